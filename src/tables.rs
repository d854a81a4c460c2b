//! Lookup tables handed to the map by configuration: which tiles have
//! hitboxes (and their shapes) and which tiles animate.

use crate::error::MapError;
use crate::geom::IRect;
use crate::tile::TileAnimation;
use std::collections::HashMap;

/// Marker meaning "one rectangle covering the whole cell".
pub const FULL: &str = "FULL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitboxShape {
    Full,
    Rects(Vec<IRect>),
}

impl HitboxShape {
    pub fn rects(&self) -> Vec<IRect> {
        match self {
            HitboxShape::Full => vec![IRect::full_tile()],
            HitboxShape::Rects(r) => r.clone(),
        }
    }

    /// Builds a shape from the raw child entries of a table row: either the
    /// single marker `FULL` or `x,y,width,height` strings.
    pub fn from_entries<S: AsRef<str>>(reference: &str, entries: &[S]) -> Result<Self, MapError> {
        if let [only] = entries {
            if only.as_ref().trim() == FULL {
                return Ok(HitboxShape::Full);
            }
        }
        entries
            .iter()
            .map(|e| parse_rect(reference, e.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(HitboxShape::Rects)
    }
}

fn parse_rect(reference: &str, text: &str) -> Result<IRect, MapError> {
    let malformed = || MapError::MalformedHitboxRect {
        reference: reference.to_owned(),
        rect: text.to_owned(),
    };
    let parts = text
        .split(',')
        .map(|p| p.trim().parse::<i32>().map_err(|_| malformed()))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        &[x, y, w, h] if w >= 0 && h >= 0 => Ok(IRect::new(x, y, w, h)),
        _ => Err(malformed()),
    }
}

/// Hitbox shapes keyed by tile reference, `name(x,y)`.
#[derive(Debug, Clone, Default)]
pub struct HitboxShapeTable {
    shapes: HashMap<String, HitboxShape>,
}

impl HitboxShapeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape. The first entry for a reference wins.
    pub fn insert(&mut self, reference: impl Into<String>, shape: HitboxShape) {
        let reference = reference.into();
        if self.shapes.contains_key(&reference) {
            log::warn!("duplicate hitbox entry for '{reference}' ignored");
            return;
        }
        self.shapes.insert(reference, shape);
    }

    pub fn get(&self, reference: &str) -> Option<&HitboxShape> {
        self.shapes.get(reference)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.shapes.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Animation data keyed by tile token, `name{x,y}`.
#[derive(Debug, Clone, Default)]
pub struct AnimationTable {
    animations: HashMap<String, TileAnimation>,
}

impl AnimationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>, animation: TileAnimation) {
        let token = token.into();
        if self.animations.contains_key(&token) {
            log::warn!("duplicate animation entry for '{token}' ignored");
            return;
        }
        self.animations.insert(token, animation);
    }

    pub fn get(&self, token: &str) -> Option<&TileAnimation> {
        self.animations.get(token)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

/// Both tables, as consulted while parsing layers.
#[derive(Debug, Clone, Default)]
pub struct TileTables {
    pub hitboxes: HitboxShapeTable,
    pub animations: AnimationTable,
}

impl TileTables {
    pub fn new(hitboxes: HitboxShapeTable, animations: AnimationTable) -> Self {
        Self {
            hitboxes,
            animations,
        }
    }
}
