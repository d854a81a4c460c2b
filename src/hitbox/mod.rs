//! Hitboxes: rectangle-set geometry plus the collision rules that depend on
//! which kind of box sits on each side.

mod geometry;

pub use geometry::{HitboxGeometry, MovementInclusion};

use crate::geom::IRect;
use macroquad::math::IVec2;

/// Handle to a scene event owned by the scene layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneEventId(pub u32);

/// What a hitbox is attached to, and the gates that come with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitboxKind {
    /// Bare geometry, no gating.
    Plain,
    /// Static map geometry.
    Tile {
        movement_inclusion: MovementInclusion,
        entity_collision: bool,
    },
    /// Area that fires a scene event when entered.
    Event {
        event: SceneEventId,
        entity_collision: bool,
    },
    /// A moving actor. Its flags opt in to tile and event collision.
    Entity {
        tile_collision: bool,
        event_collision: bool,
    },
}

/// A named rectangle set with collision semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hitbox {
    pub geometry: HitboxGeometry,
    /// Area the owner occupies visually, offset from the anchor like the
    /// collision rectangles.
    pub visual_area: IRect,
    pub kind: HitboxKind,
}

impl Hitbox {
    pub fn plain(position: IVec2, rects: Vec<IRect>) -> Self {
        Self::with_kind(HitboxKind::Plain, position, rects)
    }

    pub fn tilebox(
        movement_inclusion: MovementInclusion,
        position: IVec2,
        rects: Vec<IRect>,
        entity_collision: bool,
    ) -> Self {
        Self::with_kind(
            HitboxKind::Tile {
                movement_inclusion,
                entity_collision,
            },
            position,
            rects,
        )
    }

    pub fn eventbox(
        event: SceneEventId,
        position: IVec2,
        rects: Vec<IRect>,
        entity_collision: bool,
    ) -> Self {
        Self::with_kind(
            HitboxKind::Event {
                event,
                entity_collision,
            },
            position,
            rects,
        )
    }

    pub fn entitybox(
        position: IVec2,
        rects: Vec<IRect>,
        tile_collision: bool,
        event_collision: bool,
    ) -> Self {
        Self::with_kind(
            HitboxKind::Entity {
                tile_collision,
                event_collision,
            },
            position,
            rects,
        )
    }

    fn with_kind(kind: HitboxKind, position: IVec2, rects: Vec<IRect>) -> Self {
        let visual_area = bounds_of(&rects);
        Self {
            geometry: HitboxGeometry::new(position, rects),
            visual_area,
            kind,
        }
    }

    pub fn with_visual_area(mut self, visual_area: IRect) -> Self {
        self.visual_area = visual_area;
        self
    }

    #[inline]
    pub fn position(&self) -> IVec2 {
        self.geometry.anchor()
    }

    pub fn set_position(&mut self, position: IVec2) {
        self.geometry.set_anchor(position);
    }

    /// Position flipped for drawing (draw space is Y-down).
    pub fn draw_position(&self) -> IVec2 {
        let p = self.position();
        IVec2::new(p.x, -p.y)
    }

    pub fn collides_with(&self, other: &Hitbox) -> bool {
        collides(self, other)
    }

    /// The scene event this box fires, if it is an event box.
    pub fn scene_event(&self) -> Option<SceneEventId> {
        match self.kind {
            HitboxKind::Event { event, .. } => Some(event),
            _ => None,
        }
    }
}

/// Smallest offset rectangle around `rects` (image layout), zero when empty.
fn bounds_of(rects: &[IRect]) -> IRect {
    let Some(first) = rects.first() else {
        return IRect::default();
    };
    let (mut x0, mut y0) = (first.x, first.y);
    let (mut x1, mut y1) = (first.x + first.w, first.y + first.h);
    for r in &rects[1..] {
        x0 = x0.min(r.x);
        y0 = y0.min(r.y);
        x1 = x1.max(r.x + r.w);
        y1 = y1.max(r.y + r.h);
    }
    IRect::new(x0, y0, x1 - x0, y1 - y0)
}

/// Collision between two hitboxes at their own positions.
pub fn collides(a: &Hitbox, b: &Hitbox) -> bool {
    collides_at(a, a.position(), b, b.position())
}

/// Collision between `a` placed at `a_at` and `b` placed at `b_at`.
///
/// Tile and event boxes only report entities that opted in, and only when
/// the box itself accepts entities. A gated-off pair is rejected before any
/// geometry is looked at. Whenever a tile box is involved its movement
/// inclusion decides what contact counts.
pub fn collides_at(a: &Hitbox, a_at: IVec2, b: &Hitbox, b_at: IVec2) -> bool {
    use HitboxKind::*;

    match (a.kind, b.kind) {
        (
            Tile {
                movement_inclusion,
                entity_collision,
            },
            Entity { tile_collision, .. },
        ) => {
            entity_collision
                && tile_collision
                && a.geometry
                    .intersects_at(a_at, &b.geometry, b_at, movement_inclusion)
        }
        (Entity { .. }, Tile { .. }) | (Entity { .. }, Event { .. }) => collides_at(b, b_at, a, a_at),
        (
            Event {
                entity_collision, ..
            },
            Entity {
                event_collision, ..
            },
        ) => {
            entity_collision
                && event_collision
                && a.geometry
                    .intersects_at(a_at, &b.geometry, b_at, MovementInclusion::Overlap)
        }
        (
            Tile {
                movement_inclusion, ..
            },
            _,
        ) => a
            .geometry
            .intersects_at(a_at, &b.geometry, b_at, movement_inclusion),
        (
            _,
            Tile {
                movement_inclusion, ..
            },
        ) => b
            .geometry
            .intersects_at(b_at, &a.geometry, a_at, movement_inclusion),
        _ => a
            .geometry
            .intersects_at(a_at, &b.geometry, b_at, MovementInclusion::Overlap),
    }
}

/// Events fired by `entity` against `eventboxes`, in slice order.
pub fn triggered_events<'a>(
    entity: &'a Hitbox,
    eventboxes: &'a [Hitbox],
) -> impl Iterator<Item = SceneEventId> + 'a {
    eventboxes
        .iter()
        .filter(move |e| collides(e, entity))
        .filter_map(Hitbox::scene_event)
}
