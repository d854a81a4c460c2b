use crate::error::MapError;
use crate::hitbox::{collides_at, Hitbox};
use crate::map::TileHitboxes;
use crate::tables::TileTables;
use crate::tile::{Tile, TileToken};
use macroquad::math::IVec2;

/// Separates rows in a layer body.
pub const ROW_DELIMITER: char = ';';
/// Separates columns in a row.
pub const COLUMN_DELIMITER: char = ':';

/// One draw layer of a [`crate::TileMap`].
#[derive(Debug, Clone)]
pub struct TileMapLayer {
    tiles: Vec<Tile>,
    layer: i32,
    width: i32,
    height: i32,
}

impl TileMapLayer {
    /// An empty layer, 1x1 by the minimum-extent rule.
    pub fn empty(layer: i32) -> Self {
        Self {
            tiles: Vec::new(),
            layer,
            width: 1,
            height: 1,
        }
    }

    /// Parses a layer body such as `A{0,0}:B{64,0};C{0,64}:D{64,64}`.
    ///
    /// The last textual row becomes row 1. Empty rows and columns are
    /// skipped without taking up a coordinate.
    pub fn parse(layer: i32, body: &str, tables: &TileTables) -> Result<Self, MapError> {
        let mut out = Self::empty(layer);

        let rows = body
            .split(ROW_DELIMITER)
            .rev()
            .filter(|r| !r.is_empty());
        for (row, text) in (1..).zip(rows) {
            let columns = text.split(COLUMN_DELIMITER).filter(|c| !c.is_empty());
            for (column, raw) in (1..).zip(columns) {
                let token = TileToken::parse(raw, layer)?;
                let has_hitbox = tables.hitboxes.contains(&token.reference());

                let tile = match tables.animations.get(raw) {
                    Some(animation) => Tile::animated(token, column, row, has_hitbox, *animation),
                    None => Tile::new(token, column, row, has_hitbox),
                };
                out.tiles.push(tile);

                out.width = out.width.max(column);
                out.height = out.height.max(row);
            }
        }

        log::debug!(
            "parsed layer {} with {} tiles ({}x{})",
            layer,
            out.tiles.len(),
            out.width,
            out.height
        );
        Ok(out)
    }

    #[inline]
    pub fn layer(&self) -> i32 {
        self.layer
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// `(width, height)` in tiles.
    pub fn dimensions(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile by position in parse order.
    pub fn get_tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Tile at `(column, row)`.
    pub fn tile_at(&self, coordinate: IVec2) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.coordinate() == coordinate)
    }

    /// Whether `hitbox`, placed at `position`, hits any tile hitbox in this
    /// layer. Stops at the first hit.
    pub fn check_layer_collision(
        &self,
        position: IVec2,
        hitbox: &Hitbox,
        tile_hitboxes: &TileHitboxes,
    ) -> bool {
        self.tiles
            .iter()
            .filter(|t| t.has_hitbox())
            .any(|t| match tile_hitboxes.get(&t.reference()) {
                Some(shape) => collides_at(shape, t.origin(), hitbox, position),
                None => false,
            })
    }
}
