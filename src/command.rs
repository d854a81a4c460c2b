use crate::geom::IRect;
use macroquad::math::Vec2;

/// One tile ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub layer: i32,
    /// Index into [`crate::TileMap::tile_sets`].
    pub tileset_index: usize,
    /// Source rectangle in the tile-set image, animation frame applied.
    pub src: IRect,
    /// Draw-space top-left (Y-down).
    pub dest: Vec2,
    /// Drawn width and height of the tile.
    pub size: f32,
}
