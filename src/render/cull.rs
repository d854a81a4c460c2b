use crate::command::DrawCommand;
use crate::geom::TILE_SIZE;
use crate::layer::TileMapLayer;
use crate::tile::Tile;
use macroquad::math::{vec2, IVec2, Rect};

/// Which grid coordinate a line selection matches: rows are the `y`
/// coordinate (counted from the bottom), columns the `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    Row,
    Column,
}

impl GridAxis {
    fn index_of(self, coordinate: IVec2) -> i32 {
        match self {
            GridAxis::Row => coordinate.y,
            GridAxis::Column => coordinate.x,
        }
    }
}

/// Draw-space cell of `tile` at `stretch`. Map rows grow upward, so the
/// cell's top edge is the negated map y of the row above.
pub fn cell_rect(tile: &Tile, stretch: f32) -> Rect {
    let size = TILE_SIZE as f32 * stretch;
    let c = tile.coordinate();
    Rect::new(c.x as f32 * size, -((c.y + 1) as f32) * size, size, size)
}

fn command_for(layer: &TileMapLayer, tile: &Tile, stretch: f32) -> Option<DrawCommand> {
    let tileset_index = tile.graphics_index()?;
    let cell = cell_rect(tile, stretch);
    Some(DrawCommand {
        layer: layer.layer(),
        tileset_index,
        src: tile.source_rect(),
        dest: vec2(cell.x, cell.y),
        size: cell.w,
    })
}

/// Commands for every indexed tile whose cell intersects `area`, in layer
/// order and then parse order. Tiles without a graphics index are skipped.
pub fn query_visible_tiles<'a>(
    layers: impl IntoIterator<Item = &'a TileMapLayer>,
    area: Rect,
    stretch: f32,
) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    for layer in layers {
        for tile in layer.tiles() {
            if !area.overlaps(&cell_rect(tile, stretch)) {
                continue;
            }
            out.extend(command_for(layer, tile, stretch));
        }
    }
    out
}

/// Commands for the tiles on the given rows or columns. Lines come out in
/// the order requested, each one in layer order then parse order.
pub fn query_line_tiles<'a>(
    layers: impl IntoIterator<Item = &'a TileMapLayer>,
    axis: GridAxis,
    lines: &[i32],
    stretch: f32,
) -> Vec<DrawCommand> {
    let layers: Vec<&TileMapLayer> = layers.into_iter().collect();
    let mut out = Vec::new();
    for &line in lines {
        for layer in &layers {
            out.extend(
                layer
                    .tiles()
                    .iter()
                    .filter(|t| axis.index_of(t.coordinate()) == line)
                    .filter_map(|t| command_for(layer, t, stretch)),
            );
        }
    }
    out
}
