use crate::command::DrawCommand;
use crate::error::MapError;
use crate::geom::{IRect, TILE_SIZE};
use crate::hitbox::{Hitbox, MovementInclusion};
use crate::layer::TileMapLayer;
use crate::loader::json_loader::{load_animation_table, load_hitbox_table, read_map_text};
use crate::render::cull::{query_line_tiles, query_visible_tiles, GridAxis};
use crate::tables::{HitboxShapeTable, TileTables};
use crate::tile::Tile;
use anyhow::Context;
use macroquad::math::{ivec2, IVec2, Rect};
use std::collections::HashMap;
use std::path::Path;

/// Starts a layer segment in a map description.
pub const LAYER_DELIMITER: char = '<';
/// Ends the layer index at the front of a segment.
pub const LAYER_INDEX_END: char = '>';

/// Resolved tile hitboxes keyed by reference, `name(x,y)`. Shapes are
/// stored at the origin and placed on each tile at query time.
pub type TileHitboxes = HashMap<String, Hitbox>;

/// Smallest and largest layer extents, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapExtent {
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
}

impl Default for MapExtent {
    fn default() -> Self {
        Self {
            min_width: 1,
            max_width: 1,
            min_height: 1,
            max_height: 1,
        }
    }
}

impl MapExtent {
    /// Folds layer dimensions into an extent that never drops below 1x1.
    pub fn from_layers<'a>(layers: impl IntoIterator<Item = &'a TileMapLayer>) -> Self {
        layers
            .into_iter()
            .fold(MapExtent::default(), |mut e, l| {
                e.min_width = e.min_width.min(l.width());
                e.max_width = e.max_width.max(l.width());
                e.min_height = e.min_height.min(l.height());
                e.max_height = e.max_height.max(l.height());
                e
            })
    }

    /// Draw-space rectangle around the extent at `stretch`. Rows grow
    /// upward, so the top edge sits one tile above the highest row.
    pub fn bounding(&self, stretch: f32) -> IRect {
        let unit = TILE_SIZE as f32 * stretch;
        let scale = |tiles: i32| (tiles as f32 * unit).round_ties_even() as i32;
        IRect::new(
            scale(self.min_width),
            scale(self.max_height + 1),
            scale(self.max_width - self.min_width + 1),
            scale(self.max_height - self.min_height + 1),
        )
    }

    pub fn center(&self, stretch: f32) -> IVec2 {
        self.bounding(stretch).center()
    }
}

/// A stack of tile layers plus the hitboxes of the tiles in them.
#[derive(Debug, Clone, Default)]
pub struct TileMap {
    layers: Vec<TileMapLayer>,
    tile_hitboxes: TileHitboxes,
    tile_sets: Vec<String>,
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `<1>rows<2>rows...`.
    pub fn parse(description: &str, tables: &TileTables) -> Result<Self, MapError> {
        let mut map = TileMap::new();
        for segment in description.split(LAYER_DELIMITER).filter(|s| !s.is_empty()) {
            let (index, body) = segment.split_once(LAYER_INDEX_END).ok_or_else(|| {
                MapError::MalformedLayerHeader {
                    segment: header_of(segment),
                }
            })?;
            let index: i32 = index
                .trim()
                .parse()
                .map_err(|_| MapError::MalformedLayerHeader {
                    segment: header_of(segment),
                })?;
            map.add_layer(TileMapLayer::parse(index, body, tables)?);
        }
        Ok(map)
    }

    /// Reads the map text and both tables from disk, then resolves tile
    /// hitboxes and tile-set indices.
    pub fn load(
        map_path: impl AsRef<Path>,
        hitbox_path: impl AsRef<Path>,
        animation_path: impl AsRef<Path>,
    ) -> anyhow::Result<Self> {
        let map_path = map_path.as_ref();
        let hitboxes = load_hitbox_table(hitbox_path.as_ref())
            .with_context(|| format!("Loading hitbox table for {}", map_path.display()))?;
        let animations = load_animation_table(animation_path.as_ref())
            .with_context(|| format!("Loading animation table for {}", map_path.display()))?;
        let tables = TileTables::new(hitboxes, animations);

        let text = read_map_text(map_path)?;
        let mut map = TileMap::parse(&text, &tables)
            .with_context(|| format!("Parsing map {}", map_path.display()))?;
        map.load_tile_hitboxes(&tables.hitboxes)?;
        map.index_tile_sets();
        log::info!(
            "loaded {} with {} layers and {} tile hitboxes",
            map_path.display(),
            map.layers.len(),
            map.tile_hitboxes.len()
        );
        Ok(map)
    }

    /// Inserts `layer`, replacing an existing layer with the same index in
    /// its slot.
    pub fn add_layer(&mut self, layer: TileMapLayer) {
        if let Some(slot) = self.layers.iter_mut().find(|l| l.layer() == layer.layer()) {
            log::debug!("replacing layer {}", layer.layer());
            *slot = layer;
            return;
        }
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[TileMapLayer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, layer: i32) -> Option<&TileMapLayer> {
        self.layers.iter().find(|l| l.layer() == layer)
    }

    /// Layers whose index is in `layers`, in map order.
    pub fn layers_for<'a>(&'a self, layers: &'a [i32]) -> impl Iterator<Item = &'a TileMapLayer> + 'a {
        self.layers
            .iter()
            .filter(move |l| layers.contains(&l.layer()))
    }

    fn selected<'a>(
        &'a self,
        layers: Option<&'a [i32]>,
    ) -> impl Iterator<Item = &'a TileMapLayer> + 'a {
        self.layers
            .iter()
            .filter(move |l| layers.map_or(true, |sel| sel.contains(&l.layer())))
    }

    pub fn tile_hitboxes(&self) -> &TileHitboxes {
        &self.tile_hitboxes
    }

    /// Resolves the shape of every tile flagged with a hitbox, once per
    /// reference. Safe to call again after adding layers.
    pub fn load_tile_hitboxes(&mut self, table: &HitboxShapeTable) -> Result<(), MapError> {
        let before = self.tile_hitboxes.len();
        for tile in self.layers.iter().flat_map(|l| l.tiles()) {
            if !tile.has_hitbox() {
                continue;
            }
            let reference = tile.reference();
            if self.tile_hitboxes.contains_key(&reference) {
                continue;
            }
            let shape = table
                .get(&reference)
                .ok_or_else(|| MapError::MissingHitbox {
                    reference: reference.clone(),
                })?;
            let hitbox = Hitbox::tilebox(MovementInclusion::Overlap, IVec2::ZERO, shape.rects(), true);
            self.tile_hitboxes.insert(reference, hitbox);
        }
        log::debug!(
            "resolved {} new tile hitboxes",
            self.tile_hitboxes.len() - before
        );
        Ok(())
    }

    /// Collision against one layer only; false when the layer is missing.
    pub fn collision(&self, layer: i32, position: IVec2, hitbox: &Hitbox) -> bool {
        self.layer(layer)
            .is_some_and(|l| l.check_layer_collision(position, hitbox, &self.tile_hitboxes))
    }

    /// Extent of the selected layers, all layers when `layers` is `None`.
    pub fn extent(&self, layers: Option<&[i32]>) -> MapExtent {
        MapExtent::from_layers(self.selected(layers))
    }

    pub fn bounding(&self, layers: Option<&[i32]>, stretch: f32) -> IRect {
        self.extent(layers).bounding(stretch)
    }

    pub fn center(&self, layers: Option<&[i32]>, stretch: f32) -> IVec2 {
        self.extent(layers).center(stretch)
    }

    /// Assigns every tile an index into [`TileMap::tile_sets`], one entry
    /// per distinct tile-set name in first-seen order.
    pub fn index_tile_sets(&mut self) -> &[String] {
        let mut lookup: HashMap<String, usize> = self
            .tile_sets
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        for layer in &mut self.layers {
            for tile in layer.tiles_mut() {
                let next = lookup.len();
                let index = *lookup.entry(tile.tile_set().to_owned()).or_insert_with(|| {
                    self.tile_sets.push(tile.tile_set().to_owned());
                    next
                });
                tile.set_graphics_index(index);
            }
        }
        &self.tile_sets
    }

    /// Tile-set names the renderer has to load, by graphics index.
    pub fn tile_sets(&self) -> &[String] {
        &self.tile_sets
    }

    /// Tiles that animate, for the animation system to advance.
    pub fn animated_tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.tiles_mut().iter_mut())
            .filter(|t| t.is_animated())
    }

    /// Draw commands for the selected layers' tiles whose cells intersect
    /// the draw-space `area`. Tiles are only emitted after
    /// [`TileMap::index_tile_sets`].
    pub fn draw_commands(&self, area: Rect, layers: Option<&[i32]>, stretch: f32) -> Vec<DrawCommand> {
        query_visible_tiles(self.selected(layers), area, stretch)
    }

    /// Draw commands for whole rows (`y` coordinates, 1 at the bottom) of
    /// the selected layers.
    pub fn draw_commands_rows(&self, layers: Option<&[i32]>, rows: &[i32], stretch: f32) -> Vec<DrawCommand> {
        query_line_tiles(self.selected(layers), GridAxis::Row, rows, stretch)
    }

    /// Draw commands for whole columns (`x` coordinates) of the selected
    /// layers.
    pub fn draw_commands_columns(
        &self,
        layers: Option<&[i32]>,
        columns: &[i32],
        stretch: f32,
    ) -> Vec<DrawCommand> {
        query_line_tiles(self.selected(layers), GridAxis::Column, columns, stretch)
    }

    /// Drops every layer, hitbox and tile-set entry.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.tile_hitboxes.clear();
        self.tile_sets.clear();
    }

    /// Map-space top-left of the cell `(column, row)` offset by a pixel
    /// amount, as used when placing sprites onto the grid.
    pub fn cell_position(column: i32, row: i32, offset: IVec2) -> IVec2 {
        ivec2(column * TILE_SIZE + offset.x, (row + 1) * TILE_SIZE + offset.y)
    }
}

fn header_of(segment: &str) -> String {
    segment.chars().take(16).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::HitboxShape;

    fn tables() -> TileTables {
        let mut t = TileTables::default();
        t.hitboxes.insert("wall(0,0)", HitboxShape::Full);
        t.hitboxes.insert(
            "fence(64,0)",
            HitboxShape::Rects(vec![IRect::new(0, 0, 64, 8)]),
        );
        t
    }

    #[test]
    fn parses_layers_by_index() {
        let map = TileMap::parse("<1>grass{0,0}:grass{0,0}<2>wall{0,0}", &tables()).unwrap();
        assert_eq!(map.layer_count(), 2);
        assert_eq!(map.layer(1).unwrap().len(), 2);
        assert!(map.layer(2).unwrap().get_tile(0).unwrap().has_hitbox());
        assert!(map.layer(3).is_none());
    }

    #[test]
    fn rejects_bad_headers() {
        for bad in ["<x>a{0,0}", "<1a{0,0}"] {
            let err = TileMap::parse(bad, &tables()).unwrap_err();
            assert!(matches!(err, MapError::MalformedLayerHeader { .. }), "{bad}");
        }
    }

    #[test]
    fn add_layer_replaces_in_place() {
        let t = TileTables::default();
        let mut map = TileMap::parse("<1>a{0,0}<2>b{0,0}<3>c{0,0}", &t).unwrap();
        map.add_layer(TileMapLayer::parse(2, "z{0,0}:z{0,0}", &t).unwrap());

        let order: Vec<i32> = map.layers().iter().map(|l| l.layer()).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(map.layer(2).unwrap().len(), 2);
        assert_eq!(map.layer(2).unwrap().get_tile(0).unwrap().tile_set(), "z");
    }

    #[test]
    fn hitboxes_resolve_once() {
        let t = tables();
        let mut map = TileMap::parse("<1>wall{0,0}:wall{0,0}:fence{64,0}", &t).unwrap();
        map.load_tile_hitboxes(&t.hitboxes).unwrap();
        map.load_tile_hitboxes(&t.hitboxes).unwrap();
        assert_eq!(map.tile_hitboxes().len(), 2);
        assert_eq!(
            map.tile_hitboxes()["fence(64,0)"].geometry.rects(),
            &[IRect::new(0, 0, 64, 8)]
        );
    }

    #[test]
    fn missing_table_entry_is_an_error() {
        let t = tables();
        let map_tables = tables();
        let mut map = TileMap::parse("<1>wall{0,0}", &map_tables).unwrap();
        let empty = HitboxShapeTable::new();
        let err = map.load_tile_hitboxes(&empty).unwrap_err();
        assert!(matches!(err, MapError::MissingHitbox { ref reference } if reference == "wall(0,0)"));
        map.load_tile_hitboxes(&t.hitboxes).unwrap();
    }

    #[test]
    fn collision_is_scoped_to_one_layer() {
        let t = tables();
        let mut map = TileMap::parse("<1>wall{0,0}<2>grass{0,0}", &t).unwrap();
        map.load_tile_hitboxes(&t.hitboxes).unwrap();
        let probe = Hitbox::entitybox(IVec2::ZERO, vec![IRect::new(0, 0, 4, 4)], true, true);

        // wall sits at (1,1): x 64..128, y 64..128
        let inside = ivec2(70, 120);
        assert!(map.collision(1, inside, &probe));
        assert!(!map.collision(2, inside, &probe));
        assert!(!map.collision(9, inside, &probe));
    }

    #[test]
    fn empty_map_bounding_is_one_tile() {
        let map = TileMap::new();
        let b = map.bounding(None, 1.0);
        assert_eq!(b, IRect::new(64, 128, 64, 64));
        assert!(b.w > 0 && b.h > 0);
        assert_eq!(map.center(None, 1.0), ivec2(96, 96));
    }

    #[test]
    fn bounding_scales_and_selects_layers() {
        let t = TileTables::default();
        let map = TileMap::parse("<1>a{0,0}:a{0,0}:a{0,0};a{0,0}<2>a{0,0}", &t).unwrap();
        assert_eq!(map.bounding(None, 1.0), IRect::new(64, 192, 192, 128));
        assert_eq!(map.bounding(None, 0.5), IRect::new(32, 96, 96, 64));
        assert_eq!(map.bounding(Some(&[2]), 1.0), IRect::new(64, 128, 64, 64));
        assert_eq!(map.center(None, 1.0), ivec2(160, 128));
    }

    #[test]
    fn tile_sets_are_indexed_in_first_seen_order() {
        let t = TileTables::default();
        let mut map = TileMap::parse("<1>b{0,0}:a{0,0}:b{64,0}<2>BLACK:a{0,0}", &t).unwrap();
        let names = map.index_tile_sets().to_vec();
        assert_eq!(names, vec!["b", "a", "BLACK"]);
        let idx: Vec<_> = map.layer(1).unwrap().tiles().iter().map(|t| t.graphics_index()).collect();
        assert_eq!(idx, vec![Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn draw_commands_follow_layer_selection() {
        let t = TileTables::default();
        let mut map = TileMap::parse("<1>a{0,0}<2>b{0,0}", &t).unwrap();
        assert!(map.draw_commands(Rect::new(0.0, -256.0, 256.0, 256.0), None, 1.0).is_empty());

        map.index_tile_sets();
        let area = Rect::new(0.0, -256.0, 256.0, 256.0);
        assert_eq!(map.draw_commands(area, None, 1.0).len(), 2);
        let only_b = map.draw_commands(area, Some(&[2]), 1.0);
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].tileset_index, 1);
        assert!(map.draw_commands(Rect::new(1000.0, 1000.0, 10.0, 10.0), None, 1.0).is_empty());
    }

    #[test]
    fn row_and_column_selection() {
        let t = TileTables::default();
        let mut map = TileMap::parse("<1>a{0,0}:b{0,0};c{0,0}:d{0,0}<2>e{0,0}:f{0,0}", &t).unwrap();
        map.index_tile_sets();

        let names = |cmds: Vec<DrawCommand>| -> Vec<String> {
            cmds.iter().map(|c| map.tile_sets()[c.tileset_index].clone()).collect()
        };
        assert_eq!(names(map.draw_commands_rows(None, &[1], 1.0)), ["c", "d", "e", "f"]);
        assert_eq!(names(map.draw_commands_rows(Some(&[1]), &[2], 1.0)), ["a", "b"]);
        assert_eq!(names(map.draw_commands_columns(None, &[2], 1.0)), ["d", "b", "f"]);
        assert_eq!(names(map.draw_commands_columns(Some(&[2]), &[1, 2], 1.0)), ["e", "f"]);
        assert!(map.draw_commands_rows(None, &[3], 1.0).is_empty());
    }

    #[test]
    fn animated_tiles_can_be_advanced() {
        let mut t = TileTables::default();
        t.animations
            .insert("water{0,0}", crate::tile::TileAnimation::new(4, 100, 200));
        let mut map = TileMap::parse("<1>water{0,0}:sand{0,0}:water{0,0}", &t).unwrap();
        for tile in map.animated_tiles_mut() {
            if let Some(anim) = tile.animation_mut() {
                anim.set_phase(5);
            }
        }
        let layer = map.layer(1).unwrap();
        assert_eq!(layer.get_tile(0).unwrap().source_rect().x, 64);
        assert_eq!(layer.get_tile(1).unwrap().source_rect().x, 0);
        assert_eq!(map.animated_tiles_mut().count(), 2);
    }

    #[test]
    fn clear_resets_everything() {
        let t = tables();
        let mut map = TileMap::parse("<1>wall{0,0}", &t).unwrap();
        map.load_tile_hitboxes(&t.hitboxes).unwrap();
        map.index_tile_sets();
        map.clear();
        assert_eq!(map.layer_count(), 0);
        assert!(map.tile_hitboxes().is_empty());
        assert!(map.tile_sets().is_empty());
    }
}
