//! Layered tile-grid world for Macroquad: text-described tile maps with
//! per-tile hitboxes and animations, kind-aware collision, and a
//! map-bounded camera with steppable pans.

mod camera;
mod command;
mod config;
mod error;
mod geom;
mod hitbox;
mod layer;
mod loader {
    pub mod json_loader;
}
mod map;
mod render {
    pub mod cull;
}
mod tables;
mod tile;

pub use camera::{Camera, CameraAction, CameraPan, Horizontal, PanPhase, Vertical};
pub use command::DrawCommand;
pub use config::{CameraConfig, BASE_ZOOM};
pub use error::MapError;
pub use geom::{IRect, TILE_SIZE};
pub use hitbox::{
    collides, collides_at, triggered_events, Hitbox, HitboxGeometry, HitboxKind,
    MovementInclusion, SceneEventId,
};
pub use layer::{TileMapLayer, COLUMN_DELIMITER, ROW_DELIMITER};
pub use loader::json_loader::{
    load_animation_table, load_hitbox_table, parse_animation_table, parse_hitbox_table,
    read_map_text,
};
pub use map::{MapExtent, TileHitboxes, TileMap, LAYER_DELIMITER, LAYER_INDEX_END};
pub use render::cull::cell_rect;
pub use tables::{AnimationTable, HitboxShape, HitboxShapeTable, TileTables, FULL};
pub use tile::{Tile, TileAnimation, TileToken, BLACK};
