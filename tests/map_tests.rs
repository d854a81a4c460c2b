// tests/map_tests.rs

use macroquad::math::{ivec2, IVec2};
use macroquad_grid_world::{
    collides, parse_animation_table, parse_hitbox_table, triggered_events, Hitbox, IRect,
    MovementInclusion, SceneEventId, TileMap, TileMapLayer, TileTables,
};

const HITBOXES: &str = r#"{ "tiles": [
    { "name": "wall(0,0)", "shape": "FULL" },
    { "name": "ledge(64,0)", "shape": ["0,0,64,16"] }
] }"#;

fn tables() -> TileTables {
    TileTables::new(
        parse_hitbox_table(HITBOXES).unwrap(),
        parse_animation_table(r#"{ "tiles": [] }"#).unwrap(),
    )
}

fn probe() -> Hitbox {
    Hitbox::entitybox(IVec2::ZERO, vec![IRect::new(0, 0, 4, 4)], true, true)
}

#[test]
fn replaced_layer_keeps_collision_in_sync() {
    let t = tables();
    let mut map = TileMap::parse("<1>grass{0,0}:grass{0,0}<2>BLACK", &t).unwrap();
    map.load_tile_hitboxes(&t.hitboxes).unwrap();
    let at = ivec2(70, 120);
    assert!(!map.collision(1, at, &probe()));

    map.add_layer(TileMapLayer::parse(1, "wall{0,0}:grass{0,0}", &t).unwrap());
    map.load_tile_hitboxes(&t.hitboxes).unwrap();
    assert_eq!(map.layers().iter().map(|l| l.layer()).collect::<Vec<_>>(), [1, 2]);
    assert!(map.collision(1, at, &probe()));
}

#[test]
fn partial_tile_shapes_only_cover_their_rects() {
    let t = tables();
    let mut map = TileMap::parse("<1>ledge{64,0}", &t).unwrap();
    map.load_tile_hitboxes(&t.hitboxes).unwrap();

    // ledge at (1,1): top 16 pixels are y 112..128
    assert!(map.collision(1, ivec2(80, 126), &probe()));
    assert!(!map.collision(1, ivec2(80, 90), &probe()));
}

#[test]
fn bounding_uses_widest_and_tallest_layers() {
    let t = TileTables::default();
    let map = TileMap::parse("<1>a{0,0}:a{0,0}:a{0,0}:a{0,0}<2>a{0,0};a{0,0};a{0,0}", &t).unwrap();
    let extent = map.extent(None);
    assert_eq!((extent.max_width, extent.max_height), (4, 3));
    assert_eq!(map.bounding(None, 1.0), IRect::new(64, 256, 256, 192));
    assert_eq!(map.center(None, 1.0), ivec2(192, 160));
}

#[test]
fn cell_positions_sit_one_row_up() {
    assert_eq!(TileMap::cell_position(2, 3, IVec2::ZERO), ivec2(128, 256));
    assert_eq!(TileMap::cell_position(2, 3, ivec2(5, -5)), ivec2(133, 251));
}

#[test]
fn entities_trigger_scene_events() {
    let door = Hitbox::eventbox(SceneEventId(7), ivec2(0, 64), vec![IRect::full_tile()], true);
    let locked = Hitbox::eventbox(SceneEventId(8), ivec2(0, 64), vec![IRect::full_tile()], false);
    let far = Hitbox::eventbox(SceneEventId(9), ivec2(640, 64), vec![IRect::full_tile()], true);
    let events = [door, locked, far];

    let player = Hitbox::entitybox(ivec2(10, 50), vec![IRect::new(0, 0, 16, 16)], true, true);
    let found: Vec<_> = triggered_events(&player, &events).collect();
    assert_eq!(found, vec![SceneEventId(7)]);

    let ghost = Hitbox::entitybox(ivec2(10, 50), vec![IRect::new(0, 0, 16, 16)], true, false);
    assert_eq!(triggered_events(&ghost, &events).count(), 0);
}

#[test]
fn tile_inclusion_decides_edge_contact() {
    // tile spans x 0..64, y 0..64; the entity starts at its top-right corner
    let tile_at = ivec2(0, 64);
    let overlap = Hitbox::tilebox(MovementInclusion::Overlap, tile_at, vec![IRect::full_tile()], true);
    let touch = Hitbox::tilebox(MovementInclusion::Touch, tile_at, vec![IRect::full_tile()], true);
    let entity = Hitbox::entitybox(ivec2(64, 64), vec![IRect::new(0, 0, 8, 8)], true, true);

    assert!(!collides(&overlap, &entity));
    assert!(collides(&touch, &entity));
    assert!(collides(&entity, &touch));
}
