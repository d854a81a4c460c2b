// src/loader/json_loader.rs
use crate::config::CameraConfig;
use crate::error::MapError;
use crate::tables::{AnimationTable, HitboxShape, HitboxShapeTable, FULL};
use crate::tile::TileAnimation;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JsonHitboxTable {
    #[serde(default)]
    tiles: Vec<JsonHitboxEntry>,
}

#[derive(Deserialize)]
struct JsonHitboxEntry {
    name: String,
    shape: JsonShape,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonShape {
    Marker(String),
    Rects(Vec<String>),
}

#[derive(Deserialize)]
struct JsonAnimationTable {
    #[serde(default)]
    tiles: Vec<JsonAnimationEntry>,
}

#[derive(Deserialize)]
struct JsonAnimationEntry {
    name: String,
    #[serde(default = "one")]
    frames: u32,
    #[serde(default)]
    min_duration: u32,
    #[serde(default)]
    max_duration: u32,
}

fn one() -> u32 {
    1
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::InvalidMap(format!(
            "Table file must be a JSON file: {}",
            path.display()
        )));
    }
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T, MapError> {
    serde_json::from_str(json).map_err(|source| MapError::Json {
        path: PathBuf::from("<inline>"),
        source,
    })
}

fn hitbox_table_from_json(j: JsonHitboxTable) -> Result<HitboxShapeTable, MapError> {
    let mut table = HitboxShapeTable::new();
    for entry in j.tiles {
        let shape = match entry.shape {
            JsonShape::Marker(m) if m.trim() == FULL => HitboxShape::Full,
            JsonShape::Marker(m) => {
                return Err(MapError::InvalidMap(format!(
                    "hitbox '{}': unknown shape marker '{}'",
                    entry.name, m
                )))
            }
            JsonShape::Rects(rects) => HitboxShape::from_entries(&entry.name, rects.as_slice())?,
        };
        table.insert(entry.name, shape);
    }
    Ok(table)
}

fn animation_table_from_json(j: JsonAnimationTable) -> AnimationTable {
    let mut table = AnimationTable::new();
    for entry in j.tiles {
        table.insert(
            entry.name,
            TileAnimation::new(entry.frames, entry.min_duration, entry.max_duration),
        );
    }
    table
}

pub fn load_hitbox_table(path: &Path) -> Result<HitboxShapeTable, MapError> {
    hitbox_table_from_json(read_json(path)?)
}

pub fn parse_hitbox_table(json: &str) -> Result<HitboxShapeTable, MapError> {
    hitbox_table_from_json(parse_json(json)?)
}

pub fn load_animation_table(path: &Path) -> Result<AnimationTable, MapError> {
    Ok(animation_table_from_json(read_json(path)?))
}

pub fn parse_animation_table(json: &str) -> Result<AnimationTable, MapError> {
    Ok(animation_table_from_json(parse_json(json)?))
}

pub fn load_camera_config(path: &Path) -> Result<CameraConfig, MapError> {
    read_json(path)
}

pub fn parse_camera_config(json: &str) -> Result<CameraConfig, MapError> {
    parse_json(json)
}

/// Reads a map description, dropping line breaks so descriptions can be
/// wrapped one row per line.
pub fn read_map_text(path: &Path) -> Result<String, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(txt.chars().filter(|c| !c.is_whitespace()).collect())
}
