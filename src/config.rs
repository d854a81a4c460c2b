use crate::error::MapError;
use crate::loader::json_loader::{load_camera_config, parse_camera_config};
use serde::Deserialize;
use std::path::Path;

/// Zoom level at which one tile is drawn 64 pixels wide (stretch 1.0).
pub const BASE_ZOOM: u8 = 64;

/// Camera settings. Every field has a default so a partial (or empty) JSON
/// object is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CameraConfig {
    /// Back-buffer width in pixels.
    #[serde(default = "default_screen_width")]
    pub screen_width: i32,
    /// Back-buffer height in pixels.
    #[serde(default = "default_screen_height")]
    pub screen_height: i32,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u8,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    /// Distance moved per directional action.
    #[serde(default = "default_move_step")]
    pub move_step: i32,
    /// Scale from map pixels to draw space, independent of zoom.
    #[serde(default = "default_base_stretch")]
    pub base_stretch: f32,
}

fn default_screen_width() -> i32 {
    1280
}
fn default_screen_height() -> i32 {
    720
}
fn default_zoom() -> u8 {
    BASE_ZOOM
}
fn default_min_zoom() -> u8 {
    24
}
fn default_max_zoom() -> u8 {
    192
}
fn default_move_step() -> i32 {
    10
}
fn default_base_stretch() -> f32 {
    1.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            zoom: default_zoom(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            move_step: default_move_step(),
            base_stretch: default_base_stretch(),
        }
    }
}

impl CameraConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        load_camera_config(path.as_ref()).map(Self::sanitized)
    }

    pub fn from_json(json: &str) -> Result<Self, MapError> {
        parse_camera_config(json).map(Self::sanitized)
    }

    /// Orders the zoom bounds and keeps the start zoom inside them. The
    /// screen stays at least one pixel wide and high.
    pub fn sanitized(mut self) -> Self {
        self.min_zoom = self.min_zoom.max(1);
        if self.min_zoom > self.max_zoom {
            log::warn!(
                "min_zoom {} above max_zoom {}, swapping",
                self.min_zoom,
                self.max_zoom
            );
            std::mem::swap(&mut self.min_zoom, &mut self.max_zoom);
        }
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self.screen_width = self.screen_width.max(1);
        self.screen_height = self.screen_height.max(1);
        if !(self.base_stretch.is_finite() && self.base_stretch > 0.0) {
            log::warn!("base_stretch {} is not positive, using 1.0", self.base_stretch);
            self.base_stretch = 1.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(CameraConfig::from_json("{}").unwrap(), CameraConfig::default());
    }

    #[test]
    fn partial_object_overrides_fields() {
        let c = CameraConfig::from_json(r#"{ "screen_width": 640, "max_zoom": 128 }"#).unwrap();
        assert_eq!(c.screen_width, 640);
        assert_eq!(c.screen_height, 720);
        assert_eq!(c.max_zoom, 128);
    }

    #[test]
    fn sanitize_fixes_inverted_bounds() {
        let c = CameraConfig::from_json(r#"{ "min_zoom": 100, "max_zoom": 50, "zoom": 10 }"#).unwrap();
        assert_eq!((c.min_zoom, c.max_zoom, c.zoom), (50, 100, 50));
    }

    #[test]
    fn non_positive_base_stretch_falls_back() {
        let c = CameraConfig::from_json(r#"{ "base_stretch": 0.0 }"#).unwrap();
        assert_eq!(c.base_stretch, 1.0);
    }
}
