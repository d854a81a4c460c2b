use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building a tile map or loading its shape tables.
#[derive(Debug, Error)]
pub enum MapError {
    /// File I/O error
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// JSON decode error
    #[error("failed to parse JSON in {path}: {source}")]
    Json {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
    /// A layer segment does not start with `<index>>`
    #[error("malformed layer header '{segment}'")]
    MalformedLayerHeader {
        /// The offending segment, truncated to its header
        segment: String,
    },
    /// A tile token is neither `BLACK` nor `name{x,y}`
    #[error("layer {layer}: malformed tile token '{token}'")]
    MalformedToken {
        /// Layer the token belongs to
        layer: i32,
        /// The offending token
        token: String,
    },
    /// A hitbox table rectangle is not `x,y,width,height`
    #[error("hitbox '{reference}': malformed rectangle '{rect}'")]
    MalformedHitboxRect {
        /// Hitbox reference string
        reference: String,
        /// The offending rectangle definition
        rect: String,
    },
    /// A tile is flagged as having a hitbox but the table has no entry
    #[error("no hitbox shape for tile reference '{reference}'")]
    MissingHitbox {
        /// Tile reference string, `name(x,y)`
        reference: String,
    },
    /// Anything else wrong with the map description or tables
    #[error("invalid map: {0}")]
    InvalidMap(String),
}
