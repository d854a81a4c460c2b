use crate::error::MapError;
use crate::geom::{IRect, TILE_SIZE};
use macroquad::math::{ivec2, IVec2};
use std::fmt;

/// Token used for an opaque filler cell with no tile-set image.
pub const BLACK: &str = "BLACK";

/// A parsed tile token: `BLACK` or `name{x,y}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TileToken {
    Black,
    Sheet { tile_set: String, origin: IVec2 },
}

impl TileToken {
    /// Parses one column token. `layer` is only used for error reporting.
    pub fn parse(token: &str, layer: i32) -> Result<Self, MapError> {
        if token == BLACK {
            return Ok(TileToken::Black);
        }

        let malformed = || MapError::MalformedToken {
            layer,
            token: token.to_owned(),
        };

        let (name, rest) = token.split_once('{').ok_or_else(malformed)?;
        let inner = rest.strip_suffix('}').ok_or_else(malformed)?;
        let (x, y) = inner.split_once(',').ok_or_else(malformed)?;
        let x: i32 = x.trim().parse().map_err(|_| malformed())?;
        let y: i32 = y.trim().parse().map_err(|_| malformed())?;

        Ok(TileToken::Sheet {
            tile_set: name.to_owned(),
            origin: ivec2(x, y),
        })
    }

    pub fn tile_set(&self) -> &str {
        match self {
            TileToken::Black => BLACK,
            TileToken::Sheet { tile_set, .. } => tile_set,
        }
    }

    /// Top-left of the 64x64 source cell inside the tile-set image.
    pub fn origin(&self) -> IVec2 {
        match self {
            TileToken::Black => IVec2::ZERO,
            TileToken::Sheet { origin, .. } => *origin,
        }
    }

    /// Hitbox table key, `name(x,y)`.
    pub fn reference(&self) -> String {
        let o = self.origin();
        format!("{}({},{})", self.tile_set(), o.x, o.y)
    }
}

impl fmt::Display for TileToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileToken::Black => f.write_str(BLACK),
            TileToken::Sheet { tile_set, origin } => {
                write!(f, "{}{{{},{}}}", tile_set, origin.x, origin.y)
            }
        }
    }
}

/// Frame data for an animated tile. Frames sit side by side in the tile-set
/// image, starting at the tile's source cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileAnimation {
    pub frame_count: u32,
    pub min_frame_duration: u32,
    pub max_frame_duration: u32,
    phase: u32,
}

impl TileAnimation {
    pub fn new(frame_count: u32, min_frame_duration: u32, max_frame_duration: u32) -> Self {
        Self {
            frame_count: frame_count.max(1),
            min_frame_duration,
            max_frame_duration,
            phase: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Sets the current frame, wrapping past the last one.
    pub fn set_phase(&mut self, phase: u32) {
        self.phase = phase % self.frame_count.max(1);
    }
}

/// One cell of a [`crate::TileMapLayer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    token: TileToken,
    coordinate: IVec2,
    has_hitbox: bool,
    animation: Option<TileAnimation>,
    graphics_index: Option<usize>,
}

impl Tile {
    /// A static tile at `(column, row)`.
    pub fn new(token: TileToken, column: i32, row: i32, has_hitbox: bool) -> Self {
        Self {
            token,
            coordinate: ivec2(column, row),
            has_hitbox,
            animation: None,
            graphics_index: None,
        }
    }

    pub fn animated(
        token: TileToken,
        column: i32,
        row: i32,
        has_hitbox: bool,
        animation: TileAnimation,
    ) -> Self {
        Self {
            animation: Some(animation),
            ..Self::new(token, column, row, has_hitbox)
        }
    }

    #[inline]
    pub fn token(&self) -> &TileToken {
        &self.token
    }

    #[inline]
    pub fn tile_set(&self) -> &str {
        self.token.tile_set()
    }

    #[inline]
    pub fn tile_set_coordinate(&self) -> IVec2 {
        self.token.origin()
    }

    /// `(column, row)` in the layer.
    #[inline]
    pub fn coordinate(&self) -> IVec2 {
        self.coordinate
    }

    #[inline]
    pub fn has_hitbox(&self) -> bool {
        self.has_hitbox
    }

    pub fn is_black(&self) -> bool {
        matches!(self.token, TileToken::Black)
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation(&self) -> Option<&TileAnimation> {
        self.animation.as_ref()
    }

    /// Hook for the animation system, the only writer of the phase.
    pub fn animation_mut(&mut self) -> Option<&mut TileAnimation> {
        self.animation.as_mut()
    }

    pub fn reference(&self) -> String {
        self.token.reference()
    }

    /// Map-space top-left corner of the cell.
    pub fn origin(&self) -> IVec2 {
        ivec2(self.coordinate.x * TILE_SIZE, (self.coordinate.y + 1) * TILE_SIZE)
    }

    /// Source rectangle in the tile-set image, advanced to the current
    /// frame for animated tiles.
    pub fn source_rect(&self) -> IRect {
        let o = self.token.origin();
        let frame = self.animation.map_or(0, |a| a.phase() as i32);
        IRect::new(o.x + frame * TILE_SIZE, o.y, TILE_SIZE, TILE_SIZE)
    }

    /// Index into [`crate::TileMap::tile_sets`], once assigned.
    pub fn graphics_index(&self) -> Option<usize> {
        self.graphics_index
    }

    pub(crate) fn set_graphics_index(&mut self, index: usize) {
        self.graphics_index = Some(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sheet_token() {
        let t = TileToken::parse("grass{64,128}", 1).unwrap();
        assert_eq!(t.tile_set(), "grass");
        assert_eq!(t.origin(), ivec2(64, 128));
        assert_eq!(t.reference(), "grass(64,128)");
        assert_eq!(t.to_string(), "grass{64,128}");
    }

    #[test]
    fn parses_black_sentinel() {
        let t = TileToken::parse("BLACK", 0).unwrap();
        assert_eq!(t, TileToken::Black);
        assert_eq!(t.reference(), "BLACK(0,0)");
    }

    #[test]
    fn rejects_malformed_tokens() {
        for bad in ["grass", "grass{1}", "grass{a,b}", "grass{1,2", "{1,2,3}"] {
            let err = TileToken::parse(bad, 3).unwrap_err();
            assert!(
                matches!(&err, MapError::MalformedToken { layer: 3, token } if token == bad),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn origin_is_top_left_of_cell() {
        let t = Tile::new(TileToken::Black, 2, 1, false);
        assert_eq!(t.origin(), ivec2(128, 128));
    }

    #[test]
    fn animated_source_rect_follows_phase() {
        let token = TileToken::parse("water{0,64}", 1).unwrap();
        let mut t = Tile::animated(token, 1, 1, false, TileAnimation::new(4, 100, 200));
        assert_eq!(t.source_rect(), IRect::new(0, 64, 64, 64));
        t.animation_mut().unwrap().set_phase(6);
        assert_eq!(t.animation().unwrap().phase(), 2);
        assert_eq!(t.source_rect(), IRect::new(128, 64, 64, 64));
    }
}
