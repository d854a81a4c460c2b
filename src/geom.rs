//! Integer rectangles in map space.
//!
//! Map space is Y-up: a rectangle's `y` is its **top** edge and it spans
//! down to `y - h`. Offsets inside hitbox shapes follow image layout
//! instead (`y` grows downward from the anchor), see [`IRect::offset_from`].

use macroquad::math::{ivec2, IVec2};

/// Width and height of one tile, in map units.
pub const TILE_SIZE: i32 = 64;

/// Axis-aligned integer rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// The whole 64x64 cell.
    pub const fn full_tile() -> Self {
        Self::new(0, 0, TILE_SIZE, TILE_SIZE)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y - self.h
    }

    #[inline]
    pub fn top_left(&self) -> IVec2 {
        ivec2(self.x, self.y)
    }

    /// Center point, integer division truncating toward zero.
    pub fn center(&self) -> IVec2 {
        ivec2(self.x + self.w / 2, self.y - self.h / 2)
    }

    /// Inclusive containment: points on any edge count as inside.
    pub fn contains_point(&self, p: IVec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.bottom() && p.y <= self.top()
    }

    /// True when the rectangles share positive area.
    pub fn overlaps(&self, other: &IRect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
    }

    /// Like [`IRect::overlaps`] but edge contact also counts.
    pub fn touches(&self, other: &IRect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.bottom() <= other.top()
            && other.bottom() <= self.top()
    }

    /// True when `other` lies entirely inside `self` (shared edges allowed).
    pub fn contains_rect(&self, other: &IRect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.bottom() >= self.bottom()
            && other.top() <= self.top()
    }

    /// Places an image-layout offset rectangle relative to a map-space
    /// anchor: `x` moves right, `y` moves down from the anchor's top edge.
    pub fn offset_from(&self, anchor: IVec2) -> IRect {
        IRect::new(anchor.x + self.x, anchor.y - self.y, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_and_edges_are_y_up() {
        let r = IRect::new(64, 192, 128, 128);
        assert_eq!(r.bottom(), 64);
        assert_eq!(r.right(), 192);
        assert_eq!(r.center(), ivec2(128, 128));
    }

    #[test]
    fn contains_point_is_inclusive() {
        let r = IRect::new(0, 10, 10, 10);
        assert!(r.contains_point(ivec2(0, 0)));
        assert!(r.contains_point(ivec2(10, 10)));
        assert!(!r.contains_point(ivec2(11, 5)));
        assert!(!r.contains_point(ivec2(5, -1)));
    }

    #[test]
    fn touching_is_not_overlapping() {
        let a = IRect::new(0, 64, 64, 64);
        let b = IRect::new(64, 64, 64, 64);
        assert!(!a.overlaps(&b));
        assert!(a.touches(&b));
        assert!(a.overlaps(&IRect::new(63, 64, 64, 64)));
    }

    #[test]
    fn offset_grows_downward() {
        let r = IRect::new(16, 32, 8, 8).offset_from(ivec2(64, 128));
        assert_eq!(r, IRect::new(80, 96, 8, 8));
    }
}
