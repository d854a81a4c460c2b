use crate::geom::IRect;
use macroquad::math::IVec2;

/// How much contact between two rectangle sets counts as a hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MovementInclusion {
    /// Any shared area blocks.
    #[default]
    Overlap,
    /// Shared edges block as well.
    Touch,
    /// Blocks only once a rectangle of the other set is fully inside.
    Contain,
}

/// An anchor plus the rectangles hanging off it.
///
/// Rectangles are offsets in image layout (`y` grows down from the
/// anchor); the anchor is a map-space top-left point. The rectangle list
/// cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitboxGeometry {
    anchor: IVec2,
    rects: Box<[IRect]>,
}

impl HitboxGeometry {
    pub fn new(anchor: IVec2, rects: impl Into<Box<[IRect]>>) -> Self {
        Self {
            anchor,
            rects: rects.into(),
        }
    }

    #[inline]
    pub fn anchor(&self) -> IVec2 {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: IVec2) {
        self.anchor = anchor;
    }

    #[inline]
    pub fn rects(&self) -> &[IRect] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Rectangles placed at `at`, in map space.
    pub fn translated(&self, at: IVec2) -> impl Iterator<Item = IRect> + '_ {
        self.rects.iter().map(move |r| r.offset_from(at))
    }

    /// Plain overlap test at both geometries' own anchors.
    pub fn intersects(&self, other: &HitboxGeometry) -> bool {
        self.intersects_with(other, MovementInclusion::Overlap)
    }

    pub fn intersects_with(&self, other: &HitboxGeometry, inclusion: MovementInclusion) -> bool {
        self.intersects_at(self.anchor, other, other.anchor, inclusion)
    }

    /// Tests `self` anchored at `at` against `other` anchored at `other_at`.
    ///
    /// With [`MovementInclusion::Contain`] the containing side is `self`.
    pub fn intersects_at(
        &self,
        at: IVec2,
        other: &HitboxGeometry,
        other_at: IVec2,
        inclusion: MovementInclusion,
    ) -> bool {
        self.translated(at).any(|a| {
            other.translated(other_at).any(|b| match inclusion {
                MovementInclusion::Overlap => a.overlaps(&b),
                MovementInclusion::Touch => a.touches(&b),
                MovementInclusion::Contain => a.contains_rect(&b),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::ivec2;

    fn cell(anchor: IVec2) -> HitboxGeometry {
        HitboxGeometry::new(anchor, vec![IRect::full_tile()])
    }

    #[test]
    fn empty_set_never_intersects() {
        let empty = HitboxGeometry::new(ivec2(0, 64), Vec::new());
        let full = cell(ivec2(0, 64));
        assert!(!empty.intersects(&full));
        assert!(!full.intersects(&empty));
        assert!(!full.intersects_with(&empty, MovementInclusion::Touch));
    }

    #[test]
    fn anchors_translate_rectangles() {
        let a = cell(ivec2(0, 64));
        assert!(a.intersects(&cell(ivec2(32, 32))));
        assert!(!a.intersects(&cell(ivec2(64, 64))));
        assert!(a.intersects_with(&cell(ivec2(64, 64)), MovementInclusion::Touch));
        assert!(!a.intersects_with(&cell(ivec2(65, 64)), MovementInclusion::Touch));
    }

    #[test]
    fn any_rectangle_pair_counts() {
        let split = HitboxGeometry::new(
            ivec2(0, 64),
            vec![IRect::new(0, 0, 16, 16), IRect::new(48, 48, 16, 16)],
        );
        let probe = HitboxGeometry::new(ivec2(50, 10), vec![IRect::new(0, 0, 4, 4)]);
        assert!(split.intersects(&probe));
        let gap = HitboxGeometry::new(ivec2(30, 40), vec![IRect::new(0, 0, 4, 4)]);
        assert!(!split.intersects(&gap));
    }

    #[test]
    fn contain_requires_full_inclusion() {
        let tile = cell(ivec2(0, 64));
        let inside = HitboxGeometry::new(ivec2(8, 56), vec![IRect::new(0, 0, 16, 16)]);
        let straddling = HitboxGeometry::new(ivec2(56, 56), vec![IRect::new(0, 0, 16, 16)]);
        assert!(tile.intersects_with(&inside, MovementInclusion::Contain));
        assert!(!tile.intersects_with(&straddling, MovementInclusion::Contain));
        assert!(tile.intersects_with(&straddling, MovementInclusion::Overlap));
    }

    #[test]
    fn explicit_anchor_ignores_stored_one() {
        let a = cell(ivec2(1000, 1000));
        let b = cell(ivec2(0, 64));
        assert!(a.intersects_at(ivec2(0, 64), &b, b.anchor(), MovementInclusion::Overlap));
    }
}
