//! Axis-aligned boxes and collision categories
//!
//! Bodies are boxes described by their centre and half-extents. Category
//! filtering is a closed enum folded into a bitmask, so a query can ask for
//! several categories at once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box (centre + half-extents)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self {
            center,
            half: half.abs(),
        }
    }

    /// Box of the given full size centred on `center`
    pub fn from_size(center: Vec2, size: Vec2) -> Self {
        Self::new(center, size * 0.5)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Same box moved by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            center: self.center + delta,
            half: self.half,
        }
    }

    /// Same centre, grown by `margin` on every side
    #[inline]
    pub fn grown(&self, margin: f32) -> Self {
        Self::new(self.center, self.half + Vec2::splat(margin))
    }

    /// Box covering this one at its start and after moving by `delta`
    pub fn swept(&self, delta: Vec2) -> Self {
        let end = self.translated(delta);
        let min = self.min().min(end.min());
        let max = self.max().max(end.max());
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Strict overlap: boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }

    /// Fraction of `delta` at which this box, moving by `delta`, first overlaps `other`
    ///
    /// `Some(0.0)` when they already overlap, `None` when the move never gets
    /// there. Edge contact alone does not count.
    pub fn sweep_entry(&self, other: &Rect, delta: Vec2) -> Option<f32> {
        let reach = self.half + other.half;
        let lo = other.center - reach;
        let hi = other.center + reach;
        let mut enter = f32::NEG_INFINITY;
        let mut exit = f32::INFINITY;

        for axis in 0..2 {
            let p = self.center[axis];
            let d = delta[axis];
            if d == 0.0 {
                if p <= lo[axis] || p >= hi[axis] {
                    return None;
                }
            } else {
                let t1 = (lo[axis] - p) / d;
                let t2 = (hi[axis] - p) / d;
                enter = enter.max(t1.min(t2));
                exit = exit.min(t1.max(t2));
            }
        }

        (enter < exit && enter < 1.0 && exit > 0.0).then(|| enter.max(0.0))
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half.x && d.y <= self.half.y
    }
}

/// Collision category of a body in the spatial index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    /// Collectible junk
    Junk = 0,
    /// Static scenery the magnet cannot pass through
    Solid = 1,
    /// Crafting bench / home base zone
    Craft = 2,
    /// The magnet head itself
    Magnet = 3,
    /// The magnet's attraction field
    MagneticField = 4,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Junk,
        Category::Solid,
        Category::Craft,
        Category::Magnet,
        Category::MagneticField,
    ];

    #[inline]
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of categories a query accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CategoryMask(u8);

impl CategoryMask {
    pub const NONE: CategoryMask = CategoryMask(0);
    pub const JUNK: CategoryMask = CategoryMask::only(Category::Junk);

    pub const fn only(category: Category) -> Self {
        Self(category.bit())
    }

    pub const fn with(self, category: Category) -> Self {
        Self(self.0 | category.bit())
    }

    #[inline]
    pub const fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl From<Category> for CategoryMask {
    fn from(category: Category) -> Self {
        Self::only(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_edge_touch() {
        let a = Rect::from_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Rect::from_size(Vec2::new(9.0, 0.0), Vec2::new(10.0, 10.0));
        let c = Rect::from_size(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c), "touching edges should not overlap");
    }

    #[test]
    fn test_swept_covers_both_ends() {
        let a = Rect::from_size(Vec2::ZERO, Vec2::new(4.0, 4.0));
        let s = a.swept(Vec2::new(20.0, -6.0));
        assert!((s.min() - Vec2::new(-2.0, -8.0)).length() < 1e-5);
        assert!((s.max() - Vec2::new(22.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_sweep_entry() {
        let a = Rect::from_size(Vec2::ZERO, Vec2::splat(10.0));
        let wall = Rect::from_size(Vec2::new(50.0, 0.0), Vec2::splat(10.0));

        // Leading edge at 5 meets the wall's near side at 45
        let t = a.sweep_entry(&wall, Vec2::new(80.0, 0.0));
        assert!(t.is_some_and(|t| (t - 0.5).abs() < 1e-6));
        assert_eq!(a.sweep_entry(&wall, Vec2::new(40.0, 0.0)), None, "ends touching the edge");
        assert_eq!(a.sweep_entry(&wall, Vec2::new(-80.0, 0.0)), None);

        let inside = Rect::from_size(Vec2::new(3.0, 0.0), Vec2::splat(10.0));
        assert_eq!(a.sweep_entry(&inside, Vec2::ZERO), Some(0.0));
        assert_eq!(a.sweep_entry(&wall, Vec2::ZERO), None);
    }

    #[test]
    fn test_sweep_entry_misses_swept_corner() {
        let a = Rect::from_size(Vec2::ZERO, Vec2::splat(10.0));
        // Inside the diagonal move's bounding box but never touched
        let corner = Rect::from_size(Vec2::new(100.0, 0.0), Vec2::splat(10.0));
        let delta = Vec2::new(100.0, 100.0);
        assert!(a.swept(delta).overlaps(&corner));
        assert_eq!(a.sweep_entry(&corner, delta), None);
    }

    #[test]
    fn test_grown() {
        let a = Rect::from_size(Vec2::new(5.0, 5.0), Vec2::new(2.0, 2.0)).grown(3.0);
        assert_eq!(a.half, Vec2::splat(4.0));
        assert_eq!(a.center, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_category_mask() {
        let mask = CategoryMask::JUNK.with(Category::Solid);
        assert!(mask.contains(Category::Junk));
        assert!(mask.contains(Category::Solid));
        assert!(!mask.contains(Category::Craft));
        assert!(CategoryMask::NONE.is_empty());
        for category in Category::ALL {
            assert_eq!(CategoryMask::from(category).bits().count_ones(), 1);
        }
    }
}
