//! Vectors, axis-aligned rectangles and the overlap test every game uses.

use serde::{Deserialize, Serialize};

/// A 2D vector in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Vec2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle: top-left corner plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink every edge by `amount`. Negative values grow the rectangle.
    /// Extents never go below zero.
    pub fn inset(&self, amount: f64) -> Rect {
        let width = (self.width - amount * 2.0).max(0.0);
        let height = (self.height - amount * 2.0).max(0.0);
        let center = self.center();
        Rect::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    /// True if `point` lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// Strict AABB overlap. Rectangles that only share an edge do not overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Overlap test after shrinking `b` by `tolerance` (negative grows it).
pub fn overlaps_with_tolerance(a: &Rect, b: &Rect, tolerance: f64) -> bool {
    overlaps(a, &b.inset(tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let cases = [
            (Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(5.0, 5.0, 10.0, 10.0)),
            (Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(10.0, 0.0, 10.0, 10.0)),
            (Rect::new(-5.0, 3.0, 2.0, 50.0), Rect::new(-4.0, 0.0, 1.0, 1.0)),
            (Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(100.0, 100.0, 1.0, 1.0)),
            (Rect::new(0.0, 0.0, 30.0, 30.0), Rect::new(0.0, 0.0, 30.0, 30.0)),
        ];
        for (a, b) in cases {
            assert_eq!(overlaps(&a, &b), overlaps(&b, &a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        let corner = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(&a, &right));
        assert!(!overlaps(&a, &below));
        assert!(!overlaps(&a, &corner));
    }

    #[test]
    fn test_identical_rects_overlap() {
        let a = Rect::new(3.0, 4.0, 30.0, 30.0);
        assert!(overlaps(&a, &a));
    }

    #[test]
    fn test_separated_on_one_axis_only() {
        // Same x-range, disjoint y-range
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 20.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_inset_shrinks_and_grows() {
        let r = Rect::new(0.0, 0.0, 20.0, 10.0);
        let shrunk = r.inset(2.0);
        assert_eq!(shrunk, Rect::new(2.0, 2.0, 16.0, 6.0));
        let grown = r.inset(-3.0);
        assert_eq!(grown, Rect::new(-3.0, -3.0, 26.0, 16.0));
    }

    #[test]
    fn test_inset_never_negative() {
        let r = Rect::new(0.0, 0.0, 4.0, 4.0);
        let collapsed = r.inset(10.0);
        assert_eq!(collapsed.width, 0.0);
        assert_eq!(collapsed.height, 0.0);
    }

    #[test]
    fn test_tolerance_turns_graze_into_miss() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(8.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        assert!(!overlaps_with_tolerance(&a, &b, 3.0));
        // Growing the target catches a near miss
        let c = Rect::new(12.0, 0.0, 10.0, 10.0);
        assert!(overlaps_with_tolerance(&a, &c, -3.0));
    }

    #[test]
    fn test_centered_and_contains() {
        let r = Rect::centered(Vec2::new(100.0, 50.0), Vec2::new(30.0, 30.0));
        assert_eq!(r.x, 85.0);
        assert_eq!(r.y, 35.0);
        assert!(r.contains(Vec2::new(100.0, 50.0)));
        assert!(!r.contains(Vec2::new(116.0, 50.0)));
    }
}
