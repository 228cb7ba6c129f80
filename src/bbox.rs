//! Axis-aligned pixel rectangles.

use crate::utils::safe_cast::f64_to_i32_clamp;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Left-top-width-height pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct BBox {
    /// Left column
    pub x: i32,
    /// Top row
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl BBox {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a box from floating point tracker output, rounding towards zero
    #[must_use]
    pub fn from_f64(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: f64_to_i32_clamp(x, i32::MIN, i32::MAX),
            y: f64_to_i32_clamp(y, i32::MIN, i32::MAX),
            width: f64_to_i32_clamp(width, 0, i32::MAX),
            height: f64_to_i32_clamp(height, 0, i32::MAX),
        }
    }

    #[inline]
    #[must_use]
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    #[inline]
    #[must_use]
    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Area shared with `other`, zero when they do not overlap
    #[must_use]
    pub fn intersection_area(&self, other: &Self) -> i64 {
        let left = i64::from(self.x.max(other.x));
        let top = i64::from(self.y.max(other.y));
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return 0;
        }

        (right - left) * (bottom - top)
    }

    /// Column of the vertical centre line
    #[inline]
    #[must_use]
    pub fn center_x(&self) -> f64 {
        f64::from(self.x) + f64::from(self.width) / 2.0
    }

    /// Top-centre point, used as the head position
    #[must_use]
    pub fn top_center(&self) -> Point2<f64> {
        Point2::new(self.center_x(), f64::from(self.y))
    }

    /// Bottom-centre point snapped to whole pixels, used as the fallback foot position
    #[must_use]
    pub fn bottom_center(&self) -> Point2<f64> {
        let u = (i64::from(self.x) + i64::from(self.width) / 2) as f64;
        Point2::new(u, self.bottom() as f64)
    }

    /// Clip to a `frame_width` x `frame_height` frame; the result never has negative extent
    #[must_use]
    pub fn clip_to(&self, frame_width: i32, frame_height: i32) -> Self {
        let fw = i64::from(frame_width.max(0));
        let fh = i64::from(frame_height.max(0));

        let left = i64::from(self.x).clamp(0, fw);
        let top = i64::from(self.y).clamp(0, fh);
        let right = self.right().clamp(0, fw);
        let bottom = self.bottom().clamp(0, fh);

        // all four values lie in [0, frame dimension] so they fit in i32
        Self {
            x: left as i32,
            y: top as i32,
            width: (right - left).max(0) as i32,
            height: (bottom - top).max(0) as i32,
        }
    }
}

#[cfg(feature = "opencv")]
impl From<BBox> for opencv::core::Rect {
    fn from(b: BBox) -> Self {
        opencv::core::Rect::new(b.x, b.y, b.width, b.height)
    }
}

#[cfg(feature = "opencv")]
impl From<opencv::core::Rect> for BBox {
    fn from(r: opencv::core::Rect) -> Self {
        BBox::new(r.x, r.y, r.width.max(0), r.height.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_area() {
        let a = BBox::new(0, 0, 10, 10);
        let b = BBox::new(5, 5, 10, 10);
        assert_eq!(a.intersection_area(&b), 25);
        assert_eq!(b.intersection_area(&a), 25);

        // Touching edges share no area
        let c = BBox::new(10, 0, 10, 10);
        assert_eq!(a.intersection_area(&c), 0);
    }

    #[test]
    fn test_anchor_points() {
        let b = BBox::new(100, 50, 41, 80);
        assert_eq!(b.top_center(), Point2::new(120.5, 50.0));
        assert_eq!(b.bottom_center(), Point2::new(120.0, 130.0));
    }

    #[test]
    fn test_clip_to_frame() {
        let b = BBox::new(-20, 700, 100, 100).clip_to(1280, 720);
        assert_eq!(b, BBox::new(0, 700, 80, 20));

        // Entirely outside
        let b = BBox::new(2000, 10, 50, 50).clip_to(1280, 720);
        assert!(b.is_empty());
        assert!(b.width >= 0 && b.height >= 0);
    }

    #[test]
    fn test_from_f64() {
        let b = BBox::from_f64(10.7, 20.2, 30.9, f64::NAN);
        assert_eq!(b, BBox::new(10, 20, 30, 0));
    }
}
