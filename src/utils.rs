//! Utility functions for region-of-interest handling and numeric conversions.

pub mod safe_cast;

use crate::bbox::BBox;
use safe_cast::f64_to_i32_clamp;

/// Expand a box by `pad_ratio` of its size on every side and clip it to the frame.
///
/// The padding is truncated to whole pixels. A box lying completely outside the
/// frame comes back empty.
#[must_use]
pub fn expand_clip_roi(bbox: &BBox, frame_width: i32, frame_height: i32, pad_ratio: f64) -> BBox {
    let pad_w = f64_to_i32_clamp(f64::from(bbox.width) * pad_ratio, 0, frame_width.max(0));
    let pad_h = f64_to_i32_clamp(f64::from(bbox.height) * pad_ratio, 0, frame_height.max(0));

    let x = bbox.x.saturating_sub(pad_w).max(0);
    let y = bbox.y.saturating_sub(pad_h).max(0);
    let width = bbox
        .width
        .saturating_add(pad_w.saturating_mul(2))
        .min(frame_width - x)
        .max(0);
    let height = bbox
        .height
        .saturating_add(pad_h.saturating_mul(2))
        .min(frame_height - y)
        .max(0);

    BBox::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_clip_roi() {
        let roi = expand_clip_roi(&BBox::new(100, 100, 100, 100), 640, 480, 0.15);
        assert_eq!(roi, BBox::new(85, 85, 130, 130));
    }

    #[test]
    fn test_expand_clip_roi_edge_boundaries() {
        // Box at the top-left corner cannot grow past the origin
        let roi = expand_clip_roi(&BBox::new(0, 0, 40, 40), 640, 480, 0.5);
        assert_eq!(roi, BBox::new(0, 0, 80, 80));

        // Box at the bottom-right corner is trimmed to the frame
        let roi = expand_clip_roi(&BBox::new(600, 440, 40, 40), 640, 480, 0.5);
        assert_eq!(roi.x, 580);
        assert_eq!(roi.y, 420);
        assert!(i64::from(roi.x) + i64::from(roi.width) <= 640);
        assert!(i64::from(roi.y) + i64::from(roi.height) <= 480);
    }

    #[test]
    fn test_expand_clip_roi_outside_frame() {
        let roi = expand_clip_roi(&BBox::new(700, 500, 40, 40), 640, 480, 0.15);
        assert!(roi.is_empty());
    }

    #[test]
    fn test_expand_clip_roi_zero_padding() {
        let b = BBox::new(10, 20, 30, 40);
        assert_eq!(expand_clip_roi(&b, 640, 480, 0.0), b);
    }
}
