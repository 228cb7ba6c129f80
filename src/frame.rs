//! Frame abstraction shared by every collaborator.

use crate::bbox::BBox;
use crate::utils::safe_cast::u32_to_i32;
use image::RgbImage;

/// A captured image with known dimensions that can be cropped
pub trait Frame: Sized {
    /// Width in pixels
    fn width(&self) -> i32;

    /// Height in pixels
    fn height(&self) -> i32;

    /// Copy out the region `roi`. Returns `None` when the region clipped to
    /// the frame is empty.
    fn crop(&self, roi: &BBox) -> Option<Self>;

    /// The rectangle covering the whole frame
    fn bounds(&self) -> BBox {
        BBox::new(0, 0, self.width(), self.height())
    }
}

impl Frame for RgbImage {
    fn width(&self) -> i32 {
        u32_to_i32(self.dimensions().0).unwrap_or(i32::MAX)
    }

    fn height(&self) -> i32 {
        u32_to_i32(self.dimensions().1).unwrap_or(i32::MAX)
    }

    #[allow(clippy::cast_sign_loss)] // clipped boxes are non-negative
    fn crop(&self, roi: &BBox) -> Option<Self> {
        let roi = roi.clip_to(Frame::width(self), Frame::height(self));
        if roi.is_empty() {
            return None;
        }

        let view = image::imageops::crop_imm(
            self,
            roi.x as u32,
            roi.y as u32,
            roi.width as u32,
            roi.height as u32,
        );
        Some(view.to_image())
    }
}

#[cfg(feature = "opencv")]
impl Frame for opencv::core::Mat {
    fn width(&self) -> i32 {
        use opencv::prelude::MatTraitConst;
        self.cols()
    }

    fn height(&self) -> i32 {
        use opencv::prelude::MatTraitConst;
        self.rows()
    }

    fn crop(&self, roi: &BBox) -> Option<Self> {
        use opencv::prelude::MatTraitConst;

        let roi = roi.clip_to(Frame::width(self), Frame::height(self));
        if roi.is_empty() {
            return None;
        }

        let view = opencv::core::Mat::roi(self, roi.into()).ok()?;
        view.try_clone().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_image_dimensions() {
        let frame = RgbImage::new(64, 48);
        assert_eq!(Frame::width(&frame), 64);
        assert_eq!(Frame::height(&frame), 48);
        assert_eq!(frame.bounds(), BBox::new(0, 0, 64, 48));
    }

    #[test]
    fn test_rgb_image_crop() {
        let mut frame = RgbImage::new(64, 48);
        frame.put_pixel(10, 12, image::Rgb([255, 0, 0]));

        let crop = frame.crop(&BBox::new(10, 12, 5, 6)).unwrap();
        assert_eq!(crop.dimensions(), (5, 6));
        assert_eq!(crop.get_pixel(0, 0), &image::Rgb([255, 0, 0]));
    }

    #[test]
    fn test_rgb_image_crop_clipped() {
        let frame = RgbImage::new(64, 48);

        let crop = frame.crop(&BBox::new(60, 40, 20, 20)).unwrap();
        assert_eq!(crop.dimensions(), (4, 8));

        assert!(frame.crop(&BBox::new(100, 100, 10, 10)).is_none());
        assert!(frame.crop(&BBox::new(10, 10, 0, 10)).is_none());
    }
}
