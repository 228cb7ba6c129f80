//! Presentation of per-frame reports.

use crate::{frame::Frame, pipeline::FrameReport, Result};
use log::debug;

/// What the app loop should do after presenting a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presented {
    Continue,
    /// The user asked to quit
    Stop,
}

/// Anything that displays or records frame reports
pub trait OverlaySink<F: Frame> {
    /// # Errors
    ///
    /// Returns an error if presenting fails.
    fn present(&mut self, frame: &F, report: &FrameReport) -> Result<Presented>;
}

/// Headless sink that logs each report at debug level
#[derive(Debug, Default)]
pub struct LogOverlay;

impl<F: Frame> OverlaySink<F> for LogOverlay {
    fn present(&mut self, _frame: &F, report: &FrameReport) -> Result<Presented> {
        debug!(
            "Frame:{} Faces:{} ({:?})",
            report.frame_index,
            report.tracks.len(),
            report.mode
        );
        for track in &report.tracks {
            debug!(
                "  ID:{} H: {} box={:?} foot={:?}",
                track.id,
                track.height_text(),
                track.bbox,
                track.foot_source
            );
        }
        Ok(Presented::Continue)
    }
}

#[cfg(feature = "opencv")]
pub use window::WindowOverlay;

#[cfg(feature = "opencv")]
mod window {
    use super::{OverlaySink, Presented};
    use crate::{pipeline::FrameReport, utils::safe_cast::f64_to_i32_clamp, Result};
    use log::info;
    use opencv::{
        core::{Mat, Point, Scalar},
        highgui::{self, WINDOW_NORMAL},
        imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
        prelude::*,
    };

    const ESC_KEY: i32 = 27;

    /// `OpenCV` window drawing boxes, ids, heights and head/foot points
    pub struct WindowOverlay {
        title: String,
    }

    impl WindowOverlay {
        /// Create the display window
        ///
        /// # Errors
        ///
        /// Returns an error if the window cannot be created.
        pub fn new(title: &str) -> Result<Self> {
            highgui::named_window(title, WINDOW_NORMAL)?;
            Ok(Self {
                title: title.to_string(),
            })
        }
    }

    fn to_point(x: f64, y: f64) -> Point {
        Point::new(
            f64_to_i32_clamp(x, i32::MIN, i32::MAX),
            f64_to_i32_clamp(y, i32::MIN, i32::MAX),
        )
    }

    fn put_label(canvas: &mut Mat, text: &str, org: Point, color: Scalar) -> Result<()> {
        imgproc::put_text(canvas, text, org, FONT_HERSHEY_SIMPLEX, 0.6, color, 2, LINE_8, false)?;
        Ok(())
    }

    impl OverlaySink<Mat> for WindowOverlay {
        fn present(&mut self, frame: &Mat, report: &FrameReport) -> Result<Presented> {
            let mut canvas = frame.try_clone()?;

            for track in &report.tracks {
                let b = track.bbox;
                imgproc::rectangle(
                    &mut canvas,
                    b.into(),
                    Scalar::new(0.0, 255.0, 0.0, 0.0),
                    2,
                    LINE_8,
                    0,
                )?;
                put_label(
                    &mut canvas,
                    &format!("ID:{}", track.id),
                    Point::new(b.x, b.y - 30),
                    Scalar::new(255.0, 255.0, 0.0, 0.0),
                )?;
                put_label(
                    &mut canvas,
                    &format!("H: {}", track.height_text()),
                    Point::new(b.x, b.y - 10),
                    Scalar::new(0.0, 255.0, 255.0, 0.0),
                )?;
                imgproc::circle(
                    &mut canvas,
                    to_point(track.head.x, track.head.y),
                    4,
                    Scalar::new(0.0, 0.0, 255.0, 0.0),
                    -1,
                    LINE_8,
                    0,
                )?;
                imgproc::circle(
                    &mut canvas,
                    to_point(track.foot.x, track.foot.y),
                    4,
                    Scalar::new(255.0, 0.0, 0.0, 0.0),
                    -1,
                    LINE_8,
                    0,
                )?;
            }

            put_label(
                &mut canvas,
                &format!("Frame:{} Faces:{}", report.frame_index, report.tracks.len()),
                Point::new(10, 20),
                Scalar::new(200.0, 200.0, 200.0, 0.0),
            )?;

            highgui::imshow(&self.title, &canvas)?;

            let key = highgui::wait_key(1)?;
            if key == ESC_KEY || key == i32::from(b'q') {
                info!("Exit requested by user");
                return Ok(Presented::Stop);
            }

            Ok(Presented::Continue)
        }
    }

    impl Drop for WindowOverlay {
        fn drop(&mut self) {
            let _ = highgui::destroy_window(&self.title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FrameMode;
    use image::RgbImage;

    #[test]
    fn test_log_overlay_continues() {
        let report = FrameReport {
            frame_index: 3,
            mode: FrameMode::Track,
            tracks: Vec::new(),
        };
        let mut sink = LogOverlay;
        let result = sink.present(&RgbImage::new(4, 4), &report).unwrap();
        assert_eq!(result, Presented::Continue);
    }
}
