//! Body pose landmarks used to locate the feet.

use crate::{frame::Frame, Result};
use nalgebra::Point2;

/// Ankle positions of one body, in frame pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseLandmarks {
    pub left_ankle: Point2<f64>,
    pub right_ankle: Point2<f64>,
}

impl PoseLandmarks {
    #[must_use]
    pub fn new(left_ankle: Point2<f64>, right_ankle: Point2<f64>) -> Self {
        Self {
            left_ankle,
            right_ankle,
        }
    }

    /// The ankle whose column is closer to `u_center`. Ties go to the right ankle.
    #[must_use]
    pub fn closest_ankle(&self, u_center: f64) -> Point2<f64> {
        if (self.left_ankle.x - u_center).abs() < (self.right_ankle.x - u_center).abs() {
            self.left_ankle
        } else {
            self.right_ankle
        }
    }
}

/// Anything that estimates body landmarks for a frame
pub trait PoseEstimator<F: Frame> {
    /// Estimate landmarks; `Ok(None)` when no body is visible
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying model fails.
    fn estimate(&mut self, frame: &F) -> Result<Option<PoseLandmarks>>;
}

/// Heatmap channel of the right ankle in the COCO body layout
pub const COCO_RIGHT_ANKLE: usize = 10;
/// Heatmap channel of the left ankle in the COCO body layout
pub const COCO_LEFT_ANKLE: usize = 13;

/// Layout of a keypoint heatmap tensor `[channels, rows, cols]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapShape {
    pub channels: usize,
    pub rows: usize,
    pub cols: usize,
}

/// Peak of one heatmap channel scaled to frame pixels, `None` below `threshold`
#[must_use]
pub fn heatmap_peak(
    heatmaps: &[f32],
    shape: HeatmapShape,
    channel: usize,
    frame_size: (f64, f64),
    threshold: f32,
) -> Option<Point2<f64>> {
    let plane = shape.rows * shape.cols;
    if channel >= shape.channels || plane == 0 {
        return None;
    }
    let map = heatmaps.get(channel * plane..(channel + 1) * plane)?;

    let (idx, &peak) = map
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))?;
    if peak < threshold {
        return None;
    }

    let (row, col) = (idx / shape.cols, idx % shape.cols);
    Some(Point2::new(
        frame_size.0 * col as f64 / shape.cols as f64,
        frame_size.1 * row as f64 / shape.rows as f64,
    ))
}

/// Ankles from COCO heatmaps. A single visible ankle stands in for both.
#[must_use]
pub fn ankles_from_heatmaps(
    heatmaps: &[f32],
    shape: HeatmapShape,
    frame_size: (f64, f64),
    threshold: f32,
) -> Option<PoseLandmarks> {
    let left = heatmap_peak(heatmaps, shape, COCO_LEFT_ANKLE, frame_size, threshold);
    let right = heatmap_peak(heatmaps, shape, COCO_RIGHT_ANKLE, frame_size, threshold);

    match (left, right) {
        (Some(l), Some(r)) => Some(PoseLandmarks::new(l, r)),
        (Some(p), None) | (None, Some(p)) => Some(PoseLandmarks::new(p, p)),
        (None, None) => None,
    }
}

#[cfg(feature = "opencv")]
pub use openpose::OpenPoseEstimator;

#[cfg(feature = "opencv")]
mod openpose {
    use super::{ankles_from_heatmaps, HeatmapShape, PoseEstimator, PoseLandmarks};
    use crate::{frame::Frame, Error, Result};
    use opencv::{
        core::{Mat, Scalar, Size, CV_32F},
        dnn::{self, Net},
        prelude::*,
    };
    use std::path::Path;

    /// Network input size
    const INPUT_SIZE: i32 = 368;

    /// COCO body keypoint network run through the `OpenCV` dnn module
    pub struct OpenPoseEstimator {
        net: Net,
        threshold: f32,
    }

    impl OpenPoseEstimator {
        /// Load the pose network at `model_path` (ONNX, TensorFlow or Caffe
        /// with `config_path`)
        ///
        /// # Errors
        ///
        /// Returns an error if the model cannot be loaded.
        pub fn new<P: AsRef<Path>>(
            model_path: P,
            config_path: Option<&Path>,
            threshold: f32,
        ) -> Result<Self> {
            log::info!(
                "Initializing OpenPoseEstimator with model: {}",
                model_path.as_ref().display()
            );
            let model = model_path
                .as_ref()
                .to_str()
                .ok_or_else(|| Error::InvalidInput("Model path is not valid UTF-8".to_string()))?;
            let config = match config_path {
                Some(p) => p.to_str().ok_or_else(|| {
                    Error::InvalidInput("Model config path is not valid UTF-8".to_string())
                })?,
                None => "",
            };

            let net = dnn::read_net(model, config, "")?;
            Ok(Self { net, threshold })
        }
    }

    impl PoseEstimator<Mat> for OpenPoseEstimator {
        fn estimate(&mut self, frame: &Mat) -> Result<Option<PoseLandmarks>> {
            let blob = dnn::blob_from_image(
                frame,
                1.0 / 255.0,
                Size::new(INPUT_SIZE, INPUT_SIZE),
                Scalar::new(0., 0., 0., 0.),
                false,
                false,
                CV_32F,
            )?;
            self.net.set_input(&blob, "", 1.0, Scalar::default())?;
            let output = self.net.forward_single("")?;

            let dims = output.mat_size();
            if dims.len() != 4 {
                return Err(Error::Collaborator(format!(
                    "Unexpected pose output with {} dimensions",
                    dims.len()
                )));
            }
            let shape = HeatmapShape {
                channels: usize::try_from(dims[1]).unwrap_or(0),
                rows: usize::try_from(dims[2]).unwrap_or(0),
                cols: usize::try_from(dims[3]).unwrap_or(0),
            };

            let frame_size = (f64::from(Frame::width(frame)), f64::from(Frame::height(frame)));
            Ok(ankles_from_heatmaps(
                output.data_typed::<f32>()?,
                shape,
                frame_size,
                self.threshold,
            ))
        }
    }
}
