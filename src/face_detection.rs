//! Face detection collaborator.

use crate::{bbox::BBox, frame::Frame, Result};

/// Face detection candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceDetection {
    /// Bounding box of the detected face in frame pixels
    pub bbox: BBox,
    /// Confidence score of the detection
    pub score: f32,
}

impl FaceDetection {
    #[must_use]
    pub fn new(bbox: BBox, score: f32) -> Self {
        Self { bbox, score }
    }
}

/// Anything that finds faces in a frame
pub trait FaceDetector<F: Frame> {
    /// Detect faces in `frame`
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying model fails.
    fn detect(&mut self, frame: &F) -> Result<Vec<FaceDetection>>;
}

#[cfg(feature = "opencv")]
pub use yunet::YuNetFaceDetector;

#[cfg(feature = "opencv")]
mod yunet {
    use super::{FaceDetection, FaceDetector};
    use crate::{bbox::BBox, config::DetectionConfig, frame::Frame, Error, Result};
    use opencv::{
        core::{Mat, Ptr, Size},
        objdetect::FaceDetectorYN,
        prelude::*,
    };
    use std::path::Path;

    /// Column of the score in a YuNet result row
    const SCORE_COLUMN: i32 = 14;

    /// YuNet face detector from the `OpenCV` objdetect module
    pub struct YuNetFaceDetector {
        detector: Ptr<FaceDetectorYN>,
        input_size: Size,
    }

    impl YuNetFaceDetector {
        /// Load the YuNet ONNX model at `model_path`
        ///
        /// # Errors
        ///
        /// Returns an error if the model cannot be loaded.
        pub fn new<P: AsRef<Path>>(model_path: P, config: &DetectionConfig) -> Result<Self> {
            log::info!(
                "Initializing YuNetFaceDetector with model: {}",
                model_path.as_ref().display()
            );
            let model = model_path
                .as_ref()
                .to_str()
                .ok_or_else(|| Error::InvalidInput("Model path is not valid UTF-8".to_string()))?;

            let input_size = Size::new(320, 320);
            let detector = FaceDetectorYN::create(
                model,
                "",
                input_size,
                config.min_detection_confidence,
                config.nms_threshold,
                config.top_k,
                0,
                0,
            )?;

            Ok(Self { detector, input_size })
        }
    }

    impl FaceDetector<Mat> for YuNetFaceDetector {
        fn detect(&mut self, frame: &Mat) -> Result<Vec<FaceDetection>> {
            let size = Size::new(Frame::width(frame), Frame::height(frame));
            if size != self.input_size {
                self.detector.set_input_size(size)?;
                self.input_size = size;
            }

            let mut faces = Mat::default();
            self.detector.detect(frame, &mut faces)?;

            let mut detections = Vec::with_capacity(faces.rows().max(0) as usize);
            for row in 0..faces.rows() {
                let x = f64::from(*faces.at_2d::<f32>(row, 0)?);
                let y = f64::from(*faces.at_2d::<f32>(row, 1)?);
                let w = f64::from(*faces.at_2d::<f32>(row, 2)?);
                let h = f64::from(*faces.at_2d::<f32>(row, 3)?);
                let score = *faces.at_2d::<f32>(row, SCORE_COLUMN)?;

                detections.push(FaceDetection::new(BBox::from_f64(x, y, w, h), score));
            }

            Ok(detections)
        }
    }
}
