//! Dense facial landmark collaborator used to confirm face detections.

use crate::{frame::Frame, Result};
use nalgebra::Point2;

/// Anything that fits a landmark mesh to a face crop
pub trait LandmarkMesh<F: Frame> {
    /// Fit landmarks to `face`; `Ok(None)` when no face was found in the crop
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying model fails.
    fn estimate(&mut self, face: &F) -> Result<Option<Vec<Point2<f32>>>>;

    /// Most landmarks the model can return, `None` if unbounded or unknown
    fn landmark_count(&self) -> Option<usize> {
        None
    }
}

#[cfg(feature = "opencv")]
pub use lbf::FacemarkMesh;

#[cfg(feature = "opencv")]
mod lbf {
    use super::LandmarkMesh;
    use crate::{frame::Frame, Error, Result};
    use nalgebra::Point2;
    use opencv::{
        core::{Mat, Point2f, Ptr, Rect, Vector},
        face::{self, Facemark},
        prelude::*,
    };
    use std::path::Path;

    /// LBF facemark model from the `OpenCV` face module (68 points)
    pub struct FacemarkMesh {
        facemark: Ptr<Facemark>,
    }

    impl FacemarkMesh {
        /// Points in an LBF fit
        pub const LANDMARK_COUNT: usize = 68;

        /// Load a trained LBF model
        ///
        /// # Errors
        ///
        /// Returns an error if the model cannot be loaded.
        pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
            log::info!(
                "Initializing FacemarkMesh with model: {}",
                model_path.as_ref().display()
            );
            let model = model_path
                .as_ref()
                .to_str()
                .ok_or_else(|| Error::InvalidInput("Model path is not valid UTF-8".to_string()))?;

            let mut facemark = face::create_facemark_lbf()?;
            facemark.load_model(model)?;

            Ok(Self { facemark })
        }
    }

    impl LandmarkMesh<Mat> for FacemarkMesh {
        fn estimate(&mut self, face: &Mat) -> Result<Option<Vec<Point2<f32>>>> {
            let faces: Vector<Rect> =
                Vector::from_iter([Rect::new(0, 0, Frame::width(face), Frame::height(face))]);
            let mut landmarks: Vector<Vector<Point2f>> = Vector::new();

            if !self.facemark.fit(face, &faces, &mut landmarks)? || landmarks.is_empty() {
                return Ok(None);
            }

            let points = landmarks
                .get(0)?
                .iter()
                .map(|p| Point2::new(p.x, p.y))
                .collect();

            Ok(Some(points))
        }

        fn landmark_count(&self) -> Option<usize> {
            Some(Self::LANDMARK_COUNT)
        }
    }
}
