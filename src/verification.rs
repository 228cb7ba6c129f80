//! Face verification cascade.
//!
//! Cheap score, size and aspect checks run on every candidate. A denser
//! landmark mesh check runs on every Nth call when a mesh is configured.

use crate::{
    bbox::BBox, config::VerificationConfig, frame::Frame, mark_detection::LandmarkMesh,
    utils::expand_clip_roi,
};
use log::{debug, warn};

/// Accepts or rejects face candidates before they reach the track store
pub struct FaceVerifier<F: Frame> {
    config: VerificationConfig,
    mesh: Option<Box<dyn LandmarkMesh<F>>>,
    calls: u64,
}

impl<F: Frame> FaceVerifier<F> {
    /// Create a verifier running only the basic filters
    #[must_use]
    pub fn new(config: VerificationConfig) -> Self {
        Self {
            config,
            mesh: None,
            calls: 0,
        }
    }

    /// Attach a landmark mesh for the periodic density check
    ///
    /// The mesh is ignored when `mesh_enabled` is off, and when the model
    /// can never return `min_landmarks` points.
    #[must_use]
    pub fn with_mesh(mut self, mesh: Box<dyn LandmarkMesh<F>>) -> Self {
        if !self.config.mesh_enabled {
            debug!("Mesh verification disabled, ignoring landmark mesh");
            return self;
        }

        match mesh.landmark_count() {
            Some(count) if count < self.config.min_landmarks => {
                warn!(
                    "Landmark mesh returns at most {count} points but min_landmarks is {}, \
                     mesh verification off",
                    self.config.min_landmarks
                );
            }
            _ => self.mesh = Some(mesh),
        }
        self
    }

    /// Number of candidates seen so far
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls
    }

    #[must_use]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Score, size and aspect ratio checks. Values exactly at a threshold pass.
    #[must_use]
    pub fn passes_basic_filters(&self, score: f32, bbox: &BBox) -> bool {
        let c = &self.config;

        if score < c.score_threshold {
            debug!("Rejected {bbox:?}: score {score:.3} < {}", c.score_threshold);
            return false;
        }

        if bbox.width < c.min_face_size || bbox.height < c.min_face_size {
            debug!("Rejected {bbox:?}: smaller than {} px", c.min_face_size);
            return false;
        }

        let aspect = f64::from(bbox.height) / f64::from(bbox.width.max(1));
        if aspect < c.min_aspect || aspect > c.max_aspect {
            debug!("Rejected {bbox:?}: aspect {aspect:.2} outside [{}, {}]", c.min_aspect, c.max_aspect);
            return false;
        }

        true
    }

    /// Run the cascade on one candidate
    ///
    /// The call counter advances whatever the outcome, so the mesh cadence
    /// counts rejected candidates too.
    pub fn accept(&mut self, score: f32, bbox: &BBox, frame: &F) -> bool {
        self.calls += 1;

        if !self.passes_basic_filters(score, bbox) {
            return false;
        }

        let every_n = self.config.verify_every_n.max(1);
        if self.calls % every_n != 0 {
            return true;
        }

        let Some(mesh) = self.mesh.as_mut() else {
            return true;
        };

        let roi = expand_clip_roi(bbox, frame.width(), frame.height(), self.config.roi_padding);
        let Some(crop) = frame.crop(&roi) else {
            debug!("Rejected {bbox:?}: empty crop");
            return false;
        };

        match mesh.estimate(&crop) {
            Ok(Some(landmarks)) => {
                let accepted = landmarks.len() >= self.config.min_landmarks;
                if !accepted {
                    debug!(
                        "Rejected {bbox:?}: {} landmarks < {}",
                        landmarks.len(),
                        self.config.min_landmarks
                    );
                }
                accepted
            }
            Ok(None) => {
                debug!("Rejected {bbox:?}: no landmarks");
                false
            }
            Err(e) => {
                warn!("Landmark mesh failed: {e}");
                false
            }
        }
    }
}
