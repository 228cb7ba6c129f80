//! Single-camera metric geometry.
//!
//! A pinhole camera looks along +z with +x to the right and +y pointing down,
//! matching image rows that grow downwards. The ground is the horizontal plane
//! `y = H_cam` in camera coordinates, `H_cam` being the mounting height of the
//! camera. Casting the ray of a foot pixel onto that plane gives the forward
//! distance to the person, and similar triangles turn the pixel height of the
//! person into metres.

use crate::{config::CameraConfig, constants::RAY_PARALLEL_EPSILON, Error, Result};
use nalgebra::Vector3;
use thiserror::Error;

/// Why a height could not be measured for a frame
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indeterminate {
    /// The foot row is not strictly below the head row
    #[error("foot row is not below head row")]
    NonPositivePixelHeight,

    /// The foot ray runs parallel to the ground plane
    #[error("ray is parallel to the ground plane")]
    ParallelToGround,

    /// The foot ray meets the ground plane behind the camera
    #[error("ray meets the ground plane behind the camera")]
    BehindCamera,
}

/// A single height measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightEstimate {
    /// Estimated height in metres
    pub height: f64,
    /// Forward distance from the camera to the foot point, in metres
    pub distance: f64,
}

/// Pinhole intrinsics plus the camera's height above the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraModel {
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    height: f64,
}

impl CameraModel {
    /// Create a camera model
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is not finite, a focal length is not
    /// positive, or the camera height is not positive.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64, height: f64) -> Result<Self> {
        if ![fx, fy, cx, cy, height].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidInput(
                "Camera parameters must be finite".to_string(),
            ));
        }
        if fx <= 0.0 || fy <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Focal lengths must be positive, got fx={fx} fy={fy}"
            )));
        }
        if height <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Camera height must be positive, got {height}"
            )));
        }

        Ok(Self { fx, fy, cx, cy, height })
    }

    #[must_use]
    pub fn fx(&self) -> f64 {
        self.fx
    }

    #[must_use]
    pub fn fy(&self) -> f64 {
        self.fy
    }

    #[must_use]
    pub fn cx(&self) -> f64 {
        self.cx
    }

    #[must_use]
    pub fn cy(&self) -> f64 {
        self.cy
    }

    /// Camera height above the ground plane in metres
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Direction of the ray through pixel `(u, v)`, scaled so that `z == 1`
    #[must_use]
    pub fn pixel_to_ray(&self, u: f64, v: f64) -> Vector3<f64> {
        Vector3::new((u - self.cx) / self.fx, (v - self.cy) / self.fy, 1.0)
    }

    /// Forward distance at which the ray through `(u, v)` hits the ground
    ///
    /// # Errors
    ///
    /// Returns [`Indeterminate::ParallelToGround`] or
    /// [`Indeterminate::BehindCamera`] when the ray does not hit the ground in
    /// front of the camera.
    pub fn ground_distance(&self, u: f64, v: f64) -> std::result::Result<f64, Indeterminate> {
        let ray = self.pixel_to_ray(u, v);

        if ray.y.abs() < RAY_PARALLEL_EPSILON {
            return Err(Indeterminate::ParallelToGround);
        }

        let t = self.height / ray.y;
        if t <= 0.0 {
            return Err(Indeterminate::BehindCamera);
        }

        Ok(t * ray.z)
    }

    /// Estimate the metric height of a person standing on the ground
    ///
    /// `u_foot` falls back to the principal column when the foot column is
    /// unknown.
    ///
    /// # Errors
    ///
    /// Returns an [`Indeterminate`] reason when the pixel height is not
    /// positive or the foot ray does not hit the ground in front of the camera.
    pub fn estimate_height(
        &self,
        v_head: f64,
        v_foot: f64,
        u_foot: Option<f64>,
    ) -> std::result::Result<HeightEstimate, Indeterminate> {
        let pixel_height = v_foot - v_head;
        if pixel_height.is_nan() || pixel_height <= 0.0 {
            return Err(Indeterminate::NonPositivePixelHeight);
        }

        let distance = self.ground_distance(u_foot.unwrap_or(self.cx), v_foot)?;

        Ok(HeightEstimate {
            height: pixel_height * distance / self.fy,
            distance,
        })
    }
}

impl TryFrom<&CameraConfig> for CameraModel {
    type Error = Error;

    fn try_from(config: &CameraConfig) -> Result<Self> {
        Self::new(config.fx, config.fy, config.cx, config.cy, config.height)
    }
}
