//! Configuration management for the person height estimation application

use crate::constants::{
    DEFAULT_CAMERA_HEIGHT, DEFAULT_CX, DEFAULT_CY, DEFAULT_DETECT_EVERY_N_FRAMES,
    DEFAULT_FACE_SCORE_THRESHOLD, DEFAULT_FPS_LOG_INTERVAL, DEFAULT_FX, DEFAULT_FY,
    DEFAULT_IOU_THRESHOLD, DEFAULT_MAX_FACE_ASPECT, DEFAULT_MIN_FACE_ASPECT, DEFAULT_MIN_FACE_SIZE,
    DEFAULT_MIN_MESH_LANDMARKS, DEFAULT_POSE_THRESHOLD, DEFAULT_RETIREMENT_THRESHOLD, DEFAULT_ROI_PADDING_RATIO,
    DEFAULT_SMOOTHING_WINDOW, DEFAULT_VERIFY_EVERY_N,
};
use crate::geometry::CameraModel;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera intrinsics and mounting height
    pub camera: CameraConfig,

    /// Face detection scheduling and backend thresholds
    pub detection: DetectionConfig,

    /// Face verification cascade
    pub verification: VerificationConfig,

    /// Track association and lifecycle
    pub tracking: TrackingConfig,

    /// Height smoothing
    pub smoothing: SmoothingConfig,

    /// Model file paths
    pub models: ModelConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Pinhole intrinsics and camera height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Horizontal focal length in pixels
    pub fx: f64,

    /// Vertical focal length in pixels
    pub fy: f64,

    /// Principal point column
    pub cx: f64,

    /// Principal point row
    pub cy: f64,

    /// Camera height above the ground in metres
    pub height: f64,
}

/// Face detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Run full detection on every Nth frame, track in between
    pub every_n_frames: u64,

    /// Score below which the detector backend drops boxes (0.0-1.0)
    pub min_detection_confidence: f32,

    /// IOU threshold for the backend's non-maximum suppression (0.0-1.0)
    pub nms_threshold: f32,

    /// Maximum number of boxes kept by the backend before suppression
    pub top_k: i32,
}

/// Face verification cascade parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Minimum detection score; scores below are rejected
    pub score_threshold: f32,

    /// Minimum face width and height in pixels
    pub min_face_size: i32,

    /// Smallest accepted height/width ratio
    pub min_aspect: f64,

    /// Largest accepted height/width ratio
    pub max_aspect: f64,

    /// Confirm faces with the landmark mesh
    pub mesh_enabled: bool,

    /// Run the mesh check on every Nth verification call
    pub verify_every_n: u64,

    /// Landmarks the mesh must find for the face to count
    pub min_landmarks: usize,

    /// Padding added around the face before the mesh check, as a ratio of its size
    pub roi_padding: f64,
}

/// Track lifecycle parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Consecutive misses tolerated before a track is dropped
    pub retirement_threshold: u32,

    /// IoU a candidate must exceed to claim a track
    pub iou_threshold: f64,

    /// Count a miss for tracks left unmatched on detection frames
    pub count_detection_misses: bool,
}

/// Height smoothing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Number of recent estimates averaged per track
    pub window: usize,
}

/// Model file paths configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the YuNet face detection ONNX model
    pub face_detector: PathBuf,

    /// Path to the LBF facemark model used for verification
    pub facemark: Option<PathBuf>,

    /// COCO body keypoint network used for ankle foot points
    pub pose: Option<PathBuf>,

    /// Network description for formats that need one (Caffe prototxt)
    pub pose_config: Option<PathBuf>,

    /// Minimum heatmap confidence for an ankle
    pub pose_threshold: f32,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the overlay window
    pub show_window: bool,

    /// Overlay window title
    pub window_title: String,

    /// Log the frame rate every N frames
    pub fps_log_interval: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fx: DEFAULT_FX,
            fy: DEFAULT_FY,
            cx: DEFAULT_CX,
            cy: DEFAULT_CY,
            height: DEFAULT_CAMERA_HEIGHT,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            every_n_frames: DEFAULT_DETECT_EVERY_N_FRAMES,
            min_detection_confidence: 0.5,
            nms_threshold: 0.3,
            top_k: 5000,
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_FACE_SCORE_THRESHOLD,
            min_face_size: DEFAULT_MIN_FACE_SIZE,
            min_aspect: DEFAULT_MIN_FACE_ASPECT,
            max_aspect: DEFAULT_MAX_FACE_ASPECT,
            mesh_enabled: true,
            verify_every_n: DEFAULT_VERIFY_EVERY_N,
            min_landmarks: DEFAULT_MIN_MESH_LANDMARKS,
            roi_padding: DEFAULT_ROI_PADDING_RATIO,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            retirement_threshold: DEFAULT_RETIREMENT_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            count_detection_misses: false,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_detector: PathBuf::from("assets/face_detection_yunet.onnx"),
            facemark: None,
            pose: None,
            pose_config: None,
            pose_threshold: DEFAULT_POSE_THRESHOLD,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_window: true,
            window_title: "Person Height Estimation".to_string(),
            fps_log_interval: DEFAULT_FPS_LOG_INTERVAL,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Serialize configuration to YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Build the camera model described by this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the camera parameters are invalid.
    pub fn camera_model(&self) -> Result<CameraModel> {
        CameraModel::try_from(&self.camera)
    }

    /// Validate configuration
    ///
    /// Model paths are not checked here; backends report missing files when
    /// they load them.
    ///
    /// # Errors
    ///
    /// Returns a [`Error::ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.camera_model()
            .map_err(|e| Error::ConfigError(format!("Invalid camera: {e}")))?;

        // Detection
        if self.detection.every_n_frames == 0 {
            return Err(Error::ConfigError(
                "Detection cadence must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detection.min_detection_confidence) {
            return Err(Error::ConfigError(
                "Detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detection.nms_threshold) {
            return Err(Error::ConfigError(
                "NMS threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Verification
        let v = &self.verification;
        if !(0.0..=1.0).contains(&v.score_threshold) {
            return Err(Error::ConfigError(
                "Face score threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if v.min_face_size < 0 {
            return Err(Error::ConfigError(
                "Minimum face size must not be negative".to_string(),
            ));
        }
        if !(v.min_aspect > 0.0 && v.min_aspect <= v.max_aspect) {
            return Err(Error::ConfigError(format!(
                "Aspect range [{}, {}] is invalid",
                v.min_aspect, v.max_aspect
            )));
        }
        if v.verify_every_n == 0 {
            return Err(Error::ConfigError(
                "Verification cadence must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&v.roi_padding) {
            return Err(Error::ConfigError(
                "ROI padding must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Tracking
        if !(0.0..1.0).contains(&self.tracking.iou_threshold) {
            return Err(Error::ConfigError(
                "IOU threshold must be in [0.0, 1.0)".to_string(),
            ));
        }

        // Smoothing
        if self.smoothing.window == 0 {
            return Err(Error::ConfigError(
                "Smoothing window must be greater than 0".to_string(),
            ));
        }

        // Models
        if !(0.0..=1.0).contains(&self.models.pose_threshold) {
            return Err(Error::ConfigError(
                "Pose threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Display
        if self.display.fps_log_interval == 0 {
            return Err(Error::ConfigError(
                "FPS log interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Person Height Estimation Configuration

# Camera intrinsics (pixels) and mounting height (metres)
camera:
  fx: 1200.0
  fy: 1200.0
  cx: 640.0
  cy: 360.0
  height: 1.5

# Face detection
detection:
  every_n_frames: 5
  min_detection_confidence: 0.5
  nms_threshold: 0.3
  top_k: 5000

# Face verification cascade
verification:
  score_threshold: 0.9
  min_face_size: 40
  min_aspect: 0.8
  max_aspect: 2.2
  mesh_enabled: true
  verify_every_n: 1
  min_landmarks: 200
  roi_padding: 0.15

# Track lifecycle
tracking:
  retirement_threshold: 30
  iou_threshold: 0.2
  count_detection_misses: false

# Height smoothing
smoothing:
  window: 10

# Model paths
models:
  face_detector: "assets/face_detection_yunet.onnx"
  facemark: null
  pose: null
  pose_config: null
  pose_threshold: 0.1

# Display settings
display:
  show_window: true
  window_title: "Person Height Estimation"
  fps_log_interval: 10
"#;
