//! Constants used throughout the application

/// Default horizontal focal length in pixels
pub const DEFAULT_FX: f64 = 1200.0;

/// Default vertical focal length in pixels
pub const DEFAULT_FY: f64 = 1200.0;

/// Default principal point column
pub const DEFAULT_CX: f64 = 640.0;

/// Default principal point row
pub const DEFAULT_CY: f64 = 360.0;

/// Default camera height above the ground plane, in metres
pub const DEFAULT_CAMERA_HEIGHT: f64 = 1.5;

/// Run full detection on every Nth frame
pub const DEFAULT_DETECT_EVERY_N_FRAMES: u64 = 5;

/// Consecutive failed updates tolerated before a track is retired
pub const DEFAULT_RETIREMENT_THRESHOLD: u32 = 30;

/// Minimum IoU for a candidate to claim an existing track
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.2;

/// Face verification thresholds
pub const DEFAULT_FACE_SCORE_THRESHOLD: f32 = 0.9;
pub const DEFAULT_MIN_FACE_SIZE: i32 = 40;
pub const DEFAULT_MIN_FACE_ASPECT: f64 = 0.8;
pub const DEFAULT_MAX_FACE_ASPECT: f64 = 2.2;

/// Landmark mesh verification parameters
pub const DEFAULT_VERIFY_EVERY_N: u64 = 1;
pub const DEFAULT_MIN_MESH_LANDMARKS: usize = 200;
pub const MESH_LANDMARK_TOTAL: usize = 468;
pub const DEFAULT_ROI_PADDING_RATIO: f64 = 0.15;

/// Minimum heatmap confidence for an ankle keypoint
pub const DEFAULT_POSE_THRESHOLD: f32 = 0.1;

/// Number of height samples averaged per track
pub const DEFAULT_SMOOTHING_WINDOW: usize = 10;

/// Log the frame rate every N frames
pub const DEFAULT_FPS_LOG_INTERVAL: u64 = 10;

/// Rays with a vertical component below this never meet the ground
pub const RAY_PARALLEL_EPSILON: f64 = 1e-8;
