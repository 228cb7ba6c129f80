//! Person height estimation library for real-time camera streams.
//!
//! This library detects people through their faces, keeps a stable identity
//! for each of them across frames and estimates their height from a single
//! calibrated camera mounted at a known height.
//!
//! The estimation pipeline consists of:
//! 1. Face detection on every Nth frame, filtered by a verification cascade
//! 2. Greedy IoU association of verified faces with live tracks
//! 3. Short-term visual tracking on the frames in between
//! 4. Ground-plane ray casting from the foot point to get the distance
//! 5. Similar triangles from head and foot rows to get the height
//! 6. A moving average over the last few estimates of each track
//!
//! Concrete detector, tracker and display backends use `OpenCV` and live
//! behind the `opencv` feature. Everything else works on any [`frame::Frame`].
//!
//! # Examples
//!
//! ## Geometry
//!
//! ```
//! use person_height_estimation::geometry::CameraModel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let camera = CameraModel::new(1200.0, 1200.0, 640.0, 360.0, 1.5)?;
//!
//! // Head at row 300, foot at row 700 in the principal column
//! let estimate = camera.estimate_height(300.0, 700.0, Some(640.0)).unwrap();
//! println!("Height: {:.2} m at {:.2} m", estimate.height, estimate.distance);
//! # Ok(())
//! # }
//! ```
//!
//! ## Association
//!
//! ```
//! use person_height_estimation::{association::associate, bbox::BBox};
//!
//! let tracks = [BBox::new(100, 100, 80, 100)];
//! let faces = [BBox::new(104, 98, 80, 100), BBox::new(600, 120, 70, 90)];
//!
//! let result = associate(&tracks, &faces, 0.2);
//! assert_eq!(result.matched, vec![(0, 0)]);
//! assert_eq!(result.unmatched_candidates, vec![1]);
//! ```
//!
//! ## Complete Pipeline Example
//!
//! ```no_run
//! # #[cfg(feature = "opencv")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use person_height_estimation::{
//!     app::HeightApp,
//!     capture::{CameraSource, VideoSource},
//!     config::Config,
//!     face_detection::YuNetFaceDetector,
//!     overlay::WindowOverlay,
//!     pipeline::HeightPipeline,
//!     visual_tracker::CsrtTrackerFactory,
//! };
//!
//! let config = Config::default();
//! let detector = YuNetFaceDetector::new(&config.models.face_detector, &config.detection)?;
//! let pipeline = HeightPipeline::new(&config, Box::new(detector), Box::new(CsrtTrackerFactory))?;
//!
//! let source = CameraSource::open(&VideoSource::Camera(0))?;
//! let sink = WindowOverlay::new(&config.display.window_title)?;
//!
//! let mut app = HeightApp::new(pipeline, Box::new(source), Box::new(sink), 10);
//! let summary = app.run()?;
//! println!("{} frames, {} people", summary.frames, summary.tracks_created);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "opencv"))]
//! # fn main() {}
//! ```

/// Main application loop
pub mod app;

/// Greedy IoU association of candidates with tracks
pub mod association;

/// Pixel rectangles
pub mod bbox;

/// Frame sources
pub mod capture;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Error types and result aliases
pub mod error;

/// Face detection collaborator
pub mod face_detection;

/// Frame abstraction
pub mod frame;

/// Pinhole camera model and ground-plane height estimation
pub mod geometry;

/// Dense facial landmarks used for verification
pub mod mark_detection;

/// Report presentation
pub mod overlay;

/// Per-frame orchestration
pub mod pipeline;

/// Body pose landmarks for foot points
pub mod pose_estimation;

/// Height history and statistics
pub mod smoothing;

/// Tracks and the track store
pub mod track;

/// Utility functions
pub mod utils;

/// Face verification cascade
pub mod verification;

/// Short-term visual tracker collaborator
pub mod visual_tracker;

pub use error::{Error, Result};
