//! Error types for the person height estimation library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[cfg(feature = "opencv")]
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Face detector, pose estimator or landmark mesh failed
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Visual tracker could not be created, initialised or updated
    #[error("Tracker error: {0}")]
    Tracker(String),

    /// Frame capture failed
    #[error("Capture error: {0}")]
    Capture(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
