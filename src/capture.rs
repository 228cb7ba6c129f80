//! Frame sources.

use crate::{frame::Frame, Result};

/// Video source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// Anything that yields frames until it runs dry
pub trait FrameSource<F: Frame> {
    /// Next frame, or `Ok(None)` at the end of the stream
    ///
    /// # Errors
    ///
    /// Returns an error if the device fails.
    fn next_frame(&mut self) -> Result<Option<F>>;
}

/// Frame source backed by any iterator of frames
pub struct IterFrameSource<I> {
    frames: I,
}

impl<I> IterFrameSource<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(frames: T) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl<F: Frame, I: Iterator<Item = F>> FrameSource<F> for IterFrameSource<I> {
    fn next_frame(&mut self) -> Result<Option<F>> {
        Ok(self.frames.next())
    }
}

#[cfg(feature = "opencv")]
pub use camera::CameraSource;

#[cfg(feature = "opencv")]
mod camera {
    use super::{FrameSource, VideoSource};
    use crate::{Error, Result};
    use log::{info, warn};
    use opencv::{
        core::Mat,
        prelude::*,
        videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
    };

    /// Consecutive empty reads tolerated from a live camera
    const MAX_EMPTY_READS: u32 = 30;

    /// `OpenCV` video capture over a camera or a file
    pub struct CameraSource {
        capture: VideoCapture,
        source: VideoSource,
    }

    impl CameraSource {
        /// Open `source`
        ///
        /// # Errors
        ///
        /// Returns an error if the device or file cannot be opened.
        pub fn open(source: &VideoSource) -> Result<Self> {
            let capture = match source {
                VideoSource::Camera(index) => {
                    info!("Opening camera {index}");
                    let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;

                    // Reduce buffer size for lower latency (webcam only)
                    cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;
                    cap
                }
                VideoSource::File(path) => {
                    info!("Opening video file: {path}");
                    VideoCapture::from_file(path, videoio::CAP_ANY)?
                }
            };

            if !capture.is_opened()? {
                return Err(Error::Capture(format!("Could not open {source:?}")));
            }

            Ok(Self {
                capture,
                source: source.clone(),
            })
        }
    }

    impl FrameSource<Mat> for CameraSource {
        fn next_frame(&mut self) -> Result<Option<Mat>> {
            let mut empty_reads = 0;
            loop {
                let mut frame = Mat::default();
                if self.capture.read(&mut frame)? && !frame.empty() {
                    return Ok(Some(frame));
                }

                if matches!(self.source, VideoSource::File(_)) {
                    info!("End of video file reached");
                    return Ok(None);
                }

                empty_reads += 1;
                if empty_reads >= MAX_EMPTY_READS {
                    return Err(Error::Capture(format!(
                        "No frame from camera after {empty_reads} reads"
                    )));
                }
                warn!("Failed to read frame, retrying...");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_iter_frame_source() {
        let mut source = IterFrameSource::new(vec![RgbImage::new(4, 4), RgbImage::new(8, 8)]);

        assert_eq!(source.next_frame().unwrap().unwrap().dimensions(), (4, 4));
        assert_eq!(source.next_frame().unwrap().unwrap().dimensions(), (8, 8));
        assert!(source.next_frame().unwrap().is_none());
    }
}
