//! Short-term visual tracker collaborator.
//!
//! Every track owns one tracker instance outright. A tracker is initialised on a
//! box and then follows it frame by frame until it reports a loss.

use crate::{bbox::BBox, frame::Frame, Result};

/// Single-object short-term tracker
pub trait VisualTracker<F: Frame> {
    /// Start following `bbox` in `frame`
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker cannot be initialised on the region.
    fn init(&mut self, frame: &F, bbox: BBox) -> Result<()>;

    /// Follow the target into `frame`; `Ok(None)` when the target was lost
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying implementation fails.
    fn update(&mut self, frame: &F) -> Result<Option<BBox>>;
}

/// Creates fresh, uninitialised trackers
pub trait TrackerFactory<F: Frame> {
    /// # Errors
    ///
    /// Returns an error if a tracker instance cannot be created.
    fn create(&self) -> Result<Box<dyn VisualTracker<F>>>;
}

#[cfg(feature = "opencv")]
pub use csrt::{CsrtTracker, CsrtTrackerFactory};

#[cfg(feature = "opencv")]
mod csrt {
    use super::{TrackerFactory, VisualTracker};
    use crate::{bbox::BBox, Result};
    use opencv::{
        core::{Mat, Ptr, Rect},
        prelude::*,
        tracking::{TrackerCSRT, TrackerCSRT_Params},
    };

    /// Channel and spatial reliability tracker from `OpenCV` contrib
    pub struct CsrtTracker {
        inner: Ptr<TrackerCSRT>,
    }

    impl CsrtTracker {
        /// # Errors
        ///
        /// Returns an error if `OpenCV` cannot create the tracker.
        pub fn new() -> Result<Self> {
            let params = TrackerCSRT_Params::default()?;
            Ok(Self {
                inner: TrackerCSRT::create(&params)?,
            })
        }
    }

    impl VisualTracker<Mat> for CsrtTracker {
        fn init(&mut self, frame: &Mat, bbox: BBox) -> Result<()> {
            self.inner.init(frame, bbox.into())?;
            Ok(())
        }

        fn update(&mut self, frame: &Mat) -> Result<Option<BBox>> {
            let mut rect = Rect::default();
            if self.inner.update(frame, &mut rect)? {
                Ok(Some(rect.into()))
            } else {
                Ok(None)
            }
        }
    }

    /// Hands out a new [`CsrtTracker`] per track
    #[derive(Debug, Clone, Copy, Default)]
    pub struct CsrtTrackerFactory;

    impl TrackerFactory<Mat> for CsrtTrackerFactory {
        fn create(&self) -> Result<Box<dyn VisualTracker<Mat>>> {
            Ok(Box::new(CsrtTracker::new()?))
        }
    }
}
