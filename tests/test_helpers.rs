//! Helper functions and scripted collaborators for tests

#![allow(dead_code)]

use image::RgbImage;
use nalgebra::Point2;
use person_height_estimation::{
    bbox::BBox,
    face_detection::{FaceDetection, FaceDetector},
    mark_detection::LandmarkMesh,
    pose_estimation::{PoseEstimator, PoseLandmarks},
    visual_tracker::{TrackerFactory, VisualTracker},
    Error, Result,
};
use std::{cell::RefCell, collections::VecDeque, rc::Rc};

pub const FRAME_WIDTH: u32 = 1280;
pub const FRAME_HEIGHT: u32 = 720;

/// Create a blank test frame of the default size
pub fn create_test_frame() -> RgbImage {
    RgbImage::new(FRAME_WIDTH, FRAME_HEIGHT)
}

/// A face candidate that passes the default basic filters
pub fn good_face(x: i32, y: i32) -> FaceDetection {
    FaceDetection::new(BBox::new(x, y, 80, 100), 0.95)
}

/// Face detector answering from a script, one entry per call
pub struct ScriptedDetector {
    script: VecDeque<Result<Vec<FaceDetection>>>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Result<Vec<FaceDetection>>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// Detector returning the same faces on every call
    pub fn repeating(faces: Vec<FaceDetection>, calls: usize) -> Self {
        Self::new((0..calls).map(|_| Ok(faces.clone())).collect())
    }
}

impl FaceDetector<RgbImage> for ScriptedDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<FaceDetection>> {
        self.script.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// How every tracker created by a [`ScriptedTrackerFactory`] behaves on update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerBehaviour {
    /// Report the initial box unchanged
    Hold,
    /// Move the box by this many pixels per update
    Drift(i32, i32),
    /// Report the target as lost
    Lose,
    /// Fail with an error
    Fail,
}

/// Shared switch controlling every tracker of a factory
#[derive(Debug, Clone)]
pub struct TrackerControl(Rc<RefCell<TrackerBehaviour>>);

impl TrackerControl {
    pub fn set(&self, behaviour: TrackerBehaviour) {
        *self.0.borrow_mut() = behaviour;
    }
}

struct ScriptedTracker {
    bbox: BBox,
    control: TrackerControl,
}

impl VisualTracker<RgbImage> for ScriptedTracker {
    fn init(&mut self, _frame: &RgbImage, bbox: BBox) -> Result<()> {
        self.bbox = bbox;
        Ok(())
    }

    fn update(&mut self, _frame: &RgbImage) -> Result<Option<BBox>> {
        let behaviour = *self.control.0.borrow();
        match behaviour {
            TrackerBehaviour::Hold => Ok(Some(self.bbox)),
            TrackerBehaviour::Drift(dx, dy) => {
                self.bbox.x += dx;
                self.bbox.y += dy;
                Ok(Some(self.bbox))
            }
            TrackerBehaviour::Lose => Ok(None),
            TrackerBehaviour::Fail => Err(Error::Tracker("scripted failure".to_string())),
        }
    }
}

/// Factory of trackers sharing one [`TrackerControl`]
pub struct ScriptedTrackerFactory {
    control: TrackerControl,
    created: Rc<RefCell<usize>>,
}

impl ScriptedTrackerFactory {
    pub fn new(behaviour: TrackerBehaviour) -> (Self, TrackerControl, Rc<RefCell<usize>>) {
        let control = TrackerControl(Rc::new(RefCell::new(behaviour)));
        let created = Rc::new(RefCell::new(0));
        (
            Self {
                control: control.clone(),
                created: Rc::clone(&created),
            },
            control,
            created,
        )
    }
}

impl TrackerFactory<RgbImage> for ScriptedTrackerFactory {
    fn create(&self) -> Result<Box<dyn VisualTracker<RgbImage>>> {
        *self.created.borrow_mut() += 1;
        Ok(Box::new(ScriptedTracker {
            bbox: BBox::default(),
            control: self.control.clone(),
        }))
    }
}

/// Factory that can never create a tracker
pub struct BrokenTrackerFactory;

impl TrackerFactory<RgbImage> for BrokenTrackerFactory {
    fn create(&self) -> Result<Box<dyn VisualTracker<RgbImage>>> {
        Err(Error::Tracker("no tracker available".to_string()))
    }
}

/// Factory whose first `limit` trackers hold their box, after which `create` fails
pub struct LimitedTrackerFactory {
    limit: usize,
    created: RefCell<usize>,
    accept_reinit: bool,
}

impl LimitedTrackerFactory {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            created: RefCell::new(0),
            accept_reinit: true,
        }
    }

    /// Trackers that refuse every `init` after the first
    pub fn single_anchor(limit: usize) -> Self {
        Self {
            accept_reinit: false,
            ..Self::new(limit)
        }
    }
}

impl TrackerFactory<RgbImage> for LimitedTrackerFactory {
    fn create(&self) -> Result<Box<dyn VisualTracker<RgbImage>>> {
        let mut created = self.created.borrow_mut();
        if *created >= self.limit {
            return Err(Error::Tracker("tracker limit reached".to_string()));
        }
        *created += 1;
        Ok(Box::new(HoldingTracker {
            bbox: None,
            accept_reinit: self.accept_reinit,
        }))
    }
}

struct HoldingTracker {
    bbox: Option<BBox>,
    accept_reinit: bool,
}

impl VisualTracker<RgbImage> for HoldingTracker {
    fn init(&mut self, _frame: &RgbImage, bbox: BBox) -> Result<()> {
        if self.bbox.is_some() && !self.accept_reinit {
            return Err(Error::Tracker("re-init refused".to_string()));
        }
        self.bbox = Some(bbox);
        Ok(())
    }

    fn update(&mut self, _frame: &RgbImage) -> Result<Option<BBox>> {
        Ok(self.bbox)
    }
}

/// Pose estimator returning fixed ankles, or an error
pub struct FixedPose(pub Option<Result<PoseLandmarks>>);

impl FixedPose {
    pub fn ankles(left: (f64, f64), right: (f64, f64)) -> Self {
        Self(Some(Ok(PoseLandmarks::new(
            Point2::new(left.0, left.1),
            Point2::new(right.0, right.1),
        ))))
    }

    pub fn failing() -> Self {
        Self(Some(Err(Error::Collaborator("pose crashed".to_string()))))
    }
}

impl PoseEstimator<RgbImage> for FixedPose {
    fn estimate(&mut self, _frame: &RgbImage) -> Result<Option<PoseLandmarks>> {
        match &self.0 {
            None => Ok(None),
            Some(Ok(pose)) => Ok(Some(*pose)),
            Some(Err(e)) => Err(Error::Collaborator(e.to_string())),
        }
    }
}

/// Landmark mesh returning a fixed number of points
pub struct FixedMesh(pub usize);

impl LandmarkMesh<RgbImage> for FixedMesh {
    fn estimate(&mut self, _face: &RgbImage) -> Result<Option<Vec<Point2<f32>>>> {
        Ok(Some(vec![Point2::new(0.0, 0.0); self.0]))
    }
}
