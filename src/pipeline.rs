//! Per-frame orchestration: detection and tracking schedule, association,
//! foot point resolution, height estimation and smoothing.
//!
//! Every Nth frame runs the face detector and re-anchors tracks on verified
//! detections. The frames in between follow each track with its own visual
//! tracker. Every frame ends with a [`FrameReport`] describing all live tracks.
//!
//! No collaborator failure aborts a frame: detector errors yield no
//! candidates, tracker errors count as misses and pose errors fall back to the
//! bounding box.

use crate::{
    association::associate,
    bbox::BBox,
    config::Config,
    face_detection::FaceDetector,
    frame::Frame,
    geometry::{CameraModel, HeightEstimate, Indeterminate},
    mark_detection::LandmarkMesh,
    pose_estimation::{PoseEstimator, PoseLandmarks},
    smoothing::HeightStats,
    track::{Track, TrackStore},
    verification::FaceVerifier,
    visual_tracker::{TrackerFactory, VisualTracker},
    Result,
};
use log::{debug, warn};
use nalgebra::Point2;

/// What a frame was used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// Full face detection and association
    Detect,
    /// Visual tracker propagation only
    Track,
}

/// Where a track's foot point came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FootSource {
    /// Ankle landmark from the pose estimator
    Ankle,
    /// Bottom-centre of the bounding box
    BoxBottom,
}

/// Per-track output for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TrackReport {
    pub id: u64,
    pub bbox: BBox,
    /// Head point, top-centre of the box
    pub head: Point2<f64>,
    pub foot: Point2<f64>,
    pub foot_source: FootSource,
    /// This frame's measurement, or why there is none
    pub estimate: std::result::Result<HeightEstimate, Indeterminate>,
    /// Mean of the height history; `None` when this frame had no measurement
    pub smoothed: Option<f64>,
    /// Summary of the height history after this frame
    pub stats: Option<HeightStats>,
    pub frames_missing: u32,
}

impl TrackReport {
    /// Height label for display, `"N/A"` when this frame had no measurement
    #[must_use]
    pub fn height_text(&self) -> String {
        match self.smoothed {
            Some(h) => format!("{h:.2} m"),
            None => "N/A".to_string(),
        }
    }
}

/// Output of [`HeightPipeline::process_frame`]
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    pub mode: FrameMode,
    /// Live tracks in creation order
    pub tracks: Vec<TrackReport>,
}

/// The detection, tracking and height estimation pipeline
pub struct HeightPipeline<F: Frame> {
    camera: CameraModel,
    detect_every_n: u64,
    iou_threshold: f64,
    count_detection_misses: bool,
    detector: Box<dyn FaceDetector<F>>,
    tracker_factory: Box<dyn TrackerFactory<F>>,
    verifier: FaceVerifier<F>,
    pose_estimator: Option<Box<dyn PoseEstimator<F>>>,
    tracks: TrackStore<F>,
    frame_index: u64,
}

impl<F: Frame> HeightPipeline<F> {
    /// Create a pipeline from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: &Config,
        detector: Box<dyn FaceDetector<F>>,
        tracker_factory: Box<dyn TrackerFactory<F>>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            camera: config.camera_model()?,
            detect_every_n: config.detection.every_n_frames,
            iou_threshold: config.tracking.iou_threshold,
            count_detection_misses: config.tracking.count_detection_misses,
            detector,
            tracker_factory,
            verifier: FaceVerifier::new(config.verification.clone()),
            pose_estimator: None,
            tracks: TrackStore::new(config.tracking.retirement_threshold, config.smoothing.window),
            frame_index: 0,
        })
    }

    /// Use ankle landmarks from `estimator` as foot points
    #[must_use]
    pub fn with_pose_estimator(mut self, estimator: Box<dyn PoseEstimator<F>>) -> Self {
        self.pose_estimator = Some(estimator);
        self
    }

    /// Confirm face candidates with a landmark mesh
    #[must_use]
    pub fn with_landmark_mesh(mut self, mesh: Box<dyn LandmarkMesh<F>>) -> Self {
        self.verifier = self.verifier.with_mesh(mesh);
        self
    }

    /// Index of the next frame to be processed
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[must_use]
    pub fn tracks(&self) -> &TrackStore<F> {
        &self.tracks
    }

    #[must_use]
    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    #[must_use]
    pub fn verifier(&self) -> &FaceVerifier<F> {
        &self.verifier
    }

    /// Mode the next frame will run in
    #[must_use]
    pub fn next_mode(&self) -> FrameMode {
        if self.frame_index % self.detect_every_n == 0 {
            FrameMode::Detect
        } else {
            FrameMode::Track
        }
    }

    /// Process one frame and report every live track
    pub fn process_frame(&mut self, frame: &F) -> FrameReport {
        let mode = self.next_mode();
        debug!("Frame {} in {mode:?} mode", self.frame_index);

        let pose = self.estimate_pose(frame);

        match mode {
            FrameMode::Detect => self.detect_step(frame),
            FrameMode::Track => self.track_step(frame),
        }

        let report = FrameReport {
            frame_index: self.frame_index,
            mode,
            tracks: self.report_tracks(frame, pose.as_ref()),
        };

        self.frame_index += 1;
        report
    }

    fn estimate_pose(&mut self, frame: &F) -> Option<PoseLandmarks> {
        let estimator = self.pose_estimator.as_mut()?;
        match estimator.estimate(frame) {
            Ok(pose) => pose,
            Err(e) => {
                warn!("Pose estimation failed: {e}");
                None
            }
        }
    }

    fn detect_step(&mut self, frame: &F) {
        let detections = match self.detector.detect(frame) {
            Ok(d) => d,
            Err(e) => {
                warn!("Face detection failed: {e}");
                Vec::new()
            }
        };

        let (fw, fh) = (frame.width(), frame.height());
        let candidates: Vec<BBox> = detections
            .iter()
            .map(|d| (d.score, d.bbox.clip_to(fw, fh)))
            .filter(|(score, bbox)| self.verifier.accept(*score, bbox, frame))
            .map(|(_, bbox)| bbox)
            .collect();
        debug!(
            "{} of {} detections verified",
            candidates.len(),
            detections.len()
        );

        let association = associate(&self.tracks.boxes(), &candidates, self.iou_threshold);

        for &(track_idx, cand_idx) in &association.matched {
            let bbox = candidates[cand_idx];
            let tracker = self.start_tracker(frame, bbox);
            let Some(track) = self.tracks.get_index_mut(track_idx) else {
                continue;
            };
            match tracker {
                Some(tracker) => track.reassign(bbox, tracker),
                // Box and tracker must agree, so fall back to the old tracker
                None => match track.tracker_mut().init(frame, bbox) {
                    Ok(()) => track.record_hit(bbox),
                    Err(e) => {
                        warn!("Failed to re-anchor track {}: {e}", track.id());
                        track.record_miss();
                    }
                },
            }
        }

        if self.count_detection_misses {
            for &track_idx in &association.unmatched_tracks {
                if let Some(track) = self.tracks.get_index_mut(track_idx) {
                    track.record_miss();
                }
            }
        }

        for &cand_idx in &association.unmatched_candidates {
            let bbox = candidates[cand_idx];
            if let Some(tracker) = self.start_tracker(frame, bbox) {
                self.tracks.spawn(bbox, tracker);
            }
        }

        if self.count_detection_misses {
            self.tracks.retire_lost();
        }
    }

    fn track_step(&mut self, frame: &F) {
        let (fw, fh) = (frame.width(), frame.height());

        for track in self.tracks.iter_mut() {
            match track.tracker_mut().update(frame) {
                Ok(Some(bbox)) => {
                    let clipped = bbox.clip_to(fw, fh);
                    if clipped.is_empty() {
                        debug!("Track {} left the frame", track.id());
                        track.record_miss();
                    } else {
                        track.record_hit(clipped);
                    }
                }
                Ok(None) => track.record_miss(),
                Err(e) => {
                    warn!("Tracker update failed for track {}: {e}", track.id());
                    track.record_miss();
                }
            }
        }

        self.tracks.retire_lost();
    }

    /// Create a tracker and initialise it on `bbox`, `None` on failure
    fn start_tracker(&self, frame: &F, bbox: BBox) -> Option<Box<dyn VisualTracker<F>>> {
        let mut tracker = match self.tracker_factory.create() {
            Ok(t) => t,
            Err(e) => {
                warn!("Failed to create tracker: {e}");
                return None;
            }
        };

        if let Err(e) = tracker.init(frame, bbox) {
            warn!("Failed to initialise tracker on {bbox:?}: {e}");
            return None;
        }

        Some(tracker)
    }

    fn report_tracks(&mut self, frame: &F, pose: Option<&PoseLandmarks>) -> Vec<TrackReport> {
        let frame_height = f64::from(frame.height());
        let camera = self.camera;

        self.tracks
            .iter_mut()
            .map(|track| report_track(&camera, track, pose, frame_height))
            .collect()
    }
}

/// Resolve head and foot points, measure, and update the track's history
fn report_track<F: Frame>(
    camera: &CameraModel,
    track: &mut Track<F>,
    pose: Option<&PoseLandmarks>,
    frame_height: f64,
) -> TrackReport {
    let bbox = track.bbox();
    let head = bbox.top_center();
    let (foot, foot_source) = resolve_foot(&bbox, pose, frame_height);

    let estimate = camera.estimate_height(head.y, foot.y, Some(foot.x));
    let smoothed = match &estimate {
        Ok(est) => Some(track.history_mut().push(est.height)),
        Err(reason) => {
            debug!("Track {}: no height this frame ({reason})", track.id());
            None
        }
    };

    TrackReport {
        id: track.id(),
        bbox,
        head,
        foot,
        foot_source,
        estimate,
        smoothed,
        stats: track.history().stats(),
        frames_missing: track.frames_missing(),
    }
}

/// Foot point for `bbox`: the nearer ankle when it lies within the frame rows,
/// otherwise the bottom-centre of the box
#[must_use]
pub fn resolve_foot(
    bbox: &BBox,
    pose: Option<&PoseLandmarks>,
    frame_height: f64,
) -> (Point2<f64>, FootSource) {
    if let Some(pose) = pose {
        let ankle = pose.closest_ankle(bbox.center_x());
        if (0.0..=frame_height).contains(&ankle.y) {
            return (ankle, FootSource::Ankle);
        }
    }
    (bbox.bottom_center(), FootSource::BoxBottom)
}
