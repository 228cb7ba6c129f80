//! Live person identities and their lifecycle.

use crate::{
    bbox::BBox, frame::Frame, smoothing::HeightHistory, visual_tracker::VisualTracker,
};
use log::info;

/// One person followed across frames
pub struct Track<F: Frame> {
    id: u64,
    bbox: BBox,
    tracker: Box<dyn VisualTracker<F>>,
    frames_missing: u32,
    history: HeightHistory,
}

impl<F: Frame> Track<F> {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Consecutive failed updates since the last success
    #[must_use]
    pub fn frames_missing(&self) -> u32 {
        self.frames_missing
    }

    #[must_use]
    pub fn history(&self) -> &HeightHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HeightHistory {
        &mut self.history
    }

    pub fn tracker_mut(&mut self) -> &mut dyn VisualTracker<F> {
        self.tracker.as_mut()
    }

    /// Successful update: move the box and clear the miss counter
    pub fn record_hit(&mut self, bbox: BBox) {
        self.bbox = bbox;
        self.frames_missing = 0;
    }

    /// Failed update
    pub fn record_miss(&mut self) {
        self.frames_missing = self.frames_missing.saturating_add(1);
    }

    /// Re-anchor the track on a matched detection with a fresh tracker
    pub fn reassign(&mut self, bbox: BBox, tracker: Box<dyn VisualTracker<F>>) {
        self.tracker = tracker;
        self.record_hit(bbox);
    }
}

/// Owns every live track, in creation order
pub struct TrackStore<F: Frame> {
    tracks: Vec<Track<F>>,
    next_id: u64,
    retirement_threshold: u32,
    history_capacity: usize,
}

impl<F: Frame> TrackStore<F> {
    /// # Panics
    ///
    /// Panics if `history_capacity` is zero.
    #[must_use]
    pub fn new(retirement_threshold: u32, history_capacity: usize) -> Self {
        assert!(history_capacity > 0, "Window size must be greater than 0");
        Self {
            tracks: Vec::new(),
            next_id: 0,
            retirement_threshold,
            history_capacity,
        }
    }

    /// Add a track with the next id and return that id
    pub fn spawn(&mut self, bbox: BBox, tracker: Box<dyn VisualTracker<F>>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.tracks.push(Track {
            id,
            bbox,
            tracker,
            frames_missing: 0,
            history: HeightHistory::new(self.history_capacity),
        });
        info!("Track {id} created at {bbox:?}");

        id
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Track<F>> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Track<F>> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    /// Track at position `index` in creation order
    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut Track<F>> {
        self.tracks.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track<F>> {
        self.tracks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Track<F>> {
        self.tracks.iter_mut()
    }

    /// Boxes of all tracks, in creation order
    #[must_use]
    pub fn boxes(&self) -> Vec<BBox> {
        self.tracks.iter().map(|t| t.bbox).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Total number of tracks ever spawned
    #[must_use]
    pub fn tracks_created(&self) -> u64 {
        self.next_id
    }

    #[must_use]
    pub fn retirement_threshold(&self) -> u32 {
        self.retirement_threshold
    }

    /// Drop tracks whose miss counter exceeds the retirement threshold and
    /// return their ids
    pub fn retire_lost(&mut self) -> Vec<u64> {
        let threshold = self.retirement_threshold;
        let mut retired = Vec::new();

        self.tracks.retain(|t| {
            if t.frames_missing > threshold {
                info!("Track {} retired after {} missed frames", t.id, t.frames_missing);
                retired.push(t.id);
                false
            } else {
                true
            }
        });

        retired
    }
}
