//! Greedy IoU association between live tracks and new face candidates.

use crate::bbox::BBox;

/// Intersection over union of two boxes
///
/// Returns 0 for disjoint boxes and for pairs whose union is empty.
#[must_use]
pub fn iou(a: &BBox, b: &BBox) -> f64 {
    let intersection = a.intersection_area(b);
    if intersection <= 0 {
        return 0.0;
    }

    let union = a.area() + b.area() - intersection;
    if union <= 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

/// Result of matching candidates against tracks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Association {
    /// `(track index, candidate index)` pairs, in track order
    pub matched: Vec<(usize, usize)>,
    /// Candidates no track claimed, in input order
    pub unmatched_candidates: Vec<usize>,
    /// Tracks that claimed nothing, in input order
    pub unmatched_tracks: Vec<usize>,
}

/// Match `candidates` to `tracks` greedily
///
/// Tracks are visited in order. Each one takes the unclaimed candidate with the
/// highest IoU, the first one winning ties, provided that IoU is strictly above
/// `threshold`. This is not an optimal assignment.
#[must_use]
pub fn associate(tracks: &[BBox], candidates: &[BBox], threshold: f64) -> Association {
    let mut claimed = vec![false; candidates.len()];
    let mut result = Association::default();

    for (track_idx, track_box) in tracks.iter().enumerate() {
        let mut best: Option<usize> = None;
        let mut best_iou = 0.0;

        for (cand_idx, cand_box) in candidates.iter().enumerate() {
            if claimed[cand_idx] {
                continue;
            }
            let overlap = iou(track_box, cand_box);
            if overlap > best_iou {
                best_iou = overlap;
                best = Some(cand_idx);
            }
        }

        match best {
            Some(cand_idx) if best_iou > threshold => {
                claimed[cand_idx] = true;
                result.matched.push((track_idx, cand_idx));
            }
            _ => result.unmatched_tracks.push(track_idx),
        }
    }

    result.unmatched_candidates = claimed
        .iter()
        .enumerate()
        .filter(|(_, &taken)| !taken)
        .map(|(idx, _)| idx)
        .collect();

    result
}
