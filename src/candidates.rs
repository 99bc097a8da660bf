// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Part candidate extraction for multi-pose decoding.

use crate::keypoint::{Keypoint, Point};
use crate::tensor::{offset_vector, TensorView};

/// Default half-width of the local-maximum window.
pub const LOCAL_MAXIMUM_RADIUS: usize = 1;

/// An above-threshold local maximum, still in heatmap-cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartCandidate {
    /// Heatmap value at the cell.
    pub score: f32,
    /// Cell column.
    pub x: usize,
    /// Cell row.
    pub y: usize,
    /// Part id (heatmap channel).
    pub id: usize,
}

impl PartCandidate {
    /// Image-space position: `cell * stride + offset`.
    #[must_use]
    pub fn image_position(&self, offsets: &TensorView<'_>, stride: usize) -> Point {
        let offset = offset_vector(offsets, self.y, self.x, self.id);
        Point::new(
            (self.x * stride) as f32 + offset.x,
            (self.y * stride) as f32 + offset.y,
        )
    }

    /// The refined keypoint this candidate seeds.
    #[must_use]
    pub fn to_keypoint(&self, offsets: &TensorView<'_>, stride: usize) -> Keypoint {
        Keypoint::new(self.score, self.image_position(offsets, stride), self.id)
    }
}

/// Collect every above-threshold local maximum across all channels.
///
/// Scan order is channel, then row, then column; the result is unsorted and
/// keeps that order. Equal maxima on a plateau all qualify. `NaN` scores never
/// qualify.
#[must_use]
pub fn build_part_candidates(
    heatmaps: &TensorView<'_>,
    score_threshold: f32,
    local_radius: usize,
) -> Vec<PartCandidate> {
    let (height, width) = (heatmaps.height(), heatmaps.width());
    let mut candidates = Vec::new();

    for id in 0..heatmaps.channels() {
        for y in 0..height {
            for x in 0..width {
                let score = heatmaps.get(y, x, id);
                if score.is_nan() || score < score_threshold {
                    continue;
                }
                if is_local_maximum(heatmaps, score, y, x, id, local_radius) {
                    candidates.push(PartCandidate { score, x, y, id });
                }
            }
        }
    }

    candidates
}

/// True unless a strictly greater value lies in the clipped window.
fn is_local_maximum(
    heatmaps: &TensorView<'_>,
    score: f32,
    y: usize,
    x: usize,
    channel: usize,
    radius: usize,
) -> bool {
    let y_start = y.saturating_sub(radius);
    let y_end = heatmaps.height().min(y + radius + 1);
    let x_start = x.saturating_sub(radius);
    let x_end = heatmaps.width().min(x + radius + 1);

    !(y_start..y_end).any(|wy| (x_start..x_end).any(|wx| heatmaps.get(wy, wx, channel) > score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::NUM_KEYPOINTS;
    use crate::tensor::NUM_OFFSET_CHANNELS;
    use ndarray::Array4;

    #[test]
    fn test_threshold_and_local_max() {
        let mut heatmaps = Array4::<f32>::zeros((1, 5, 5, NUM_KEYPOINTS));
        heatmaps[[0, 2, 2, 0]] = 0.9;
        heatmaps[[0, 2, 3, 0]] = 0.6; // neighbour of a larger peak
        heatmaps[[0, 0, 0, 1]] = 0.1; // below threshold
        heatmaps[[0, 4, 4, 1]] = 0.7;

        let candidates = build_part_candidates(&TensorView::new(heatmaps.view()), 0.5, 1);
        assert_eq!(
            candidates,
            vec![
                PartCandidate { score: 0.9, x: 2, y: 2, id: 0 },
                PartCandidate { score: 0.7, x: 4, y: 4, id: 1 },
            ]
        );
    }

    #[test]
    fn test_plateau_all_pass() {
        let mut heatmaps = Array4::<f32>::zeros((1, 3, 3, NUM_KEYPOINTS));
        heatmaps[[0, 1, 0, 2]] = 0.8;
        heatmaps[[0, 1, 1, 2]] = 0.8;

        let candidates = build_part_candidates(&TensorView::new(heatmaps.view()), 0.5, 1);
        assert_eq!(candidates.len(), 2);
        assert_eq!((candidates[0].x, candidates[1].x), (0, 1));
    }

    #[test]
    fn test_window_radius() {
        let mut heatmaps = Array4::<f32>::zeros((1, 1, 5, NUM_KEYPOINTS));
        heatmaps[[0, 0, 0, 0]] = 0.6;
        heatmaps[[0, 0, 2, 0]] = 0.9;

        let view = TensorView::new(heatmaps.view());
        assert_eq!(build_part_candidates(&view, 0.5, 1).len(), 2);
        assert_eq!(build_part_candidates(&view, 0.5, 2).len(), 1);
    }

    #[test]
    fn test_nan_scores_rejected() {
        let mut heatmaps = Array4::<f32>::zeros((1, 2, 2, NUM_KEYPOINTS));
        heatmaps[[0, 0, 0, 0]] = f32::NAN;
        let candidates = build_part_candidates(&TensorView::new(heatmaps.view()), 0.1, 1);
        assert!(candidates.is_empty());

        // a NaN neighbour is not greater, so it does not suppress
        heatmaps[[0, 1, 1, 0]] = 0.5;
        let candidates = build_part_candidates(&TensorView::new(heatmaps.view()), 0.1, 1);
        assert_eq!(candidates, vec![PartCandidate { score: 0.5, x: 1, y: 1, id: 0 }]);
    }

    #[test]
    fn test_image_position() {
        let mut offsets = Array4::<f32>::zeros((1, 3, 3, NUM_OFFSET_CHANNELS));
        offsets[[0, 1, 2, 5]] = 2.0;
        offsets[[0, 1, 2, 5 + NUM_KEYPOINTS]] = 1.0;
        let candidate = PartCandidate { score: 0.5, x: 2, y: 1, id: 5 };

        let kpt = candidate.to_keypoint(&TensorView::new(offsets.view()), 16);
        assert_eq!(kpt.position, Point::new(33.0, 18.0));
        assert_eq!(kpt.id, 5);
    }
}
