// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Multi-person decoding: greedy root selection with part-level NMS.

use crate::candidates::build_part_candidates;
use crate::error::Result;
use crate::keypoint::Pose;
use crate::nms::is_suppressed;
use crate::tensor::PoseTensors;
use crate::traverse::decode_pose_from_root;

/// Parameters for [`decode_multiple_poses`].
#[derive(Debug, Clone, Copy)]
pub struct MultiPoseParams {
    /// Heatmap downsampling factor.
    pub stride: usize,
    /// Upper bound on returned poses.
    pub max_poses: usize,
    /// Minimum heatmap value for a root candidate.
    pub score_threshold: f32,
    /// Minimum image-space distance between same-part roots.
    pub nms_radius: f32,
    /// Half-width of the candidate local-maximum window.
    pub local_maximum_radius: usize,
}

/// Decode up to `max_poses` poses.
///
/// Candidates are taken in descending score order (stable, so equal scores
/// keep channel/row/column scan order). A candidate whose refined position is
/// within `nms_radius` of the same part in an accepted pose is dropped for
/// good; otherwise a full pose is grown from it and appended. Poses are
/// returned in acceptance order.
///
/// # Errors
///
/// Returns [`crate::DecodeError::ShapeMismatchError`] if any tensor has the
/// wrong channel count or grid size.
pub fn decode_multiple_poses(tensors: &PoseTensors<'_>, params: &MultiPoseParams) -> Result<Vec<Pose>> {
    tensors.validate()?;

    let mut candidates = build_part_candidates(
        &tensors.heatmaps,
        params.score_threshold,
        params.local_maximum_radius,
    );
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let squared_radius = params.nms_radius * params.nms_radius;
    let mut poses: Vec<Pose> = Vec::with_capacity(params.max_poses.min(candidates.len()));

    for root in &candidates {
        if poses.len() >= params.max_poses {
            break;
        }

        let position = root.image_position(&tensors.offsets, params.stride);
        if is_suppressed(position, root.id, &poses, squared_radius) {
            continue;
        }

        poses.push(decode_pose_from_root(root, tensors, params.stride));
    }

    Ok(poses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::{Point, NUM_KEYPOINTS};
    use crate::skeleton::NUM_EDGES;
    use crate::tensor::{TensorView, NUM_DISPLACEMENT_CHANNELS, NUM_OFFSET_CHANNELS};
    use ndarray::Array4;

    fn params(max_poses: usize, nms_radius: f32) -> MultiPoseParams {
        MultiPoseParams {
            stride: 16,
            max_poses,
            score_threshold: 0.5,
            nms_radius,
            local_maximum_radius: 1,
        }
    }

    fn decode(heatmaps: &Array4<f32>, params: &MultiPoseParams) -> Vec<Pose> {
        let (_, h, w, _) = heatmaps.dim();
        let offsets = Array4::<f32>::zeros((1, h, w, NUM_OFFSET_CHANNELS));
        let disp = Array4::<f32>::zeros((1, h, w, NUM_DISPLACEMENT_CHANNELS));
        let tensors = PoseTensors::new(
            TensorView::new(heatmaps.view()),
            TensorView::new(offsets.view()),
            TensorView::new(disp.view()),
            TensorView::new(disp.view()),
        );
        decode_multiple_poses(&tensors, params).unwrap()
    }

    #[test]
    fn test_below_threshold_is_empty() {
        let heatmaps = Array4::<f32>::from_elem((1, 6, 6, NUM_KEYPOINTS), 0.2);
        assert!(decode(&heatmaps, &params(5, 20.0)).is_empty());
    }

    #[test]
    fn test_two_separate_peaks() {
        let mut heatmaps = Array4::<f32>::zeros((1, 9, 9, NUM_KEYPOINTS));
        heatmaps[[0, 1, 1, 0]] = 0.8;
        heatmaps[[0, 7, 7, 3]] = 0.9;

        let poses = decode(&heatmaps, &params(2, 20.0));
        assert_eq!(poses.len(), 2);
        // higher score accepted first
        assert_eq!(poses[0][3].position, Point::new(112.0, 112.0));
        assert!((poses[0][3].score - 0.9).abs() < f32::EPSILON);
        assert_eq!(poses[1][0].position, Point::new(16.0, 16.0));
        assert!((poses[1][0].score - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_max_poses_bound() {
        let mut heatmaps = Array4::<f32>::zeros((1, 9, 9, NUM_KEYPOINTS));
        for (i, c) in [(0, 0), (4, 0), (8, 0), (0, 8), (8, 8)].iter().enumerate() {
            heatmaps[[0, c.0, c.1, 0]] = 0.6 + i as f32 * 0.05;
        }
        assert_eq!(decode(&heatmaps, &params(3, 1.0)).len(), 3);
        assert_eq!(decode(&heatmaps, &params(10, 1.0)).len(), 5);
    }

    #[test]
    fn test_nms_rejects_nearby_same_part() {
        // two nose peaks 32px apart, radius 40 keeps only the stronger one
        let mut heatmaps = Array4::<f32>::zeros((1, 9, 9, NUM_KEYPOINTS));
        heatmaps[[0, 4, 2, 0]] = 0.9;
        heatmaps[[0, 4, 4, 0]] = 0.7;

        let poses = decode(&heatmaps, &params(5, 40.0));
        assert_eq!(poses.len(), 1);
        assert_eq!(poses[0][0].position, Point::new(32.0, 64.0));

        let poses = decode(&heatmaps, &params(5, 20.0));
        assert_eq!(poses.len(), 2);
    }

    #[test]
    fn test_nms_against_traversed_keypoint() {
        // nose root at cell (2, 2); edge 0 (nose -> left eye) moves one cell right
        let mut heatmaps = Array4::<f32>::zeros((1, 9, 9, NUM_KEYPOINTS));
        heatmaps[[0, 2, 2, 0]] = 0.9;
        heatmaps[[0, 2, 3, 1]] = 0.6; // where traversal lands the left eye
        heatmaps[[0, 6, 6, 1]] = 0.7; // a second, distant left eye
        let offsets = Array4::<f32>::zeros((1, 9, 9, NUM_OFFSET_CHANNELS));
        let mut fwd = Array4::<f32>::zeros((1, 9, 9, NUM_DISPLACEMENT_CHANNELS));
        fwd[[0, 2, 2, NUM_EDGES]] = 16.0; // edge 0, x component
        let bwd = Array4::<f32>::zeros((1, 9, 9, NUM_DISPLACEMENT_CHANNELS));
        let tensors = PoseTensors::new(
            TensorView::new(heatmaps.view()),
            TensorView::new(offsets.view()),
            TensorView::new(fwd.view()),
            TensorView::new(bwd.view()),
        );

        let poses = decode_multiple_poses(&tensors, &params(5, 20.0)).unwrap();
        assert_eq!(poses.len(), 2);
        // the first pose reached the left eye by traversal, not as a root
        assert_eq!(poses[0][0].position, Point::new(32.0, 32.0));
        assert_eq!(poses[0][1].position, Point::new(48.0, 32.0));
        assert!((poses[0][1].score - 0.6).abs() < f32::EPSILON);
        // the distant left eye survives, the one under the traversed eye does not
        assert_eq!(poses[1][1].position, Point::new(96.0, 96.0));
        assert!(poses
            .iter()
            .skip(1)
            .all(|pose| pose[1].position != Point::new(48.0, 32.0)));
    }

    #[test]
    fn test_equal_scores_keep_scan_order() {
        let mut heatmaps = Array4::<f32>::zeros((1, 9, 9, NUM_KEYPOINTS));
        heatmaps[[0, 6, 6, 2]] = 0.7;
        heatmaps[[0, 1, 1, 2]] = 0.7;
        heatmaps[[0, 4, 4, 1]] = 0.7;

        let poses = decode(&heatmaps, &params(3, 1.0));
        assert_eq!(poses.len(), 3);
        assert_eq!(poses[0][1].position, Point::new(64.0, 64.0));
        assert_eq!(poses[1][2].position, Point::new(16.0, 16.0));
        assert_eq!(poses[2][2].position, Point::new(96.0, 96.0));
    }

    #[test]
    fn test_deterministic() {
        let heatmaps = Array4::from_shape_fn((1, 8, 8, NUM_KEYPOINTS), |(_, y, x, c)| {
            ((y * 5 + x * 3 + c * 7) % 11) as f32 / 10.0
        });
        let first = decode(&heatmaps, &params(6, 10.0));
        let second = decode(&heatmaps, &params(6, 10.0));
        assert_eq!(first, second);
    }
}
