// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Part-level non-maximum suppression for multi-pose decoding.

use crate::keypoint::{Point, Pose};

/// Whether a root candidate lies too close to an already accepted pose.
///
/// Only the candidate's own part id is compared against the same part id of
/// each accepted pose. The boundary is inclusive: a squared distance equal to
/// `squared_radius` suppresses.
///
/// # Arguments
///
/// * `position` - Refined image-space position of the candidate.
/// * `part_id` - Part id of the candidate.
/// * `poses` - Poses accepted so far.
/// * `squared_radius` - `nms_radius * nms_radius`.
#[must_use]
pub fn is_suppressed(position: Point, part_id: usize, poses: &[Pose], squared_radius: f32) -> bool {
    poses
        .iter()
        .any(|pose| pose[part_id].position.squared_distance(&position) <= squared_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::Keypoint;

    fn pose_with(part_id: usize, position: Point) -> Pose {
        let mut pose = Pose::empty();
        pose[part_id] = Keypoint::new(0.9, position, part_id);
        pose
    }

    #[test]
    fn test_no_poses() {
        assert!(!is_suppressed(Point::new(0.0, 0.0), 0, &[], 100.0));
    }

    #[test]
    fn test_inclusive_radius() {
        let poses = [pose_with(3, Point::new(0.0, 0.0))];
        assert!(is_suppressed(Point::new(6.0, 8.0), 3, &poses, 100.0));
        assert!(!is_suppressed(Point::new(6.0, 8.1), 3, &poses, 100.0));
    }

    #[test]
    fn test_only_same_part_checked() {
        // part 3 of the accepted pose sits on top of the candidate, but the
        // candidate is part 4 whose slot is far away
        let mut pose = pose_with(3, Point::new(50.0, 50.0));
        pose[4] = Keypoint::new(0.9, Point::new(500.0, 500.0), 4);
        assert!(!is_suppressed(Point::new(50.0, 50.0), 4, &[pose], 400.0));
    }

    #[test]
    fn test_any_pose_suppresses() {
        let poses = [
            pose_with(0, Point::new(1000.0, 1000.0)),
            pose_with(0, Point::new(10.0, 10.0)),
        ];
        assert!(is_suppressed(Point::new(12.0, 10.0), 0, &poses, 25.0));
    }
}
