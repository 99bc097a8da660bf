// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Fixed body-part graphs.
//!
//! [`PARENT_CHILD_TREE`] drives multi-pose decoding: an edge's position in the
//! table is its edge id, which selects the displacement channels, so the order
//! must never change. [`DISPLAY_SKELETON`] is the denser graph used for drawing.

/// Number of edges in the decoding tree.
pub const NUM_EDGES: usize = 16;

/// `(parent, child)` part ids, rooted at the nose.
pub const PARENT_CHILD_TREE: [(usize, usize); NUM_EDGES] = [
    (0, 1),   // nose -> left eye
    (1, 3),   // left eye -> left ear
    (0, 2),   // nose -> right eye
    (2, 4),   // right eye -> right ear
    (0, 5),   // nose -> left shoulder
    (5, 7),   // left shoulder -> left elbow
    (7, 9),   // left elbow -> left wrist
    (5, 11),  // left shoulder -> left hip
    (11, 13), // left hip -> left knee
    (13, 15), // left knee -> left ankle
    (0, 6),   // nose -> right shoulder
    (6, 8),   // right shoulder -> right elbow
    (8, 10),  // right elbow -> right wrist
    (6, 12),  // right shoulder -> right hip
    (12, 14), // right hip -> right knee
    (14, 16), // right knee -> right ankle
];

/// Joint pairs connected by a line when drawing a pose.
pub const DISPLAY_SKELETON: [(usize, usize); 18] = [
    (0, 1),   // nose to left eye
    (0, 2),   // nose to right eye
    (1, 3),   // left eye to left ear
    (2, 4),   // right eye to right ear
    (5, 6),   // left shoulder to right shoulder
    (5, 11),  // left shoulder to left hip
    (6, 12),  // right shoulder to right hip
    (5, 12),  // left shoulder to right hip
    (6, 11),  // right shoulder to left hip
    (11, 12), // left hip to right hip
    (5, 7),   // left shoulder to left elbow
    (7, 9),   // left elbow to left wrist
    (6, 8),   // right shoulder to right elbow
    (8, 10),  // right elbow to right wrist
    (11, 13), // left hip to left knee
    (13, 15), // left knee to left ankle
    (12, 14), // right hip to right knee
    (14, 16), // right knee to right ankle
];

/// Colour group of each display limb: head, torso, arms, legs.
pub const LIMB_GROUPS: [LimbGroup; 18] = [
    LimbGroup::Head,
    LimbGroup::Head,
    LimbGroup::Head,
    LimbGroup::Head,
    LimbGroup::Torso,
    LimbGroup::Torso,
    LimbGroup::Torso,
    LimbGroup::Torso,
    LimbGroup::Torso,
    LimbGroup::Torso,
    LimbGroup::Arm,
    LimbGroup::Arm,
    LimbGroup::Arm,
    LimbGroup::Arm,
    LimbGroup::Leg,
    LimbGroup::Leg,
    LimbGroup::Leg,
    LimbGroup::Leg,
];

/// Body region a display limb belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimbGroup {
    /// Face edges.
    Head,
    /// Shoulders and hips.
    Torso,
    /// Upper and lower arms.
    Arm,
    /// Upper and lower legs.
    Leg,
}

impl LimbGroup {
    /// RGB colour used for this group.
    #[must_use]
    pub const fn color(&self) -> [u8; 3] {
        match self {
            Self::Head => [255, 0, 255],
            Self::Torso => [255, 0, 0],
            Self::Arm => [0, 255, 0],
            Self::Leg => [0, 0, 255],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::NUM_KEYPOINTS;

    #[test]
    fn test_tree_spans_all_parts() {
        // every non-root part is the child of exactly one edge
        let mut parents = [0usize; NUM_KEYPOINTS];
        for &(_, child) in &PARENT_CHILD_TREE {
            parents[child] += 1;
        }
        assert_eq!(parents[0], 0);
        assert!(parents[1..].iter().all(|&n| n == 1));
    }

    #[test]
    fn test_tree_edge_order() {
        assert_eq!(PARENT_CHILD_TREE[0], (0, 1));
        assert_eq!(PARENT_CHILD_TREE[4], (0, 5));
        assert_eq!(PARENT_CHILD_TREE[10], (0, 6));
        assert_eq!(PARENT_CHILD_TREE[15], (14, 16));
    }

    #[test]
    fn test_display_skeleton_in_range() {
        assert!(DISPLAY_SKELETON
            .iter()
            .all(|&(a, b)| a < NUM_KEYPOINTS && b < NUM_KEYPOINTS && a != b));
        assert_eq!(LIMB_GROUPS[0].color(), [255, 0, 255]);
        assert_eq!(LIMB_GROUPS[17], LimbGroup::Leg);
    }
}
