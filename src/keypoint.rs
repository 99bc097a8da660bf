// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Keypoint and pose types produced by the decoders.
//!
//! A [`Pose`] is a fixed-size array of [`NUM_KEYPOINTS`] keypoints indexed by
//! part id, so `pose[i].id == i` holds for every slot.

use std::ops::{Index, IndexMut};

use serde::Serialize;

/// Number of body parts a PoseNet model predicts.
pub const NUM_KEYPOINTS: usize = 17;

/// Part names in channel order.
pub const PART_NAMES: [&str; NUM_KEYPOINTS] = [
    "nose",
    "leftEye",
    "rightEye",
    "leftEar",
    "rightEar",
    "leftShoulder",
    "rightShoulder",
    "leftElbow",
    "rightElbow",
    "leftWrist",
    "rightWrist",
    "leftHip",
    "rightHip",
    "leftKnee",
    "rightKnee",
    "leftAnkle",
    "rightAnkle",
];

/// Look up the part id for a part name.
#[must_use]
pub fn part_id(name: &str) -> Option<usize> {
    PART_NAMES.iter().position(|&n| n == name)
}

/// A 2D position in pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn squared_distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }
}

/// A single decoded body part.
///
/// A `score` of exactly `0.0` doubles as the "not yet decoded" marker while a
/// pose is being assembled by the graph traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Keypoint {
    /// Heatmap confidence in `[0, 1]`.
    pub score: f32,
    /// Refined image-space position.
    pub position: Point,
    /// Part id (`0..NUM_KEYPOINTS`).
    pub id: usize,
}

impl Keypoint {
    /// Create a new keypoint.
    #[must_use]
    pub const fn new(score: f32, position: Point, id: usize) -> Self {
        Self {
            score,
            position,
            id,
        }
    }

    /// An undecoded slot for `id`.
    #[must_use]
    pub const fn unfilled(id: usize) -> Self {
        Self::new(0.0, Point::new(0.0, 0.0), id)
    }

    /// Whether the slot still holds the undecoded marker.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_unfilled(&self) -> bool {
        self.score == 0.0
    }

    /// Name of this keypoint's body part.
    #[must_use]
    pub fn name(&self) -> &'static str {
        PART_NAMES.get(self.id).copied().unwrap_or("unknown")
    }
}

/// A full-body pose: one keypoint per part id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pose {
    keypoints: [Keypoint; NUM_KEYPOINTS],
}

impl Pose {
    /// A pose where every slot is unfilled.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            keypoints: std::array::from_fn(Keypoint::unfilled),
        }
    }

    /// Build a pose from an id-indexed keypoint array.
    #[must_use]
    pub const fn from_keypoints(keypoints: [Keypoint; NUM_KEYPOINTS]) -> Self {
        Self { keypoints }
    }

    /// All keypoints, indexed by part id.
    #[must_use]
    pub const fn keypoints(&self) -> &[Keypoint; NUM_KEYPOINTS] {
        &self.keypoints
    }

    /// Iterate keypoints in part id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Keypoint> {
        self.keypoints.iter()
    }

    /// Keypoint for the named body part.
    #[must_use]
    pub fn keypoint_by_name(&self, name: &str) -> Option<&Keypoint> {
        part_id(name).map(|id| &self.keypoints[id])
    }

    /// Mean keypoint score.
    #[must_use]
    pub fn mean_score(&self) -> f32 {
        self.keypoints.iter().map(|k| k.score).sum::<f32>() / NUM_KEYPOINTS as f32
    }

    /// Whether every slot has been decoded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.keypoints.iter().all(|k| !k.is_unfilled())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<usize> for Pose {
    type Output = Keypoint;

    fn index(&self, id: usize) -> &Keypoint {
        &self.keypoints[id]
    }
}

impl IndexMut<usize> for Pose {
    fn index_mut(&mut self, id: usize) -> &mut Keypoint {
        &mut self.keypoints[id]
    }
}

impl<'a> IntoIterator for &'a Pose {
    type Item = &'a Keypoint;
    type IntoIter = std::slice::Iter<'a, Keypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.keypoints.iter()
    }
}
