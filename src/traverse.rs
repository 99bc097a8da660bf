// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose assembly by walking the part tree from a root keypoint.
//!
//! Starting from one refined root, a backward pass over
//! [`PARENT_CHILD_TREE`](crate::skeleton::PARENT_CHILD_TREE) (last edge to
//! first) fills parents from children using the backward displacements, then
//! a forward pass (first edge to last) fills children from parents using the
//! forward displacements. Each slot is written at most once.
//!
//! A slot counts as empty while its score is exactly `0.0`, so a keypoint
//! whose heatmap value is genuinely zero stays "empty" and may be revisited
//! by a later edge.

use crate::candidates::PartCandidate;
use crate::keypoint::{Keypoint, Point, Pose};
use crate::skeleton::{NUM_EDGES, PARENT_CHILD_TREE};
use crate::tensor::{offset_vector, PoseTensors, TensorView};

/// Which way an edge of the part tree is followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    /// Child to parent, edges visited last to first.
    Backward,
    /// Parent to child, edges visited first to last.
    Forward,
}

impl EdgeDirection {
    /// `(source, target)` part ids for a `(parent, child)` edge.
    #[must_use]
    pub const fn endpoints(self, edge: (usize, usize)) -> (usize, usize) {
        match self {
            Self::Backward => (edge.1, edge.0),
            Self::Forward => (edge.0, edge.1),
        }
    }

    fn displacements<'t, 'a>(self, tensors: &'t PoseTensors<'a>) -> &'t TensorView<'a> {
        match self {
            Self::Backward => &tensors.displacement_bwd,
            Self::Forward => &tensors.displacement_fwd,
        }
    }
}

/// Build a full pose around one accepted root candidate.
#[must_use]
pub fn decode_pose_from_root(root: &PartCandidate, tensors: &PoseTensors<'_>, stride: usize) -> Pose {
    let mut pose = Pose::empty();
    pose[root.id] = root.to_keypoint(&tensors.offsets, stride);

    propagate(&mut pose, EdgeDirection::Backward, tensors, stride);
    propagate(&mut pose, EdgeDirection::Forward, tensors, stride);

    pose
}

/// One pass over the tree in the order `direction` prescribes.
fn propagate(pose: &mut Pose, direction: EdgeDirection, tensors: &PoseTensors<'_>, stride: usize) {
    let displacements = direction.displacements(tensors);
    let mut visit = |edge_id: usize| {
        let (source, target) = direction.endpoints(PARENT_CHILD_TREE[edge_id]);
        if pose[source].score > 0.0 && pose[target].is_unfilled() {
            pose[target] = traverse_to_target(
                edge_id,
                &pose[source],
                target,
                tensors,
                displacements,
                stride,
            );
        }
    };

    match direction {
        EdgeDirection::Backward => (0..NUM_EDGES).rev().for_each(&mut visit),
        EdgeDirection::Forward => (0..NUM_EDGES).for_each(&mut visit),
    }
}

/// Step from `source` along edge `edge_id` and refine the landing cell for `target_id`.
///
/// The source position is snapped to its nearest heatmap cell, displaced,
/// snapped again, and the target keypoint is read from that cell.
#[must_use]
pub fn traverse_to_target(
    edge_id: usize,
    source: &Keypoint,
    target_id: usize,
    tensors: &PoseTensors<'_>,
    displacements: &TensorView<'_>,
    stride: usize,
) -> Keypoint {
    let heatmaps = &tensors.heatmaps;
    let (src_y, src_x) = nearest_cell(source.position, stride, heatmaps);

    let displacement = Point::new(
        displacements.get(src_y, src_x, NUM_EDGES + edge_id),
        displacements.get(src_y, src_x, edge_id),
    );
    let displaced = Point::new(
        source.position.x + displacement.x,
        source.position.y + displacement.y,
    );

    let (y, x) = nearest_cell(displaced, stride, heatmaps);
    let offset = offset_vector(&tensors.offsets, y, x, target_id);
    let score = heatmaps.get(y, x, target_id);

    Keypoint::new(
        score,
        Point::new(
            (x * stride) as f32 + offset.x,
            (y * stride) as f32 + offset.y,
        ),
        target_id,
    )
}

/// Nearest heatmap cell `(y, x)` to an image-space point, clamped to the grid.
///
/// Halves round to even.
fn nearest_cell(point: Point, stride: usize, heatmaps: &TensorView<'_>) -> (usize, usize) {
    let stride = stride as f32;
    (
        snap(point.y / stride, heatmaps.height()),
        snap(point.x / stride, heatmaps.width()),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn snap(value: f32, dim: usize) -> usize {
    let max = dim.saturating_sub(1) as f32;
    // NaN survives the clamp and casts to 0
    value.round_ties_even().clamp(0.0, max) as usize
}
