// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Single-person decoding: one global maximum per heatmap channel.

use crate::error::Result;
use crate::keypoint::{Keypoint, Point, Pose, NUM_KEYPOINTS};
use crate::tensor::{offset_vector, validate_heatmaps_offsets, TensorView};

/// Decode exactly one pose from heatmaps and offsets.
///
/// For each part channel the cell with the strictly greatest heatmap value is
/// kept (ties go to the first cell in row-major order) and refined as
/// `cell * stride + offset`.
///
/// # Errors
///
/// Returns [`crate::DecodeError::ShapeMismatchError`] if the tensors do not
/// have 17 / 34 channels over the same grid.
pub fn decode_single_pose(
    heatmaps: &TensorView<'_>,
    offsets: &TensorView<'_>,
    stride: usize,
) -> Result<Pose> {
    validate_heatmaps_offsets(heatmaps, offsets)?;

    let mut pose = Pose::empty();
    for part in 0..NUM_KEYPOINTS {
        let (y, x, score) = locate_channel_max(heatmaps, part);
        let offset = offset_vector(offsets, y, x, part);
        let position = Point::new(
            (x * stride) as f32 + offset.x,
            (y * stride) as f32 + offset.y,
        );
        pose[part] = Keypoint::new(score, position, part);
    }
    Ok(pose)
}

/// Row-major argmax of one channel as `(y, x, value)`.
fn locate_channel_max(heatmaps: &TensorView<'_>, channel: usize) -> (usize, usize, f32) {
    let mut best = (0, 0, heatmaps.get(0, 0, channel));
    for y in 0..heatmaps.height() {
        for x in 0..heatmaps.width() {
            let value = heatmaps.get(y, x, channel);
            if value > best.2 {
                best = (y, x, value);
            }
        }
    }
    best
}
