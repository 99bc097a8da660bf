// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Mode dispatch for decoding one frame of model output.
//!
//! [`PoseDecoder`] holds a validated [`DecoderConfig`] and nothing else, so a
//! single decoder can be reused for every frame without carrying state.

use crate::config::DecoderConfig;
use crate::error::{DecodeError, Result};
use crate::keypoint::Pose;
use crate::mode::EstimationMode;
use crate::multi_pose::{decode_multiple_poses, MultiPoseParams};
use crate::single_pose::decode_single_pose;
use crate::tensor::PoseTensors;

/// Derive the heatmap stride from the model input size.
///
/// `stride = (input_dim - 1) / (heatmap_dim - 1)`, rounded down to a multiple
/// of 8.
///
/// # Errors
///
/// Returns [`DecodeError::DegenerateInputError`] if `heatmap_dim <= 1`,
/// `input_dim == 0`, or the rounded stride is zero.
pub fn compute_stride(input_dim: usize, heatmap_dim: usize) -> Result<usize> {
    if heatmap_dim <= 1 {
        return Err(DecodeError::DegenerateInputError(format!(
            "heatmap dimension must be greater than 1 to derive a stride, got {heatmap_dim}"
        )));
    }
    if input_dim == 0 {
        return Err(DecodeError::DegenerateInputError(
            "input dimension must be positive".to_string(),
        ));
    }

    let mut stride = (input_dim - 1) / (heatmap_dim - 1);
    stride -= stride % 8;
    if stride == 0 {
        return Err(DecodeError::DegenerateInputError(format!(
            "input dimension {input_dim} is too small for a {heatmap_dim}-cell heatmap"
        )));
    }
    Ok(stride)
}

/// Stateless decoder turning model output tensors into poses.
#[derive(Debug, Clone)]
pub struct PoseDecoder {
    config: DecoderConfig,
}

impl PoseDecoder {
    /// Create a decoder.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ConfigError`] if the configuration is out of range.
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one frame, deriving the stride from the model input height.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::DegenerateInputError`] if no stride can be
    /// derived, or [`DecodeError::ShapeMismatchError`] if the tensors do not
    /// match the PoseNet layout.
    pub fn decode(&self, tensors: &PoseTensors<'_>, input_height: usize) -> Result<Vec<Pose>> {
        let stride = compute_stride(input_height, tensors.heatmaps.height())?;
        self.decode_with_stride(tensors, stride)
    }

    /// Decode one frame with an explicit stride.
    ///
    /// Single-pose mode returns exactly one pose; multi-pose mode returns at
    /// most `max_poses`, in acceptance order.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ShapeMismatchError`] on malformed tensors or
    /// [`DecodeError::DegenerateInputError`] for a zero stride.
    pub fn decode_with_stride(&self, tensors: &PoseTensors<'_>, stride: usize) -> Result<Vec<Pose>> {
        if stride == 0 {
            return Err(DecodeError::DegenerateInputError(
                "stride must be positive".to_string(),
            ));
        }

        match self.config.mode {
            EstimationMode::SinglePose => {
                let pose = decode_single_pose(&tensors.heatmaps, &tensors.offsets, stride)?;
                Ok(vec![pose])
            }
            EstimationMode::MultiPose => {
                let params = MultiPoseParams {
                    stride,
                    max_poses: self.config.max_poses,
                    score_threshold: self.config.score_threshold,
                    nms_radius: self.config.nms_radius,
                    local_maximum_radius: self.config.local_maximum_radius,
                };
                decode_multiple_poses(tensors, &params)
            }
        }
    }
}
