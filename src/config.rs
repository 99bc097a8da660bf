// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Decoder configuration.
//!
//! This module defines the [`DecoderConfig`] struct, which controls the
//! estimation mode and the multi-pose selection parameters.

use crate::candidates::LOCAL_MAXIMUM_RADIUS;
use crate::error::{DecodeError, Result};
use crate::mode::EstimationMode;

/// Configuration for pose decoding.
///
/// Uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use posenet_decode::{DecoderConfig, EstimationMode};
///
/// let config = DecoderConfig::new()
///     .with_mode(EstimationMode::MultiPose)
///     .with_max_poses(5)
///     .with_score_threshold(0.3)
///     .with_nms_radius(20.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Single- or multi-person decoding.
    pub mode: EstimationMode,
    /// Maximum number of poses returned in multi-pose mode.
    pub max_poses: usize,
    /// Minimum heatmap value for a multi-pose root candidate (0.0 to 1.0).
    pub score_threshold: f32,
    /// Minimum distance in image pixels between same-part roots of distinct poses.
    pub nms_radius: f32,
    /// Half-width of the local-maximum window used to find candidates.
    pub local_maximum_radius: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            mode: EstimationMode::SinglePose,
            max_poses: 20,
            score_threshold: 0.25,
            nms_radius: 100.0,
            local_maximum_radius: LOCAL_MAXIMUM_RADIUS,
        }
    }
}

impl DecoderConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the estimation mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: EstimationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the maximum number of poses.
    ///
    /// Ignored in single-pose mode, which always yields exactly one pose.
    #[must_use]
    pub const fn with_max_poses(mut self, max: usize) -> Self {
        self.max_poses = max;
        self
    }

    /// Set the root candidate score threshold.
    #[must_use]
    pub const fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Set the NMS radius in image pixels.
    #[must_use]
    pub const fn with_nms_radius(mut self, radius: f32) -> Self {
        self.nms_radius = radius;
        self
    }

    /// Set the local-maximum window half-width.
    #[must_use]
    pub const fn with_local_maximum_radius(mut self, radius: usize) -> Self {
        self.local_maximum_radius = radius;
        self
    }

    /// Number of poses a decode can return under this configuration.
    #[must_use]
    pub const fn effective_max_poses(&self) -> usize {
        match self.mode {
            EstimationMode::SinglePose => 1,
            EstimationMode::MultiPose => self.max_poses,
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ConfigError`] if `max_poses` is zero, the score
    /// threshold lies outside `[0, 1]`, or the NMS radius is not a positive
    /// finite number.
    pub fn validate(&self) -> Result<()> {
        if self.max_poses == 0 {
            return Err(DecodeError::ConfigError(
                "max_poses must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(DecodeError::ConfigError(format!(
                "score_threshold must be in [0, 1], got {}",
                self.score_threshold
            )));
        }
        if !self.nms_radius.is_finite() || self.nms_radius <= 0.0 {
            return Err(DecodeError::ConfigError(format!(
                "nms_radius must be a positive number of pixels, got {}",
                self.nms_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = DecoderConfig::default();
        assert_eq!(config.mode, EstimationMode::SinglePose);
        assert_eq!(config.max_poses, 20);
        assert!((config.score_threshold - 0.25).abs() < f32::EPSILON);
        assert!((config.nms_radius - 100.0).abs() < f32::EPSILON);
        assert_eq!(config.local_maximum_radius, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = DecoderConfig::new()
            .with_mode(EstimationMode::MultiPose)
            .with_max_poses(3)
            .with_score_threshold(0.5)
            .with_nms_radius(30.0)
            .with_local_maximum_radius(2);

        assert_eq!(config.mode, EstimationMode::MultiPose);
        assert_eq!(config.effective_max_poses(), 3);
        assert!((config.score_threshold - 0.5).abs() < f32::EPSILON);
        assert!((config.nms_radius - 30.0).abs() < f32::EPSILON);
        assert_eq!(config.local_maximum_radius, 2);
    }

    #[test]
    fn test_single_pose_caps_at_one() {
        let config = DecoderConfig::new().with_max_poses(8);
        assert_eq!(config.effective_max_poses(), 1);
    }

    #[test]
    fn test_config_validation() {
        assert!(DecoderConfig::new().with_max_poses(0).validate().is_err());
        assert!(DecoderConfig::new().with_score_threshold(1.5).validate().is_err());
        assert!(DecoderConfig::new().with_score_threshold(f32::NAN).validate().is_err());
        assert!(DecoderConfig::new().with_nms_radius(0.0).validate().is_err());
        assert!(DecoderConfig::new().with_nms_radius(f32::INFINITY).validate().is_err());
    }
}
