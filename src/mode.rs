// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Estimation modes.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// How many people a frame is decoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EstimationMode {
    /// One pose from per-part global maxima.
    #[default]
    SinglePose,
    /// Up to `max_poses` poses via candidate selection and tree traversal.
    MultiPose,
}

impl EstimationMode {
    /// Returns the canonical string name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SinglePose => "single",
            Self::MultiPose => "multi",
        }
    }

    /// Returns whether this mode needs the displacement tensors.
    #[must_use]
    pub const fn uses_displacements(&self) -> bool {
        matches!(self, Self::MultiPose)
    }
}

impl fmt::Display for EstimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EstimationMode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "singlepose" | "single-pose" => Ok(Self::SinglePose),
            "multi" | "multipose" | "multi-pose" | "multiple" => Ok(Self::MultiPose),
            _ => Err(DecodeError::ConfigError(format!(
                "invalid estimation mode '{s}', expected one of: single, multi"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("single".parse::<EstimationMode>().unwrap(), EstimationMode::SinglePose);
        assert_eq!("SinglePose".parse::<EstimationMode>().unwrap(), EstimationMode::SinglePose);
        assert_eq!("multi".parse::<EstimationMode>().unwrap(), EstimationMode::MultiPose);
        assert_eq!("multi-pose".parse::<EstimationMode>().unwrap(), EstimationMode::MultiPose);
    }

    #[test]
    fn test_invalid_mode_is_config_error() {
        let err = "crowd".parse::<EstimationMode>().unwrap_err();
        assert!(matches!(err, DecodeError::ConfigError(_)));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(EstimationMode::SinglePose.to_string(), "single");
        assert_eq!(EstimationMode::MultiPose.to_string(), "multi");
        assert_eq!(EstimationMode::default(), EstimationMode::SinglePose);
        assert!(EstimationMode::MultiPose.uses_displacements());
    }
}
