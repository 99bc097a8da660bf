// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Model-family specific tensor preparation.
//!
//! PoseNet ships as a MobileNet and a ResNet50 variant. They differ in how the
//! RGB input must be normalised and in the order of their displacement
//! outputs. The elementwise transforms here run in parallel with rayon; every
//! element is independent, so the result does not depend on thread count.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Per-channel ImageNet means subtracted from ResNet50 input (0-255 scale).
pub const RESNET_MEAN: [f32; 3] = [123.15, 115.90, 103.06];

/// Smallest side length accepted for the model input.
pub const MIN_INPUT_DIM: usize = 130;

/// PoseNet backbone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// MobileNetV1 backbone, input scaled to `[-1, 1]`.
    #[serde(alias = "mobilenetv1")]
    MobileNet,
    /// ResNet50 backbone, mean-subtracted 0-255 input.
    #[default]
    #[serde(alias = "resnet")]
    ResNet50,
}

impl ModelType {
    /// Returns the canonical string name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MobileNet => "mobilenet",
            Self::ResNet50 => "resnet50",
        }
    }

    /// Normalise an interleaved RGB buffer with values in `[0, 1]` in place.
    pub fn preprocess(&self, pixels: &mut [f32]) {
        match self {
            Self::MobileNet => preprocess_mobilenet(pixels),
            Self::ResNet50 => preprocess_resnet(pixels),
        }
    }

    /// Output indices for this backbone.
    #[must_use]
    pub const fn output_layout(&self) -> OutputLayout {
        OutputLayout::for_model(*self)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mobilenet" | "mobilenetv1" | "mobilenet_v1" => Ok(Self::MobileNet),
            "resnet" | "resnet50" | "resnet_50" => Ok(Self::ResNet50),
            _ => Err(DecodeError::ConfigError(format!(
                "invalid model type '{s}', expected one of: mobilenet, resnet50"
            ))),
        }
    }
}

/// Positions of the four tensors in a model's output list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLayout {
    /// Heatmap output index.
    pub heatmaps: usize,
    /// Offsets output index.
    pub offsets: usize,
    /// Forward displacement output index.
    pub displacement_fwd: usize,
    /// Backward displacement output index.
    pub displacement_bwd: usize,
}

impl OutputLayout {
    /// Layout for a backbone; the ResNet50 export swaps the displacement outputs.
    #[must_use]
    pub const fn for_model(model: ModelType) -> Self {
        let (displacement_fwd, displacement_bwd) = match model {
            ModelType::MobileNet => (2, 3),
            ModelType::ResNet50 => (3, 2),
        };
        Self {
            heatmaps: 0,
            offsets: 1,
            displacement_fwd,
            displacement_bwd,
        }
    }
}

/// MobileNet normalisation: `v * 2 - 1`.
pub fn preprocess_mobilenet(pixels: &mut [f32]) {
    pixels.par_iter_mut().for_each(|v| *v = v.mul_add(2.0, -1.0));
}

/// ResNet50 normalisation: scale to 0-255 and subtract the channel mean.
///
/// A trailing partial pixel is left untouched.
pub fn preprocess_resnet(pixels: &mut [f32]) {
    pixels.par_chunks_exact_mut(3).for_each(|rgb| {
        for (v, mean) in rgb.iter_mut().zip(RESNET_MEAN) {
            *v = v.mul_add(255.0, -mean);
        }
    });
}

/// Logistic activation applied to raw heatmap logits in place.
pub fn apply_sigmoid(values: &mut [f32]) {
    values
        .par_iter_mut()
        .for_each(|v| *v = 1.0 / (1.0 + (-*v).exp()));
}

/// Model input size `(width, height)` for a source frame.
///
/// The height is `target_height` and the width follows the source aspect
/// ratio; both sides are clamped to at least [`MIN_INPUT_DIM`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn input_dims(source_width: usize, source_height: usize, target_height: usize) -> (usize, usize) {
    let height = target_height.max(MIN_INPUT_DIM);
    let aspect = if source_height == 0 {
        1.0
    } else {
        source_width as f32 / source_height as f32
    };
    let width = ((height as f32 * aspect) as usize).max(MIN_INPUT_DIM);
    (width, height)
}
