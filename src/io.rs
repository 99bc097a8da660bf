// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Loading model outputs from disk and exporting decoded poses.
//!
//! A tensor bundle is a JSON document holding the raw outputs of one PoseNet
//! forward pass in model output order:
//!
//! ```json
//! {
//!   "model_type": "resnet50",
//!   "input_height": 257,
//!   "source_size": [1280, 720],
//!   "heatmaps_activated": true,
//!   "outputs": [{ "shape": [1, 17, 17, 17], "data": [0.0, ...] }, ...]
//! }
//! ```

use std::fs;
use std::path::Path;

use ndarray::{Array4, Ix4};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};
use crate::keypoint::{Keypoint, Pose};
use crate::preprocessing::{apply_sigmoid, ModelType};
use crate::tensor::{PoseTensors, TensorView};

/// One serialised NHWC tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTensor {
    /// `[batch, height, width, channels]`.
    pub shape: Vec<usize>,
    /// Row-major values.
    pub data: Vec<f32>,
}

impl RawTensor {
    /// Convert into an owned 4D array.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ShapeMismatchError`] if the shape is not 4D or
    /// does not match the data length.
    pub fn into_array(self) -> Result<Array4<f32>> {
        let dims: [usize; 4] = self.shape.as_slice().try_into().map_err(|_| {
            DecodeError::ShapeMismatchError(format!(
                "expected a 4D [batch, height, width, channels] shape, got {:?}",
                self.shape
            ))
        })?;
        Ok(Array4::from_shape_vec(Ix4(dims[0], dims[1], dims[2], dims[3]), self.data)?)
    }
}

impl From<&Array4<f32>> for RawTensor {
    fn from(array: &Array4<f32>) -> Self {
        Self {
            shape: array.shape().to_vec(),
            data: array.iter().copied().collect(),
        }
    }
}

const fn default_activated() -> bool {
    true
}

/// Raw outputs of one forward pass plus the context needed to decode them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorBundle {
    /// Backbone that produced the outputs; decides the displacement order.
    #[serde(default)]
    pub model_type: ModelType,
    /// Model input height in pixels, used to derive the stride.
    pub input_height: usize,
    /// Model input width in pixels, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_width: Option<usize>,
    /// Camera frame `(width, height)` the model input was resized from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_size: Option<(usize, usize)>,
    /// Whether the heatmaps already went through a sigmoid.
    #[serde(default = "default_activated")]
    pub heatmaps_activated: bool,
    /// Outputs in model order.
    pub outputs: Vec<RawTensor>,
}

impl TensorBundle {
    /// Read a bundle from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Io`] if the file cannot be read or
    /// [`DecodeError::TensorFileError`] if it is not a valid bundle.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            DecodeError::TensorFileError(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Write the bundle as JSON, overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Io`] or [`DecodeError::TensorFileError`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let payload = serde_json::to_string(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// Assign outputs to their roles and activate the heatmaps if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TensorFileError`] if there are not exactly four
    /// outputs, or [`DecodeError::ShapeMismatchError`] for malformed tensors.
    pub fn into_outputs(self) -> Result<ModelOutputs> {
        if self.outputs.len() != 4 {
            return Err(DecodeError::TensorFileError(format!(
                "expected 4 model outputs, got {}",
                self.outputs.len()
            )));
        }

        let layout = self.model_type.output_layout();
        let mut slots: Vec<Option<RawTensor>> = self.outputs.into_iter().map(Some).collect();
        let mut take = |index: usize| -> Result<Array4<f32>> {
            slots[index]
                .take()
                .ok_or_else(|| {
                    DecodeError::TensorFileError(format!("output {index} assigned twice"))
                })?
                .into_array()
        };

        let mut heatmaps = take(layout.heatmaps)?;
        let offsets = take(layout.offsets)?;
        let displacement_fwd = take(layout.displacement_fwd)?;
        let displacement_bwd = take(layout.displacement_bwd)?;

        if !self.heatmaps_activated {
            match heatmaps.as_slice_mut() {
                Some(values) => apply_sigmoid(values),
                None => heatmaps.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp())),
            }
        }

        Ok(ModelOutputs {
            model_type: self.model_type,
            input_height: self.input_height,
            input_width: self.input_width.unwrap_or(self.input_height),
            source_size: self.source_size,
            heatmaps,
            offsets,
            displacement_fwd,
            displacement_bwd,
        })
    }
}

/// Owned model outputs ready for decoding.
#[derive(Debug, Clone)]
pub struct ModelOutputs {
    /// Backbone that produced the outputs.
    pub model_type: ModelType,
    /// Model input height in pixels.
    pub input_height: usize,
    /// Model input width in pixels; the height when the bundle omits it.
    pub input_width: usize,
    /// Camera frame `(width, height)`, if recorded.
    pub source_size: Option<(usize, usize)>,
    /// Activated heatmaps.
    pub heatmaps: Array4<f32>,
    /// Offsets.
    pub offsets: Array4<f32>,
    /// Forward displacements.
    pub displacement_fwd: Array4<f32>,
    /// Backward displacements.
    pub displacement_bwd: Array4<f32>,
}

impl ModelOutputs {
    /// Borrow the four tensors for decoding.
    #[must_use]
    pub fn tensors(&self) -> PoseTensors<'_> {
        PoseTensors::new(
            TensorView::new(self.heatmaps.view()),
            TensorView::new(self.offsets.view()),
            TensorView::new(self.displacement_fwd.view()),
            TensorView::new(self.displacement_bwd.view()),
        )
    }

    /// Model input `(width, height)`.
    #[must_use]
    pub const fn input_size(&self) -> (usize, usize) {
        (self.input_width, self.input_height)
    }

    /// Camera frame size, falling back to the model input size.
    #[must_use]
    pub fn frame_size(&self) -> (usize, usize) {
        self.source_size.unwrap_or_else(|| self.input_size())
    }

    /// Smallest and largest finite heatmap values, `None` if there are none.
    #[must_use]
    pub fn heatmap_range(&self) -> Option<(f32, f32)> {
        self.heatmaps
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Serialised form of one decoded pose.
#[derive(Debug, Clone, Serialize)]
pub struct PoseRecord {
    /// Mean keypoint score.
    pub score: f32,
    /// Keypoints with their part names.
    pub keypoints: Vec<KeypointRecord>,
}

/// Serialised form of one keypoint.
#[derive(Debug, Clone, Serialize)]
pub struct KeypointRecord {
    /// Part name.
    pub part: &'static str,
    /// Decoded keypoint.
    #[serde(flatten)]
    pub keypoint: Keypoint,
}

impl From<&Pose> for PoseRecord {
    fn from(pose: &Pose) -> Self {
        Self {
            score: pose.mean_score(),
            keypoints: pose
                .iter()
                .map(|kpt| KeypointRecord {
                    part: kpt.name(),
                    keypoint: *kpt,
                })
                .collect(),
        }
    }
}

/// Write decoded poses as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`DecodeError::Io`] or [`DecodeError::TensorFileError`].
pub fn save_poses<P: AsRef<Path>>(path: P, poses: &[Pose]) -> Result<()> {
    let records: Vec<PoseRecord> = poses.iter().map(PoseRecord::from).collect();
    let payload = serde_json::to_string_pretty(&records)?;
    fs::write(path, payload)?;
    Ok(())
}
