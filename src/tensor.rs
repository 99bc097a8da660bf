// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Read-only views over the model output tensors.
//!
//! Every tensor is laid out `[batch, height, width, channels]` (NHWC) with
//! `batch == 1`. A flat buffer is indexed as
//! `((b * height + y) * width + x) * channels + c`.

use ndarray::{ArrayView4, Ix4};

use crate::error::{DecodeError, Result};
use crate::keypoint::{Point, NUM_KEYPOINTS};
use crate::skeleton::NUM_EDGES;

/// Channel count of the offsets tensor (y offsets, then x offsets).
pub const NUM_OFFSET_CHANNELS: usize = 2 * NUM_KEYPOINTS;

/// Channel count of each displacement tensor (y, then x, per edge).
pub const NUM_DISPLACEMENT_CHANNELS: usize = 2 * NUM_EDGES;

/// Bounds-checked accessor over a single NHWC tensor.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a> {
    data: ArrayView4<'a, f32>,
}

impl<'a> TensorView<'a> {
    /// Wrap an existing 4D array view.
    #[must_use]
    pub const fn new(data: ArrayView4<'a, f32>) -> Self {
        Self { data }
    }

    /// View a flat NHWC buffer with the given shape.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ShapeMismatchError`] if `data.len()` does not
    /// equal the product of `shape`.
    pub fn from_slice(shape: [usize; 4], data: &'a [f32]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(DecodeError::ShapeMismatchError(format!(
                "buffer of {} values cannot be viewed as {shape:?} ({expected} values)",
                data.len()
            )));
        }
        let view = ArrayView4::from_shape(Ix4(shape[0], shape[1], shape[2], shape[3]), data)?;
        Ok(Self::new(view))
    }

    /// Shape as `[batch, height, width, channels]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 4] {
        let (b, h, w, c) = self.data.dim();
        [b, h, w, c]
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.data.dim().2
    }

    /// Number of channels.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.data.dim().3
    }

    /// Value at `(y, x, channel)` of the first batch entry.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds. Callers clamp indices, so this
    /// only fires on an internal invariant violation.
    #[must_use]
    pub fn get(&self, y: usize, x: usize, channel: usize) -> f32 {
        self.data[[0, y, x, channel]]
    }

    /// The underlying array view.
    #[must_use]
    pub const fn view(&self) -> &ArrayView4<'a, f32> {
        &self.data
    }

    /// Check batch size and channel count.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ShapeMismatchError`] naming the tensor.
    pub fn expect_channels(&self, name: &str, channels: usize) -> Result<()> {
        let [batch, _, _, actual] = self.shape();
        if batch != 1 {
            return Err(DecodeError::ShapeMismatchError(format!(
                "{name}: expected batch size 1, got {batch}"
            )));
        }
        if actual != channels {
            return Err(DecodeError::ShapeMismatchError(format!(
                "{name}: expected {channels} channels, got {actual}"
            )));
        }
        Ok(())
    }

    fn expect_spatial(&self, name: &str, height: usize, width: usize) -> Result<()> {
        if self.height() != height || self.width() != width {
            return Err(DecodeError::ShapeMismatchError(format!(
                "{name}: expected {height}x{width} grid to match heatmaps, got {}x{}",
                self.height(),
                self.width()
            )));
        }
        Ok(())
    }
}

/// Offset vector refining cell `(y, x)` for `part`.
///
/// The x component lives at channel `part + 17`, the y component at `part`.
#[must_use]
pub fn offset_vector(offsets: &TensorView<'_>, y: usize, x: usize, part: usize) -> Point {
    Point::new(
        offsets.get(y, x, part + NUM_KEYPOINTS),
        offsets.get(y, x, part),
    )
}

/// The four tensors a PoseNet model emits for one frame.
#[derive(Debug, Clone, Copy)]
pub struct PoseTensors<'a> {
    /// Part confidences after sigmoid, 17 channels.
    pub heatmaps: TensorView<'a>,
    /// Sub-cell refinement vectors, 34 channels.
    pub offsets: TensorView<'a>,
    /// Parent-to-child displacement, 32 channels.
    pub displacement_fwd: TensorView<'a>,
    /// Child-to-parent displacement, 32 channels.
    pub displacement_bwd: TensorView<'a>,
}

impl<'a> PoseTensors<'a> {
    /// Group the four tensors.
    #[must_use]
    pub const fn new(
        heatmaps: TensorView<'a>,
        offsets: TensorView<'a>,
        displacement_fwd: TensorView<'a>,
        displacement_bwd: TensorView<'a>,
    ) -> Self {
        Self {
            heatmaps,
            offsets,
            displacement_fwd,
            displacement_bwd,
        }
    }

    /// Validate heatmaps and offsets only (enough for single-pose decoding).
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ShapeMismatchError`] on a channel or grid mismatch.
    pub fn validate_single(&self) -> Result<()> {
        validate_heatmaps_offsets(&self.heatmaps, &self.offsets)
    }

    /// Validate all four tensors.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ShapeMismatchError`] on a channel or grid mismatch.
    pub fn validate(&self) -> Result<()> {
        self.validate_single()?;
        let (h, w) = (self.heatmaps.height(), self.heatmaps.width());
        for (name, tensor) in [
            ("displacement_fwd", &self.displacement_fwd),
            ("displacement_bwd", &self.displacement_bwd),
        ] {
            tensor.expect_channels(name, NUM_DISPLACEMENT_CHANNELS)?;
            tensor.expect_spatial(name, h, w)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_heatmaps_offsets(
    heatmaps: &TensorView<'_>,
    offsets: &TensorView<'_>,
) -> Result<()> {
    heatmaps.expect_channels("heatmaps", NUM_KEYPOINTS)?;
    offsets.expect_channels("offsets", NUM_OFFSET_CHANNELS)?;
    offsets.expect_spatial("offsets", heatmaps.height(), heatmaps.width())?;
    if heatmaps.height() == 0 || heatmaps.width() == 0 {
        return Err(DecodeError::DegenerateInputError(
            "heatmaps have an empty spatial grid".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn test_from_slice_layout() {
        // 1x2x3x2, value encodes its own flat index
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let view = TensorView::from_slice([1, 2, 3, 2], &data).unwrap();
        assert_eq!(view.shape(), [1, 2, 3, 2]);
        assert_eq!(view.get(0, 0, 0), 0.0);
        assert_eq!(view.get(0, 1, 1), 3.0);
        assert_eq!(view.get(1, 2, 1), 11.0);
    }

    #[test]
    fn test_from_slice_length_mismatch() {
        let data = vec![0.0; 5];
        let err = TensorView::from_slice([1, 2, 2, 2], &data).unwrap_err();
        assert!(matches!(err, DecodeError::ShapeMismatchError(_)));
    }

    #[test]
    fn test_offset_vector_channels() {
        let mut offsets = Array4::<f32>::zeros((1, 1, 1, NUM_OFFSET_CHANNELS));
        offsets[[0, 0, 0, 3]] = 1.5; // y for part 3
        offsets[[0, 0, 0, 3 + NUM_KEYPOINTS]] = -2.5; // x for part 3
        let view = TensorView::new(offsets.view());
        let v = offset_vector(&view, 0, 0, 3);
        assert_eq!(v, Point::new(-2.5, 1.5));
    }

    #[test]
    fn test_validate_channel_counts() {
        let heatmaps = Array4::<f32>::zeros((1, 4, 4, NUM_KEYPOINTS));
        let offsets = Array4::<f32>::zeros((1, 4, 4, NUM_OFFSET_CHANNELS));
        let good = Array4::<f32>::zeros((1, 4, 4, NUM_DISPLACEMENT_CHANNELS));
        let bad = Array4::<f32>::zeros((1, 4, 4, 30));

        let tensors = PoseTensors::new(
            TensorView::new(heatmaps.view()),
            TensorView::new(offsets.view()),
            TensorView::new(good.view()),
            TensorView::new(good.view()),
        );
        assert!(tensors.validate().is_ok());

        let tensors = PoseTensors {
            displacement_bwd: TensorView::new(bad.view()),
            ..tensors
        };
        assert!(matches!(
            tensors.validate(),
            Err(DecodeError::ShapeMismatchError(_))
        ));
    }

    #[test]
    fn test_validate_grid_and_batch() {
        let heatmaps = Array4::<f32>::zeros((1, 4, 4, NUM_KEYPOINTS));
        let offsets = Array4::<f32>::zeros((1, 3, 4, NUM_OFFSET_CHANNELS));
        let err = validate_heatmaps_offsets(
            &TensorView::new(heatmaps.view()),
            &TensorView::new(offsets.view()),
        );
        assert!(matches!(err, Err(DecodeError::ShapeMismatchError(_))));

        let batched = Array4::<f32>::zeros((2, 4, 4, NUM_KEYPOINTS));
        let err = TensorView::new(batched.view()).expect_channels("heatmaps", NUM_KEYPOINTS);
        assert!(matches!(err, Err(DecodeError::ShapeMismatchError(_))));
    }
}
