// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! # PoseNet Decode
//!
//! Decoding of PoseNet model outputs into 17-keypoint human poses, written in
//! Rust. The crate takes the four NHWC tensors a PoseNet forward pass produces
//! and turns them into [`Pose`]s in model-input pixel space. Running the model
//! itself is left to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::Array4;
//! use posenet_decode::{
//!     DecoderConfig, EstimationMode, PoseDecoder, PoseTensors, TensorView,
//!     NUM_DISPLACEMENT_CHANNELS, NUM_KEYPOINTS, NUM_OFFSET_CHANNELS,
//! };
//!
//! fn main() -> posenet_decode::Result<()> {
//!     let mut heatmaps = Array4::<f32>::zeros((1, 17, 17, NUM_KEYPOINTS));
//!     heatmaps[[0, 4, 4, 0]] = 0.9;
//!     let offsets = Array4::<f32>::zeros((1, 17, 17, NUM_OFFSET_CHANNELS));
//!     let displacements = Array4::<f32>::zeros((1, 17, 17, NUM_DISPLACEMENT_CHANNELS));
//!
//!     let tensors = PoseTensors::new(
//!         TensorView::new(heatmaps.view()),
//!         TensorView::new(offsets.view()),
//!         TensorView::new(displacements.view()),
//!         TensorView::new(displacements.view()),
//!     );
//!
//!     let decoder = PoseDecoder::new(
//!         DecoderConfig::new()
//!             .with_mode(EstimationMode::MultiPose)
//!             .with_score_threshold(0.5),
//!     )?;
//!     // 257 px input over a 17-cell heatmap gives stride 16
//!     let poses = decoder.decode(&tensors, 257)?;
//!     assert_eq!(poses.len(), 1);
//!     assert_eq!(poses[0].keypoint_by_name("nose").map(|k| k.score), Some(0.9));
//!     Ok(())
//! }
//! ```
//!
//! ## CLI
//!
//! ```bash
//! # Single pose from a stored tensor bundle
//! posenet-decode decode --input frame.json
//!
//! # Up to 5 people, written to JSON
//! posenet-decode decode -i frame.json --mode multi --max-poses 5 -o poses.json
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decoder`] | [`PoseDecoder`] mode dispatch and stride derivation |
//! | [`config`] | [`DecoderConfig`] builder |
//! | [`single_pose`] | Per-part argmax decoding |
//! | [`multi_pose`] | Greedy multi-person decoding |
//! | [`candidates`] | Local-maximum root candidates |
//! | [`traverse`] | Displacement-guided skeleton traversal |
//! | [`nms`] | Same-part suppression against accepted poses |
//! | [`tensor`] | Shape-checked views over NHWC tensors |
//! | [`keypoint`] | [`Keypoint`], [`Pose`] and part names |
//! | [`skeleton`] | Traversal tree and display skeleton |
//! | [`preprocessing`] | Model-family input normalisation |
//! | [`projection`] | Mapping poses onto the source frame |
//! | [`io`] | Tensor bundle loading and pose export |
//! | [`error`] | Error types ([`DecodeError`], [`Result`]) |

// Modules
pub mod candidates;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod io;
pub mod keypoint;
pub mod mode;
pub mod multi_pose;
pub mod nms;
pub mod preprocessing;
pub mod projection;
pub mod single_pose;
pub mod skeleton;
pub mod tensor;
pub mod traverse;

// Re-export main types for convenience
pub use candidates::{build_part_candidates, PartCandidate};
pub use config::DecoderConfig;
pub use decoder::{compute_stride, PoseDecoder};
pub use error::{DecodeError, Result};
pub use keypoint::{Keypoint, Point, Pose, NUM_KEYPOINTS, PART_NAMES};
pub use mode::EstimationMode;
pub use multi_pose::{decode_multiple_poses, MultiPoseParams};
pub use single_pose::decode_single_pose;
pub use skeleton::{NUM_EDGES, PARENT_CHILD_TREE};
pub use tensor::{PoseTensors, TensorView, NUM_DISPLACEMENT_CHANNELS, NUM_OFFSET_CHANNELS};

// Re-export model-family and display helpers
pub use io::{save_poses, ModelOutputs, TensorBundle};
pub use preprocessing::{ModelType, OutputLayout};
pub use projection::{visible_bones, Projection, ScreenKeypoint};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
