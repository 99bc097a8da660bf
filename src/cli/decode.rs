// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::time::Instant;

use crate::cli::args::DecodeArgs;
use crate::cli::logging::{elapsed_ms, set_verbose};
use crate::io::{save_poses, TensorBundle};
use crate::keypoint::{Point, NUM_KEYPOINTS};
use crate::projection::{visible_bones, Projection, ScreenKeypoint};
use crate::{compute_stride, DecoderConfig, EstimationMode, Pose, PoseDecoder, Result, VERSION};
use crate::{info, section, success, verbose, warn};

/// Decode poses from a stored tensor bundle.
///
/// # Errors
///
/// Returns a [`crate::DecodeError`] for an invalid mode or configuration, an
/// unreadable bundle, malformed tensors, or a failed pose export.
pub fn run_decode(args: &DecodeArgs) -> Result<Vec<Pose>> {
    set_verbose(args.verbose);

    let mode: EstimationMode = args.mode.parse()?;
    let config = DecoderConfig::new()
        .with_mode(mode)
        .with_max_poses(args.max_poses)
        .with_score_threshold(args.conf)
        .with_nms_radius(args.nms_radius)
        .with_local_maximum_radius(args.local_radius);
    let decoder = PoseDecoder::new(config)?;

    let outputs = TensorBundle::load(&args.input)?.into_outputs()?;
    let tensors = outputs.tensors();
    let (input_width, input_height) = outputs.input_size();
    let (frame_width, frame_height) = outputs.frame_size();

    println!(
        "posenet-decode {VERSION} 🚀 {} {mode}-pose decoding",
        outputs.model_type
    );

    if let Some((lo, hi)) = outputs.heatmap_range() {
        if lo < 0.0 || hi > 1.0 {
            warn!(
                "heatmap values span [{lo:.3}, {hi:.3}], expected probabilities; \
                 set \"heatmaps_activated\": false for raw logits"
            );
        }
    }

    section!("Tensors");
    verbose!("heatmaps          {:?}", tensors.heatmaps.shape());
    verbose!("offsets           {:?}", tensors.offsets.shape());
    if mode.uses_displacements() {
        verbose!("displacement fwd  {:?}", tensors.displacement_fwd.shape());
        verbose!("displacement bwd  {:?}", tensors.displacement_bwd.shape());
    }

    let stride = compute_stride(input_height, tensors.heatmaps.height())?;
    verbose!("input {input_width}x{input_height}, frame {frame_width}x{frame_height}, stride {stride}");

    let start = Instant::now();
    let poses = decoder.decode_with_stride(&tensors, stride)?;
    let decode_ms = elapsed_ms(start);

    info!(
        "{}: {}, {decode_ms:.1}ms",
        args.input,
        format_pose_summary(&poses)
    );

    let projection = Projection::new(outputs.frame_size(), outputs.input_size())
        .with_mirror(args.mirror)
        .with_min_confidence(args.min_confidence);
    for (i, pose) in poses.iter().enumerate() {
        let screen = projection.project_pose(pose);
        let visible = screen.iter().filter(|k| k.visible).count();
        let extent = match visible_extent(&screen) {
            Some((min, max)) => format!(
                "frame box [{:.0}, {:.0}, {:.0}, {:.0}]",
                min.x, min.y, max.x, max.y
            ),
            None => "nothing visible".to_string(),
        };
        verbose!(
            "  pose {i}: score {:.2}, {visible}/{NUM_KEYPOINTS} keypoints >= {}%, {} bones, {extent}",
            pose.mean_score(),
            args.min_confidence,
            visible_bones(&screen).len()
        );
    }

    if let Some(path) = &args.output {
        save_poses(path, &poses)?;
        success!("Results saved to {path}");
    }

    Ok(poses)
}

/// Format a summary like "3 poses".
fn format_pose_summary(poses: &[Pose]) -> String {
    match poses.len() {
        0 => "no poses".to_string(),
        1 => "1 pose".to_string(),
        n => format!("{n} poses"),
    }
}

/// Corners of the box around the visible keypoints, in frame pixels.
fn visible_extent(keypoints: &[ScreenKeypoint; NUM_KEYPOINTS]) -> Option<(Point, Point)> {
    keypoints
        .iter()
        .filter(|k| k.visible)
        .map(|k| k.position)
        .fold(None, |extent, p| match extent {
            None => Some((p, p)),
            Some((min, max)) => Some((
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )),
        })
}
