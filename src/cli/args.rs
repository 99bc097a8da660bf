// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Decode Options:
    --input, -i <INPUT>      Tensor bundle JSON with the four model outputs
    --mode <MODE>            Estimation mode: single or multi [default: single]
    --max-poses <N>          Maximum poses in multi mode [default: 20]
    --conf <CONF>            Root candidate score threshold [default: 0.25]
    --nms-radius <PX>        Same-part NMS radius in pixels [default: 100]
    --local-radius <N>       Local maximum window half-width [default: 1]
    --min-confidence <PCT>   Keypoint display cut-off in percent [default: 70]
    --mirror                 Mirror poses horizontally in the camera frame
    --output, -o <OUTPUT>    Write decoded poses as JSON
    --verbose                Show verbose output

Examples:
    posenet-decode decode --input frame.json
    posenet-decode decode -i frame.json --mode multi --max-poses 5 --conf 0.3
    posenet-decode decode -i frame.json --mode multi --nms-radius 20 -o poses.json"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode poses from stored PoseNet outputs
    Decode(DecodeArgs),
}

/// Arguments for the decode command.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Tensor bundle JSON file
    #[arg(short, long)]
    pub input: String,

    /// Estimation mode (single, multi)
    #[arg(long, default_value = "single")]
    pub mode: String,

    /// Maximum number of poses in multi mode
    #[arg(long, default_value_t = 20)]
    pub max_poses: usize,

    /// Root candidate score threshold
    #[arg(long, default_value_t = 0.25)]
    pub conf: f32,

    /// Same-part NMS radius in image pixels
    #[arg(long, default_value_t = 100.0)]
    pub nms_radius: f32,

    /// Local maximum window half-width in heatmap cells
    #[arg(long, default_value_t = 1)]
    pub local_radius: usize,

    /// Keypoint display cut-off in percent
    #[arg(long, default_value_t = 70.0)]
    pub min_confidence: f32,

    /// Mirror x when projecting into the camera frame (front-facing camera)
    #[arg(long)]
    pub mirror: bool,

    /// Write decoded poses to this JSON file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}
