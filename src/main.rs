// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;

use posenet_decode::cli::args::{Cli, Commands};
use posenet_decode::cli::decode::run_decode;
use posenet_decode::error;

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Decode(args) => {
            if let Err(e) = run_decode(args) {
                error!("{e}");
                process::exit(1);
            }
        }
    }
}
