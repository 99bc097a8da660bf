// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for decoding stored model outputs.
//!
//! This module contains the command-line interface logic, including argument parsing,
//! coloured logging and the `decode` command implementation.

// Modules
/// CLI arguments.
pub mod args;

/// Decode command.
pub mod decode;

/// Coloured terminal output.
pub mod logging;
