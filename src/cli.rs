//! Command-line interface definitions.
//!
//! A single command: rewrite the `.dart` files under one root directory and
//! format them afterwards.

use crate::runner::DEFAULT_ROOT;
use clap::Parser;
use std::path::PathBuf;

/// Rewrite deprecated Flutter calls (`withOpacity`, `print`) and run `dart format`.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Directory to rewrite recursively.
    #[arg(default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Skip the `dart format` step even if `dart` is on PATH.
    #[arg(long)]
    pub no_format: bool,

    /// Emit a JSON summary instead of human-readable progress.
    #[arg(long)]
    pub json: bool,
}
