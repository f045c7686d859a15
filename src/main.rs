//! dart-modernize: rewrite deprecated Flutter API calls in place.
//!
//! Converts `withOpacity(0.x)` to `withAlpha(n)` and `print(...);` to
//! `debugPrint(...);` in every `.dart` file under a root directory, then runs
//! `dart format` on that directory when anything changed.

use anyhow::{Context, Result};
use clap::Parser;
use dart_modernize::cli::Args;
use dart_modernize::runner::{self, Config, Formatter};

fn main() -> Result<()> {
    let args = Args::parse();

    let formatter = if args.no_format {
        Formatter::Disabled
    } else {
        Formatter::discover()
    };
    let config = Config {
        quiet: args.json,
        ..Config::new(args.root, formatter)
    };

    let summary = runner::run(&config);

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{json}");
    }

    Ok(())
}
