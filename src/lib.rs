//! dart-modernize library for rewriting deprecated Flutter API calls.
//!
//! The workflow has three phases:
//!
//! 1. **Scanning**: collect `.dart` files under a root directory
//! 2. **Rewriting**: apply each rule in order, overwriting files whose content changes
//! 3. **Formatting**: run `dart format` once if anything changed
//!
//! # Example
//!
//! ```no_run
//! use dart_modernize::{rewriter, rules, scanner};
//! use std::path::Path;
//!
//! let files = scanner::collect_dart_files(Path::new("lib"));
//! let report = rewriter::apply_rules(&files, &rules::default_rules());
//!
//! println!("Modified {} files", report.modified().len());
//! ```
//!
//! Rules can also be applied to in-memory text:
//!
//! ```
//! use dart_modernize::rules::{OpacityToAlpha, Rule};
//!
//! let rewrite = OpacityToAlpha.rewrite("Colors.black.withOpacity(0.5)");
//! assert_eq!(rewrite.text, "Colors.black.withAlpha(128)");
//! ```

pub mod cli;
pub mod formatter;
pub mod rewriter;
pub mod rules;
pub mod runner;
pub mod scanner;

// Re-export commonly used types at crate root
pub use rewriter::{FileOutcome, RewriteError, RewriteReport};
pub use rules::{Rewrite, Rule};
pub use runner::{Config, FormatStatus, Formatter, RunSummary};
