//! End-to-end run: collect files, apply the rewrite stages, then format.
//!
//! Every failure past argument parsing degrades to a printed diagnostic; the
//! returned [`RunSummary`] records what actually happened so callers (and
//! tests) need not scrape console output.

use crate::formatter::{self, DART};
use crate::rewriter::{self, RewriteReport};
use crate::rules::{self, Rule};
use crate::scanner;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directory rewritten when none is given, the usual Flutter source root.
pub const DEFAULT_ROOT: &str = "lib";

/// How the formatting step should be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    /// Formatting was turned off by the caller.
    Disabled,
    /// No executable could be resolved; formatting is skipped with a warning.
    Missing,
    /// Run this executable as `<path> format <root>`.
    At(PathBuf),
}

impl Formatter {
    /// Resolves `dart` on `PATH`.
    pub fn discover() -> Self {
        formatter::find_executable(DART).map_or(Formatter::Missing, Formatter::At)
    }
}

/// Inputs for a single run.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub formatter: Formatter,
    /// Suppress progress output on stdout.
    pub quiet: bool,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>, formatter: Formatter) -> Self {
        Self {
            root: root.into(),
            formatter,
            quiet: false,
        }
    }
}

/// What happened to the formatting step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FormatStatus {
    Formatted,
    /// No file changed, so there was nothing to format.
    NotNeeded,
    /// Files changed but no formatter executable was found.
    Unavailable,
    Disabled,
    Failed { reason: String },
}

/// Per-rule modified-file count.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSummary {
    pub rule: &'static str,
    pub modified: usize,
}

/// A file a rule could not process.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub rule: &'static str,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub root: PathBuf,
    pub files_scanned: usize,
    pub rules: Vec<RuleSummary>,
    /// Union of every rule's modified files.
    pub modified: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    pub format: FormatStatus,
}

impl RunSummary {
    pub fn total_modified(&self) -> usize {
        self.modified.len()
    }

    fn empty(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            files_scanned: 0,
            rules: Vec::new(),
            modified: Vec::new(),
            skipped: Vec::new(),
            format: FormatStatus::NotNeeded,
        }
    }
}

/// Console printer. `quiet` silences progress on stdout; warnings and errors
/// always go to stderr.
struct Console {
    quiet: bool,
}

impl Console {
    fn info(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("{} {}", "info:".blue().bold(), message);
        }
    }

    fn ok(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("{} {}", "ok:".green().bold(), message);
        }
    }

    fn line(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    fn warn(&self, message: impl std::fmt::Display) {
        eprintln!("{} {}", "warn:".yellow().bold(), message);
    }

    fn error(&self, message: impl std::fmt::Display) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }
}

/// Runs the default rewrite stages over `config.root`.
pub fn run(config: &Config) -> RunSummary {
    run_with_rules(config, &rules::default_rules())
}

/// Runs `stages` in order over every `.dart` file under `config.root`.
pub fn run_with_rules(config: &Config, stages: &[Box<dyn Rule>]) -> RunSummary {
    let console = Console {
        quiet: config.quiet,
    };
    let root = config.root.as_path();

    console.info(format!("Rewriting .dart files under '{}'", root.display()));
    match &config.formatter {
        Formatter::At(path) => console.info(format!("Found dart executable at {}", path.display())),
        Formatter::Missing => console.warn(
            "'dart' not found on PATH; files will be rewritten but formatting is skipped",
        ),
        Formatter::Disabled => {}
    }

    let files = scanner::collect_dart_files(root);
    if files.is_empty() {
        console.info("No .dart files found. Nothing to do.");
        return RunSummary::empty(root);
    }
    console.info(format!("Found {} .dart files", files.len()));

    let report = rewrite(&console, &files, stages);
    let modified = report.modified();

    let format = if modified.is_empty() {
        console.ok("No changes were needed in any files.");
        FormatStatus::NotNeeded
    } else {
        console.line(format!(
            "\n{} {}",
            "Total files modified:".bold(),
            modified.len()
        ));
        run_formatter(&console, &config.formatter, root, stages.len() + 1)
    };

    console.line(format!("\n{}", "Refactoring complete.".green().bold()));

    RunSummary {
        root: root.to_path_buf(),
        files_scanned: files.len(),
        rules: report
            .rules
            .iter()
            .map(|r| RuleSummary {
                rule: r.rule,
                modified: r.modified().len(),
            })
            .collect(),
        modified: modified.into_iter().collect(),
        skipped: skipped_files(&report),
        format,
    }
}

fn rewrite(console: &Console, files: &[PathBuf], stages: &[Box<dyn Rule>]) -> RewriteReport {
    let mut report = RewriteReport::default();

    for (step, stage) in stages.iter().enumerate() {
        console.line(format!(
            "\n{} Checking for {}",
            format!("{}.", step + 1).bold(),
            stage.description()
        ));

        let rule_report = rewriter::apply_rule(files, stage.as_ref());
        for path in rule_report.modified() {
            console.line(format!("   - {} {}", "rewrote".yellow(), path.display()));
        }
        for (_, err) in rule_report.skipped() {
            console.error(err);
        }
        report.rules.push(rule_report);
    }

    report
}

fn run_formatter(
    console: &Console,
    formatter: &Formatter,
    root: &Path,
    step: usize,
) -> FormatStatus {
    let executable = match formatter {
        Formatter::At(path) => path,
        Formatter::Missing => {
            console.warn("Skipping formatting because 'dart' was not found.");
            return FormatStatus::Unavailable;
        }
        Formatter::Disabled => return FormatStatus::Disabled,
    };

    console.line(format!(
        "\n{} Formatting .dart files in '{}'",
        format!("{step}.").bold(),
        root.display()
    ));

    match formatter::format_directory(executable, root) {
        Ok(()) => {
            console.ok("Formatting successful.");
            FormatStatus::Formatted
        }
        Err(err) => {
            console.error(&err);
            FormatStatus::Failed {
                reason: err.to_string(),
            }
        }
    }
}

fn skipped_files(report: &RewriteReport) -> Vec<SkippedFile> {
    report
        .rules
        .iter()
        .flat_map(|r| {
            r.skipped().map(move |(path, err)| SkippedFile {
                rule: r.rule,
                path: path.to_path_buf(),
                reason: err.to_string(),
            })
        })
        .collect()
}
