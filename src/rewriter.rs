//! Applying rules to files on disk.
//!
//! Each rule is run over every file before the next rule starts, so a later
//! rule reads what an earlier rule wrote. A file is only written when a rule
//! actually changes its content. Read and write failures are captured per file
//! as [`FileOutcome::Skipped`] and never abort the pass.

use crate::rules::Rule;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a file could not be processed by a rule.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Result of applying one rule to one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The rule found nothing to change; the file was not touched.
    Unchanged,
    /// The rule changed the content and the file was overwritten.
    Rewritten,
    /// The file was left as-is because of an I/O or decoding failure.
    Skipped(RewriteError),
}

impl FileOutcome {
    pub fn is_rewritten(&self) -> bool {
        matches!(self, FileOutcome::Rewritten)
    }
}

/// Outcomes of a single rule over the whole file set.
#[derive(Debug)]
pub struct RuleReport {
    pub rule: &'static str,
    /// One entry per input file, in input order.
    pub outcomes: Vec<(PathBuf, FileOutcome)>,
}

impl RuleReport {
    /// Files whose content this rule changed.
    pub fn modified(&self) -> BTreeSet<PathBuf> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_rewritten())
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Files this rule could not process, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &RewriteError)> {
        self.outcomes.iter().filter_map(|(path, outcome)| match outcome {
            FileOutcome::Skipped(err) => Some((path.as_path(), err)),
            _ => None,
        })
    }
}

/// Outcomes of every rule, in the order the rules ran.
#[derive(Debug, Default)]
pub struct RewriteReport {
    pub rules: Vec<RuleReport>,
}

impl RewriteReport {
    /// Union of every rule's modified files.
    pub fn modified(&self) -> BTreeSet<PathBuf> {
        self.rules.iter().flat_map(RuleReport::modified).collect()
    }
}

/// Applies `rule` to a single file, overwriting it if the content changes.
pub fn rewrite_file(path: &Path, rule: &dyn Rule) -> FileOutcome {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) => {
            return FileOutcome::Skipped(RewriteError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let rewrite = rule.rewrite(&content);
    if !rewrite.changed {
        return FileOutcome::Unchanged;
    }

    match std::fs::write(path, rewrite.text) {
        Ok(()) => FileOutcome::Rewritten,
        Err(source) => FileOutcome::Skipped(RewriteError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Runs one rule over every file.
pub fn apply_rule(files: &[PathBuf], rule: &dyn Rule) -> RuleReport {
    let outcomes = files
        .iter()
        .map(|file| (file.clone(), rewrite_file(file, rule)))
        .collect();

    RuleReport {
        rule: rule.name(),
        outcomes,
    }
}

/// Runs each rule over every file, strictly in the given order.
pub fn apply_rules(files: &[PathBuf], rules: &[Box<dyn Rule>]) -> RewriteReport {
    RewriteReport {
        rules: rules
            .iter()
            .map(|rule| apply_rule(files, rule.as_ref()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{OpacityToAlpha, PrintToDebugPrint, default_rules};
    use std::fs;

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn rewrites_file_with_matches() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "a.dart", b"c.withOpacity(0.5);\n");

        let outcome = rewrite_file(&file, &OpacityToAlpha);

        assert!(outcome.is_rewritten());
        assert_eq!(fs::read_to_string(&file).unwrap(), "c.withAlpha(128);\n");
    }

    #[test]
    fn leaves_file_without_matches_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "a.dart", b"void main() {}\n");
        let before = fs::metadata(&file).unwrap().modified().unwrap();

        let outcome = rewrite_file(&file, &PrintToDebugPrint);

        assert!(matches!(outcome, FileOutcome::Unchanged));
        assert_eq!(fs::read_to_string(&file).unwrap(), "void main() {}\n");
        assert_eq!(fs::metadata(&file).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn missing_file_is_skipped_with_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.dart");

        let outcome = rewrite_file(&missing, &OpacityToAlpha);

        match outcome {
            FileOutcome::Skipped(RewriteError::Read { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected read failure, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_skipped_and_left_intact() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = b"print('\xff');\n";
        let file = write(dir.path(), "latin1.dart", bytes);

        let outcome = rewrite_file(&file, &PrintToDebugPrint);

        assert!(matches!(
            outcome,
            FileOutcome::Skipped(RewriteError::Read { .. })
        ));
        assert_eq!(fs::read(&file).unwrap(), bytes);
    }

    #[test]
    fn error_message_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.dart");
        let FileOutcome::Skipped(err) = rewrite_file(&missing, &OpacityToAlpha) else {
            panic!("expected skip");
        };
        let message = err.to_string();
        assert!(message.starts_with("failed to read "));
        assert!(message.contains("gone.dart"));
    }

    #[test]
    fn failures_do_not_stop_the_pass() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.dart", b"print('x');");
        let missing = dir.path().join("missing.dart");
        let files = vec![missing.clone(), good.clone()];

        let report = apply_rule(&files, &PrintToDebugPrint);

        assert_eq!(report.rule, "print-to-debug-print");
        assert_eq!(report.modified(), BTreeSet::from([good.clone()]));
        let skipped: Vec<_> = report.skipped().map(|(p, _)| p.to_path_buf()).collect();
        assert_eq!(skipped, vec![missing]);
        assert_eq!(fs::read_to_string(&good).unwrap(), "debugPrint('x');");
    }

    #[test]
    fn report_unions_modified_sets_across_rules() {
        let dir = tempfile::tempdir().unwrap();
        let both = write(dir.path(), "both.dart", b"print(c.withOpacity(0.2));");
        let opacity_only = write(dir.path(), "opacity.dart", b"c.withOpacity(0.4);");
        let print_only = write(dir.path(), "print.dart", b"print(1);");
        let neither = write(dir.path(), "neither.dart", b"// nothing\n");
        let files = vec![both.clone(), opacity_only.clone(), print_only.clone(), neither];

        let report = apply_rules(&files, &default_rules());

        assert_eq!(report.rules.len(), 2);
        assert_eq!(
            report.rules[0].modified(),
            BTreeSet::from([both.clone(), opacity_only.clone()])
        );
        assert_eq!(
            report.rules[1].modified(),
            BTreeSet::from([both.clone(), print_only.clone()])
        );
        assert_eq!(
            report.modified(),
            BTreeSet::from([both.clone(), opacity_only, print_only])
        );
        assert_eq!(
            fs::read_to_string(&both).unwrap(),
            "debugPrint(c.withAlpha(51));"
        );
    }

    #[test]
    fn second_run_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "a.dart", b"print(c.withOpacity(0.9));");
        let files = vec![file];

        let first = apply_rules(&files, &default_rules());
        let second = apply_rules(&files, &default_rules());

        assert_eq!(first.modified().len(), 1);
        assert!(second.modified().is_empty());
    }

    #[test]
    fn empty_file_list_produces_empty_reports() {
        let report = apply_rules(&[], &default_rules());
        assert_eq!(report.rules.len(), 2);
        assert!(report.rules.iter().all(|r| r.outcomes.is_empty()));
        assert!(report.modified().is_empty());
    }
}
