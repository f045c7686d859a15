//! Textual rewrite rules.
//!
//! Each rule is a two-stage transform: a regex locates matches, then
//! [`Rule::replacement`] computes the new text for one match from its
//! captures. Rules are purely textual and know nothing about Dart syntax, so a
//! pattern appearing inside a string literal or comment is rewritten too.
//!
//! Rules run in the order given by [`default_rules`]. Later stages read what
//! earlier stages wrote.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `.withOpacity(0.<digits>)` on some receiver. Only literals starting with `0.`
/// are matched.
static OPACITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.withOpacity\((0\.[0-9]+)\)").expect("valid regex"));

/// Whole-word `print(` up to the first `);` on the same line.
static PRINT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bprint\s*\((.*?)\);").expect("valid regex"));

/// Result of applying a rule to a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub changed: bool,
}

/// A stateless match-and-replace transform over source text.
pub trait Rule {
    /// Short identifier used in reports, e.g. `"opacity-to-alpha"`.
    fn name(&self) -> &'static str;

    /// Human-readable description of what the rule converts.
    fn description(&self) -> &'static str;

    /// Pattern locating every occurrence this rule rewrites.
    fn pattern(&self) -> &Regex;

    /// Computes the replacement for a single match.
    fn replacement(&self, caps: &Captures<'_>) -> String;

    /// Replaces every match in `source` in a single pass.
    fn rewrite(&self, source: &str) -> Rewrite {
        let text = self
            .pattern()
            .replace_all(source, |caps: &Captures<'_>| self.replacement(caps))
            .into_owned();
        let changed = text != source;
        Rewrite { text, changed }
    }
}

/// Converts `.withOpacity(0.x)` to `.withAlpha(n)` with `n` in `0..=255`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpacityToAlpha;

impl Rule for OpacityToAlpha {
    fn name(&self) -> &'static str {
        "opacity-to-alpha"
    }

    fn description(&self) -> &'static str {
        "'.withOpacity()' to '.withAlpha()'"
    }

    fn pattern(&self) -> &Regex {
        &OPACITY_PATTERN
    }

    fn replacement(&self, caps: &Captures<'_>) -> String {
        match caps[1].parse::<f64>() {
            Ok(opacity) => format!(".withAlpha({})", opacity_to_alpha(opacity)),
            // The pattern only admits ASCII digits, so this keeps the match as-is.
            Err(_) => caps[0].to_string(),
        }
    }
}

/// Maps an opacity to an 8-bit alpha value.
///
/// The input is clamped to `[0.0, 1.0]`, scaled by 255 and rounded half away
/// from zero, so `0.5` becomes `128`. NaN maps to `0`.
pub fn opacity_to_alpha(opacity: f64) -> u8 {
    let clamped = if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    };
    (clamped * 255.0).round() as u8
}

/// Converts `print(...);` statements to `debugPrint(...);`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintToDebugPrint;

impl Rule for PrintToDebugPrint {
    fn name(&self) -> &'static str {
        "print-to-debug-print"
    }

    fn description(&self) -> &'static str {
        "'print()' to 'debugPrint()'"
    }

    fn pattern(&self) -> &Regex {
        &PRINT_PATTERN
    }

    fn replacement(&self, caps: &Captures<'_>) -> String {
        format!("debugPrint({});", &caps[1])
    }
}

/// The rewrite stages in the order they must run.
///
/// Opacity conversion comes first; the print stage operates on its output.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(OpacityToAlpha), Box::new(PrintToDebugPrint)]
}
