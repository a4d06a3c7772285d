//! Pass/total extraction from free-form test-runner output.
//!
//! Test runners emit heterogeneous human-readable summaries, so the parser
//! applies an ordered table of line patterns instead of expecting a machine
//! format. The first line that matches wins. The richer "Test Suites:" form
//! takes precedence over the bare "<N> passed" fallback on any given line:
//! when a line contains the `Test Suites:` marker but the full pattern does
//! not match, the fallback is not tried on that line.
//!
//! The function is infallible: pattern failures, overflowing counts, and
//! unmatchable input all degrade to `(0, 0)`.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::models::TestOutcome;

/// Which capture groups a pattern yields.
#[derive(Debug, Clone, Copy)]
enum Extract {
    /// Group 1 = passed, group 2 = total.
    PassedAndTotal,
    /// Group 1 = passed; total is assumed equal to passed.
    PassedOnly,
}

/// One row of the pattern table: a cheap substring gate plus the regex that
/// is attempted only when the gate hits.
struct LinePattern {
    needle: &'static str,
    pattern: &'static str,
    extract: Extract,
}

/// Ordered pattern table. Earlier rows take precedence within a line.
const PATTERNS: &[LinePattern] = &[
    LinePattern {
        needle: "Test Suites:",
        pattern: r"Test Suites:\s*(\d+) passed, (\d+) total",
        extract: Extract::PassedAndTotal,
    },
    LinePattern {
        needle: "passed",
        pattern: r"(\d+)\s+passed",
        extract: Extract::PassedOnly,
    },
];

struct CompiledPattern {
    needle: &'static str,
    regex: Regex,
    extract: Extract,
}

fn compiled_patterns() -> &'static [CompiledPattern] {
    static COMPILED: OnceLock<Vec<CompiledPattern>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .filter_map(|p| match Regex::new(p.pattern) {
                Ok(regex) => Some(CompiledPattern {
                    needle: p.needle,
                    regex,
                    extract: p.extract,
                }),
                Err(err) => {
                    warn!(pattern = p.pattern, %err, "dropping unparseable outcome pattern");
                    None
                }
            })
            .collect()
    })
}

/// Extract a `(passed, total)` outcome from captured stdout+stderr text.
///
/// Lines are ANSI-stripped individually, then scanned in order against the
/// pattern table; the first successful match is returned. Input matching no
/// pattern yields `(0, 0)`.
pub fn parse_test_output(output: &str) -> TestOutcome {
    for line in output.lines() {
        let clean = super::ansi::strip_ansi(line);
        for pattern in compiled_patterns() {
            if !clean.contains(pattern.needle) {
                continue;
            }
            if let Some(outcome) = try_extract(pattern, &clean) {
                debug!(line = %clean, passed = outcome.passed, total = outcome.total, "matched outcome line");
                return outcome;
            }
            // The marker was present but the counts were not where this
            // pattern expects them. Move on to the next line rather than
            // letting a weaker pattern misread the same line.
            break;
        }
    }
    TestOutcome::default()
}

fn try_extract(pattern: &CompiledPattern, line: &str) -> Option<TestOutcome> {
    let captures = pattern.regex.captures(line)?;
    let passed: u32 = parse_count(captures.get(1)?.as_str(), line)?;
    let total = match pattern.extract {
        Extract::PassedAndTotal => parse_count(captures.get(2)?.as_str(), line)?,
        Extract::PassedOnly => passed,
    };
    Some(TestOutcome::new(passed, total))
}

fn parse_count(digits: &str, line: &str) -> Option<u32> {
    match digits.parse() {
        Ok(n) => Some(n),
        Err(err) => {
            warn!(%err, line, "test count does not fit in u32, skipping line");
            None
        }
    }
}
