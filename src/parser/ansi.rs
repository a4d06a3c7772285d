//! ANSI escape sequence stripping for test-runner output.
//!
//! Stripping is applied line by line, never to the whole text: an escape
//! sequence split across a line boundary is left unnormalized. Known
//! limitation; the summary lines we match against never wrap.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Matches single-character escapes and CSI sequences.
const ANSI_PATTERN: &str = r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])";

fn ansi_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ANSI_PATTERN).ok()).as_ref()
}

/// Remove ANSI escape sequences from a single line.
///
/// Returns the line unchanged if the stripping regex is unavailable; the
/// parser must never fail because of cosmetic noise in the input.
pub fn strip_ansi(line: &str) -> Cow<'_, str> {
    match ansi_regex() {
        Some(re) => re.replace_all(line, ""),
        None => Cow::Borrowed(line),
    }
}
