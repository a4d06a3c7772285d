//! Parse command: run the outcome heuristics over a captured log file.
//! Usage: rubric parse <FILE>
//!
//! Debugging aid for the pattern table: paste a runner's output into a file
//! and see which counts the grader would extract from it.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::parser::parse_test_output;

pub fn execute(file: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let outcome = parse_test_output(&content);
    println!(
        "{}: {} passed, {} failed, {} total",
        file.display().to_string().bold(),
        outcome.passed.to_string().green(),
        outcome.failed().to_string().red(),
        outcome.total
    );
    Ok(())
}
