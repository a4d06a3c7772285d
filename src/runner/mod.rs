//! Project discovery and test execution inside a student checkout.
//!
//! A checkout contains one project per digit-named subdirectory (`1/`, `2/`,
//! ...). Each project is identified by its manifest file and graded by
//! running the matching install and test commands, blocking and sequential.
//! There is deliberately no timeout: a hung test command blocks the batch,
//! which is an accepted limitation of the current design.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use crate::models::TestOutcome;
use crate::parser::parse_test_output;

/// Project flavor, detected from the manifest present in a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Npm,
    Cargo,
}

impl ProjectKind {
    /// Detect the project kind from the manifest files in `dir`.
    pub fn detect(dir: &Path) -> Option<Self> {
        if dir.join("package.json").is_file() {
            Some(Self::Npm)
        } else if dir.join("Cargo.toml").is_file() {
            Some(Self::Cargo)
        } else {
            None
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Cargo => "cargo",
        }
    }

    fn install_args(&self) -> &'static [&'static str] {
        match self {
            Self::Npm => &["install"],
            Self::Cargo => &["build"],
        }
    }

    fn test_args(&self) -> &'static [&'static str] {
        match self {
            Self::Npm => &["test"],
            Self::Cargo => &["test"],
        }
    }
}

/// Outcome of one project directory, keyed by its directory name.
#[derive(Debug, Clone, Serialize)]
pub struct DirOutcome {
    pub dir: String,
    pub outcome: TestOutcome,
}

/// List the digit-named project directories of a checkout in ascending
/// numeric order.
pub fn discover_project_dirs(checkout: &Path) -> Result<Vec<PathBuf>> {
    let mut numbered: Vec<(u64, PathBuf)> = Vec::new();
    let entries = std::fs::read_dir(checkout)
        .with_context(|| format!("failed to list checkout {}", checkout.display()))?;

    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Ok(number) = name.parse::<u64>() {
            numbered.push((number, entry.path()));
        }
    }

    numbered.sort_by_key(|(number, _)| *number);
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

/// Grade every project directory of a checkout.
pub fn grade_checkout(checkout: &Path) -> Result<Vec<DirOutcome>> {
    let dirs = discover_project_dirs(checkout)?;
    info!(
        checkout = %checkout.display(),
        count = dirs.len(),
        "found project directories"
    );

    let mut outcomes = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let outcome = run_project(&dir)?;
        info!(dir = %name, passed = outcome.passed, total = outcome.total, "directory graded");
        outcomes.push(DirOutcome { dir: name, outcome });
    }
    Ok(outcomes)
}

/// Run install and test in one project directory and parse the output.
///
/// Degrading cases, none of which are errors:
/// - no recognized manifest: `(0, 0)`
/// - install step exits non-zero: `(0, 0)`
/// - test output matches no known pattern: `(0, 0)`
///
/// Only a failure to execute the tool at all (missing binary, I/O error)
/// propagates as an error.
pub fn run_project(dir: &Path) -> Result<TestOutcome> {
    let Some(kind) = ProjectKind::detect(dir) else {
        warn!(dir = %dir.display(), "no recognized project manifest, scoring 0");
        return Ok(TestOutcome::default());
    };

    which::which(kind.program())
        .with_context(|| format!("{} not found on PATH", kind.program()))?;

    run_install_and_test(kind.program(), kind.install_args(), kind.test_args(), dir)
}

/// Install-then-test pipeline with the degrading install behavior.
fn run_install_and_test(
    program: &str,
    install_args: &[&str],
    test_args: &[&str],
    dir: &Path,
) -> Result<TestOutcome> {
    debug!(dir = %dir.display(), program, "running install step");
    let install = run_step(program, install_args, dir)?;
    if !install.status_success {
        warn!(dir = %dir.display(), "install step failed, scoring 0\n{}", install.tail());
        return Ok(TestOutcome::default());
    }

    debug!(dir = %dir.display(), program, "running test step");
    let test = run_step(program, test_args, dir)?;
    if !test.status_success {
        // Failing tests still print a summary; parse whatever we got.
        debug!(dir = %dir.display(), "test step exited non-zero, parsing output anyway");
    }

    Ok(parse_test_output(&test.combined))
}

/// Captured result of one blocking subprocess step.
struct StepOutput {
    status_success: bool,
    combined: String,
}

impl StepOutput {
    /// Last few lines of output, for log messages.
    fn tail(&self) -> String {
        let lines: Vec<&str> = self.combined.lines().collect();
        let start = lines.len().saturating_sub(5);
        lines[start..].join("\n")
    }
}

fn run_step(program: &str, args: &[&str], cwd: &Path) -> Result<StepOutput> {
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("failed to execute: {program} {}", args.join(" ")))?;

    // stdout then stderr, matching how the summaries are read by eye
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(StepOutput {
        status_success: output.status.success(),
        combined,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_orders_numerically() {
        let temp = TempDir::new().unwrap();
        for name in ["10", "2", "1", "notes", "03"] {
            std::fs::create_dir(temp.path().join(name)).unwrap();
        }
        // a stray digit-named file must not be picked up
        std::fs::write(temp.path().join("7"), "").unwrap();

        let dirs = discover_project_dirs(temp.path()).unwrap();
        let names: Vec<String> = dirs
            .iter()
            .map(|d| d.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["1", "2", "03", "10"]);
    }

    #[test]
    fn test_detect_project_kind() {
        let temp = TempDir::new().unwrap();
        assert_eq!(ProjectKind::detect(temp.path()), None);

        std::fs::write(temp.path().join("Cargo.toml"), "[package]").unwrap();
        assert_eq!(ProjectKind::detect(temp.path()), Some(ProjectKind::Cargo));

        // package.json wins when both are present
        std::fs::write(temp.path().join("package.json"), "{}").unwrap();
        assert_eq!(ProjectKind::detect(temp.path()), Some(ProjectKind::Npm));
    }

    #[test]
    fn test_run_project_without_manifest_scores_zero() {
        let temp = TempDir::new().unwrap();
        let outcome = run_project(temp.path()).unwrap();
        assert_eq!(outcome, TestOutcome::default());
    }

    #[test]
    fn test_failed_install_step_scores_zero_without_error() {
        let temp = TempDir::new().unwrap();
        let outcome = run_install_and_test(
            "sh",
            &["-c", "echo dependency resolution exploded >&2; exit 1"],
            &["-c", "echo 'Test Suites: 3 passed, 3 total'"],
            temp.path(),
        )
        .unwrap();
        // the test step must never run after a failed install
        assert_eq!(outcome, TestOutcome::default());
    }

    #[test]
    fn test_failing_test_step_output_is_still_parsed() {
        let temp = TempDir::new().unwrap();
        let outcome = run_install_and_test(
            "sh",
            &["-c", "true"],
            &["-c", "echo 'Test Suites: 2 passed, 5 total'; exit 1"],
            temp.path(),
        )
        .unwrap();
        assert_eq!(outcome, TestOutcome::new(2, 5));
    }

    #[test]
    fn test_run_step_captures_stdout_and_stderr() {
        let temp = TempDir::new().unwrap();
        let out = run_step("sh", &["-c", "echo one; echo two >&2"], temp.path()).unwrap();
        assert!(out.status_success);
        assert!(out.combined.contains("one"));
        assert!(out.combined.contains("two"));
    }
}
