//! Per-assignment reports: TSV table, JSON details file, console summary.
//!
//! The TSV is the canonical artifact: one row per student, sorted by name,
//! with `-` standing in for a missing commit date and its status, and
//! `ERROR` marking students whose processing failed outright.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::models::{DeadlineStatus, TestOutcome};
use crate::runner::DirOutcome;

/// How one student's row ended up.
#[derive(Debug, Clone)]
pub enum RowResult {
    Graded {
        outcome: TestOutcome,
        commit: Option<DateTime<Utc>>,
        status: Option<DeadlineStatus>,
        directories: Vec<DirOutcome>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct ReportRow {
    pub name: String,
    pub result: RowResult,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub assignment: String,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn new(assignment: String, mut rows: Vec<ReportRow>) -> Self {
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Self { assignment, rows }
    }

    /// Render the tab-separated report body.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let (passed, failed, commit, status) = match &row.result {
                RowResult::Graded {
                    outcome,
                    commit,
                    status,
                    ..
                } => (
                    outcome.passed.to_string(),
                    outcome.failed().to_string(),
                    commit.map(format_commit).unwrap_or_else(|| "-".to_string()),
                    status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                RowResult::Error { .. } => (
                    "ERROR".to_string(),
                    "ERROR".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ),
            };
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                row.name, passed, failed, commit, status
            ));
        }
        out
    }

    /// Write the TSV report as `<reports_dir>/<assignment>.tsv`.
    pub fn write_tsv(&self, reports_dir: &Path) -> Result<PathBuf> {
        let path = reports_dir.join(format!("{}.tsv", self.assignment));
        std::fs::write(&path, self.to_tsv())
            .with_context(|| format!("failed to write report {}", path.display()))?;
        Ok(path)
    }

    /// Write the JSON details file as `<reports_dir>/<assignment>.json`.
    ///
    /// Per student: the per-directory outcomes plus a statistics block, or
    /// the error message when processing failed.
    pub fn write_json(&self, reports_dir: &Path) -> Result<PathBuf> {
        let mut students = serde_json::Map::new();
        for row in &self.rows {
            let value = match &row.result {
                RowResult::Graded {
                    outcome,
                    commit,
                    status,
                    directories,
                } => {
                    let details: serde_json::Map<String, serde_json::Value> = directories
                        .iter()
                        .map(|d| (d.dir.clone(), json!(d.outcome)))
                        .collect();
                    json!({
                        "details": details,
                        "outcome": outcome,
                        "commit": commit.map(format_commit),
                        "deadline_status": status,
                        "statistics": {
                            "total_directories": directories.len(),
                            "directories_passing": directories
                                .iter()
                                .filter(|d| d.outcome.passed > 0)
                                .count(),
                        },
                    })
                }
                RowResult::Error { message } => json!({
                    "details": message,
                    "statistics": {
                        "total_directories": 0,
                        "directories_passing": 0,
                    },
                }),
            };
            students.insert(row.name.clone(), value);
        }

        let path = reports_dir.join(format!("{}.json", self.assignment));
        let body = serde_json::to_string_pretty(&serde_json::Value::Object(students))
            .context("failed to serialize JSON report")?;
        std::fs::write(&path, body)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        Ok(path)
    }

    /// Print a colored summary table to stdout.
    pub fn print_summary(&self) {
        println!("\n{}", self.assignment.bold().blue());
        println!("{}", "=".repeat(60));
        for row in &self.rows {
            match &row.result {
                RowResult::Graded {
                    outcome,
                    commit,
                    status,
                    ..
                } => {
                    let status_cell = match status {
                        Some(DeadlineStatus::OnTimeSoft) => "on_time_soft".green(),
                        Some(DeadlineStatus::OnTimeHard) => "on_time_hard".yellow(),
                        Some(DeadlineStatus::Late) => "late".red(),
                        None => "-".normal(),
                    };
                    println!(
                        "  {:<24} {:>3} passed {:>3} failed  {:<25} {}",
                        row.name,
                        outcome.passed,
                        outcome.failed(),
                        commit.map(format_commit).unwrap_or_else(|| "-".to_string()),
                        status_cell
                    );
                }
                RowResult::Error { message } => {
                    println!(
                        "  {:<24} {}  {}",
                        row.name,
                        "ERROR".red().bold(),
                        message.dimmed()
                    );
                }
            }
        }
    }
}

fn format_commit(commit: DateTime<Utc>) -> String {
    commit.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn graded_row(name: &str, passed: u32, total: u32) -> ReportRow {
        ReportRow {
            name: name.to_string(),
            result: RowResult::Graded {
                outcome: TestOutcome::new(passed, total),
                commit: Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()),
                status: Some(DeadlineStatus::OnTimeSoft),
                directories: vec![DirOutcome {
                    dir: "1".to_string(),
                    outcome: TestOutcome::new(passed, total),
                }],
            },
        }
    }

    #[test]
    fn test_tsv_rows_are_sorted_by_name() {
        let report = Report::new(
            "hw01".to_string(),
            vec![graded_row("zoe", 1, 1), graded_row("amy", 2, 3)],
        );
        let tsv = report.to_tsv();
        let lines: Vec<&str> = tsv.lines().collect();
        assert!(lines[0].starts_with("amy\t"));
        assert!(lines[1].starts_with("zoe\t"));
    }

    #[test]
    fn test_tsv_graded_row_format() {
        let report = Report::new("hw01".to_string(), vec![graded_row("amy", 2, 3)]);
        assert_eq!(
            report.to_tsv(),
            "amy\t2\t1\t2026-03-01T12:00:00Z\ton_time_soft\n"
        );
    }

    #[test]
    fn test_tsv_missing_commit_renders_dashes() {
        let row = ReportRow {
            name: "bob".to_string(),
            result: RowResult::Graded {
                outcome: TestOutcome::default(),
                commit: None,
                status: None,
                directories: Vec::new(),
            },
        };
        let report = Report::new("hw01".to_string(), vec![row]);
        assert_eq!(report.to_tsv(), "bob\t0\t0\t-\t-\n");
    }

    #[test]
    fn test_tsv_error_row_markers() {
        let row = ReportRow {
            name: "eve".to_string(),
            result: RowResult::Error {
                message: "clone failed".to_string(),
            },
        };
        let report = Report::new("hw01".to_string(), vec![row]);
        assert_eq!(report.to_tsv(), "eve\tERROR\tERROR\t-\t-\n");
    }

    #[test]
    fn test_json_details_and_statistics() {
        let report = Report::new("hw01".to_string(), vec![graded_row("amy", 2, 3)]);
        let dir = tempfile::TempDir::new().unwrap();
        let path = report.write_json(dir.path()).unwrap();

        let body: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(body["amy"]["statistics"]["total_directories"], 1);
        assert_eq!(body["amy"]["statistics"]["directories_passing"], 1);
        assert_eq!(body["amy"]["details"]["1"]["passed"], 2);
        assert_eq!(body["amy"]["deadline_status"], "on_time_soft");
    }
}
