//! Grade command: the batch operation over one or more assignment rosters.
//! Usage: rubric grade <ROSTER>... --deadlines <FILE>

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::git;
use crate::models::{DeadlinePolicy, DeadlineRecord, Roster, RosterEntry};
use crate::report::{Report, ReportRow, RowResult};
use crate::runner;

/// Execute the grade command.
///
/// Each roster file is one assignment. An assignment with no deadline entry
/// is skipped entirely; within an assignment, one student's failure never
/// aborts the rest of the batch.
pub fn execute(
    rosters: Vec<PathBuf>,
    deadlines: PathBuf,
    repos_dir: PathBuf,
    reports_dir: PathBuf,
) -> Result<()> {
    which::which("git").context("git not found on PATH")?;

    let policy = DeadlinePolicy::load(&deadlines)?;
    std::fs::create_dir_all(&repos_dir)
        .with_context(|| format!("failed to create {}", repos_dir.display()))?;
    std::fs::create_dir_all(&reports_dir)
        .with_context(|| format!("failed to create {}", reports_dir.display()))?;

    for roster_path in &rosters {
        let roster = match Roster::load(roster_path) {
            Ok(roster) => roster,
            Err(err) => {
                error!(%err, "skipping unreadable roster {}", roster_path.display());
                continue;
            }
        };

        let Some(record) = policy.get(&roster.assignment) else {
            error!(
                assignment = %roster.assignment,
                "no deadline entry, skipping assignment"
            );
            continue;
        };

        info!(
            assignment = %roster.assignment,
            students = roster.entries.len(),
            "grading assignment"
        );
        let report = grade_assignment(&roster, record, &repos_dir);

        let tsv_path = report.write_tsv(&reports_dir)?;
        report.write_json(&reports_dir)?;
        report.print_summary();
        info!(report = %tsv_path.display(), "assignment report written");
    }

    Ok(())
}

/// Grade every student on a roster against one deadline record.
///
/// Per-student failures become `ERROR` rows instead of propagating.
pub fn grade_assignment(roster: &Roster, record: &DeadlineRecord, repos_dir: &Path) -> Report {
    let rows = roster
        .entries
        .iter()
        .map(|entry| {
            let result = match grade_student(entry, record, repos_dir) {
                Ok(result) => result,
                Err(err) => {
                    error!(student = %entry.name, "failed to process: {err:#}");
                    RowResult::Error {
                        message: format!("{err:#}"),
                    }
                }
            };
            ReportRow {
                name: entry.name.clone(),
                result,
            }
        })
        .collect();

    Report::new(roster.assignment.clone(), rows)
}

fn grade_student(
    entry: &RosterEntry,
    record: &DeadlineRecord,
    repos_dir: &Path,
) -> Result<RowResult> {
    info!(student = %entry.name, url = %entry.url, "processing student");

    let checkout = git::clone_or_pull(&entry.url, repos_dir)?;
    let commit = git::last_commit_time(&checkout)?;
    let directories = runner::grade_checkout(&checkout)?;

    let outcome = directories.iter().map(|d| d.outcome).sum();
    let status = commit.map(|c| record.classify(c));

    Ok(RowResult::Graded {
        outcome,
        commit,
        status,
        directories,
    })
}
