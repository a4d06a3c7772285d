//! End-to-end grading tests against real on-disk git repositories.

use chrono::{TimeZone, Utc};
use rubric::commands::grade::grade_assignment;
use rubric::models::{DeadlineRecord, Roster};
use rubric::{git, runner};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run a git command in `cwd`, panicking on failure.
fn run_git(args: &[&str], cwd: &Path, commit_date: Option<&str>) {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(cwd);
    if let Some(date) = commit_date {
        cmd.env("GIT_AUTHOR_DATE", date).env("GIT_COMMITTER_DATE", date);
    }
    let output = cmd.output().expect("git should be runnable");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Create `<origins>/<user>/hw01` with one commit at `commit_date` and one
/// digit-named project directory (no manifest, so it grades as 0/0).
fn init_student_repo(origins: &Path, user: &str, commit_date: &str) -> PathBuf {
    let repo = origins.join(user).join("hw01");
    std::fs::create_dir_all(repo.join("1")).unwrap();
    std::fs::write(repo.join("1").join("solution.txt"), "answer\n").unwrap();

    run_git(&["init"], &repo, None);
    run_git(&["config", "user.email", "student@example.com"], &repo, None);
    run_git(&["config", "user.name", user], &repo, None);
    run_git(&["add", "."], &repo, None);
    run_git(&["commit", "-m", "submit"], &repo, Some(commit_date));
    repo
}

fn write_roster(dir: &Path, entries: &[(&str, &Path)]) -> PathBuf {
    let path = dir.join("hw01.tsv");
    let body: String = entries
        .iter()
        .map(|(name, url)| format!("{name}\t{}\n", url.display()))
        .collect();
    std::fs::write(&path, body).unwrap();
    path
}

fn deadline_record() -> DeadlineRecord {
    DeadlineRecord {
        soft: Utc.with_ymd_and_hms(2026, 3, 5, 23, 59, 0).unwrap(),
        hard: Utc.with_ymd_and_hms(2026, 3, 12, 23, 59, 0).unwrap(),
    }
}

#[test]
fn grades_a_roster_and_classifies_deadlines() {
    let temp = TempDir::new().unwrap();
    let origins = temp.path().join("origins");
    let repos_dir = temp.path().join("repos");
    std::fs::create_dir_all(&repos_dir).unwrap();

    // alice commits before the soft deadline, dave after the hard one
    let alice = init_student_repo(&origins, "alice", "2026-03-01T10:00:00+00:00");
    let dave = init_student_repo(&origins, "dave", "2026-03-20T10:00:00+00:00");

    let roster_path = write_roster(
        temp.path(),
        &[("alice", alice.as_path()), ("dave", dave.as_path())],
    );
    let roster = Roster::load(&roster_path).unwrap();
    assert_eq!(roster.assignment, "hw01");

    let report = grade_assignment(&roster, &deadline_record(), &repos_dir);
    let tsv = report.to_tsv();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "alice\t0\t0\t2026-03-01T10:00:00Z\ton_time_soft");
    assert_eq!(lines[1], "dave\t0\t0\t2026-03-20T10:00:00Z\tlate");

    // checkouts land under <user>_<repo>
    assert!(repos_dir.join("alice_hw01").join("1").exists());
    assert!(repos_dir.join("dave_hw01").exists());
}

#[test]
fn failed_clone_becomes_an_error_row_and_does_not_abort_the_batch() {
    let temp = TempDir::new().unwrap();
    let origins = temp.path().join("origins");
    let repos_dir = temp.path().join("repos");
    std::fs::create_dir_all(&repos_dir).unwrap();

    let alice = init_student_repo(&origins, "alice", "2026-03-10T10:00:00+00:00");
    let ghost = origins.join("ghost").join("hw01");

    let roster_path = write_roster(
        temp.path(),
        &[("ghost", ghost.as_path()), ("alice", alice.as_path())],
    );
    let roster = Roster::load(&roster_path).unwrap();

    let report = grade_assignment(&roster, &deadline_record(), &repos_dir);
    let tsv = report.to_tsv();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 2);
    // sorted by name: alice first, graded between soft and hard
    assert_eq!(lines[0], "alice\t0\t0\t2026-03-10T10:00:00Z\ton_time_hard");
    assert_eq!(lines[1], "ghost\tERROR\tERROR\t-\t-");
}

#[test]
fn repository_without_commits_renders_dashes() {
    let temp = TempDir::new().unwrap();
    let origins = temp.path().join("origins");
    let repos_dir = temp.path().join("repos");
    std::fs::create_dir_all(&repos_dir).unwrap();

    let carol = origins.join("carol").join("hw01");
    std::fs::create_dir_all(&carol).unwrap();
    run_git(&["init"], &carol, None);

    let roster_path = write_roster(temp.path(), &[("carol", carol.as_path())]);
    let roster = Roster::load(&roster_path).unwrap();

    let report = grade_assignment(&roster, &deadline_record(), &repos_dir);
    assert_eq!(report.to_tsv(), "carol\t0\t0\t-\t-\n");
}

#[test]
fn clone_or_pull_reuses_an_existing_checkout() {
    let temp = TempDir::new().unwrap();
    let origins = temp.path().join("origins");
    let repos_dir = temp.path().join("repos");
    std::fs::create_dir_all(&repos_dir).unwrap();

    let alice = init_student_repo(&origins, "alice", "2026-03-01T10:00:00+00:00");
    let url = alice.display().to_string();

    let first = git::clone_or_pull(&url, &repos_dir).unwrap();
    let second = git::clone_or_pull(&url, &repos_dir).unwrap();
    assert_eq!(first, second);

    let commit = git::last_commit_time(&first).unwrap().unwrap();
    assert_eq!(commit, Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap());
}

#[test]
fn existing_non_repo_checkout_directory_is_an_error() {
    let temp = TempDir::new().unwrap();
    let origins = temp.path().join("origins");
    let repos_dir = temp.path().join("repos");

    let alice = init_student_repo(&origins, "alice", "2026-03-01T10:00:00+00:00");

    // something already squats on the checkout path but is not a clone
    std::fs::create_dir_all(repos_dir.join("alice_hw01")).unwrap();

    let err = git::clone_or_pull(&alice.display().to_string(), &repos_dir).unwrap_err();
    assert!(err.to_string().contains("not a git repository"));
}

#[test]
fn checkout_project_dirs_are_discovered_after_clone() {
    let temp = TempDir::new().unwrap();
    let origins = temp.path().join("origins");
    let repos_dir = temp.path().join("repos");
    std::fs::create_dir_all(&repos_dir).unwrap();

    let alice = init_student_repo(&origins, "alice", "2026-03-01T10:00:00+00:00");
    let checkout = git::clone_or_pull(&alice.display().to_string(), &repos_dir).unwrap();

    let outcomes = runner::grade_checkout(&checkout).unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].dir, "1");
    // no manifest in the project dir: unknown kind scores 0/0
    assert_eq!(outcomes[0].outcome.passed, 0);
    assert_eq!(outcomes[0].outcome.total, 0);
}
