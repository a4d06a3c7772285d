//! Git plumbing: thin command wrappers, clone-or-pull, and commit timestamps.
//!
//! Every operation shells out to the `git` binary with captured output.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info, warn};

/// Run a git command and return the raw Output.
///
/// Wraps `Command::new("git")` with `current_dir` and error context. Use this
/// when you need access to both stdout and stderr, or custom error handling.
pub fn run_git(args: &[&str], cwd: &Path) -> Result<Output> {
    Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("failed to execute: git {}", args.join(" ")))
}

/// Run a git command, check for success, and return stdout as a trimmed String.
///
/// On failure, bails with the stderr content.
pub fn run_git_checked(args: &[&str], cwd: &Path) -> Result<String> {
    let output = run_git(args, cwd)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let cmd = args.first().unwrap_or(&"");
        bail!("git {cmd} failed: {}", stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a git command and return true if exit code is 0.
///
/// Silently swallows errors. Use for existence checks.
pub fn run_git_bool(args: &[&str], cwd: &Path) -> bool {
    run_git(args, cwd)
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Derive the unique checkout directory name `<user>_<repo>` from a URL.
///
/// Takes the last two path segments, stripping a `.git` suffix from the repo
/// segment and anything up to a `:` (scp-style host prefix) from the user
/// segment.
pub fn checkout_name(url: &str) -> Result<String> {
    let trimmed = url.trim_end_matches('/');
    let mut segments = trimmed.rsplit('/').filter(|s| !s.is_empty());
    let repo = segments
        .next()
        .map(|s| s.trim_end_matches(".git"))
        .filter(|s| !s.is_empty())
        .with_context(|| format!("cannot derive repository name from URL '{url}'"))?;
    let user = segments
        .next()
        .map(|s| s.rsplit(':').next().unwrap_or(s))
        .filter(|s| !s.is_empty())
        .with_context(|| format!("cannot derive user name from URL '{url}'"))?;
    Ok(format!("{user}_{repo}"))
}

/// Materialize a repository under `repos_dir`, cloning on first contact and
/// pulling on later runs.
///
/// An existing directory that is not a git repository is an error: grading
/// it would silently produce garbage. A failed pull is downgraded to a
/// warning: the existing checkout is still usable for grading, just
/// possibly stale.
pub fn clone_or_pull(url: &str, repos_dir: &Path) -> Result<PathBuf> {
    let name = checkout_name(url)?;
    let checkout = repos_dir.join(&name);

    if checkout.exists() {
        // --resolve-git-dir does not walk up to an enclosing repository the
        // way a bare rev-parse would
        if !run_git_bool(&["rev-parse", "--resolve-git-dir", ".git"], &checkout) {
            bail!(
                "checkout {} exists but is not a git repository",
                checkout.display()
            );
        }
        debug!(%url, checkout = %checkout.display(), "checkout exists, pulling");
        match run_git(&["pull", "--ff-only"], &checkout) {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(%url, "pull failed, grading existing checkout: {}", stderr.trim());
            }
            Err(err) => {
                warn!(%url, %err, "pull failed, grading existing checkout");
            }
        }
        return Ok(checkout);
    }

    info!(%url, checkout = %checkout.display(), "cloning");
    run_git_checked(&["clone", url, &name], repos_dir)
        .with_context(|| format!("failed to clone {url}"))?;
    Ok(checkout)
}

/// Timestamp of the most recent commit on the checked-out branch, or `None`
/// for a repository with no commits yet.
pub fn last_commit_time(checkout: &Path) -> Result<Option<DateTime<Utc>>> {
    let output = run_git(&["log", "-1", "--format=%cI"], checkout)?;
    if !output.status.success() {
        // `git log` exits non-zero on an unborn branch.
        debug!(checkout = %checkout.display(), "git log failed, treating as no commits");
        return Ok(None);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stamp = stdout.trim();
    if stamp.is_empty() {
        return Ok(None);
    }

    let parsed = DateTime::parse_from_rfc3339(stamp)
        .with_context(|| format!("unparseable commit timestamp '{stamp}'"))?;
    Ok(Some(parsed.with_timezone(&Utc)))
}
