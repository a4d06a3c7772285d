//! Deadline policy loading and commit-time classification
//!
//! A policy file is a YAML map keyed by assignment name, each entry carrying a
//! soft and a hard deadline in `YYYY-MM-DD HH:MM` form. Timestamps are
//! interpreted as UTC. The policy is loaded once at the start of a batch and
//! never mutated afterwards.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Timestamp format accepted in policy files.
const POLICY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read deadline policy {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse deadline policy {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("assignment '{assignment}': invalid {field} timestamp '{value}' (expected YYYY-MM-DD HH:MM)")]
    BadTimestamp {
        assignment: String,
        field: &'static str,
        value: String,
    },

    #[error("assignment '{assignment}': hard deadline precedes soft deadline")]
    InvertedDeadlines { assignment: String },
}

/// Soft/hard deadline pair for one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeadlineRecord {
    pub soft: DateTime<Utc>,
    pub hard: DateTime<Utc>,
}

impl DeadlineRecord {
    /// Classify a commit timestamp against this deadline pair.
    ///
    /// A missing commit timestamp must be handled by the caller; there is no
    /// status for "repository has no commits".
    pub fn classify(&self, commit: DateTime<Utc>) -> DeadlineStatus {
        if commit <= self.soft {
            DeadlineStatus::OnTimeSoft
        } else if commit <= self.hard {
            DeadlineStatus::OnTimeHard
        } else {
            DeadlineStatus::Late
        }
    }
}

/// Three-way submission status relative to a soft/hard deadline pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    /// Committed on or before the soft deadline: fully on time.
    OnTimeSoft,
    /// Committed after the soft but on or before the hard deadline.
    OnTimeHard,
    /// Committed after the hard deadline.
    Late,
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeadlineStatus::OnTimeSoft => "on_time_soft",
            DeadlineStatus::OnTimeHard => "on_time_hard",
            DeadlineStatus::Late => "late",
        };
        f.write_str(label)
    }
}

/// On-disk form of a policy entry, before timestamp validation.
#[derive(Debug, Deserialize)]
struct RawRecord {
    soft: String,
    hard: String,
}

/// Immutable map of assignment name to deadline record.
#[derive(Debug, Clone)]
pub struct DeadlinePolicy {
    records: HashMap<String, DeadlineRecord>,
}

impl DeadlinePolicy {
    /// Load and validate a policy file.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content).map_err(|err| match err {
            PolicyError::Yaml { source, .. } => PolicyError::Yaml {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parse policy YAML from a string.
    pub fn parse(content: &str) -> Result<Self, PolicyError> {
        let raw: HashMap<String, RawRecord> =
            serde_yaml::from_str(content).map_err(|source| PolicyError::Yaml {
                path: String::new(),
                source,
            })?;

        let mut records = HashMap::with_capacity(raw.len());
        for (assignment, entry) in raw {
            let soft = parse_policy_time(&entry.soft).ok_or_else(|| PolicyError::BadTimestamp {
                assignment: assignment.clone(),
                field: "soft",
                value: entry.soft.clone(),
            })?;
            let hard = parse_policy_time(&entry.hard).ok_or_else(|| PolicyError::BadTimestamp {
                assignment: assignment.clone(),
                field: "hard",
                value: entry.hard.clone(),
            })?;
            if hard < soft {
                return Err(PolicyError::InvertedDeadlines { assignment });
            }
            records.insert(assignment, DeadlineRecord { soft, hard });
        }

        Ok(Self { records })
    }

    pub fn get(&self, assignment: &str) -> Option<&DeadlineRecord> {
        self.records.get(assignment)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records sorted by assignment name.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&String, &DeadlineRecord)> {
        let mut entries: Vec<_> = self.records.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}

fn parse_policy_time(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), POLICY_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
