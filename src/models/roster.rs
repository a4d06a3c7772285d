//! Roster files: one tab-separated `name<TAB>repository URL` line per student.
//!
//! The roster file name (stem) doubles as the assignment key into the
//! deadline policy. Blank lines and `#` comments are skipped; malformed lines
//! are logged and skipped rather than failing the load.

use std::path::Path;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("roster path {path} has no file name")]
    BadPath { path: String },

    #[error("roster {path} contains no entries")]
    Empty { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Roster {
    /// Assignment key, taken from the roster file stem.
    pub assignment: String,
    /// Entries in file order.
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let assignment = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or_else(|| RosterError::BadPath {
                path: path.display().to_string(),
            })?;

        let content = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let entries = Self::parse_entries(&content, &assignment);
        if entries.is_empty() {
            return Err(RosterError::Empty {
                path: path.display().to_string(),
            });
        }

        Ok(Self {
            assignment,
            entries,
        })
    }

    fn parse_entries(content: &str, assignment: &str) -> Vec<RosterEntry> {
        let mut entries = Vec::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('\t') {
                Some((name, url)) if !name.trim().is_empty() && !url.trim().is_empty() => {
                    entries.push(RosterEntry {
                        name: name.trim().to_string(),
                        url: url.trim().to_string(),
                    });
                }
                _ => {
                    warn!(
                        assignment,
                        line = idx + 1,
                        "skipping malformed roster line (expected name<TAB>url)"
                    );
                }
            }
        }
        entries
    }
}
