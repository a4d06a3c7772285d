//! Clean command: remove the clone cache.
//! Usage: rubric clean [--repos-dir DIR]

use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn execute(repos_dir: PathBuf) -> Result<()> {
    if !repos_dir.exists() {
        println!("Nothing to clean.");
        return Ok(());
    }

    std::fs::remove_dir_all(&repos_dir)
        .with_context(|| format!("failed to remove {}", repos_dir.display()))?;
    println!("Removed {}", repos_dir.display());
    Ok(())
}
