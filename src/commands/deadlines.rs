//! Deadlines command: validate a policy file and display its records.
//! Usage: rubric deadlines <FILE> [--assignment KEY]

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::models::DeadlinePolicy;

pub fn execute(file: PathBuf, assignment: Option<String>) -> Result<()> {
    let policy = DeadlinePolicy::load(&file)?;

    if let Some(key) = assignment {
        let Some(record) = policy.get(&key) else {
            bail!("no deadline entry for assignment '{key}'");
        };
        println!("{}", key.bold());
        println!("  soft: {}", record.soft.format("%Y-%m-%d %H:%M"));
        println!("  hard: {}", record.hard.format("%Y-%m-%d %H:%M"));
        return Ok(());
    }

    if policy.is_empty() {
        println!("Policy file is valid but contains no assignments.");
        return Ok(());
    }

    println!("{}", "Deadline policy".bold().blue());
    println!("{}", "=".repeat(50));
    for (key, record) in policy.iter_sorted() {
        println!(
            "  {:<20} soft {}  hard {}",
            key,
            record.soft.format("%Y-%m-%d %H:%M"),
            record.hard.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
