use anyhow::Result;
use clap::{Parser, Subcommand};
use rubric::commands::{clean, deadlines, grade, parse};
use rubric::logging;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "rubric")]
#[command(about = "Batch grading harness CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade assignment rosters: clone, run tests, classify deadlines, report
    Grade {
        /// Roster files, one per assignment (name<TAB>repo URL per line)
        #[arg(required = true)]
        rosters: Vec<PathBuf>,

        /// Deadline policy file (YAML: assignment -> soft/hard)
        #[arg(short, long)]
        deadlines: PathBuf,

        /// Directory for cloned repositories
        #[arg(long, default_value = "repos")]
        repos_dir: PathBuf,

        /// Directory for generated reports
        #[arg(long, default_value = "reports")]
        reports_dir: PathBuf,
    },

    /// Extract a pass/fail count from a captured test-runner log
    Parse {
        /// File holding the captured stdout+stderr of a test run
        file: PathBuf,
    },

    /// Validate and display a deadline policy file
    Deadlines {
        /// Deadline policy file
        file: PathBuf,

        /// Show only this assignment's record
        #[arg(short, long)]
        assignment: Option<String>,
    },

    /// Remove the clone cache
    Clean {
        /// Directory holding cloned repositories
        #[arg(long, default_value = "repos")]
        repos_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let guard = logging::init(&cli.log_level)?;
    debug!(log_file = %guard.path.display(), "logging initialized");

    match cli.command {
        Commands::Grade {
            rosters,
            deadlines,
            repos_dir,
            reports_dir,
        } => grade::execute(rosters, deadlines, repos_dir, reports_dir),
        Commands::Parse { file } => parse::execute(file),
        Commands::Deadlines { file, assignment } => deadlines::execute(file, assignment),
        Commands::Clean { repos_dir } => clean::execute(repos_dir),
    }
}
