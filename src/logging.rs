//! Logging setup: stderr plus a timestamped file under `logs/`.
//!
//! Initialized exactly once at program entry; the returned guard flushes the
//! log file when dropped at exit. `RUST_LOG` overrides the CLI level when
//! set.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directory for log files, relative to the working directory.
const LOG_DIR: &str = "logs";

/// Keeps the log file handle alive and flushes it on drop.
pub struct LogGuard {
    file: Arc<File>,
    pub path: PathBuf,
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        use std::io::Write;
        let _ = (&*self.file).flush();
    }
}

/// Install the global subscriber: a stderr layer and a file layer writing
/// `logs/rubric_<YYYYmmdd_HHMMSS>.log`.
pub fn init(level: &str) -> Result<LogGuard> {
    std::fs::create_dir_all(LOG_DIR)
        .with_context(|| format!("failed to create {LOG_DIR}/ directory"))?;

    let path = PathBuf::from(LOG_DIR).join(format!(
        "rubric_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let file = Arc::new(
        File::create(&path)
            .with_context(|| format!("failed to create log file {}", path.display()))?,
    );

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(fmt::layer().with_ansi(false).with_writer(Arc::clone(&file)))
        .init();

    Ok(LogGuard { file, path })
}
