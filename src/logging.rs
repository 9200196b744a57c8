use std::fs;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "info,match_result_terminal=debug";
const LOG_FILE: &str = "match_result_terminal.log";

pub fn log_dir() -> PathBuf {
    std::env::var("MATCH_LOG_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// File-only logging for the TUI, which owns the terminal. Returns the log file directory,
/// or `None` when the directory is not writable and logging stays off.
pub fn init_file_logging() -> Option<PathBuf> {
    let dir = log_dir();
    if !dir_is_writable(&dir) {
        return None;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Flushes on drop; the process is the guard's lifetime.
    Box::leak(Box::new(guard));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok();
    installed.then_some(dir)
}

/// Minimal stderr logging for one-shot commands.
pub fn init_stderr_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dir_is_writable(dir: &Path) -> bool {
    // `rolling::daily` panics if it cannot create its first file.
    if fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".write_test");
    match fs::OpenOptions::new().create(true).append(true).open(&probe) {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}
