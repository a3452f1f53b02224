use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the per-user directory under `$HOME`.
pub const APP_DIR_NAME: &str = ".discourse-dashboard";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.discourse-dashboard/logs/` exists and return the app directory.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let app_dir = home.join(APP_DIR_NAME);
    fs::create_dir_all(app_dir.join("logs"))
        .with_context(|| format!("Failed to create {}", app_dir.display()))?;
    Ok(app_dir)
}

/// Default log file used by the interactive dashboard.
pub fn default_log_file() -> anyhow::Result<PathBuf> {
    Ok(ensure_directories()?.join("logs").join("dashboard.log"))
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to a file; used while the TUI owns the terminal.
    File(PathBuf),
}

/// Map `DEBUG`/`INFO`/`WARNING`/`ERROR`/`CRITICAL` level names to a tracing
/// filter directive.
///
/// Unknown names fall back to `"info"`.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
pub fn setup_logging(log_level: &str, target: &LogTarget) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match target {
        LogTarget::File(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        LogTarget::Stderr => None,
    };
    let stderr_layer = match target {
        LogTarget::Stderr => Some(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        ),
        LogTarget::File(_) => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
