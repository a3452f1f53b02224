use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::models::Role;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Classroom discourse dashboard for annotated lesson transcripts
#[derive(Parser, Debug, Clone)]
#[command(
    name = "discourse-dashboard",
    about = "Classroom discourse dashboard for annotated lesson transcripts",
    version
)]
pub struct Settings {
    /// Directory containing one spreadsheet per lesson
    #[arg(long, env = "DISCOURSE_DATA_DIR", default_value = "DATA")]
    pub data_dir: PathBuf,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "summary", "json"])]
    pub view: String,

    /// Comma-separated lesson ids to include (all lessons when omitted,
    /// none when given empty)
    #[arg(long, value_delimiter = ',')]
    pub lessons: Option<Vec<String>>,

    /// Restrict turn counts, dialog acts and the preview to one role
    #[arg(long, value_parser = ["teacher", "student"])]
    pub role: Option<String>,

    /// Number of rows shown in the raw-data preview
    #[arg(long, default_value = "50")]
    pub preview_rows: usize,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(
        long,
        env = "DISCOURSE_LOG_LEVEL",
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Lesson ids requested with `--lessons`, trimmed and de-duplicated.
    ///
    /// `None` means "every lesson"; `--lessons ""` selects nothing.
    pub fn lesson_selection(&self) -> Option<BTreeSet<String>> {
        let lessons = self.lessons.as_ref()?;
        Some(
            lessons
                .iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
        )
    }

    /// Parsed `--role` restriction.
    pub fn role_restriction(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
