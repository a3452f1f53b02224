use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the discourse dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A lesson file lacks one or more required columns.
    #[error(
        "Schema error in {file}: missing column(s) [{}]; found [{}]",
        .missing.join(", "),
        .found.join(", ")
    )]
    Schema {
        file: PathBuf,
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// No lesson files could be discovered in the data directory.
    #[error("No lesson files found in {0}")]
    EmptyCorpus(PathBuf),

    /// The expected data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A workbook could not be opened or has no readable worksheet.
    #[error("Failed to read spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// A CSV lesson file is malformed.
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Two files map to the same lesson identifier.
    #[error("Duplicate lesson id '{lesson_id}': {first} and {second}")]
    DuplicateLesson {
        lesson_id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A file name yields an empty lesson identifier once trimmed.
    #[error("Cannot derive a lesson id from {0}")]
    InvalidLessonId(PathBuf),

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The terminal could not be set up, drawn to, read from or restored.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_schema_names_file_and_columns() {
        let err = DashboardError::Schema {
            file: PathBuf::from("/data/lesson1.xlsx"),
            missing: vec!["DialogAct".to_string(), "Turn".to_string()],
            found: vec!["Speaker".to_string(), "Sentence".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/lesson1.xlsx"));
        assert!(msg.contains("missing column(s) [DialogAct, Turn]"));
        assert!(msg.contains("found [Speaker, Sentence]"));
    }

    #[test]
    fn test_error_display_empty_corpus() {
        let err = DashboardError::EmptyCorpus(PathBuf::from("/empty/dir"));
        assert_eq!(err.to_string(), "No lesson files found in /empty/dir");
    }

    #[test]
    fn test_error_display_data_path_not_found() {
        let err = DashboardError::DataPathNotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "Data path not found: /missing/dir");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/some/lesson.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/lesson.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_duplicate_lesson() {
        let err = DashboardError::DuplicateLesson {
            lesson_id: "L1".to_string(),
            first: PathBuf::from("L1.csv"),
            second: PathBuf::from("L1.xlsx"),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate lesson id 'L1': L1.csv and L1.xlsx"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = DashboardError::Config("unknown lesson 'L9'".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown lesson 'L9'");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(matches!(err, DashboardError::JsonParse(_)));
        assert!(err.to_string().starts_with("Failed to serialize JSON"));
    }

    #[test]
    fn test_error_display_terminal() {
        let err = DashboardError::Terminal("raw mode unavailable".to_string());
        assert_eq!(err.to_string(), "Terminal error: raw mode unavailable");
    }
}
