//! Lesson file discovery and loading.
//!
//! Finds per-lesson spreadsheets in a data directory and reads the first
//! worksheet of each into a [`SourceTable`] of optional string cells.
//! Spreadsheet formats go through `calamine`; `.csv` files through `csv`.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use discourse_core::error::{DashboardError, Result};
use tracing::{debug, warn};

/// File-name prefix of the lock files spreadsheet editors leave behind.
pub const LOCK_FILE_PREFIX: &str = "~$";

/// Extensions (lowercase) recognised as lesson files.
pub const LESSON_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "ods", "csv"];

// ── SourceTable ───────────────────────────────────────────────────────────────

/// Raw contents of one lesson file: a header row plus data rows.
///
/// A blank cell is `None`. Rows whose cells are all blank stay in the table
/// as all-missing rows; only blank padding after the last non-blank row is
/// trimmed.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// All-blank rows kept in `rows`.
    pub blank_rows: usize,
    /// All-blank rows trimmed from the end of the sheet.
    pub trailing_blank_rows: usize,
}

impl SourceTable {
    /// Build a table from in-memory rows, trimming trailing blank padding.
    pub fn from_rows(
        path: impl Into<PathBuf>,
        headers: Vec<String>,
        raw_rows: impl IntoIterator<Item = Vec<Option<String>>>,
    ) -> Self {
        let mut rows: Vec<Vec<Option<String>>> = raw_rows.into_iter().collect();
        let kept = rows
            .iter()
            .rposition(|row| !row.iter().all(is_blank))
            .map_or(0, |last| last + 1);
        let trailing_blank_rows = rows.len() - kept;
        rows.truncate(kept);
        let blank_rows = rows.iter().filter(|row| row.iter().all(is_blank)).count();

        SourceTable {
            path: path.into(),
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows,
            blank_rows,
            trailing_blank_rows,
        }
    }

    /// Cell at (`row`, `column`), `None` when blank or beyond the row's end.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }
}

fn is_blank(cell: &Option<String>) -> bool {
    cell.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true)
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find every lesson file directly inside `data_dir`, sorted by path.
///
/// Sub-directories are not searched. Editor lock files (`~$…`) and files with
/// other extensions are ignored.
pub fn find_lesson_files(data_dir: &Path) -> Result<Vec<PathBuf>> {
    if !data_dir.is_dir() {
        warn!("Data path does not exist: {}", data_dir.display());
        return Err(DashboardError::DataPathNotFound(data_dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_lesson_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    debug!("Discovered {} lesson files in {}", files.len(), data_dir.display());
    Ok(files)
}

/// `true` when `path` names a lesson file this reader can load.
pub fn is_lesson_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with(LOCK_FILE_PREFIX) {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| LESSON_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Derive the lesson identifier from a file path: its stem, trimmed.
pub fn lesson_id_from_path(path: &Path) -> Result<String> {
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_string())
        .unwrap_or_default();
    if id.is_empty() {
        return Err(DashboardError::InvalidLessonId(path.to_path_buf()));
    }
    Ok(id)
}

/// Read one lesson file into a [`SourceTable`].
pub fn read_source_table(path: &Path) -> Result<SourceTable> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let table = if is_csv {
        read_csv(path)?
    } else {
        read_workbook(path)?
    };

    debug!(
        "File {}: {} columns, {} rows ({} blank), {} trailing blank rows trimmed",
        path.display(),
        table.headers.len(),
        table.rows.len(),
        table.blank_rows,
        table.trailing_blank_rows,
    );
    Ok(table)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_csv(path: &Path) -> Result<SourceTable> {
    let csv_err = |source: csv::Error| DashboardError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(SourceTable::from_rows(path, headers, rows))
}

fn read_workbook(path: &Path) -> Result<SourceTable> {
    let spreadsheet_err = |message: String| DashboardError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_err("workbook has no worksheet".to_string()))?
        .map_err(|e| spreadsheet_err(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_to_string(cell).unwrap_or_default())
            .collect(),
        None => Vec::new(),
    };
    let data_rows = rows.map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

    Ok(SourceTable::from_rows(path, headers, data_rows))
}

/// Render a spreadsheet cell as text; blank and error cells become `None`.
pub(crate) fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(ndt) => format_datetime(ndt),
            None => format_float(dt.as_f64()),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Integral floats print without a fractional part (`3.0` → `"3"`).
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Time-only spreadsheet values sit on the 1899-12-31 epoch day.
fn format_datetime(ndt: NaiveDateTime) -> String {
    let time_only = NaiveDate::from_ymd_opt(1899, 12, 31)
        .map(|epoch| ndt.date() <= epoch)
        .unwrap_or(false);
    if time_only {
        ndt.format("%H:%M:%S").to_string()
    } else {
        ndt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
