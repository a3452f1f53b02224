//! Required-column validation for lesson tables.

use std::collections::HashMap;
use std::path::Path;

use discourse_core::error::{DashboardError, Result};
use discourse_core::models::REQUIRED_COLUMNS;

/// Position of each required column inside one source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub timestamp: usize,
    pub turn: usize,
    pub speaker: usize,
    pub sentence: usize,
    pub teacher_tag: usize,
    pub student_tag: usize,
    pub dialog_act: usize,
}

/// Check that `headers` contains every name in [`REQUIRED_COLUMNS`].
///
/// Column order and extra columns do not matter; for a repeated header the
/// first occurrence wins. Fails with [`DashboardError::Schema`] listing the
/// missing columns and the ones that were found.
pub fn validate_columns(file: &Path, headers: &[String]) -> Result<ColumnIndex> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (i, header) in headers.iter().enumerate() {
        positions.entry(header.as_str()).or_insert(i);
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !positions.contains_key(**col))
        .map(|col| col.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(DashboardError::Schema {
            file: file.to_path_buf(),
            missing,
            found: headers.to_vec(),
        });
    }

    let at = |name: &str| positions[name];
    Ok(ColumnIndex {
        timestamp: at("TimeStamp"),
        turn: at("Turn"),
        speaker: at("Speaker"),
        sentence: at("Sentence"),
        teacher_tag: at("Teacher_Tag"),
        student_tag: at("Student_Tag"),
        dialog_act: at("DialogAct"),
    })
}
