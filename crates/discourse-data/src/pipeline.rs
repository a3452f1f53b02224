//! Load pipeline: discover → read → validate → normalize → merge.

use std::path::{Path, PathBuf};
use std::time::Instant;

use discourse_core::error::Result;
use tracing::{info, warn};

use crate::merger::{merge_lessons, MergedDataset};
use crate::normalizer::{normalize_table, LessonRecords};
use crate::reader::{find_lesson_files, lesson_id_from_path, read_source_table};
use crate::schema::validate_columns;

/// Build the merged dataset from every lesson file in `data_dir`.
///
/// Any failing file aborts the whole load; no partial dataset is returned.
pub fn load_dataset(data_dir: &Path) -> Result<MergedDataset> {
    let files = find_lesson_files(data_dir)?;
    load_dataset_from_files(data_dir, &files)
}

/// Build the merged dataset from an already discovered file list.
pub fn load_dataset_from_files(data_dir: &Path, files: &[PathBuf]) -> Result<MergedDataset> {
    let started = Instant::now();

    // ── Step 1: Validate and normalize each file ──────────────────────────────
    let lessons = files
        .iter()
        .map(|path| load_lesson(path))
        .collect::<Result<Vec<LessonRecords>>>()?;

    // ── Step 2: Merge ─────────────────────────────────────────────────────────
    let dataset = merge_lessons(data_dir, lessons)?;

    let stats = &dataset.report().stats;
    if stats.unparsable_turns > 0 {
        warn!(
            "{} turn label(s) could not be parsed and sort last within their lesson",
            stats.unparsable_turns
        );
    }
    if stats.empty_speakers > 0 {
        warn!("{} row(s) have an empty speaker", stats.empty_speakers);
    }

    info!(
        "Loaded {} lessons ({} records) in {:.3}s",
        dataset.report().files_loaded,
        dataset.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(dataset)
}

/// Distinct lesson ids of `dataset`, sorted.
pub fn list_lessons(dataset: &MergedDataset) -> Vec<String> {
    dataset.lesson_ids()
}

fn load_lesson(path: &Path) -> Result<LessonRecords> {
    let lesson_id = lesson_id_from_path(path)?;
    let table = read_source_table(path)?;
    let columns = validate_columns(path, &table.headers)?;
    Ok(normalize_table(&table, &columns, &lesson_id))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
