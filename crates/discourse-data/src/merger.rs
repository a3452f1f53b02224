//! Combines per-lesson record sets into one ordered, immutable dataset.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use discourse_core::error::{DashboardError, Result};
use discourse_core::models::{LoadReport, NormalizationStats, UtteranceRecord};
use serde::Serialize;
use tracing::info;

use crate::normalizer::LessonRecords;

// ── MergedDataset ─────────────────────────────────────────────────────────────

/// Every utterance of every lesson, sorted by
/// `(lesson_id, turn_num with missing last, source_row_index)`.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Serialize)]
pub struct MergedDataset {
    records: Vec<UtteranceRecord>,
    /// lesson id → source file, one entry per merged file.
    lessons: BTreeMap<String, PathBuf>,
    data_dir: PathBuf,
    report: LoadReport,
}

impl MergedDataset {
    /// All records in merge order.
    pub fn records(&self) -> &[UtteranceRecord] {
        &self.records
    }

    /// Distinct lesson ids in lexicographic order, including lessons whose
    /// file had no data rows.
    pub fn lesson_ids(&self) -> Vec<String> {
        self.lessons.keys().cloned().collect()
    }

    /// `true` when `lesson_id` names a merged lesson.
    pub fn has_lesson(&self, lesson_id: &str) -> bool {
        self.lessons.contains_key(lesson_id)
    }

    /// Directory the lessons were loaded from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Merge normalized lessons into a [`MergedDataset`].
///
/// Fails with [`DashboardError::EmptyCorpus`] when `lessons` is empty and
/// with [`DashboardError::DuplicateLesson`] when two files share a lesson id.
/// The result does not depend on the order of `lessons`.
pub fn merge_lessons(data_dir: &Path, lessons: Vec<LessonRecords>) -> Result<MergedDataset> {
    if lessons.is_empty() {
        return Err(DashboardError::EmptyCorpus(data_dir.to_path_buf()));
    }

    let files_loaded = lessons.len();
    let mut sources: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut stats = NormalizationStats::default();
    let mut records: Vec<UtteranceRecord> =
        Vec::with_capacity(lessons.iter().map(|l| l.records.len()).sum());

    for lesson in lessons {
        if let Some(first) = sources.get(&lesson.lesson_id) {
            let (first, second) = ordered_pair(first, &lesson.source);
            return Err(DashboardError::DuplicateLesson {
                lesson_id: lesson.lesson_id,
                first,
                second,
            });
        }
        stats.absorb(&lesson.stats);
        sources.insert(lesson.lesson_id, lesson.source);
        records.extend(lesson.records);
    }

    records.sort_by(|a, b| a.merge_order(b));

    info!(
        "Merged {} records from {} lessons in {}",
        records.len(),
        files_loaded,
        data_dir.display()
    );

    Ok(MergedDataset {
        records,
        lessons: sources,
        data_dir: data_dir.to_path_buf(),
        report: LoadReport {
            built_at: Utc::now(),
            files_loaded,
            stats,
        },
    })
}

/// Report duplicate paths in a fixed order regardless of discovery order.
fn ordered_pair(a: &Path, b: &Path) -> (PathBuf, PathBuf) {
    if a <= b {
        (a.to_path_buf(), b.to_path_buf())
    } else {
        (b.to_path_buf(), a.to_path_buf())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use discourse_core::models::Role;

    fn record(lesson: &str, turn: &str, row: usize) -> UtteranceRecord {
        let turn_num = turn.trim().parse::<f64>().ok();
        UtteranceRecord {
            lesson_id: lesson.to_string(),
            timestamp: None,
            turn: Some(turn.to_string()),
            turn_num,
            speaker: "T".to_string(),
            role: Role::Teacher,
            sentence: format!("{lesson}-{turn}"),
            teacher_tag: None,
            student_tag: None,
            dialog_act: None,
            source_row_index: row,
        }
    }

    fn lesson(id: &str, turns: &[&str]) -> LessonRecords {
        LessonRecords {
            lesson_id: id.to_string(),
            source: PathBuf::from(format!("/data/{id}.csv")),
            records: turns
                .iter()
                .enumerate()
                .map(|(row, turn)| record(id, turn, row))
                .collect(),
            stats: NormalizationStats {
                records: turns.len(),
                ..Default::default()
            },
        }
    }

    fn order(dataset: &MergedDataset) -> Vec<String> {
        dataset.records().iter().map(|r| r.sentence.clone()).collect()
    }

    #[test]
    fn test_merge_sorts_by_lesson_then_turn() {
        let dataset = merge_lessons(
            Path::new("/data"),
            vec![lesson("L2", &["3", "1", "2"]), lesson("L1", &["5", "4"])],
        )
        .unwrap();

        assert_eq!(
            order(&dataset),
            vec!["L1-4", "L1-5", "L2-1", "L2-2", "L2-3"]
        );
    }

    #[test]
    fn test_merge_unparsable_turns_last_within_lesson() {
        let dataset = merge_lessons(
            Path::new("/data"),
            vec![lesson("L1", &["oops", "2", "?", "1"]), lesson("L0", &["x"])],
        )
        .unwrap();

        assert_eq!(
            order(&dataset),
            vec!["L0-x", "L1-1", "L1-2", "L1-oops", "L1-?"]
        );
    }

    #[test]
    fn test_merge_equal_turns_keep_row_order() {
        let dataset =
            merge_lessons(Path::new("/data"), vec![lesson("L1", &["1", "1", "1"])]).unwrap();
        let rows: Vec<usize> = dataset.records().iter().map(|r| r.source_row_index).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_merge_independent_of_discovery_order() {
        let a = merge_lessons(
            Path::new("/data"),
            vec![lesson("L2", &["3", "1"]), lesson("L1", &["x", "2"])],
        )
        .unwrap();
        let b = merge_lessons(
            Path::new("/data"),
            vec![lesson("L1", &["x", "2"]), lesson("L2", &["3", "1"])],
        )
        .unwrap();
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn test_merge_preserves_every_record() {
        let dataset = merge_lessons(
            Path::new("/data"),
            vec![lesson("A", &["1", "2"]), lesson("B", &[]), lesson("C", &["z"])],
        )
        .unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.report().stats.records, 3);
        assert_eq!(dataset.report().files_loaded, 3);
    }

    #[test]
    fn test_merge_lists_empty_lessons() {
        let dataset =
            merge_lessons(Path::new("/data"), vec![lesson("B", &[]), lesson("A", &["1"])])
                .unwrap();
        assert_eq!(dataset.lesson_ids(), vec!["A", "B"]);
        assert!(dataset.has_lesson("B"));
    }

    #[test]
    fn test_merge_empty_corpus_error() {
        let err = merge_lessons(Path::new("/nothing/here"), Vec::new()).unwrap_err();
        match err {
            DashboardError::EmptyCorpus(path) => assert_eq!(path, Path::new("/nothing/here")),
            other => panic!("expected empty corpus, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_duplicate_lesson_rejected() {
        let mut second = lesson("L1", &["1"]);
        second.source = PathBuf::from("/data/L1.xlsx");
        let err = merge_lessons(Path::new("/data"), vec![second, lesson("L1", &["2"])]).unwrap_err();
        match err {
            DashboardError::DuplicateLesson {
                lesson_id,
                first,
                second,
            } => {
                assert_eq!(lesson_id, "L1");
                assert_eq!(first, PathBuf::from("/data/L1.csv"));
                assert_eq!(second, PathBuf::from("/data/L1.xlsx"));
            }
            other => panic!("expected duplicate lesson, got {other:?}"),
        }
    }
}
