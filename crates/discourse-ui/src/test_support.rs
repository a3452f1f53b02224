//! Shared fixtures for the UI tests.

use std::path::{Path, PathBuf};

use discourse_core::models::{NormalizationStats, UtteranceRecord};
use discourse_core::roles::classify_speaker;
use discourse_data::merger::{merge_lessons, MergedDataset};
use discourse_data::normalizer::LessonRecords;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

fn utterance(row: usize, speaker: &str, tag: Option<&str>, act: Option<&str>) -> UtteranceRecord {
    let role = classify_speaker(Some(speaker));
    UtteranceRecord {
        lesson_id: "A".to_string(),
        timestamp: Some(format!("00:00:{:02}", row * 5)),
        turn: Some((row + 1).to_string()),
        turn_num: Some((row + 1) as f64),
        speaker: speaker.to_string(),
        role,
        sentence: format!("utterance {row}"),
        teacher_tag: tag.map(str::to_string),
        student_tag: (speaker != "T").then(|| "Answer".to_string()),
        dialog_act: act.map(str::to_string),
        source_row_index: row,
    }
}

/// Lesson A: three teacher turns tagged Q, Q, S against ask, ask, state and
/// two student turns. Lesson B: header only.
pub fn sample_dataset() -> MergedDataset {
    let a = vec![
        utterance(0, "T", Some("Q"), Some("ask")),
        utterance(1, "Student 1", None, None),
        utterance(2, "T", Some("Q"), Some("ask")),
        utterance(3, "Student 2", None, None),
        utterance(4, "T", Some("S"), Some("state")),
    ];
    let lessons = vec![
        LessonRecords {
            lesson_id: "A".to_string(),
            source: PathBuf::from("/data/A.xlsx"),
            stats: NormalizationStats {
                records: a.len(),
                ..Default::default()
            },
            records: a,
        },
        LessonRecords {
            lesson_id: "B".to_string(),
            source: PathBuf::from("/data/B.xlsx"),
            records: Vec::new(),
            stats: NormalizationStats::default(),
        },
    ];
    merge_lessons(Path::new("/data"), lessons).expect("sample dataset")
}

/// Every symbol of the test terminal's buffer, row after row.
pub fn screen(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}
