//! Cell cleaning and typing for one validated lesson table.

use discourse_core::models::{NormalizationStats, UtteranceRecord};
use discourse_core::roles::classify_speaker;
use tracing::debug;

use crate::reader::SourceTable;
use crate::schema::ColumnIndex;

/// Textual artifacts that stand for a missing tag.
const MISSING_ARTIFACTS: [&str; 2] = ["nan", "NaN"];

/// Records produced from one lesson file.
#[derive(Debug, Clone)]
pub struct LessonRecords {
    pub lesson_id: String,
    pub source: std::path::PathBuf,
    pub records: Vec<UtteranceRecord>,
    pub stats: NormalizationStats,
}

/// Normalize every row of `table` into an [`UtteranceRecord`].
///
/// Never fails: malformed values become missing markers and are counted in
/// the returned stats.
pub fn normalize_table(table: &SourceTable, columns: &ColumnIndex, lesson_id: &str) -> LessonRecords {
    let lesson_id = lesson_id.trim().to_string();
    let mut stats = NormalizationStats {
        blank_rows: table.blank_rows,
        ..Default::default()
    };

    let records: Vec<UtteranceRecord> = (0..table.rows.len())
        .map(|row| {
            let turn = table.cell(row, columns.turn).map(str::to_string);
            let turn_num = parse_turn(turn.as_deref());
            let speaker = clean_text(table.cell(row, columns.speaker));
            let record = UtteranceRecord {
                lesson_id: lesson_id.clone(),
                timestamp: table.cell(row, columns.timestamp).map(str::to_string),
                turn_num,
                turn,
                role: classify_speaker(Some(&speaker)),
                speaker,
                sentence: clean_text(table.cell(row, columns.sentence)),
                teacher_tag: normalize_tag(table.cell(row, columns.teacher_tag)),
                student_tag: normalize_tag(table.cell(row, columns.student_tag)),
                dialog_act: normalize_tag(table.cell(row, columns.dialog_act)),
                source_row_index: row,
            };
            count_anomalies(&mut stats, &record);
            record
        })
        .collect();

    debug!(
        "Lesson {}: {} records, {} unparsable turns, {} missing dialog acts",
        lesson_id, stats.records, stats.unparsable_turns, stats.missing_dialog_acts,
    );

    LessonRecords {
        lesson_id,
        source: table.path.clone(),
        records,
        stats,
    }
}

/// Trim a free-text cell; a blank cell becomes the empty string.
pub fn clean_text(cell: Option<&str>) -> String {
    cell.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Trim a tag cell, collapsing blanks and `nan`/`NaN` artifacts to `None`.
pub fn normalize_tag(cell: Option<&str>) -> Option<String> {
    let trimmed = cell?.trim();
    if trimmed.is_empty() || MISSING_ARTIFACTS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a turn label as a finite number; anything else is `None`.
pub fn parse_turn(turn: Option<&str>) -> Option<f64> {
    turn?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn count_anomalies(stats: &mut NormalizationStats, record: &UtteranceRecord) {
    stats.records += 1;
    if record.turn_num.is_none() {
        stats.unparsable_turns += 1;
    }
    if record.speaker.is_empty() {
        stats.empty_speakers += 1;
    }
    if record.teacher_tag.is_none() {
        stats.missing_teacher_tags += 1;
    }
    if record.student_tag.is_none() {
        stats.missing_student_tags += 1;
    }
    if record.dialog_act.is_none() {
        stats.missing_dialog_acts += 1;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use discourse_core::models::{Role, REQUIRED_COLUMNS};

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect()
    }

    fn table(rows: Vec<Vec<Option<String>>>) -> SourceTable {
        SourceTable::from_rows(
            "L1.csv",
            REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            rows,
        )
    }

    fn index() -> ColumnIndex {
        ColumnIndex {
            timestamp: 0,
            turn: 1,
            speaker: 2,
            sentence: 3,
            teacher_tag: 4,
            student_tag: 5,
            dialog_act: 6,
        }
    }

    // ── normalize_tag ─────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_tag_missing_forms_collapse() {
        assert_eq!(normalize_tag(None), None);
        assert_eq!(normalize_tag(Some("")), None);
        assert_eq!(normalize_tag(Some("   ")), None);
        assert_eq!(normalize_tag(Some("nan")), None);
        assert_eq!(normalize_tag(Some("NaN")), None);
        assert_eq!(normalize_tag(Some(" nan ")), None);
    }

    #[test]
    fn test_normalize_tag_keeps_real_values_trimmed() {
        assert_eq!(normalize_tag(Some(" Q ")), Some("Q".to_string()));
        assert_eq!(normalize_tag(Some("NAN")), Some("NAN".to_string()));
        assert_eq!(normalize_tag(Some("banana")), Some("banana".to_string()));
    }

    // ── parse_turn ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_turn_numeric_forms() {
        assert_eq!(parse_turn(Some("3")), Some(3.0));
        assert_eq!(parse_turn(Some(" 12 ")), Some(12.0));
        assert_eq!(parse_turn(Some("4.5")), Some(4.5));
        assert_eq!(parse_turn(Some("1e1")), Some(10.0));
        assert_eq!(parse_turn(Some("-2")), Some(-2.0));
    }

    #[test]
    fn test_parse_turn_unparsable_is_none() {
        assert_eq!(parse_turn(None), None);
        assert_eq!(parse_turn(Some("")), None);
        assert_eq!(parse_turn(Some("12a")), None);
        assert_eq!(parse_turn(Some("NaN")), None);
        assert_eq!(parse_turn(Some("inf")), None);
    }

    // ── clean_text ────────────────────────────────────────────────────────────

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some("  hello there ")), "hello there");
        assert_eq!(clean_text(None), "");
    }

    // ── normalize_table ───────────────────────────────────────────────────────

    #[test]
    fn test_normalize_table_builds_records() {
        let t = table(vec![
            cells(&["00:01", "1", " T ", " What is 2+2? ", "Q", "nan", "ask"]),
            cells(&["00:02", "x", "Student A", "Four", "", "Answer", "state"]),
        ]);

        let out = normalize_table(&t, &index(), " L1 ");
        assert_eq!(out.lesson_id, "L1");
        assert_eq!(out.records.len(), 2);

        let first = &out.records[0];
        assert_eq!(first.lesson_id, "L1");
        assert_eq!(first.timestamp.as_deref(), Some("00:01"));
        assert_eq!(first.turn_num, Some(1.0));
        assert_eq!(first.speaker, "T");
        assert_eq!(first.role, Role::Teacher);
        assert_eq!(first.sentence, "What is 2+2?");
        assert_eq!(first.teacher_tag.as_deref(), Some("Q"));
        assert_eq!(first.student_tag, None);
        assert_eq!(first.source_row_index, 0);

        let second = &out.records[1];
        assert_eq!(second.turn.as_deref(), Some("x"));
        assert_eq!(second.turn_num, None);
        assert_eq!(second.role, Role::Student);
        assert_eq!(second.teacher_tag, None);
        assert_eq!(second.source_row_index, 1);
    }

    #[test]
    fn test_normalize_table_keeps_rows_with_bad_values() {
        let t = table(vec![cells(&["", "??", "", "", "", "", ""])]);
        let out = normalize_table(&t, &index(), "L1");
        assert_eq!(out.records.len(), 1);
        let record = &out.records[0];
        assert_eq!(record.speaker, "");
        assert_eq!(record.role, Role::Student);
        assert_eq!(out.stats.unparsable_turns, 1);
        assert_eq!(out.stats.empty_speakers, 1);
        assert_eq!(out.stats.missing_dialog_acts, 1);
    }

    #[test]
    fn test_normalize_table_blank_row_becomes_student_record() {
        let t = table(vec![
            cells(&["", "1", "T", "a", "", "", ""]),
            cells(&["", "", "", "", "", "", ""]),
            cells(&["", "2", "S", "b", "", "", ""]),
        ]);
        let out = normalize_table(&t, &index(), "L1");
        let positions: Vec<usize> = out.records.iter().map(|r| r.source_row_index).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(out.stats.blank_rows, 1);
        assert_eq!(out.stats.records, 3);

        let blank = &out.records[1];
        assert_eq!(blank.speaker, "");
        assert_eq!(blank.role, Role::Student);
        assert_eq!(blank.turn_num, None);
        assert_eq!(blank.teacher_tag, None);
        assert_eq!(blank.student_tag, None);
        assert_eq!(blank.dialog_act, None);
    }

    #[test]
    fn test_normalize_table_short_row_fills_missing() {
        let t = table(vec![vec![Some("00:01".to_string()), Some("1".to_string())]]);
        let out = normalize_table(&t, &index(), "L1");
        let record = &out.records[0];
        assert_eq!(record.speaker, "");
        assert_eq!(record.dialog_act, None);
    }

    #[test]
    fn test_normalize_table_stats_totals() {
        let t = table(vec![
            cells(&["", "1", "T", "a", "Q", "", "ask"]),
            cells(&["", "2", "S", "b", "", "Answer", ""]),
        ]);
        let out = normalize_table(&t, &index(), "L1");
        assert_eq!(out.stats.records, 2);
        assert_eq!(out.stats.missing_teacher_tags, 1);
        assert_eq!(out.stats.missing_student_tags, 1);
        assert_eq!(out.stats.missing_dialog_acts, 1);
        assert_eq!(out.stats.unparsable_turns, 0);
    }
}
