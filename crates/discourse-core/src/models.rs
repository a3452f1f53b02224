use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Column headers every lesson file must expose.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "TimeStamp",
    "Turn",
    "Speaker",
    "Sentence",
    "Teacher_Tag",
    "Student_Tag",
    "DialogAct",
];

/// Coarse speaker category derived from the raw speaker label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    /// Both roles in display order.
    pub const ALL: [Role; 2] = [Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// One utterance of a lesson transcript after normalization.
///
/// Tag and act fields use `None` as the single missing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtteranceRecord {
    /// Trimmed stem of the source file name.
    pub lesson_id: String,
    /// Opaque time value copied from the `TimeStamp` column.
    pub timestamp: Option<String>,
    /// Raw `Turn` cell.
    pub turn: Option<String>,
    /// Numeric parse of `turn`, `None` when unparsable.
    pub turn_num: Option<f64>,
    /// Trimmed speaker label, empty when the cell was blank.
    pub speaker: String,
    pub role: Role,
    /// Trimmed utterance text, empty when the cell was blank.
    pub sentence: String,
    pub teacher_tag: Option<String>,
    pub student_tag: Option<String>,
    pub dialog_act: Option<String>,
    /// 0-based data-row position inside the source file.
    pub source_row_index: usize,
}

impl UtteranceRecord {
    /// Total order used for the merged dataset:
    /// `(lesson_id, turn_num with missing last, source_row_index)`.
    pub fn merge_order(&self, other: &Self) -> Ordering {
        self.lesson_id
            .cmp(&other.lesson_id)
            .then_with(|| compare_turns(self.turn_num, other.turn_num))
            .then_with(|| self.source_row_index.cmp(&other.source_row_index))
    }
}

/// Ascending numeric order with missing turns after every parsed one.
pub fn compare_turns(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Value-level anomalies counted while normalizing one or more files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub records: usize,
    /// Rows with every cell blank, kept as all-missing student records.
    pub blank_rows: usize,
    pub unparsable_turns: usize,
    pub empty_speakers: usize,
    pub missing_teacher_tags: usize,
    pub missing_student_tags: usize,
    pub missing_dialog_acts: usize,
}

impl NormalizationStats {
    /// Add another file's counts to these totals.
    pub fn absorb(&mut self, other: &NormalizationStats) {
        self.records += other.records;
        self.blank_rows += other.blank_rows;
        self.unparsable_turns += other.unparsable_turns;
        self.empty_speakers += other.empty_speakers;
        self.missing_teacher_tags += other.missing_teacher_tags;
        self.missing_student_tags += other.missing_student_tags;
        self.missing_dialog_acts += other.missing_dialog_acts;
    }
}

/// Summary of one dataset build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    /// UTC time the dataset was built.
    pub built_at: DateTime<Utc>,
    /// Number of lesson files merged.
    pub files_loaded: usize,
    /// Totals across every file.
    pub stats: NormalizationStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lesson: &str, turn_num: Option<f64>, row: usize) -> UtteranceRecord {
        UtteranceRecord {
            lesson_id: lesson.to_string(),
            timestamp: None,
            turn: turn_num.map(|t| t.to_string()),
            turn_num,
            speaker: "T".to_string(),
            role: Role::Teacher,
            sentence: String::new(),
            teacher_tag: None,
            student_tag: None,
            dialog_act: None,
            source_row_index: row,
        }
    }

    // ── Role ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_role_display_and_parse() {
        assert_eq!(Role::Teacher.to_string(), "teacher");
        assert_eq!(Role::Student.to_string(), "student");
        assert_eq!("Teacher".parse::<Role>(), Ok(Role::Teacher));
        assert_eq!(" student ".parse::<Role>(), Ok(Role::Student));
        assert!("parent".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&Role::Teacher).unwrap();
        assert_eq!(json, "\"teacher\"");
        let back: Role = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(back, Role::Student);
    }

    #[test]
    fn test_role_ordering_teacher_first() {
        assert!(Role::Teacher < Role::Student);
    }

    // ── Ordering ──────────────────────────────────────────────────────────────

    #[test]
    fn test_compare_turns_missing_last() {
        assert_eq!(compare_turns(Some(1.0), Some(2.0)), Ordering::Less);
        assert_eq!(compare_turns(Some(99.0), None), Ordering::Less);
        assert_eq!(compare_turns(None, Some(-5.0)), Ordering::Greater);
        assert_eq!(compare_turns(None, None), Ordering::Equal);
    }

    #[test]
    fn test_merge_order_lesson_then_turn_then_row() {
        let a = record("L1", Some(5.0), 0);
        let b = record("L2", Some(1.0), 0);
        assert_eq!(a.merge_order(&b), Ordering::Less);

        let c = record("L1", Some(4.0), 1);
        assert_eq!(a.merge_order(&c), Ordering::Greater);

        let d = record("L1", None, 0);
        let e = record("L1", None, 3);
        assert_eq!(d.merge_order(&e), Ordering::Less);
        assert_eq!(a.merge_order(&d), Ordering::Less);
    }

    // ── NormalizationStats ────────────────────────────────────────────────────

    #[test]
    fn test_stats_absorb() {
        let mut total = NormalizationStats::default();
        let file = NormalizationStats {
            records: 4,
            blank_rows: 1,
            unparsable_turns: 2,
            empty_speakers: 0,
            missing_teacher_tags: 3,
            missing_student_tags: 1,
            missing_dialog_acts: 1,
        };
        total.absorb(&file);
        total.absorb(&file);
        assert_eq!(total.records, 8);
        assert_eq!(total.unparsable_turns, 4);
        assert_eq!(total.missing_teacher_tags, 6);
    }
}
