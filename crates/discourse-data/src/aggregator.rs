//! Chart-ready views over a filtered slice of the merged dataset.
//!
//! Every function here is pure: the same dataset and filter always produce
//! the same values in the same order.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use discourse_core::models::{Role, UtteranceRecord};
use serde::Serialize;

use crate::merger::MergedDataset;

/// Maximum number of categories in a frequency view.
pub const TOP_N: usize = 10;

/// Default number of rows returned by [`preview`].
pub const DEFAULT_PREVIEW_ROWS: usize = 50;

/// Column headers of the raw-data preview, in display order.
pub const PREVIEW_COLUMNS: [&str; 9] = [
    "lesson_id",
    "TimeStamp",
    "Turn",
    "Speaker",
    "role",
    "Sentence",
    "Teacher_Tag",
    "Student_Tag",
    "DialogAct",
];

// ── LessonFilter ──────────────────────────────────────────────────────────────

/// Lesson selection plus optional role restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LessonFilter {
    pub lessons: BTreeSet<String>,
    pub role: Option<Role>,
}

impl LessonFilter {
    pub fn new(lessons: BTreeSet<String>, role: Option<Role>) -> Self {
        Self { lessons, role }
    }

    /// Every lesson of `dataset`, no role restriction.
    pub fn all(dataset: &MergedDataset) -> Self {
        Self {
            lessons: dataset.lesson_ids().into_iter().collect(),
            role: None,
        }
    }

    /// `true` when no lesson is selected ("nothing selected").
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    fn selects_lesson(&self, record: &UtteranceRecord) -> bool {
        self.lessons.contains(&record.lesson_id)
    }

    fn admits_role(&self, record: &UtteranceRecord) -> bool {
        self.role.map_or(true, |role| record.role == role)
    }
}

// ── View types ────────────────────────────────────────────────────────────────

/// One bar of a frequency chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

/// Teacher tag × dialog act table, normalized per row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProportionMatrix {
    /// Teacher tags, sorted.
    pub row_labels: Vec<String>,
    /// Dialog acts, sorted.
    pub column_labels: Vec<String>,
    /// `counts[row][col]`.
    pub counts: Vec<Vec<u64>>,
    /// `counts[row][col] / row_totals[row]`, all zeros for an empty row.
    pub proportions: Vec<Vec<f64>>,
    pub row_totals: Vec<u64>,
}

impl ProportionMatrix {
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    /// Proportions of one teacher tag keyed by dialog act.
    pub fn row(&self, label: &str) -> Option<BTreeMap<&str, f64>> {
        let r = self.row_labels.iter().position(|l| l == label)?;
        Some(
            self.column_labels
                .iter()
                .map(String::as_str)
                .zip(self.proportions[r].iter().copied())
                .collect(),
        )
    }

    /// Proportion at (`row`, `column`) by label.
    pub fn proportion(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.column_labels.iter().position(|l| l == column)?;
        Some(self.proportions[r][c])
    }
}

/// The four research-question views for one filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateViews {
    pub turn_counts_by_role: BTreeMap<Role, u64>,
    pub dialog_act_top10: Vec<CategoryCount>,
    pub student_tag_top10: Vec<CategoryCount>,
    pub teacher_dialogact_proportions: ProportionMatrix,
}

impl AggregateViews {
    /// Sum of `turn_counts_by_role`.
    pub fn total_turns(&self) -> u64 {
        self.turn_counts_by_role.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.turn_counts_by_role.is_empty()
            && self.dialog_act_top10.is_empty()
            && self.student_tag_top10.is_empty()
            && self.teacher_dialogact_proportions.is_empty()
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Compute all views for the lessons in `selected_lessons`.
///
/// `role` narrows turn counts and dialog acts only; student tags always use
/// the student rows and the proportion matrix always uses the teacher rows of
/// the selected lessons. An empty selection yields empty views.
pub fn aggregate(
    dataset: &MergedDataset,
    selected_lessons: &BTreeSet<String>,
    role: Option<Role>,
) -> AggregateViews {
    let filter = LessonFilter {
        lessons: selected_lessons.clone(),
        role,
    };
    aggregate_filter(dataset, &filter)
}

/// [`aggregate`] driven by a [`LessonFilter`].
pub fn aggregate_filter(dataset: &MergedDataset, filter: &LessonFilter) -> AggregateViews {
    let selected: Vec<&UtteranceRecord> = dataset
        .records()
        .iter()
        .filter(|r| filter.selects_lesson(r))
        .collect();

    let restricted: Vec<&UtteranceRecord> = selected
        .iter()
        .copied()
        .filter(|r| filter.admits_role(r))
        .collect();

    AggregateViews {
        turn_counts_by_role: turn_counts_by_role(restricted.iter().copied()),
        dialog_act_top10: top_categories(
            restricted.iter().map(|r| r.dialog_act.as_deref()),
            TOP_N,
        ),
        student_tag_top10: top_categories(
            selected
                .iter()
                .filter(|r| r.role == Role::Student)
                .map(|r| r.student_tag.as_deref()),
            TOP_N,
        ),
        teacher_dialogact_proportions: proportion_matrix(
            selected.iter().copied().filter(|r| r.role == Role::Teacher),
        ),
    }
}

/// First `limit` records of the filtered slice, in dataset order.
pub fn preview<'a>(
    dataset: &'a MergedDataset,
    filter: &LessonFilter,
    limit: usize,
) -> Vec<&'a UtteranceRecord> {
    dataset
        .records()
        .iter()
        .filter(|r| filter.selects_lesson(r) && filter.admits_role(r))
        .take(limit)
        .collect()
}

/// Ranked frequency of the non-missing `values`.
///
/// Descending by count; ties keep first-encountered order; at most `limit`
/// entries.
pub fn top_categories<'a, I>(values: I, limit: usize) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for value in values.into_iter().flatten() {
        match position.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                position.insert(value, counts.len());
                counts.push(CategoryCount {
                    label: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

fn turn_counts_by_role<'a, I>(records: I) -> BTreeMap<Role, u64>
where
    I: Iterator<Item = &'a UtteranceRecord>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.role).or_insert(0) += 1;
    }
    counts
}

fn proportion_matrix<'a, I>(teacher_rows: I) -> ProportionMatrix
where
    I: Iterator<Item = &'a UtteranceRecord>,
{
    let mut rows: BTreeSet<&str> = BTreeSet::new();
    let mut pairs: BTreeMap<(&str, &str), u64> = BTreeMap::new();

    for record in teacher_rows {
        let Some(tag) = record.teacher_tag.as_deref() else {
            continue;
        };
        rows.insert(tag);
        if let Some(act) = record.dialog_act.as_deref() {
            *pairs.entry((tag, act)).or_insert(0) += 1;
        }
    }

    let columns: BTreeSet<&str> = pairs.keys().map(|(_, act)| *act).collect();
    let row_labels: Vec<String> = rows.iter().map(|s| s.to_string()).collect();
    let column_labels: Vec<String> = columns.iter().map(|s| s.to_string()).collect();

    let counts: Vec<Vec<u64>> = rows
        .iter()
        .map(|tag| {
            columns
                .iter()
                .map(|act| pairs.get(&(*tag, *act)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    let row_totals: Vec<u64> = counts.iter().map(|row| row.iter().sum()).collect();

    let proportions = counts
        .iter()
        .zip(&row_totals)
        .map(|(row, &total)| {
            row.iter()
                .map(|&count| {
                    if total == 0 {
                        0.0
                    } else {
                        count as f64 / total as f64
                    }
                })
                .collect()
        })
        .collect();

    ProportionMatrix {
        row_labels,
        column_labels,
        counts,
        proportions,
        row_totals,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
