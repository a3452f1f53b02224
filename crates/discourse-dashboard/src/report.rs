//! Non-interactive outputs: filter resolution, text summary and JSON.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use discourse_core::error::{DashboardError, Result};
use discourse_core::formatting::{format_count, format_proportion, percentage};
use discourse_core::settings::Settings;
use discourse_data::aggregator::{AggregateViews, CategoryCount, LessonFilter};
use discourse_data::merger::MergedDataset;
use serde_json::{Map, Value};

/// Build the filter requested on the command line.
///
/// Without `--lessons` every lesson is selected; an empty `--lessons`
/// selects none. Unknown ids are a configuration error naming them and the
/// available ones.
pub fn resolve_filter(dataset: &MergedDataset, settings: &Settings) -> Result<LessonFilter> {
    let role = settings.role_restriction();
    let Some(requested) = settings.lesson_selection() else {
        return Ok(LessonFilter {
            role,
            ..LessonFilter::all(dataset)
        });
    };

    let unknown: Vec<&str> = requested
        .iter()
        .filter(|id| !dataset.has_lesson(id))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(DashboardError::Config(format!(
            "unknown lesson id(s) [{}]; available: [{}]",
            unknown.join(", "),
            dataset.lesson_ids().join(", ")
        )));
    }

    Ok(LessonFilter::new(requested, role))
}

/// JSON document for `--view json`.
pub fn json_report(
    dataset: &MergedDataset,
    filter: &LessonFilter,
    views: &AggregateViews,
) -> Result<Value> {
    let mut doc = Map::new();
    doc.insert("lessons".into(), serde_json::to_value(&filter.lessons)?);
    doc.insert("role".into(), serde_json::to_value(filter.role)?);
    doc.insert(
        "turn_counts_by_role".into(),
        serde_json::to_value(&views.turn_counts_by_role)?,
    );
    doc.insert(
        "dialog_act_top10".into(),
        serde_json::to_value(&views.dialog_act_top10)?,
    );
    doc.insert(
        "student_tag_top10".into(),
        serde_json::to_value(&views.student_tag_top10)?,
    );
    doc.insert(
        "teacher_dialogact_proportions".into(),
        serde_json::to_value(&views.teacher_dialogact_proportions)?,
    );
    doc.insert("report".into(), serde_json::to_value(dataset.report())?);
    Ok(Value::Object(doc))
}

/// Plain-text summary for `--view summary`.
pub fn summary_text(dataset: &MergedDataset, filter: &LessonFilter, views: &AggregateViews) -> String {
    let mut out = String::new();
    let report = dataset.report();
    let stats = &report.stats;

    let _ = writeln!(out, "Classroom discourse summary");
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "Data directory : {}", dataset.data_dir().display());
    let _ = writeln!(
        out,
        "Lessons        : {} ({} of {})",
        join(&filter.lessons),
        filter.lessons.len(),
        dataset.lesson_ids().len()
    );
    let _ = writeln!(
        out,
        "Role           : {}",
        filter.role.map(|r| r.as_str()).unwrap_or("all")
    );
    let _ = writeln!(
        out,
        "Records        : {} (blank rows {}, unparsable turns {}, empty speakers {})",
        format_count(stats.records as u64),
        stats.blank_rows,
        stats.unparsable_turns,
        stats.empty_speakers
    );
    let _ = writeln!(
        out,
        "Built at       : {}",
        report.built_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if filter.is_empty() {
        let _ = writeln!(out, "\nNothing selected.");
        return out;
    }

    let _ = writeln!(out, "\nRQ1 Turns by role");
    let total = views.total_turns();
    for (role, count) in &views.turn_counts_by_role {
        let _ = writeln!(
            out,
            "  {:<10} {:>8}  {:>5.1}%",
            role.as_str(),
            format_count(*count),
            percentage(*count as f64, total as f64, 1)
        );
    }

    write_ranking(&mut out, "RQ1 Top 10 dialog acts", &views.dialog_act_top10);
    write_ranking(&mut out, "RQ2 Top 10 student tags", &views.student_tag_top10);

    let _ = writeln!(out, "\nRQ3 Teacher tag × dialog act (row proportions)");
    let matrix = &views.teacher_dialogact_proportions;
    if matrix.is_empty() {
        let _ = writeln!(out, "  (no teacher turns)");
        return out;
    }
    let _ = write!(out, "  {:<14}", "");
    for act in &matrix.column_labels {
        let _ = write!(out, " {act:>8}");
    }
    let _ = writeln!(out);
    for (tag, row) in matrix.row_labels.iter().zip(&matrix.proportions) {
        let _ = write!(out, "  {tag:<14}");
        for p in row {
            let _ = write!(out, " {:>8}", format_proportion(*p));
        }
        let _ = writeln!(out);
    }

    out
}

fn write_ranking(out: &mut String, title: &str, counts: &[CategoryCount]) {
    let _ = writeln!(out, "\n{title}");
    if counts.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (rank, c) in counts.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<20} {:>8}", rank + 1, c.label, format_count(c.count));
    }
}

fn join(ids: &BTreeSet<String>) -> String {
    ids.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
