//! Raw-data preview table: the first rows of the applied selection.

use discourse_core::formatting::truncate_to_width;
use discourse_core::models::UtteranceRecord;
use discourse_data::aggregator::PREVIEW_COLUMNS;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::themes::Theme;

/// Column widths matching [`PREVIEW_COLUMNS`]; the sentence takes the rest.
const WIDTHS: [Constraint; 9] = [
    Constraint::Length(8),
    Constraint::Length(10),
    Constraint::Length(5),
    Constraint::Length(12),
    Constraint::Length(8),
    Constraint::Min(20),
    Constraint::Length(12),
    Constraint::Length(12),
    Constraint::Length(10),
];

/// Cell texts of one preview row, in [`PREVIEW_COLUMNS`] order.
pub fn preview_cells(record: &UtteranceRecord) -> [String; 9] {
    let missing = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        record.lesson_id.clone(),
        missing(&record.timestamp),
        missing(&record.turn),
        record.speaker.clone(),
        record.role.to_string(),
        record.sentence.clone(),
        missing(&record.teacher_tag),
        missing(&record.student_tag),
        missing(&record.dialog_act),
    ]
}

pub fn render_preview(
    frame: &mut Frame,
    area: Rect,
    rows: &[&UtteranceRecord],
    limit: usize,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(
            format!(" Raw data (first {limit} rows) "),
            theme.header,
        ));

    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("No rows in this selection", theme.dim)))
                .block(block),
            area,
        );
        return;
    }

    let header = Row::new(PREVIEW_COLUMNS.iter().map(|h| Cell::from(*h))).style(theme.table_header);

    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let cells = preview_cells(record).into_iter().enumerate().map(|(col, text)| {
                let cell = Cell::from(truncate_to_width(&text, 60));
                if col == 4 {
                    cell.style(theme.role_style(record.role))
                } else {
                    cell
                }
            });
            Row::new(cells).style(style)
        })
        .collect();

    let table = Table::new(body, WIDTHS)
        .header(header)
        .block(block)
        .style(theme.text);
    frame.render_widget(table, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
