//! Teacher tag × dialog act heatmap for the RQ3 tab.

use discourse_core::formatting::{format_count, format_proportion, truncate_to_width};
use discourse_data::aggregator::ProportionMatrix;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::themes::Theme;

/// Width of the teacher-tag label column.
pub const ROW_LABEL_WIDTH: u16 = 16;
/// Width of each dialog-act column.
pub const CELL_WIDTH: u16 = 9;

/// Render `matrix` as a shaded table: one row per teacher tag, one column per
/// dialog act, each cell a whole-percent proportion. A trailing column shows
/// the row's counted acts.
pub fn render_heatmap(frame: &mut Frame, area: Rect, matrix: &ProportionMatrix, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(
            " Teacher tag × dialog act (row proportions) ",
            theme.header,
        ));

    if matrix.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "No teacher turns in this selection",
            theme.dim,
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let label_width = ROW_LABEL_WIDTH as usize;
    let cell_width = CELL_WIDTH as usize;

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(
                matrix
                    .column_labels
                    .iter()
                    .map(|act| Cell::from(truncate_to_width(act, cell_width - 1))),
            )
            .chain(std::iter::once(Cell::from("n"))),
    )
    .style(theme.table_header);

    let rows: Vec<Row> = matrix
        .row_labels
        .iter()
        .zip(&matrix.proportions)
        .zip(&matrix.row_totals)
        .map(|((tag, proportions), total)| {
            let cells = std::iter::once(
                Cell::from(truncate_to_width(tag, label_width - 1)).style(theme.label),
            )
            .chain(proportions.iter().map(|&p| {
                Cell::from(format!("{:>width$}", format_proportion(p), width = cell_width - 1))
                    .style(theme.heat_text(p))
            }))
            .chain(std::iter::once(
                Cell::from(format_count(*total)).style(theme.dim),
            ));
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(ROW_LABEL_WIDTH))
        .chain(matrix.column_labels.iter().map(|_| Constraint::Length(CELL_WIDTH)))
        .chain(std::iter::once(Constraint::Length(CELL_WIDTH)))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(0)
        .style(theme.text);
    frame.render_widget(table, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
