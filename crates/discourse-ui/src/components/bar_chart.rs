//! Horizontal frequency bar charts for the RQ1 and RQ2 tabs.

use std::collections::BTreeMap;

use discourse_core::formatting::{format_count, truncate_to_width};
use discourse_core::models::Role;
use discourse_data::aggregator::CategoryCount;
use ratatui::{
    layout::{Direction, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::themes::Theme;

/// Widest label drawn to the left of a bar.
pub const MAX_LABEL_WIDTH: usize = 18;

/// Build one coloured bar per category, in the given order.
pub fn category_bars<'a>(counts: &[CategoryCount], theme: &Theme) -> Vec<Bar<'a>> {
    counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let color = theme.category_color(i);
            Bar::default()
                .value(c.count)
                .label(Line::from(truncate_to_width(&c.label, MAX_LABEL_WIDTH)))
                .text_value(format_count(c.count))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect()
}

/// Build the two role bars of the turn-frequency chart.
pub fn role_bars<'a>(counts: &BTreeMap<Role, u64>, theme: &Theme) -> Vec<Bar<'a>> {
    counts
        .iter()
        .map(|(role, &count)| {
            let style = theme.role_style(*role);
            Bar::default()
                .value(count)
                .label(Line::from(role.as_str()))
                .text_value(format_count(count))
                .style(style)
                .value_style(Style::default().fg(Color::Black).bg(style.fg.unwrap_or_default()))
        })
        .collect()
}

/// Render `bars` as a bordered horizontal bar chart, or a placeholder line
/// when there is nothing to plot.
pub fn render_bars(frame: &mut Frame, area: Rect, title: &str, bars: &[Bar], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(format!(" {title} "), theme.header));

    if bars.is_empty() {
        let placeholder =
            Paragraph::new(Line::from(Span::styled("No data for this selection", theme.dim)))
                .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .label_style(theme.label)
        .data(BarGroup::default().bars(bars));
    frame.render_widget(chart, area);
}

/// Convenience wrapper: [`category_bars`] then [`render_bars`].
pub fn render_category_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    counts: &[CategoryCount],
    theme: &Theme,
) {
    let bars = category_bars(counts, theme);
    render_bars(frame, area, title, &bars, theme);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
