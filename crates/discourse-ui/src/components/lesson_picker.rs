//! Lesson multi-select with a role selector and an apply hint.

use discourse_runtime::session::DashboardSession;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::themes::Theme;

/// Cursor position inside the lesson list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickerState {
    pub cursor: usize,
}

impl PickerState {
    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// Keep the cursor inside a list of `len` items.
    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

/// One `[x] L1` line per lesson, checked by the pending selection.
pub fn lesson_items<'a>(session: &DashboardSession, theme: &Theme) -> Vec<ListItem<'a>> {
    session
        .lesson_ids()
        .into_iter()
        .map(|id| {
            let checked = session.pending().lessons.contains(&id);
            let (mark, style) = if checked {
                ("[x] ", theme.checked)
            } else {
                ("[ ] ", theme.unchecked)
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(id, theme.text),
            ]))
        })
        .collect()
}

pub fn render_lesson_picker(
    frame: &mut Frame,
    area: Rect,
    session: &DashboardSession,
    picker: &PickerState,
    theme: &Theme,
) {
    let [list_area, footer_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(4)]).areas(area);

    let pending = session.pending();
    let title = format!(
        " Lessons {}/{} ",
        pending.lessons.len(),
        session.lesson_ids().len()
    );
    let list = List::new(lesson_items(session, theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(Span::styled(title, theme.header)),
        )
        .highlight_style(theme.cursor);
    let mut state = ListState::default().with_selected(Some(picker.cursor));
    frame.render_stateful_widget(list, list_area, &mut state);

    let role = pending.role.map(|r| r.as_str()).unwrap_or("all");
    let status = if session.is_dirty() {
        Span::styled("Enter to apply", theme.warning)
    } else {
        Span::styled("applied", theme.success)
    };
    let footer = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Role: ", theme.label),
            Span::styled(role, theme.value),
        ]),
        Line::from(status),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.table_border),
    );
    frame.render_widget(footer, footer_area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
