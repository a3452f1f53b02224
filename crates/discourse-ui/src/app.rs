//! Application state and TUI event loop for the discourse dashboard.
//!
//! [`App`] owns the theme, the active tab, the lesson picker cursor and the
//! [`DashboardSession`]. Keys edit the pending selection; `Enter` applies
//! it and `R` reloads the dataset through the [`DatasetCache`].

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};

use discourse_core::error::{DashboardError, Result};
use discourse_runtime::dataset_cache::DatasetCache;
use discourse_runtime::session::DashboardSession;

use crate::components::bar_chart::{render_bars, render_category_chart, role_bars};
use crate::components::header::Header;
use crate::components::heatmap::render_heatmap;
use crate::components::lesson_picker::{render_lesson_picker, PickerState};
use crate::preview_view::render_preview;
use crate::themes::Theme;

/// Width of the lesson picker column.
const PICKER_WIDTH: u16 = 26;

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Dashboard tabs, one per research question plus the raw-data preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Turns,
    StudentTags,
    Heatmap,
    Preview,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Turns, Tab::StudentTags, Tab::Heatmap, Tab::Preview];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Turns => "RQ1 Turns & dialog acts",
            Tab::StudentTags => "RQ2 Student tags",
            Tab::Heatmap => "RQ3 Tag × act",
            Tab::Preview => "Preview",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Turns => 0,
            Tab::StudentTags => 1,
            Tab::Heatmap => 2,
            Tab::Preview => 3,
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    pub tab: Tab,
    pub picker: PickerState,
    pub session: DashboardSession,
    /// Last reload outcome shown in the status line.
    pub status: Option<String>,
    /// Set while the most recent reload failed; the body shows it instead of
    /// the views of the previous dataset.
    pub load_error: Option<String>,
    pub should_quit: bool,
    cache: DatasetCache,
    data_dir: PathBuf,
}

impl App {
    /// `cache` must already hold the dataset `session` was built from.
    pub fn new(
        theme_name: &str,
        session: DashboardSession,
        cache: DatasetCache,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            tab: Tab::Turns,
            picker: PickerState::default(),
            session,
            status: None,
            load_error: None,
            should_quit: false,
            cache,
            data_dir,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the dashboard until the user quits.
    ///
    /// Polls `crossterm` with a 250 ms timeout; the loop exits on `q`, `Esc`
    /// or `Ctrl+C`. Terminal I/O failures surface as
    /// [`DashboardError::Terminal`].
    pub fn run(mut self) -> Result<()> {
        self.run_terminal().map_err(terminal_error)
    }

    fn run_terminal(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        let lessons = self.session.lesson_ids();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.tab = Tab::ALL[index];
            }
            KeyCode::Up => self.picker.up(),
            KeyCode::Down => self.picker.down(lessons.len()),
            KeyCode::Char(' ') => {
                if let Some(id) = lessons.get(self.picker.cursor) {
                    self.session.toggle_lesson(id);
                }
            }
            KeyCode::Char('a') => self.session.select_all(),
            KeyCode::Char('n') => self.session.select_none(),
            KeyCode::Char('r') => {
                self.session.cycle_role();
            }
            KeyCode::Enter => {
                self.session.apply();
                self.status = None;
            }
            KeyCode::Char('R') => self.reload(),
            _ => {}
        }
    }

    /// Reload through the cache; a changed file set yields a new dataset.
    ///
    /// On failure the views are hidden behind an error panel until a later
    /// reload succeeds.
    pub fn reload(&mut self) {
        match self.cache.get_or_load(&self.data_dir) {
            Ok(dataset) => {
                self.load_error = None;
                self.session.replace_dataset(dataset);
                self.picker.clamp(self.session.lesson_ids().len());
                self.status = Some(format!(
                    "Loaded {} lessons from {}",
                    self.session.lesson_ids().len(),
                    self.data_dir.display()
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, "reload failed");
                self.status = Some("Reload failed; press R to retry".to_string());
                self.load_error = Some(e.to_string());
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [header_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(Paragraph::new(self.status_line()), status_area);

        if let Some(error) = &self.load_error {
            render_load_error(frame, header_area.union(body_area), error, &self.theme);
            return;
        }

        let header = Header::new(self.session.dataset(), &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

        let [picker_area, main_area] =
            Layout::horizontal([Constraint::Length(PICKER_WIDTH), Constraint::Min(20)])
                .areas(body_area);
        render_lesson_picker(frame, picker_area, &self.session, &self.picker, &self.theme);

        let [tabs_area, content_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(main_area);
        self.render_tabs(frame, tabs_area);

        if self.session.applied().is_empty() {
            render_nothing_selected(frame, content_area, &self.theme);
        } else {
            self.render_tab_content(frame, content_area);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border),
            )
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .select(self.tab.index());
        frame.render_widget(tabs, area);
    }

    fn render_tab_content(&self, frame: &mut Frame, area: Rect) {
        let views = self.session.views();
        match self.tab {
            Tab::Turns => {
                let [turns_area, acts_area] =
                    Layout::vertical([Constraint::Length(7), Constraint::Min(4)]).areas(area);
                let bars = role_bars(&views.turn_counts_by_role, &self.theme);
                render_bars(frame, turns_area, "Turns by role", &bars, &self.theme);
                render_category_chart(
                    frame,
                    acts_area,
                    "Top 10 dialog acts",
                    &views.dialog_act_top10,
                    &self.theme,
                );
            }
            Tab::StudentTags => render_category_chart(
                frame,
                area,
                "Top 10 student tags",
                &views.student_tag_top10,
                &self.theme,
            ),
            Tab::Heatmap => {
                render_heatmap(frame, area, &views.teacher_dialogact_proportions, &self.theme)
            }
            Tab::Preview => render_preview(
                frame,
                area,
                &self.session.preview(),
                self.session.preview_rows(),
                &self.theme,
            ),
        }
    }

    fn status_line(&self) -> Line<'_> {
        if let Some(status) = &self.status {
            let style = if status.starts_with("Reload failed") {
                self.theme.error
            } else {
                self.theme.info
            };
            return Line::from(Span::styled(status.as_str(), style));
        }
        Line::from(Span::styled(
            "Tab/1-4 views  ↑↓ move  Space toggle  a/n all/none  r role  Enter apply  R reload  q quit",
            self.theme.dim,
        ))
    }
}

fn terminal_error(e: io::Error) -> DashboardError {
    DashboardError::Terminal(e.to_string())
}

/// Error panel shown in place of the dashboard after a failed reload.
pub fn render_load_error(frame: &mut Frame, area: Rect, error: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Could not load lessons", theme.error)),
        Line::from(""),
        Line::from(Span::styled(error, theme.text)),
        Line::from(""),
        Line::from(Span::styled(
            "Fix the files, then press R to reload or q to quit.",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.table_border),
            ),
        area,
    );
}

/// Benign placeholder shown when the applied filter selects no lesson.
pub fn render_nothing_selected(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Nothing selected", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Pick lessons with Space, then press Enter to apply.",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
