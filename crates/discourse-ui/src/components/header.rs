use crate::themes::Theme;
use discourse_core::formatting::format_count;
use discourse_data::merger::MergedDataset;
use ratatui::text::{Line, Span};

/// Width of the separator line under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering four lines:
///
/// 1. Application title.
/// 2. A 60-column `=` separator.
/// 3. Corpus summary in `[ lessons | records | built HH:MM:SS UTC ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    pub dataset: &'a MergedDataset,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(dataset: &'a MergedDataset, theme: &'a Theme) -> Self {
        Self { dataset, theme }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let report = self.dataset.report();
        let lessons = self.dataset.lesson_ids().len();

        vec![
            Line::from(Span::styled(
                "CLASSROOM DISCOURSE DASHBOARD",
                self.theme.header,
            )),
            Line::from(Span::styled(
                "=".repeat(SEPARATOR_WIDTH),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(format!("{lessons} lessons"), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} records", format_count(self.dataset.len() as u64)),
                    self.theme.value,
                ),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("built {} UTC", report.built_at.format("%H:%M:%S")),
                    self.theme.value,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_dataset;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let dataset = sample_dataset();
        assert_eq!(Header::new(&dataset, &theme).to_lines().len(), 4);
    }

    #[test]
    fn test_header_title_and_separator() {
        let theme = Theme::dark();
        let dataset = sample_dataset();
        let lines = Header::new(&dataset, &theme).to_lines();

        assert!(text(&lines[0]).contains("CLASSROOM DISCOURSE DASHBOARD"));
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), SEPARATOR_WIDTH);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::light();
        let dataset = sample_dataset();
        let lines = Header::new(&dataset, &theme).to_lines();

        let info = text(&lines[2]);
        assert!(info.contains("2 lessons"), "got: {info}");
        assert!(info.contains("5 records"), "got: {info}");
        assert!(info.starts_with("[ ") && info.ends_with(" ]"));
        assert!(text(&lines[3]).is_empty());
    }
}
