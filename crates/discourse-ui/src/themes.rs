use discourse_core::models::Role;
use ratatui::style::{Color, Modifier, Style};

/// Ten-colour categorical palette used for bar charts.
pub const CATEGORY_PALETTE: [Color; 10] = [
    Color::Rgb(0x4E, 0x79, 0xA7),
    Color::Rgb(0xF2, 0x8E, 0x2B),
    Color::Rgb(0xE1, 0x57, 0x59),
    Color::Rgb(0x76, 0xB7, 0xB2),
    Color::Rgb(0x59, 0xA1, 0x4F),
    Color::Rgb(0xED, 0xC9, 0x48),
    Color::Rgb(0xB0, 0x7A, 0xA1),
    Color::Rgb(0xFF, 0x9D, 0xA7),
    Color::Rgb(0x9C, 0x75, 0x5F),
    Color::Rgb(0xBA, 0xB0, 0xAC),
];

/// Eight-colour fallback palette for the classic theme.
const ANSI_PALETTE: [Color; 8] = [
    Color::Blue,
    Color::Yellow,
    Color::Red,
    Color::Cyan,
    Color::Green,
    Color::LightYellow,
    Color::Magenta,
    Color::LightRed,
];

/// Light and dark ends of the heatmap ramp.
const HEAT_LOW: (u8, u8, u8) = (0xF7, 0xFB, 0xFF);
const HEAT_HIGH: (u8, u8, u8) = (0x08, 0x30, 0x6B);

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark, 7–15 light. Absent or unparseable means dark.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// All styles used by the dashboard components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Tabs and picker ──────────────────────────────────────────────────────
    pub tab_active: Style,
    pub tab_inactive: Style,
    /// Highlighted lesson in the picker.
    pub cursor: Style,
    pub checked: Style,
    pub unchecked: Style,

    // ── Roles ────────────────────────────────────────────────────────────────
    pub role_teacher: Style,
    pub role_student: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// `false` restricts charts to the basic ANSI colours.
    pub truecolor: bool,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            tab_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::Gray),
            cursor: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            checked: Style::default().fg(Color::Green),
            unchecked: Style::default().fg(Color::DarkGray),

            role_teacher: Style::default().fg(Color::Rgb(0x4E, 0x79, 0xA7)),
            role_student: Style::default().fg(Color::Rgb(0xF2, 0x8E, 0x2B)),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            truecolor: true,
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            tab_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::DarkGray),
            cursor: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            checked: Style::default().fg(Color::Green),
            unchecked: Style::default().fg(Color::Gray),

            role_teacher: Style::default().fg(Color::Rgb(0x4E, 0x79, 0xA7)),
            role_student: Style::default().fg(Color::Rgb(0xF2, 0x8E, 0x2B)),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),

            truecolor: true,
        }
    }

    /// Basic 8-colour ANSI theme without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            tab_active: Style::default().fg(Color::Yellow),
            tab_inactive: Style::default().fg(Color::Gray),
            cursor: Style::default().fg(Color::Black).bg(Color::White),
            checked: Style::default().fg(Color::Green),
            unchecked: Style::default().fg(Color::DarkGray),

            role_teacher: Style::default().fg(Color::Blue),
            role_student: Style::default().fg(Color::Yellow),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            truecolor: false,
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Colour of the `index`-th bar, cycling through the palette.
    pub fn category_color(&self, index: usize) -> Color {
        if self.truecolor {
            CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()]
        } else {
            ANSI_PALETTE[index % ANSI_PALETTE.len()]
        }
    }

    pub fn role_style(&self, role: Role) -> Style {
        match role {
            Role::Teacher => self.role_teacher,
            Role::Student => self.role_student,
        }
    }

    /// Background colour of a heatmap cell holding `proportion` (0.0–1.0).
    pub fn heat_color(&self, proportion: f64) -> Color {
        let p = if proportion.is_finite() {
            proportion.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if !self.truecolor {
            return match p {
                p if p >= 0.75 => Color::Blue,
                p if p >= 0.5 => Color::LightBlue,
                p if p >= 0.25 => Color::Cyan,
                _ => Color::White,
            };
        }
        let mix = |low: u8, high: u8| -> u8 {
            (low as f64 + (high as f64 - low as f64) * p).round() as u8
        };
        Color::Rgb(
            mix(HEAT_LOW.0, HEAT_HIGH.0),
            mix(HEAT_LOW.1, HEAT_HIGH.1),
            mix(HEAT_LOW.2, HEAT_HIGH.2),
        )
    }

    /// Readable text style on top of [`Self::heat_color`].
    pub fn heat_text(&self, proportion: f64) -> Style {
        let fg = if proportion >= 0.5 {
            Color::White
        } else {
            Color::Black
        };
        Style::default().fg(fg).bg(self.heat_color(proportion))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
