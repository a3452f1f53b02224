use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use discourse_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a proportion in `[0, 1]` as a whole percentage, e.g. `0.5` → `"50%"`.
///
/// Non-finite inputs render as `"0%"`.
///
/// # Examples
///
/// ```
/// use discourse_core::formatting::format_proportion;
///
/// assert_eq!(format_proportion(0.5), "50%");
/// assert_eq!(format_proportion(1.0), "100%");
/// assert_eq!(format_proportion(2.0 / 3.0), "67%");
/// ```
pub fn format_proportion(value: f64) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    format!("{:.0}%", value * 100.0)
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use discourse_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Shorten `label` so it occupies at most `max_width` terminal columns,
/// ending in `…` when something was cut.
///
/// Width is measured in display columns, so CJK and emoji labels are handled.
///
/// # Examples
///
/// ```
/// use discourse_core::formatting::truncate_to_width;
///
/// assert_eq!(truncate_to_width("question", 20), "question");
/// assert_eq!(truncate_to_width("question", 5), "ques…");
/// assert_eq!(truncate_to_width("question", 0), "");
/// ```
pub fn truncate_to_width(label: &str, max_width: usize) -> String {
    if label.width() <= max_width {
        return label.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
