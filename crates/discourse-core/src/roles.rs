//! Speaker label → [`Role`] classification.

use crate::models::Role;

/// Labels that name the teacher outright.
const TEACHER_LABELS: [&str; 3] = ["t", "teacher", "instructor"];

/// Classify a raw speaker label.
///
/// The label is trimmed and lowercased. `t`, `teacher` and `instructor`, or
/// any label containing `teacher`, map to [`Role::Teacher`]; everything else,
/// including a missing label, maps to [`Role::Student`].
pub fn classify_speaker(speaker: Option<&str>) -> Role {
    let label = speaker.unwrap_or_default().trim().to_lowercase();
    if TEACHER_LABELS.contains(&label.as_str()) || label.contains("teacher") {
        Role::Teacher
    } else {
        Role::Student
    }
}
