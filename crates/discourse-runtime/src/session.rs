//! Interactive dashboard session: pending vs. applied filter state.
//!
//! The lesson picker edits the *pending* filter; views are only recomputed
//! when the pending filter is applied.

use std::sync::Arc;

use discourse_core::models::{Role, UtteranceRecord};
use discourse_data::aggregator::{aggregate_filter, preview, AggregateViews, LessonFilter};
use discourse_data::merger::MergedDataset;

/// Next role restriction in the cycle none → teacher → student → none.
pub fn next_role(role: Option<Role>) -> Option<Role> {
    match role {
        None => Some(Role::Teacher),
        Some(Role::Teacher) => Some(Role::Student),
        Some(Role::Student) => None,
    }
}

pub struct DashboardSession {
    dataset: Arc<MergedDataset>,
    pending: LessonFilter,
    applied: LessonFilter,
    views: AggregateViews,
    preview_rows: usize,
}

impl DashboardSession {
    /// Start a session with `initial` already applied.
    pub fn new(dataset: Arc<MergedDataset>, initial: LessonFilter, preview_rows: usize) -> Self {
        let views = aggregate_filter(&dataset, &initial);
        Self {
            dataset,
            pending: initial.clone(),
            applied: initial,
            views,
            preview_rows,
        }
    }

    /// Start a session with every lesson selected.
    pub fn with_all_lessons(dataset: Arc<MergedDataset>, preview_rows: usize) -> Self {
        let filter = LessonFilter::all(&dataset);
        Self::new(dataset, filter, preview_rows)
    }

    // ── Pending selection ─────────────────────────────────────────────────

    /// Toggle `lesson_id` in the pending selection. Returns whether it is now
    /// selected; unknown ids are ignored.
    pub fn toggle_lesson(&mut self, lesson_id: &str) -> bool {
        if !self.dataset.has_lesson(lesson_id) {
            return false;
        }
        if self.pending.lessons.remove(lesson_id) {
            false
        } else {
            self.pending.lessons.insert(lesson_id.to_string());
            true
        }
    }

    pub fn select_all(&mut self) {
        self.pending.lessons = self.dataset.lesson_ids().into_iter().collect();
    }

    pub fn select_none(&mut self) {
        self.pending.lessons.clear();
    }

    pub fn cycle_role(&mut self) -> Option<Role> {
        self.pending.role = next_role(self.pending.role);
        self.pending.role
    }

    /// `true` when the pending selection differs from the applied one.
    pub fn is_dirty(&self) -> bool {
        self.pending != self.applied
    }

    /// Apply the pending selection and recompute the views.
    pub fn apply(&mut self) {
        self.applied = self.pending.clone();
        self.views = aggregate_filter(&self.dataset, &self.applied);
        tracing::debug!(
            lessons = self.applied.lessons.len(),
            role = ?self.applied.role,
            turns = self.views.total_turns(),
            "filter applied"
        );
    }

    /// Swap in a freshly loaded dataset.
    ///
    /// Selections keep the lessons that still exist; the views are
    /// recomputed for the applied filter.
    pub fn replace_dataset(&mut self, dataset: Arc<MergedDataset>) {
        if Arc::ptr_eq(&self.dataset, &dataset) {
            return;
        }
        self.pending.lessons.retain(|id| dataset.has_lesson(id));
        self.applied.lessons.retain(|id| dataset.has_lesson(id));
        self.dataset = dataset;
        self.views = aggregate_filter(&self.dataset, &self.applied);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn dataset(&self) -> &MergedDataset {
        &self.dataset
    }

    pub fn lesson_ids(&self) -> Vec<String> {
        self.dataset.lesson_ids()
    }

    pub fn pending(&self) -> &LessonFilter {
        &self.pending
    }

    pub fn applied(&self) -> &LessonFilter {
        &self.applied
    }

    /// Views for the applied filter.
    pub fn views(&self) -> &AggregateViews {
        &self.views
    }

    /// Preview rows for the applied filter.
    pub fn preview(&self) -> Vec<&UtteranceRecord> {
        preview(&self.dataset, &self.applied, self.preview_rows)
    }

    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
