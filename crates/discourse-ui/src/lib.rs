//! Terminal UI layer for the discourse dashboard.
//!
//! Provides themes, the lesson picker, bar-chart and heatmap components, the
//! raw-data preview table and the application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod components;
pub mod preview_view;
pub mod themes;

#[cfg(test)]
pub(crate) mod test_support;

pub use discourse_core as core;
