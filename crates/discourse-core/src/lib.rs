//! Domain model for the classroom discourse dashboard.
//!
//! Holds the utterance record and role types, the speaker classifier, the
//! shared error type, CLI settings and display formatting helpers used by the
//! data, runtime and UI crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod roles;
pub mod settings;

pub use error::{DashboardError, Result};
pub use models::{Role, UtteranceRecord, REQUIRED_COLUMNS};
