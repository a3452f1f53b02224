//! Runtime layer for the discourse dashboard.
//!
//! Owns the signature-keyed dataset cache and the interactive session state
//! that sits between the data layer and the terminal UI.

pub mod dataset_cache;
pub mod session;

pub use dataset_cache::DatasetCache;
pub use session::DashboardSession;

pub use discourse_core as core;
pub use discourse_data as data;
