//! Data layer for the discourse dashboard.
//!
//! Discovers and reads per-lesson transcript files, validates their columns,
//! normalizes cells into utterance records, merges the lessons into one
//! ordered dataset and computes the research-question views over it.

pub mod aggregator;
pub mod merger;
pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod schema;

pub use aggregator::{
    aggregate, aggregate_filter, preview, AggregateViews, CategoryCount, LessonFilter,
    ProportionMatrix,
};
pub use merger::MergedDataset;
pub use pipeline::{list_lessons, load_dataset, load_dataset_from_files};

pub use discourse_core as core;
