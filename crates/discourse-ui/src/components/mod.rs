pub mod bar_chart;
pub mod header;
pub mod heatmap;
pub mod lesson_picker;
