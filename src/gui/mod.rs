//! GUI module - blocking chart window

mod app;
mod chart_viewer;

pub use app::{show_charts, ChartWindowApp};
pub use chart_viewer::ChartViewer;
