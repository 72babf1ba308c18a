//! Stats module - descriptive statistics and correlation

mod calculator;
mod correlation;

pub use calculator::{AnalysisSummary, ColumnMeasure, ColumnSummary, StatsCalculator};
pub use correlation::{pearson_pairwise, CorrelationMatrix};
