//! Play Store Insights
//!
//! Exploratory analysis of the Google Play Store app catalog and its user
//! review sentiments, built on Polars.
//!
//! # Overview
//!
//! - **Loading**: both CSV files are read as text with pandas-style missing markers
//! - **Cleaning**: sentinel row removal, date/number coercion, `Installs` normalization
//! - **Statistics**: descriptive statistics, pairwise Pearson correlation, skewness, kurtosis
//! - **Charts**: five static charts saved as PNG files or shown in a window
//! - **Report**: labelled text tables or JSON
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use playstore_insights::{AnalysisConfig, Pipeline, Reporter};
//!
//! let config = AnalysisConfig::builder()
//!     .input_dir("data")
//!     .output_dir("charts")
//!     .build()?;
//!
//! // Statistics only, no charts
//! let analysis = Pipeline::new(config.clone())?.analyze()?;
//! println!("{}", Reporter::render_text(&analysis.summary));
//!
//! // Everything: charts, report.txt and report.json in ./charts
//! let outcome = Pipeline::new(config)?.run()?;
//! ```

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod gui;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use charts::{ChartKind, RenderError, RenderedChart, StaticChartRenderer};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigError, RenderMode};
pub use data::{
    CleanedData, CleanerError, CleaningReport, DataCleaner, DataLoader, InstallsPolicy,
    LoaderError,
};
pub use error::{AnalysisError, Result};
pub use pipeline::{Analysis, AnalysisOutcome, Pipeline};
pub use report::{ReportError, Reporter};
pub use stats::{AnalysisSummary, CorrelationMatrix, StatsCalculator};
