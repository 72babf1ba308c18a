//! Top-level error type for an analysis run.

use thiserror::Error;

use crate::charts::RenderError;
use crate::config::ConfigError;
use crate::data::{CleanerError, LoaderError};
use crate::report::ReportError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoaderError),

    #[error("Failed to clean data: {0}")]
    Clean(#[from] CleanerError),

    #[error("Failed to compute statistics: {0}")]
    Stats(#[from] polars::error::PolarsError),

    #[error("Failed to render charts: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_load_error_keeps_path_in_message() {
        let err: AnalysisError = LoaderError::MissingColumn {
            path: PathBuf::from("/data/apps.csv"),
            column: "Installs".to_string(),
        }
        .into();

        let message = err.to_string();
        assert!(message.contains("/data/apps.csv"));
        assert!(message.contains("Installs"));
    }

    #[test]
    fn test_cleaner_error_display() {
        let err: AnalysisError = CleanerError::MalformedInstalls {
            value: "Free".to_string(),
        }
        .into();

        assert!(err.to_string().starts_with("Failed to clean data:"));
        assert!(err.to_string().contains("Free"));
    }
}
