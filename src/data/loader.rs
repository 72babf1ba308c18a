//! CSV Data Loader Module
//! Reads the app catalog and review files into Polars DataFrames.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::{apps, reviews};

/// Tokens read as missing, mirroring the pandas `read_csv` defaults.
pub const PANDAS_NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
}

impl LoaderError {
    /// Path of the input file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            LoaderError::FileAccess { path, .. }
            | LoaderError::Parse { path, .. }
            | LoaderError::MissingColumn { path, .. } => path,
        }
    }
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load the app catalog, checking that the analysed columns exist.
    pub fn load_apps(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = Self::load_csv(path)?;
        Self::require_columns(&df, path, &apps::REQUIRED)?;
        Ok(df)
    }

    /// Load the user review table, checking that the analysed columns exist.
    pub fn load_reviews(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = Self::load_csv(path)?;
        Self::require_columns(&df, path, &reviews::REQUIRED)?;
        Ok(df)
    }

    /// Load a CSV file with every column read as text.
    ///
    /// Typing is left to the cleaner so that a malformed cell becomes a null
    /// there instead of failing schema inference here.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        std::fs::File::open(path).map_err(|source| LoaderError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        let null_values = PANDAS_NA_VALUES
            .into_iter()
            .map(PlSmallStr::from_static)
            .collect();

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_null_values(Some(NullValues::AllColumns(null_values)))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|source| LoaderError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded CSV"
        );
        debug!(columns = ?Self::get_columns(&df), "CSV header");

        Ok(df)
    }

    /// Get list of column names from a DataFrame.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn require_columns(df: &DataFrame, path: &Path, required: &[&str]) -> Result<(), LoaderError> {
        let present = Self::get_columns(df);
        match required
            .iter()
            .find(|column| !present.iter().any(|p| p == *column))
        {
            Some(column) => Err(LoaderError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            }),
            None => Ok(()),
        }
    }
}
