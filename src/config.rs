//! Configuration for an analysis run.
//!
//! Use [`AnalysisConfig::builder()`] to override the defaults; the builder
//! validates the result.

use serde::Serialize;
use std::path::{Path, PathBuf};

pub use crate::data::InstallsPolicy;

pub const DEFAULT_APPS_FILE: &str = "googleplaystore.csv";
pub const DEFAULT_REVIEWS_FILE: &str = "googleplaystore_user_reviews.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "charts";

/// What happens to the rendered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum RenderMode {
    /// Write numbered PNG files and the report into the output directory.
    #[default]
    File,
    /// Show the charts one after another in a blocking window.
    Screen,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    /// Directory holding both CSV files.
    /// Default: "."
    pub input_dir: PathBuf,

    /// App catalog file name, relative to `input_dir`.
    /// Default: "googleplaystore.csv"
    pub apps_file: String,

    /// Review sentiment file name, relative to `input_dir`.
    /// Default: "googleplaystore_user_reviews.csv"
    pub reviews_file: String,

    /// Where charts and reports go in [`RenderMode::File`].
    /// Default: "charts"
    pub output_dir: PathBuf,

    /// Default: File
    pub render_mode: RenderMode,

    /// Default: Drop
    pub installs_policy: InstallsPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            apps_file: DEFAULT_APPS_FILE.to_string(),
            reviews_file: DEFAULT_REVIEWS_FILE.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            render_mode: RenderMode::default(),
            installs_policy: InstallsPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    pub fn apps_path(&self) -> PathBuf {
        self.input_dir.join(&self.apps_file)
    }

    pub fn reviews_path(&self) -> PathBuf {
        self.input_dir.join(&self.reviews_file)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("apps_file", &self.apps_file),
            ("reviews_file", &self.reviews_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyFileName {
                    field: field.to_string(),
                });
            }
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': file name must not be empty")]
    EmptyFileName { field: String },

    #[error("Invalid output directory: path must not be empty")]
    EmptyOutputDir,
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    input_dir: Option<PathBuf>,
    apps_file: Option<String>,
    reviews_file: Option<String>,
    output_dir: Option<PathBuf>,
    render_mode: Option<RenderMode>,
    installs_policy: Option<InstallsPolicy>,
}

impl AnalysisConfigBuilder {
    pub fn input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(path.into());
        self
    }

    pub fn apps_file(mut self, name: impl Into<String>) -> Self {
        self.apps_file = Some(name.into());
        self
    }

    pub fn reviews_file(mut self, name: impl Into<String>) -> Self {
        self.reviews_file = Some(name.into());
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = Some(mode);
        self
    }

    /// Set how malformed `Installs` values are handled.
    pub fn installs_policy(mut self, policy: InstallsPolicy) -> Self {
        self.installs_policy = Some(policy);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            input_dir: self.input_dir.unwrap_or(defaults.input_dir),
            apps_file: self.apps_file.unwrap_or(defaults.apps_file),
            reviews_file: self.reviews_file.unwrap_or(defaults.reviews_file),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            render_mode: self.render_mode.unwrap_or(defaults.render_mode),
            installs_policy: self.installs_policy.unwrap_or(defaults.installs_policy),
        };

        config.validate()?;
        Ok(config)
    }
}
