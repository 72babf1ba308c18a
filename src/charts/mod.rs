//! Charts module - chart data preparation and static rendering

mod data;
pub mod palette;
mod renderer;

pub use data::{
    apps_per_year, column_value_counts, count_years, gaussian_kde, histogram_bins, kde_curve,
    pie_slices, value_counts, HistogramBins, PieSlice,
};
pub use renderer::StaticChartRenderer;

use plotters::drawing::DrawingAreaErrorKind;
use polars::prelude::PolarsError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Chart data error: {0}")]
    Data(#[from] PolarsError),
    #[error("Failed to write chart {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Chart viewer failed: {0}")]
    Viewer(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(err.to_string())
    }
}

/// The five charts, in the order they are rendered and shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartKind {
    RatingDistribution,
    AppsPerCategory,
    SentimentDistribution,
    AppsOverTime,
    CorrelationHeatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::RatingDistribution,
        ChartKind::AppsPerCategory,
        ChartKind::SentimentDistribution,
        ChartKind::AppsOverTime,
        ChartKind::CorrelationHeatmap,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::RatingDistribution => "Distribution of App Ratings on Google Play Store",
            ChartKind::AppsPerCategory => "Count of Apps per Category on Google Play Store",
            ChartKind::SentimentDistribution => "Distribution of Sentiments from User Reviews",
            ChartKind::AppsOverTime => "Trends in the Number of Apps Added Over Time",
            ChartKind::CorrelationHeatmap => "Correlation Matrix Among Numeric Variables",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::RatingDistribution => "01_rating_distribution.png",
            ChartKind::AppsPerCategory => "02_apps_per_category.png",
            ChartKind::SentimentDistribution => "03_sentiment_distribution.png",
            ChartKind::AppsOverTime => "04_apps_over_time.png",
            ChartKind::CorrelationHeatmap => "05_correlation_heatmap.png",
        }
    }

    /// Pixel size: the figure size in inches at 100 dpi.
    pub fn size(&self) -> (u32, u32) {
        match self {
            ChartKind::RatingDistribution => (1000, 600),
            ChartKind::AppsPerCategory => (1200, 800),
            ChartKind::SentimentDistribution => (800, 800),
            ChartKind::AppsOverTime => (1200, 600),
            ChartKind::CorrelationHeatmap => (800, 600),
        }
    }
}

/// A chart rendered to an in-memory RGB raster.
#[derive(Clone)]
pub struct RenderedChart {
    pub kind: ChartKind,
    pub width: u32,
    pub height: u32,
    /// Row-major RGB8, `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for RenderedChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedChart")
            .field("kind", &self.kind)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl RenderedChart {
    /// Write the chart as `<dir>/<file_name>` and return that path.
    pub fn save_png(&self, dir: &Path) -> Result<PathBuf, RenderError> {
        std::fs::create_dir_all(dir).map_err(|source| RenderError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(self.kind.file_name());
        image::save_buffer(
            &path,
            &self.pixels,
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )
        .map_err(|source| RenderError::Image {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
