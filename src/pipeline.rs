//! Analysis pipeline.
//!
//! Runs the stages top to bottom on one thread:
//! load -> clean -> statistics -> charts -> report.

use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use crate::charts::{RenderedChart, StaticChartRenderer};
use crate::config::{AnalysisConfig, RenderMode};
use crate::data::{apps, CleanedData, DataCleaner, DataLoader};
use crate::error::Result;
use crate::gui::show_charts;
use crate::report::Reporter;
use crate::stats::{AnalysisSummary, StatsCalculator};

/// Cleaned tables and the statistics computed over them.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub data: CleanedData,
    pub summary: AnalysisSummary,
}

/// Everything a full run produced.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub analysis: Analysis,
    pub text_report: String,
    pub json_report: String,
    /// Chart and report files written in [`RenderMode::File`].
    pub written: Vec<PathBuf>,
}

pub struct Pipeline {
    config: AnalysisConfig,
}

impl Pipeline {
    /// Create a pipeline for a validated configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load, clean and summarize both tables without drawing anything.
    pub fn analyze(&self) -> Result<Analysis> {
        let start = Instant::now();

        info!("Stage 1/5: loading data");
        let raw_apps = DataLoader::load_apps(&self.config.apps_path())?;
        let raw_reviews = DataLoader::load_reviews(&self.config.reviews_path())?;

        info!("Stage 2/5: cleaning data");
        let data = DataCleaner::new(self.config.installs_policy).clean(&raw_apps, &raw_reviews)?;
        debug!(report = ?data.report, "Cleaning report");

        info!("Stage 3/5: computing statistics");
        let summary = StatsCalculator::summarize(&data.apps, &apps::NUMERIC)?;

        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Analysis complete");
        Ok(Analysis { data, summary })
    }

    /// Full run: analysis, charts in the configured mode, and the report.
    pub fn run(&self) -> Result<AnalysisOutcome> {
        let analysis = self.analyze()?;

        info!("Stage 4/5: rendering charts");
        let charts = StaticChartRenderer::render_all(
            &analysis.data.apps,
            &analysis.data.reviews,
            &analysis.summary.correlation,
        )?;
        let mut written = self.present(charts)?;

        info!("Stage 5/5: writing report");
        let text_report = Reporter::render_text(&analysis.summary);
        let json_report = Reporter::render_json(&analysis.summary, &analysis.data.report)?;
        if self.config.render_mode == RenderMode::File {
            written.extend(Reporter::write_files(
                self.config.output_dir(),
                &text_report,
                &json_report,
            )?);
        }

        Ok(AnalysisOutcome {
            analysis,
            text_report,
            json_report,
            written,
        })
    }

    fn present(&self, charts: Vec<RenderedChart>) -> Result<Vec<PathBuf>> {
        match self.config.render_mode {
            RenderMode::File => {
                let dir = self.config.output_dir();
                let mut paths = Vec::with_capacity(charts.len());
                for chart in &charts {
                    let path = chart.save_png(dir)?;
                    debug!(chart = ?chart.kind, path = %path.display(), "Saved chart");
                    paths.push(path);
                }
                info!(count = paths.len(), dir = %dir.display(), "Saved charts");
                Ok(paths)
            }
            RenderMode::Screen => {
                show_charts(charts)?;
                Ok(Vec::new())
            }
        }
    }
}
