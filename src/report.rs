//! Report Module
//! Formats the statistics as labelled text tables or JSON and writes them to disk.
//!
//! Block order is fixed:
//! 1. Descriptive Statistics
//! 2. Correlation Matrix
//! 3. Skewness
//! 4. Kurtosis

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::data::CleaningReport;
use crate::stats::{AnalysisSummary, ColumnMeasure, ColumnSummary};

pub const TEXT_REPORT_FILE: &str = "report.txt";
pub const JSON_REPORT_FILE: &str = "report.json";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Machine-readable report document.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub cleaning: &'a CleaningReport,
    pub statistics: &'a AnalysisSummary,
}

pub struct Reporter;

impl Reporter {
    /// The four labelled blocks, separated by blank lines.
    pub fn render_text(summary: &AnalysisSummary) -> String {
        let mut out = String::new();

        out.push_str("Descriptive Statistics:\n");
        out.push_str(&Self::descriptive_table(&summary.descriptive));
        out.push('\n');

        out.push_str("Correlation Matrix:\n");
        let header: Vec<String> = summary.correlation.columns.clone();
        let rows: Vec<(String, Vec<String>)> = summary
            .correlation
            .columns
            .iter()
            .zip(&summary.correlation.values)
            .map(|(name, row)| (name.clone(), row.iter().map(|v| format_value(*v)).collect()))
            .collect();
        out.push_str(&format_table(&header, &rows));
        out.push('\n');

        out.push_str("Skewness:\n");
        out.push_str(&Self::measure_table(&summary.skewness));
        out.push('\n');

        out.push_str("Kurtosis:\n");
        out.push_str(&Self::measure_table(&summary.kurtosis));
        out
    }

    /// Pretty JSON of the statistics together with the cleaning counts.
    pub fn render_json(
        summary: &AnalysisSummary,
        cleaning: &CleaningReport,
    ) -> Result<String, ReportError> {
        let report = JsonReport {
            cleaning,
            statistics: summary,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Write `report.txt` and `report.json` into `dir`, creating it if needed.
    pub fn write_files(dir: &Path, text: &str, json: &str) -> Result<Vec<PathBuf>, ReportError> {
        std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(2);
        for (name, contents) in [(TEXT_REPORT_FILE, text), (JSON_REPORT_FILE, json)] {
            let path = dir.join(name);
            std::fs::write(&path, contents).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }

        info!(dir = %dir.display(), "Wrote report files");
        Ok(written)
    }

    /// `describe()` layout: statistics as rows, columns across.
    fn descriptive_table(columns: &[ColumnSummary]) -> String {
        let header: Vec<String> = columns.iter().map(|c| c.column.clone()).collect();
        let stat_rows: [(&str, fn(&ColumnSummary) -> f64); 8] = [
            ("count", |c| c.count as f64),
            ("mean", |c| c.mean),
            ("std", |c| c.std),
            ("min", |c| c.min),
            ("25%", |c| c.p25),
            ("50%", |c| c.median),
            ("75%", |c| c.p75),
            ("max", |c| c.max),
        ];

        let rows: Vec<(String, Vec<String>)> = stat_rows
            .iter()
            .map(|(label, get)| {
                let cells = columns.iter().map(|c| format_value(get(c))).collect();
                (label.to_string(), cells)
            })
            .collect();
        format_table(&header, &rows)
    }

    fn measure_table(measures: &[ColumnMeasure]) -> String {
        let rows: Vec<(String, Vec<String>)> = measures
            .iter()
            .map(|m| (m.column.clone(), vec![format_value(m.value)]))
            .collect();
        format_table(&[], &rows)
    }
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.6}", value)
    }
}

/// Right-aligned cells under an optional header, row labels left-aligned.
fn format_table(header: &[String], rows: &[(String, Vec<String>)]) -> String {
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let columns = header
        .len()
        .max(rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0));

    let mut widths = vec![0usize; columns];
    for (i, name) in header.iter().enumerate() {
        widths[i] = widths[i].max(name.len());
    }
    for (_, cells) in rows {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let line = |label: String, cells: &[String]| {
        let mut row = label;
        for (cell, width) in cells.iter().zip(&widths) {
            row.push_str(&format!("  {:>width$}", cell));
        }
        row.push('\n');
        row
    };

    let mut out = String::new();
    if !header.is_empty() {
        out.push_str(&line(" ".repeat(label_width), header));
    }
    for (label, cells) in rows {
        out.push_str(&line(format!("{:<label_width$}", label), cells));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CorrelationMatrix;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn summary() -> AnalysisSummary {
        AnalysisSummary {
            descriptive: vec![ColumnSummary {
                column: "Rating".to_string(),
                count: 2,
                mean: 4.0,
                std: 0.5,
                min: 3.5,
                p25: 3.75,
                median: 4.0,
                p75: 4.25,
                max: 4.5,
            }],
            correlation: CorrelationMatrix {
                columns: vec!["Rating".to_string(), "Reviews".to_string()],
                values: vec![vec![1.0, f64::NAN], vec![f64::NAN, 1.0]],
            },
            skewness: vec![ColumnMeasure {
                column: "Rating".to_string(),
                value: f64::NAN,
            }],
            kurtosis: vec![ColumnMeasure {
                column: "Rating".to_string(),
                value: -1.2,
            }],
        }
    }

    #[test]
    fn test_blocks_in_order() {
        let text = Reporter::render_text(&summary());
        let positions: Vec<usize> = [
            "Descriptive Statistics:",
            "Correlation Matrix:",
            "Skewness:",
            "Kurtosis:",
        ]
        .iter()
        .map(|label| text.find(label).unwrap())
        .collect();

        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_text_tables() {
        let text = Reporter::render_text(&summary());

        assert!(text.contains("count  2.000000\n"));
        assert!(text.contains("25%    3.750000\n"));
        assert!(text.contains("Rating   1.000000       NaN\n"));
        assert!(text.contains("Skewness:\nRating  NaN\n"));
        assert!(text.contains("Kurtosis:\nRating  -1.200000\n"));
    }

    #[test]
    fn test_format_table_alignment() {
        let table = format_table(
            &["a".to_string(), "bb".to_string()],
            &[
                ("x".to_string(), vec!["1".to_string(), "22".to_string()]),
                ("yyy".to_string(), vec!["333".to_string(), "4".to_string()]),
            ],
        );

        assert_eq!(table, "       a  bb\nx      1  22\nyyy  333   4\n");
    }

    #[test]
    fn test_json_report_uses_null_for_nan() {
        let json = Reporter::render_json(&summary(), &CleaningReport::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["statistics"]["descriptive"][0]["25%"], 3.75);
        assert!(value["statistics"]["skewness"][0]["value"].is_null());
        assert_eq!(value["cleaning"]["apps_retained"], 0);
    }

    #[test]
    fn test_write_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");

        let written = Reporter::write_files(&out, "text", "{}").unwrap();
        assert_eq!(written, vec![out.join("report.txt"), out.join("report.json")]);
        assert_eq!(std::fs::read_to_string(&written[0]).unwrap(), "text");
    }
}
