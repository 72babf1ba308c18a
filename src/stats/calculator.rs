//! Statistics Calculator Module
//! Descriptive statistics, skewness and kurtosis over nullable numeric columns.

use polars::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::debug;

use super::CorrelationMatrix;

/// Descriptive statistics for a single column, the rows of `describe()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn empty(column: &str) -> Self {
        Self {
            column: column.to_string(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// One per-column scalar such as a skewness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMeasure {
    pub column: String,
    pub value: f64,
}

/// Everything the reporter prints.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub descriptive: Vec<ColumnSummary>,
    pub correlation: CorrelationMatrix,
    pub skewness: Vec<ColumnMeasure>,
    pub kurtosis: Vec<ColumnMeasure>,
}

/// Handles statistical calculations. Missing values are always excluded.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute all statistics over the given numeric columns of `df`.
    pub fn summarize(df: &DataFrame, columns: &[&str]) -> PolarsResult<AnalysisSummary> {
        let mut named = Vec::with_capacity(columns.len());
        for name in columns {
            named.push((name.to_string(), Self::column_values(df, name)?));
        }

        let mut descriptive = Vec::with_capacity(named.len());
        let mut skewness = Vec::with_capacity(named.len());
        let mut kurtosis = Vec::with_capacity(named.len());

        for (name, values) in &named {
            let present = Self::present(values);
            debug!(column = %name, count = present.len(), "summarizing column");

            descriptive.push(Self::compute_descriptive_stats(name, &present));
            skewness.push(ColumnMeasure {
                column: name.clone(),
                value: Self::skewness(&present),
            });
            kurtosis.push(ColumnMeasure {
                column: name.clone(),
                value: Self::kurtosis(&present),
            });
        }

        Ok(AnalysisSummary {
            descriptive,
            correlation: CorrelationMatrix::pearson(&named),
            skewness,
            kurtosis,
        })
    }

    /// Read a column as nullable `f64`. `NaN` cells are reported as missing.
    pub fn column_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
        let cast = df.column(name)?.cast(&DataType::Float64)?;
        let values = cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// The non-missing values of a nullable column.
    pub fn present(values: &[Option<f64>]) -> Vec<f64> {
        values.iter().flatten().copied().collect()
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(column: &str, values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary::empty(column);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        ColumnSummary {
            column: column.to_string(),
            count: n,
            mean: values.iter().mean(),
            // Sample standard deviation; NaN for a single value.
            std: values.iter().std_dev(),
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Bias-corrected sample skewness (G1). NaN below three values.
    pub fn skewness(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 3 {
            return f64::NAN;
        }
        let (m2, m3, _) = Self::central_sums(values);
        if m2 == 0.0 {
            return 0.0;
        }

        let n = n as f64;
        (n * (n - 1.0).sqrt() / (n - 2.0)) * (m3 / m2.powf(1.5))
    }

    /// Bias-corrected sample excess kurtosis (G2). NaN below four values.
    pub fn kurtosis(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 4 {
            return f64::NAN;
        }
        let (m2, _, m4) = Self::central_sums(values);
        if m2 == 0.0 {
            return 0.0;
        }

        let n = n as f64;
        let numerator = n * (n + 1.0) * (n - 1.0) * m4;
        let denominator = (n - 2.0) * (n - 3.0) * m2 * m2;
        let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
        numerator / denominator - adjustment
    }

    /// Sums of squared, cubed and fourth-power deviations from the mean.
    fn central_sums(values: &[f64]) -> (f64, f64, f64) {
        let mean = values.iter().mean();
        values.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), x| {
            let d = x - mean;
            let d2 = d * d;
            (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
        })
    }
}
