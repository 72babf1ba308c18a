//! Chart data preparation.
//! Turns cleaned tables into the plain series each chart draws.

use chrono::Datelike;
use polars::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};

use crate::data::epoch_days_to_date;

/// Equal-width histogram over the data range.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl HistogramBins {
    pub fn lower(&self) -> f64 {
        self.edges[0]
    }

    pub fn upper(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper() - self.lower()) / self.counts.len() as f64
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(left edge, right edge, count)` per bin.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }
}

/// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// The last bin is closed on the right. A constant sample is centered in a
/// unit-wide range and an empty one spans `[0, 1]`.
pub fn histogram_bins(values: &[f64], bins: usize) -> HistogramBins {
    let bins = bins.max(1);
    let (lo, hi) = match values.iter().copied().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    }) {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
        Some(range) => range,
    };

    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    edges[bins] = hi;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    HistogramBins { edges, counts }
}

/// Gaussian kernel density estimate at each grid point (Scott's bandwidth).
///
/// Empty when the sample has fewer than two values or no spread.
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return Vec::new();
    }
    let std = values.iter().std_dev();
    if std.is_nan() || std <= 0.0 {
        return Vec::new();
    }
    let Ok(kernel) = Normal::new(0.0, 1.0) else {
        return Vec::new();
    };

    let bandwidth = std * (n as f64).powf(-0.2);
    grid.iter()
        .map(|&x| {
            let sum: f64 = values
                .iter()
                .map(|&xi| kernel.pdf((x - xi) / bandwidth))
                .sum();
            sum / (n as f64 * bandwidth)
        })
        .collect()
}

/// KDE evaluated across the histogram range, scaled from density to counts.
pub fn kde_curve(values: &[f64], bins: &HistogramBins, points: usize) -> Vec<(f64, f64)> {
    let points = points.max(2);
    let step = (bins.upper() - bins.lower()) / (points - 1) as f64;
    let grid: Vec<f64> = (0..points).map(|i| bins.lower() + step * i as f64).collect();
    let scale = values.len() as f64 * bins.bin_width();

    gaussian_kde(values, &grid)
        .into_iter()
        .zip(grid)
        .map(|(density, x)| (x, density * scale))
        .collect()
}

/// Occurrences of each non-missing label, most frequent first.
///
/// Ties are ordered by label so the output is deterministic.
pub fn value_counts<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// [`value_counts`] over a text column of `df`.
pub fn column_value_counts(df: &DataFrame, column: &str) -> PolarsResult<Vec<(String, usize)>> {
    let text = df.column(column)?.cast(&DataType::String)?;
    Ok(value_counts(text.str()?.into_iter()))
}

/// One wedge of the sentiment pie. Angles are degrees, counterclockwise from +x.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
    pub start_deg: f64,
    pub end_deg: f64,
    pub exploded: bool,
}

impl PieSlice {
    pub fn mid_deg(&self) -> f64 {
        (self.start_deg + self.end_deg) / 2.0
    }
}

/// Lay out wedges counterclockwise from `start_deg`, exploding the slice named `explode`.
pub fn pie_slices(counts: &[(String, usize)], start_deg: f64, explode: &str) -> Vec<PieSlice> {
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut angle = start_deg;
    counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| {
            let fraction = *count as f64 / total as f64;
            let start = angle;
            angle += fraction * 360.0;
            PieSlice {
                label: label.clone(),
                count: *count,
                fraction,
                start_deg: start,
                end_deg: angle,
                exploded: label == explode,
            }
        })
        .collect()
}

/// Count dated rows per calendar year, years ascending. Missing dates are skipped.
pub fn count_years(years: impl IntoIterator<Item = Option<i32>>) -> BTreeMap<i32, usize> {
    let mut per_year = BTreeMap::new();
    for year in years.into_iter().flatten() {
        *per_year.entry(year).or_insert(0) += 1;
    }
    per_year
}

/// [`count_years`] over a `Date` column of `df`.
pub fn apps_per_year(df: &DataFrame, column: &str) -> PolarsResult<BTreeMap<i32, usize>> {
    let days = df.column(column)?.cast(&DataType::Int32)?;
    let years = days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(epoch_days_to_date).map(|date| date.year()));
    Ok(count_years(years))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_histogram_bins_cover_all_values() {
        let values = [1.0, 1.5, 2.0, 4.9, 5.0, 3.3, 3.3];
        let bins = histogram_bins(&values, 20);

        assert_eq!(bins.counts.len(), 20);
        assert_eq!(bins.edges.len(), 21);
        assert_eq!(bins.total(), values.len());
        assert_eq!(bins.lower(), 1.0);
        assert_eq!(bins.upper(), 5.0);
        // The maximum lands in the last, right-closed bin.
        assert_eq!(bins.counts[19], 2);
        assert_eq!(bins.counts[0], 1);
    }

    #[test]
    fn test_histogram_degenerate_ranges() {
        let constant = histogram_bins(&[4.0, 4.0], 20);
        assert_eq!(constant.lower(), 3.5);
        assert_eq!(constant.upper(), 4.5);
        assert_eq!(constant.total(), 2);

        let empty = histogram_bins(&[], 20);
        assert_eq!(empty.lower(), 0.0);
        assert_eq!(empty.upper(), 1.0);
        assert_eq!(empty.total(), 0);
    }

    #[test]
    fn test_kde_integrates_to_about_one() {
        let values = [3.9, 4.1, 4.3, 4.4, 4.5, 4.7, 4.2, 3.5];
        let grid: Vec<f64> = (0..=600).map(|i| i as f64 * 0.01).collect();
        let density = gaussian_kde(&values, &grid);

        let area: f64 = density.iter().sum::<f64>() * 0.01;
        assert!((area - 1.0).abs() < 0.01, "area was {area}");
    }

    #[test]
    fn test_kde_needs_spread() {
        assert!(gaussian_kde(&[4.0], &[4.0]).is_empty());
        assert!(gaussian_kde(&[4.0, 4.0, 4.0], &[4.0]).is_empty());
    }

    #[test]
    fn test_value_counts_descending() {
        let counts = value_counts([
            Some("GAME"),
            Some("TOOLS"),
            None,
            Some("GAME"),
            Some("FAMILY"),
            Some("TOOLS"),
            Some("GAME"),
        ]);

        assert_eq!(
            counts,
            vec![
                ("GAME".to_string(), 3),
                ("TOOLS".to_string(), 2),
                ("FAMILY".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_pie_explodes_by_name_not_position() {
        let counts = vec![
            ("Negative".to_string(), 50),
            ("Positive".to_string(), 30),
            ("Neutral".to_string(), 20),
        ];
        let slices = pie_slices(&counts, 140.0, "Positive");

        assert_eq!(slices.len(), 3);
        assert!(!slices[0].exploded);
        assert!(slices[1].exploded);
        assert!(!slices[2].exploded);
        assert_eq!(slices[0].start_deg, 140.0);
        assert!((slices[2].end_deg - 500.0).abs() < 1e-9);
        assert!((slices[0].fraction - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_count_years_ascending() {
        let per_year = count_years([Some(2019), Some(2018), None, Some(2018)]);

        assert_eq!(per_year.into_iter().collect::<Vec<_>>(), vec![(2018, 2), (2019, 1)]);
    }

    #[test]
    fn test_apps_per_year_reads_date_column() {
        let days = Series::new("Last Updated".into(), &[Some(17_532i32), None, Some(17_900)])
            .cast(&DataType::Date)
            .unwrap();
        let df = DataFrame::new(vec![days.into()]).unwrap();

        let per_year = apps_per_year(&df, "Last Updated").unwrap();
        assert_eq!(per_year.into_iter().collect::<Vec<_>>(), vec![(2018, 1), (2019, 1)]);
    }
}
