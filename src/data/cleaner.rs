//! Data Cleaner Module
//! Normalizes the raw app and review tables before analysis.

use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::coerce::{coerce_dates, coerce_installs, coerce_numeric};
use super::{apps, reviews};

/// Category value of a known corrupt catalog row (its fields are shifted by one).
pub const SENTINEL_CATEGORY: &str = "1.9";

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Malformed Installs value '{value}' (expected a count like \"10,000+\")")]
    MalformedInstalls { value: String },
}

/// What to do with an `Installs` value that is not a formatted count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum InstallsPolicy {
    /// Remove the row and log it.
    #[default]
    Drop,
    /// Abort cleaning on the first malformed value.
    Fail,
}

/// Row and cell counts collected while cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub apps_loaded: usize,
    pub sentinel_rows_removed: usize,
    pub malformed_installs_removed: usize,
    pub dates_coerced_to_missing: usize,
    pub reviews_coerced_to_missing: usize,
    pub ratings_coerced_to_missing: usize,
    pub apps_retained: usize,
    pub reviews_loaded: usize,
    pub reviews_removed: usize,
    pub reviews_retained: usize,
}

/// Cleaned tables, ready for statistics and charts.
#[derive(Debug, Clone)]
pub struct CleanedData {
    pub apps: DataFrame,
    pub reviews: DataFrame,
    pub report: CleaningReport,
}

/// Applies the cleaning steps in order. Re-cleaning clean data is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner {
    installs_policy: InstallsPolicy,
}

impl DataCleaner {
    pub fn new(installs_policy: InstallsPolicy) -> Self {
        Self { installs_policy }
    }

    /// Clean both tables.
    pub fn clean(&self, apps: &DataFrame, reviews: &DataFrame) -> Result<CleanedData, CleanerError> {
        let mut report = CleaningReport::default();
        let apps = self.clean_apps(apps, &mut report)?;
        let reviews = self.clean_reviews(reviews, &mut report)?;

        info!(
            apps = report.apps_retained,
            reviews = report.reviews_retained,
            "cleaning complete"
        );

        Ok(CleanedData {
            apps,
            reviews,
            report,
        })
    }

    /// Clean the app catalog.
    ///
    /// Order matters: the sentinel row is removed before any coercion runs,
    /// since its shifted fields would otherwise count as malformed values.
    pub fn clean_apps(
        &self,
        df: &DataFrame,
        report: &mut CleaningReport,
    ) -> Result<DataFrame, CleanerError> {
        report.apps_loaded = df.height();

        let mut df = Self::drop_sentinel_category(df)?;
        report.sentinel_rows_removed = report.apps_loaded - df.height();
        debug!(removed = report.sentinel_rows_removed, "sentinel category rows");

        let (dates, lost) = coerce_dates(df.column(apps::LAST_UPDATED)?)?;
        df.with_column(dates)?;
        report.dates_coerced_to_missing = lost;

        df = self.normalize_installs(df, report)?;

        let (reviews, lost) = coerce_numeric(df.column(apps::REVIEWS)?)?;
        df.with_column(reviews)?;
        report.reviews_coerced_to_missing = lost;

        let (ratings, lost) = coerce_numeric(df.column(apps::RATING)?)?;
        df.with_column(ratings)?;
        report.ratings_coerced_to_missing = lost;

        if report.dates_coerced_to_missing
            + report.reviews_coerced_to_missing
            + report.ratings_coerced_to_missing
            > 0
        {
            debug!(
                dates = report.dates_coerced_to_missing,
                reviews = report.reviews_coerced_to_missing,
                ratings = report.ratings_coerced_to_missing,
                "cells coerced to missing"
            );
        }

        report.apps_retained = df.height();
        Ok(df)
    }

    /// Drop review rows missing the review text or its sentiment.
    pub fn clean_reviews(
        &self,
        df: &DataFrame,
        report: &mut CleaningReport,
    ) -> Result<DataFrame, CleanerError> {
        report.reviews_loaded = df.height();

        let cleaned = df
            .clone()
            .lazy()
            .filter(
                col(reviews::TRANSLATED_REVIEW)
                    .is_not_null()
                    .and(col(reviews::SENTIMENT).is_not_null()),
            )
            .collect()?;

        report.reviews_retained = cleaned.height();
        report.reviews_removed = report.reviews_loaded - report.reviews_retained;
        debug!(removed = report.reviews_removed, "incomplete review rows");

        Ok(cleaned)
    }

    fn drop_sentinel_category(df: &DataFrame) -> Result<DataFrame, CleanerError> {
        let filtered = df
            .clone()
            .lazy()
            .filter(
                col(apps::CATEGORY)
                    .neq(lit(SENTINEL_CATEGORY))
                    .or(col(apps::CATEGORY).is_null()),
            )
            .collect()?;
        Ok(filtered)
    }

    fn normalize_installs(
        &self,
        mut df: DataFrame,
        report: &mut CleaningReport,
    ) -> Result<DataFrame, CleanerError> {
        let coerced = coerce_installs(df.column(apps::INSTALLS)?)?;

        if let Some(first) = coerced.rejected.first() {
            if self.installs_policy == InstallsPolicy::Fail {
                return Err(CleanerError::MalformedInstalls {
                    value: first.clone(),
                });
            }
            warn!(
                rows = coerced.rejected.len(),
                first = %first,
                "dropping rows with malformed Installs"
            );
        }
        report.malformed_installs_removed = coerced.rejected.len();

        let keep: Vec<bool> = coerced.values.iter().map(Option::is_some).collect();
        df.with_column(Series::new(apps::INSTALLS.into(), coerced.values))?;

        if report.malformed_installs_removed == 0 {
            return Ok(df);
        }
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        Ok(df.filter(&mask)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::coerce::epoch_days_to_date;
    use chrono::Datelike;

    fn raw_apps(categories: &[&str], installs: &[&str], updated: &[&str]) -> DataFrame {
        let n = categories.len();
        df!(
            "App" => (0..n).map(|i| format!("app-{i}")).collect::<Vec<_>>(),
            apps::CATEGORY => categories,
            apps::RATING => vec!["4.1"; n],
            apps::REVIEWS => vec!["10"; n],
            apps::INSTALLS => installs,
            apps::LAST_UPDATED => updated,
        )
        .unwrap()
    }

    fn years(df: &DataFrame) -> Vec<Option<i32>> {
        let days = df
            .column(apps::LAST_UPDATED)
            .unwrap()
            .cast(&DataType::Int32)
            .unwrap();
        days.i32()
            .unwrap()
            .into_iter()
            .map(|d| d.and_then(epoch_days_to_date).map(|date| date.year()))
            .collect()
    }

    #[test]
    fn test_sentinel_row_removed_and_installs_normalized() {
        let df = raw_apps(
            &["1.9", "GAME"],
            &["Free", "1,000+"],
            &["February 11, 2018", "2018-01-01"],
        );
        let mut report = CleaningReport::default();
        let cleaned = DataCleaner::default().clean_apps(&df, &mut report).unwrap();

        assert_eq!(cleaned.height(), 1);
        assert_eq!(report.sentinel_rows_removed, 1);
        assert_eq!(report.malformed_installs_removed, 0);

        let installs: Vec<Option<i64>> = cleaned
            .column(apps::INSTALLS)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(installs, vec![Some(1000)]);
        assert_eq!(years(&cleaned), vec![Some(2018)]);
    }

    #[test]
    fn test_missing_category_is_not_the_sentinel() {
        let df = df!(
            apps::CATEGORY => &[None, Some("ART_AND_DESIGN")],
            apps::RATING => &["4.1", "3.9"],
            apps::REVIEWS => &["159", "967"],
            apps::INSTALLS => &["10,000+", "500,000+"],
            apps::LAST_UPDATED => &["January 7, 2018", "January 15, 2018"],
        )
        .unwrap();
        let mut report = CleaningReport::default();
        let cleaned = DataCleaner::default().clean_apps(&df, &mut report).unwrap();

        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_malformed_installs_dropped_by_default() {
        let df = raw_apps(
            &["GAME", "TOOLS"],
            &["Free", "5,000+"],
            &["2018-01-01", "2019-03-02"],
        );
        let mut report = CleaningReport::default();
        let cleaned = DataCleaner::default().clean_apps(&df, &mut report).unwrap();

        assert_eq!(cleaned.height(), 1);
        assert_eq!(report.malformed_installs_removed, 1);
        assert_eq!(cleaned.column(apps::INSTALLS).unwrap().null_count(), 0);
    }

    #[test]
    fn test_malformed_installs_fail_policy() {
        let df = raw_apps(&["GAME"], &["Free"], &["2018-01-01"]);
        let mut report = CleaningReport::default();
        let err = DataCleaner::new(InstallsPolicy::Fail)
            .clean_apps(&df, &mut report)
            .unwrap_err();

        match err {
            CleanerError::MalformedInstalls { value } => assert_eq!(value, "Free"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unparsable_cells_become_missing() {
        let df = df!(
            apps::CATEGORY => &["GAME", "GAME"],
            apps::RATING => &["4.5", "NaN-ish"],
            apps::REVIEWS => &["3.0M", "12"],
            apps::INSTALLS => &["100+", "100+"],
            apps::LAST_UPDATED => &["yesterday", "March 3, 2017"],
        )
        .unwrap();
        let mut report = CleaningReport::default();
        let cleaned = DataCleaner::default().clean_apps(&df, &mut report).unwrap();

        assert_eq!(cleaned.height(), 2);
        assert_eq!(cleaned.column(apps::REVIEWS).unwrap().null_count(), 1);
        assert_eq!(cleaned.column(apps::RATING).unwrap().null_count(), 1);
        assert_eq!(years(&cleaned), vec![None, Some(2017)]);
        assert_eq!(report.dates_coerced_to_missing, 1);
        assert_eq!(report.reviews_coerced_to_missing, 1);
        assert_eq!(report.ratings_coerced_to_missing, 1);
    }

    #[test]
    fn test_reviews_missing_fields_dropped() {
        let df = df!(
            reviews::TRANSLATED_REVIEW => &[Some("good"), None, Some("meh")],
            reviews::SENTIMENT => &[Some("Positive"), Some("Negative"), None],
        )
        .unwrap();
        let mut report = CleaningReport::default();
        let cleaned = DataCleaner::default().clean_reviews(&df, &mut report).unwrap();

        assert_eq!(cleaned.height(), 1);
        assert_eq!(report.reviews_removed, 2);
        let text = cleaned.column(reviews::TRANSLATED_REVIEW).unwrap();
        assert_eq!(text.str().unwrap().get(0), Some("good"));
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let apps_df = raw_apps(
            &["1.9", "GAME", "TOOLS"],
            &["Free", "1,000+", "Free"],
            &["x", "2018-01-01", "2019-01-01"],
        );
        let reviews_df = df!(
            reviews::TRANSLATED_REVIEW => &[Some("good"), None],
            reviews::SENTIMENT => &[Some("Positive"), Some("Negative")],
        )
        .unwrap();

        let cleaner = DataCleaner::default();
        let once = cleaner.clean(&apps_df, &reviews_df).unwrap();
        let twice = cleaner.clean(&once.apps, &once.reviews).unwrap();

        assert!(once.apps.equals_missing(&twice.apps));
        assert!(once.reviews.equals_missing(&twice.reviews));
        assert_eq!(twice.report.sentinel_rows_removed, 0);
        assert_eq!(twice.report.malformed_installs_removed, 0);
        assert_eq!(twice.report.reviews_removed, 0);
    }
}
