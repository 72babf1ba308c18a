//! Value coercion for the cleaner.
//!
//! Every coercion substitutes a null for a value it cannot convert; the
//! column-level helpers also return how many non-null cells were lost so the
//! cleaner can log it.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// `NaiveDate::num_days_from_ce` of 1970-01-01, the epoch of Polars' `Date`.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y",
    "%b %d, %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a finite number. Anything else (`"3.0M"`, `"Varies"`, `"inf"`) is `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an install count such as `"10,000+"` into `10000`.
pub fn parse_installs(raw: &str) -> Option<u64> {
    let cleaned: String = raw.chars().filter(|c| *c != '+' && *c != ',').collect();
    cleaned.trim().parse::<u64>().ok()
}

/// Parse a date in one of the accepted layouts.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Days since 1970-01-01, the physical representation of a Polars `Date`.
pub(crate) fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`date_to_epoch_days`].
pub(crate) fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Coerce a column to `Float64`, returning the number of cells lost.
pub(crate) fn coerce_numeric(column: &Column) -> PolarsResult<(Series, usize)> {
    if column.dtype() != &DataType::String {
        let cast = column.cast(&DataType::Float64)?;
        return Ok((cast.as_materialized_series().clone(), 0));
    }

    let mut lost = 0;
    let values: Vec<Option<f64>> = column
        .str()?
        .into_iter()
        .map(|opt| {
            let parsed = opt.and_then(parse_numeric);
            if opt.is_some() && parsed.is_none() {
                lost += 1;
            }
            parsed
        })
        .collect();

    Ok((Series::new(column.name().clone(), values), lost))
}

/// Coerce a column to `Date`, returning the number of cells lost.
pub(crate) fn coerce_dates(column: &Column) -> PolarsResult<(Series, usize)> {
    if column.dtype() != &DataType::String {
        let cast = column.cast(&DataType::Date)?;
        return Ok((cast.as_materialized_series().clone(), 0));
    }

    let mut lost = 0;
    let days: Vec<Option<i32>> = column
        .str()?
        .into_iter()
        .map(|opt| {
            let parsed = opt.and_then(parse_date).map(date_to_epoch_days);
            if opt.is_some() && parsed.is_none() {
                lost += 1;
            }
            parsed
        })
        .collect();

    Series::new(column.name().clone(), days)
        .cast(&DataType::Date)
        .map(|series| (series, lost))
}

/// Install counts per row, plus the raw text of every row that did not parse.
///
/// A row is valid exactly when its value is `Some`.
pub(crate) struct CoercedInstalls {
    pub values: Vec<Option<i64>>,
    pub rejected: Vec<String>,
}

pub(crate) fn coerce_installs(column: &Column) -> PolarsResult<CoercedInstalls> {
    let mut rejected = Vec::new();

    let values: Vec<Option<i64>> = if column.dtype() == &DataType::String {
        column
            .str()?
            .into_iter()
            .map(|opt| {
                let parsed = opt
                    .and_then(parse_installs)
                    .and_then(|v| i64::try_from(v).ok());
                if parsed.is_none() {
                    rejected.push(opt.unwrap_or("<missing>").to_string());
                }
                parsed
            })
            .collect()
    } else {
        let cast = column.cast(&DataType::Int64)?;
        cast.i64()?
            .into_iter()
            .map(|opt| match opt {
                Some(v) if v >= 0 => Some(v),
                other => {
                    rejected.push(other.map_or("<missing>".to_string(), |v| v.to_string()));
                    None
                }
            })
            .collect()
    };

    Ok(CoercedInstalls { values, rejected })
}
