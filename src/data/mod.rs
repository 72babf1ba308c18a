//! Data module - CSV loading and cleaning

mod cleaner;
mod coerce;
mod loader;

pub use cleaner::{CleanedData, CleanerError, CleaningReport, DataCleaner, InstallsPolicy};
pub use coerce::{parse_date, parse_installs, parse_numeric};
pub(crate) use coerce::epoch_days_to_date;
pub use loader::{DataLoader, LoaderError, PANDAS_NA_VALUES};

/// Column names of the app catalog.
pub mod apps {
    pub const CATEGORY: &str = "Category";
    pub const RATING: &str = "Rating";
    pub const REVIEWS: &str = "Reviews";
    pub const INSTALLS: &str = "Installs";
    pub const LAST_UPDATED: &str = "Last Updated";

    pub const REQUIRED: [&str; 5] = [CATEGORY, RATING, REVIEWS, INSTALLS, LAST_UPDATED];

    /// Numeric columns the statistics are computed over, in report order.
    pub const NUMERIC: [&str; 3] = [RATING, REVIEWS, INSTALLS];
}

/// Column names of the user review table.
pub mod reviews {
    pub const TRANSLATED_REVIEW: &str = "Translated_Review";
    pub const SENTIMENT: &str = "Sentiment";

    pub const REQUIRED: [&str; 2] = [TRANSLATED_REVIEW, SENTIMENT];
}
