//! Reporting period used to pick the history page and month footer.

use chrono::{Datelike, Local, NaiveDate};

/// Calendar year plus English month name (`"March"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Four-digit year used in the history page URL.
    pub year: i32,
    /// Full English month name matched against month footers.
    pub month: String,
}

impl Period {
    /// Period for the local date at call time.
    #[must_use]
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Period containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.format("%B").to_string(),
        }
    }
}
