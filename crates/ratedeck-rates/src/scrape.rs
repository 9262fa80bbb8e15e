//! History page parsing.
//!
//! The history page carries a yearly summary table (`.history-rate-summary`)
//! with an `Average:` row, and one `.month-footer` cell per month whose last
//! `.nowrap` span holds the monthly average (e.g. `¥1 = €0.1289`).

use regex::Regex;
use select::document::Document;
use select::predicate::{Class, Name};

use crate::error::{RatesError, Result};

const NUMBER_PATTERN: &str = r"\d+\.\d+";

/// Year-to-date and month-to-date averages; `0.0` when not found.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Averages {
    /// Year-to-date average.
    pub ytd: f64,
    /// Month-to-date average for the requested month.
    pub mtd: f64,
}

/// Parser for exchange-rate history pages.
#[derive(Debug, Clone)]
pub struct Scraper {
    number: Regex,
}

impl Scraper {
    /// Compile the scraping patterns.
    ///
    /// # Errors
    ///
    /// Returns [`RatesError::RegexCompile`] if a pattern is invalid.
    pub fn new() -> Result<Self> {
        let number = Regex::new(NUMBER_PATTERN).map_err(|source| RatesError::RegexCompile {
            pattern: NUMBER_PATTERN,
            source,
        })?;
        Ok(Self { number })
    }

    /// First decimal number (`digits.digits`) in `text`.
    #[must_use]
    pub fn extract_first_number(&self, text: &str) -> Option<f64> {
        self.number
            .find(text)
            .and_then(|found| found.as_str().parse::<f64>().ok())
    }

    /// Extract the yearly and monthly averages from a history page.
    ///
    /// `month` is matched case-insensitively against the month footers.
    #[must_use]
    pub fn extract_average_values(&self, html: &str, month: &str) -> Averages {
        let document = Document::from(html);
        Averages {
            ytd: self.ytd_average(&document).unwrap_or(0.0),
            mtd: self.mtd_average(&document, month).unwrap_or(0.0),
        }
    }

    fn ytd_average(&self, document: &Document) -> Option<f64> {
        let summary = document.find(Class("history-rate-summary")).next()?;
        let row = summary
            .find(Name("tr"))
            .find(|row| row.text().contains("Average:"))?;
        let cell = row.find(Name("td")).nth(1)?;
        self.extract_first_number(&cell.text())
    }

    fn mtd_average(&self, document: &Document, month: &str) -> Option<f64> {
        let month = month.to_lowercase();
        let footer = document
            .find(Class("month-footer"))
            .find(|footer| footer.text().to_lowercase().contains(&month))?;
        let average = footer.find(Class("nowrap")).last()?;
        self.extract_first_number(&average.text())
    }
}
