//! # Design
//!
//! - Keep error messages constant; carry the URL or currency as context fields.
//! - Preserve reqwest/regex sources without logging at the construction site.

use ratedeck_api_models::Currency;
use thiserror::Error;

/// Result alias for rate collection operations.
pub type Result<T> = std::result::Result<T, RatesError>;

/// Errors raised while collecting exchange rates.
#[derive(Debug, Error)]
pub enum RatesError {
    /// A scraping pattern failed to compile.
    #[error("regex compilation failed")]
    RegexCompile {
        /// Pattern that failed.
        pattern: &'static str,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// The HTTP client could not be built.
    #[error("http client construction failed")]
    ClientBuild {
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The upstream request failed before a response arrived.
    #[error("http request failed")]
    Http {
        /// Requested URL.
        url: String,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The upstream answered with a non-success status.
    #[error("http response status error")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Status code returned.
        status: u16,
    },
    /// The upstream body could not be read or decoded.
    #[error("response decoding failed")]
    Decode {
        /// Requested URL.
        url: String,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// Every pair failed for the requested base currency.
    #[error("no rates collected")]
    NoResults {
        /// Base currency requested.
        base: Currency,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_are_constant() {
        let no_results = RatesError::NoResults {
            base: Currency::Usd,
        };
        assert_eq!(no_results.to_string(), "no rates collected");
        assert!(no_results.source().is_none());

        let status = RatesError::HttpStatus {
            url: "http://localhost/x".into(),
            status: 503,
        };
        assert_eq!(status.to_string(), "http response status error");
    }

    #[test]
    fn regex_errors_keep_their_source() {
        let Err(source) = regex::Regex::new("(") else {
            panic!("unbalanced pattern should not compile");
        };
        let err = RatesError::RegexCompile {
            pattern: "(",
            source,
        };
        assert!(err.source().is_some());
    }
}
