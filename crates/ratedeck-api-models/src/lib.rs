#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the Ratedeck public API.
//!
//! The web UI decodes these types from the server responses, so they stay free
//! of runtime dependencies and compile for both native and wasm targets.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// RFC9457-compatible problem document surfaced on validation/runtime errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    /// URI reference identifying the problem type.
    pub kind: String,
    /// Short, human-readable summary of the issue.
    pub title: String,
    /// HTTP status code associated with the error.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Detailed diagnostic message when available.
    pub detail: Option<String>,
}

/// Liveness payload returned by `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Always `ok` while the process is serving.
    pub status: String,
    /// Build identifier recorded at startup.
    pub build: String,
}

/// Exchange rate summary for one currency pair.
///
/// `mtd` and `ytd` are averages scraped from the history page for the current
/// month and year; values that could not be found are reported as `0.0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencyRate {
    /// Base currency code (lower-case).
    pub from: String,
    /// Quote currency code (lower-case).
    pub to: String,
    /// Current spot rate.
    pub rate: f64,
    /// Month-to-date average.
    pub mtd: f64,
    /// Year-to-date average.
    pub ytd: f64,
}

/// Currencies tracked by the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// US dollar.
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
    /// Japanese yen.
    Jpy,
    /// Swiss franc.
    Chf,
    /// Chinese yuan.
    Cny,
}

impl Currency {
    /// Every tracked currency in display order.
    pub const ALL: [Self; 6] = [
        Self::Usd,
        Self::Eur,
        Self::Gbp,
        Self::Jpy,
        Self::Chf,
        Self::Cny,
    ];

    /// Lower-case ISO 4217 code used in URLs and payloads.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Eur => "eur",
            Self::Gbp => "gbp",
            Self::Jpy => "jpy",
            Self::Chf => "chf",
            Self::Cny => "cny",
        }
    }

    /// Tracked currencies other than `self`, in display order.
    pub fn counterparts(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |other| *other != self)
    }
}

impl Display for Currency {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.code())
    }
}

/// Returned when a currency code is not tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCurrency {
    /// The rejected input.
    pub value: String,
}

impl Display for UnknownCurrency {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("unknown currency code")
    }
}

impl std::error::Error for UnknownCurrency {}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|currency| currency.code() == normalized)
            .ok_or_else(|| UnknownCurrency {
                value: value.to_string(),
            })
    }
}
