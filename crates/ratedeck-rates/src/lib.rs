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
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Exchange-rate collection for the Ratedeck service.
//!
//! Layout: `scrape.rs` (history page parsing), `source.rs` (upstream HTTP
//! access behind [`RateSource`]), `collector.rs` (per-pair fan-out),
//! `period.rs` (reporting month/year).

mod collector;
mod error;
mod period;
mod scrape;
mod source;

pub use collector::{Collection, RateCollector};
pub use error::{RatesError, Result};
pub use period::Period;
pub use scrape::{Averages, Scraper};
pub use source::{HttpRateSource, Pair, RateSource, SourceConfig, SpotRates};
