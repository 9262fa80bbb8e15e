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
//! HTTP surface for the Ratedeck rate collector.
//!
//! Layout: `http/router.rs` (router + server host), `http/rates.rs` and
//! `http/health.rs` (handlers), `http/errors.rs` (problem responses),
//! `http/telemetry.rs` (request metrics), `state.rs` (shared handler state).

mod error;
mod http;
mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use state::{ApiState, PeriodProvider};
