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

//! Ratedeck server bootstrap wiring.
//!
//! Layout: `config.rs` (environment parsing), `bootstrap.rs` (service wiring).

/// Server boot sequence.
pub mod bootstrap;
/// Environment-driven configuration.
pub mod config;
mod error;

pub use bootstrap::run_app;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
