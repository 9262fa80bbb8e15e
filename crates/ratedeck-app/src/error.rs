//! # Design
//!
//! - Centralize application-level errors for configuration and bootstrap.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration values were invalid.
    #[error("invalid configuration")]
    InvalidConfig {
        /// Environment variable that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value.
        value: Option<String>,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: ratedeck_telemetry::TelemetryError,
    },
    /// Rate collector construction failed.
    #[error("rate collector operation failed")]
    Rates {
        /// Operation identifier.
        operation: &'static str,
        /// Source collector error.
        source: ratedeck_rates::RatesError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: ratedeck_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn telemetry(
        operation: &'static str,
        source: ratedeck_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn rates(operation: &'static str, source: ratedeck_rates::RatesError) -> Self {
        Self::Rates { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: ratedeck_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}
