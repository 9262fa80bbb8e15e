//! Shared handler state.

use std::sync::Arc;

use ratedeck_rates::{Period, RateCollector};
use ratedeck_telemetry::Metrics;

/// Yields the reporting period for a request.
pub type PeriodProvider = Arc<dyn Fn() -> Period + Send + Sync>;

/// State shared by every handler.
#[derive(Clone)]
pub struct ApiState {
    pub(crate) collector: RateCollector,
    pub(crate) telemetry: Metrics,
    pub(crate) period: PeriodProvider,
}

impl ApiState {
    /// State that reports on the current local month.
    #[must_use]
    pub fn new(collector: RateCollector, telemetry: Metrics) -> Self {
        Self::with_period(collector, telemetry, Arc::new(Period::current))
    }

    /// State with an explicit period source.
    #[must_use]
    pub fn with_period(collector: RateCollector, telemetry: Metrics, period: PeriodProvider) -> Self {
        Self {
            collector,
            telemetry,
            period,
        }
    }
}
