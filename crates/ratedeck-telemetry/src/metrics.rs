//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes only the counters the rate service reports on.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::{Result, TelemetryError};

/// Outcome label recorded for each collected currency pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// The pair produced a rate row.
    Collected,
    /// The pair was skipped after an upstream failure.
    Skipped,
}

impl PairOutcome {
    const fn as_label(self) -> &'static str {
        match self {
            Self::Collected => "collected",
            Self::Skipped => "skipped",
        }
    }
}

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    rate_pairs_total: IntCounterVec,
}

/// Snapshot of the collector counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Pairs that produced a rate row.
    pub pairs_collected_total: u64,
    /// Pairs skipped after an upstream failure.
    pub pairs_skipped_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "http_requests_total",
            source,
        })?;
        let rate_pairs_total = IntCounterVec::new(
            Opts::new(
                "rate_pairs_total",
                "Currency pairs processed by the collector, by outcome",
            ),
            &["outcome"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "rate_pairs_total",
            source,
        })?;

        registry
            .register(Box::new(http_requests_total.clone()))
            .map_err(|source| TelemetryError::MetricsRegister {
                name: "http_requests_total",
                source,
            })?;
        registry
            .register(Box::new(rate_pairs_total.clone()))
            .map_err(|source| TelemetryError::MetricsRegister {
                name: "rate_pairs_total",
                source,
            })?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                rate_pairs_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Record `count` collector pairs with the given outcome.
    pub fn add_rate_pairs(&self, outcome: PairOutcome, count: usize) {
        let count = u64::try_from(count).unwrap_or(u64::MAX);
        self.inner
            .rate_pairs_total
            .with_label_values(&[outcome.as_label()])
            .inc_by(count);
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Take a point-in-time snapshot of the collector counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counter = |outcome: PairOutcome| {
            self.inner
                .rate_pairs_total
                .with_label_values(&[outcome.as_label()])
                .get()
        };
        MetricsSnapshot {
            pairs_collected_total: counter(PairOutcome::Collected),
            pairs_skipped_total: counter(PairOutcome::Skipped),
        }
    }
}
