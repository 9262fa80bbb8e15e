//! Upstream access: history pages and spot rates.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use ratedeck_api_models::Currency;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{RatesError, Result};

/// Base and quote currency of one collected row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    /// Currency the rate is expressed from.
    pub base: Currency,
    /// Currency the rate is expressed in.
    pub quote: Currency,
}

/// Source of raw exchange-rate data.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the HTML history page for `pair` in `year`.
    async fn history_page(&self, pair: Pair, year: i32) -> Result<String>;
    /// Fetch the current spot rates quoted against `base`.
    async fn spot_rates(&self, base: Currency) -> Result<SpotRates>;
}

/// Endpoints and timeout for [`HttpRateSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Origin serving `/exchange-rate-history/{base}-{quote}-{year}`.
    pub history_url: String,
    /// Origin serving `/v6/latest/{BASE}`.
    pub spot_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            history_url: "https://www.exchange-rates.org".to_string(),
            spot_url: "https://open.er-api.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Spot rates for one base currency, keyed by upper-case quote code.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpotRates {
    rates: HashMap<String, f64>,
}

impl SpotRates {
    /// Rate for `quote`; `0.0` when the upstream did not list it.
    #[must_use]
    pub fn rate(&self, quote: Currency) -> f64 {
        self.rates
            .get(&quote.code().to_uppercase())
            .copied()
            .unwrap_or(0.0)
    }
}

impl FromIterator<(Currency, f64)> for SpotRates {
    fn from_iter<I: IntoIterator<Item = (Currency, f64)>>(iter: I) -> Self {
        Self {
            rates: iter
                .into_iter()
                .map(|(quote, rate)| (quote.code().to_uppercase(), rate))
                .collect(),
        }
    }
}

/// [`RateSource`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: Client,
    config: SourceConfig,
}

impl HttpRateSource {
    /// Build the client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RatesError::ClientBuild`] if the TLS backend cannot be initialised.
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| RatesError::ClientBuild { source })?;
        Ok(Self { client, config })
    }

    fn history_url(&self, pair: Pair, year: i32) -> String {
        format!(
            "{}/exchange-rate-history/{}-{}-{year}",
            self.config.history_url.trim_end_matches('/'),
            pair.base.code(),
            pair.quote.code(),
        )
    }

    fn spot_url(&self, base: Currency) -> String {
        format!(
            "{}/v6/latest/{}",
            self.config.spot_url.trim_end_matches('/'),
            base.code().to_uppercase(),
        )
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        debug!(url, "requesting upstream");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| RatesError::Http {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(RatesError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn history_page(&self, pair: Pair, year: i32) -> Result<String> {
        let url = self.history_url(pair, year);
        self.get(&url)
            .await?
            .text()
            .await
            .map_err(|source| RatesError::Decode { url, source })
    }

    async fn spot_rates(&self, base: Currency) -> Result<SpotRates> {
        let url = self.spot_url(base);
        self.get(&url)
            .await?
            .json()
            .await
            .map_err(|source| RatesError::Decode { url, source })
    }
}
