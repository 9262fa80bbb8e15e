//! HTTP client helpers (REST).

use crate::core::rates::{rates_path, resolve_api_base};
use gloo::utils::{document, window};
use gloo_net::http::Request;
use ratedeck_api_models::{Currency, CurrencyRate, ProblemDetails};

const API_META_SELECTOR: &str = "meta[name=\"ratedeck-api\"]";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Client pointed at the `ratedeck-api` meta tag, or the page origin without one.
    pub(crate) fn from_document() -> Self {
        let configured = document()
            .query_selector(API_META_SELECTOR)
            .ok()
            .flatten()
            .and_then(|meta| meta.get_attribute("content"));
        let origin = window().location().origin().unwrap_or_default();
        Self::new(resolve_api_base(configured.as_deref(), &origin))
    }

    pub(crate) async fn fetch_rates(&self, base: Currency) -> anyhow::Result<Vec<CurrencyRate>> {
        let response = Request::get(&format!("{}{}", self.base_url, rates_path(base)))
            .send()
            .await?;
        if !response.ok() {
            let status = response.status();
            let detail = response
                .json::<ProblemDetails>()
                .await
                .ok()
                .and_then(|problem| problem.detail)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            anyhow::bail!(detail);
        }
        Ok(response.json::<Vec<CurrencyRate>>().await?)
    }
}
