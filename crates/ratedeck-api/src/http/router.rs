//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, Request, header::CONTENT_TYPE},
    routing::get,
};
use ratedeck_telemetry::build_sha;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::health::{health, metrics};
use crate::http::rates::list_rates;
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::ApiState;

/// Axum router wrapper that hosts the Ratedeck API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Wire routes, tracing, request ids, metrics and CORS around `state`.
    #[must_use]
    pub fn new(state: ApiState) -> Self {
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(ratedeck_telemetry::propagate_request_id_layer())
            .layer(ratedeck_telemetry::set_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(state.telemetry.clone()));

        let router = Self::build_router()
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    fn build_router() -> Router<ApiState> {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route("/v1/rates/{currency}", get(list_rates))
    }

    /// Serve the API on the supplied address until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> ApiServerResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        tracing::info!(addr = %addr, "api listening");
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }

    #[cfg(test)]
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::StatusCode;
    use ratedeck_api_models::{Currency, CurrencyRate, HealthResponse, ProblemDetails};
    use ratedeck_rates::{
        Pair, Period, RateCollector, RateSource, RatesError, Scraper, SpotRates,
    };
    use ratedeck_telemetry::Metrics;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StaticSource {
        fail: bool,
    }

    #[async_trait]
    impl RateSource for StaticSource {
        async fn history_page(&self, pair: Pair, _year: i32) -> ratedeck_rates::Result<String> {
            if self.fail {
                return Err(RatesError::HttpStatus {
                    url: format!("history/{}", pair.quote),
                    status: 500,
                });
            }
            Ok(r#"<table class="history-rate-summary">
                    <tr><td>Average:</td><td>0.5000</td></tr></table>
                  <div class="month-footer">May <span class="nowrap">0.4000</span></div>"#
                .to_string())
        }

        async fn spot_rates(&self, base: Currency) -> ratedeck_rates::Result<SpotRates> {
            Ok(base.counterparts().map(|quote| (quote, 0.45)).collect())
        }
    }

    fn server(fail: bool) -> anyhow::Result<(ApiServer, Metrics)> {
        let metrics = Metrics::new()?;
        let collector = RateCollector::new(Arc::new(StaticSource { fail }), Scraper::new()?);
        let state = ApiState::with_period(
            collector,
            metrics.clone(),
            Arc::new(|| Period {
                year: 2024,
                month: "May".to_string(),
            }),
        );
        Ok((ApiServer::new(state), metrics))
    }

    async fn get(server: &ApiServer, uri: &str) -> anyhow::Result<(StatusCode, Vec<u8>)> {
        let response = server
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty())?)
            .await?;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, body.to_vec()))
    }

    #[tokio::test]
    async fn rates_route_returns_rows_for_counterparts() -> anyhow::Result<()> {
        let (server, metrics) = server(false)?;
        let (status, body) = get(&server, "/v1/rates/USD").await?;

        assert_eq!(status, StatusCode::OK);
        let rows: Vec<CurrencyRate> = serde_json::from_slice(&body)?;
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|row| row.from == "usd" && row.to != "usd"));
        assert!((rows[0].ytd - 0.5).abs() < f64::EPSILON);
        assert!((rows[0].mtd - 0.4).abs() < f64::EPSILON);
        assert!((rows[0].rate - 0.45).abs() < f64::EPSILON);
        assert_eq!(metrics.snapshot().pairs_collected_total, 5);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_currency_is_a_bad_request() -> anyhow::Result<()> {
        let (server, _) = server(false)?;
        let (status, body) = get(&server, "/v1/rates/btc").await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let problem: ProblemDetails = serde_json::from_slice(&body)?;
        assert_eq!(problem.status, 400);
        assert!(problem.detail.unwrap_or_default().contains("btc"));
        Ok(())
    }

    #[tokio::test]
    async fn empty_collection_is_a_bad_gateway() -> anyhow::Result<()> {
        let (server, metrics) = server(true)?;
        let (status, body) = get(&server, "/v1/rates/eur").await?;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let problem: ProblemDetails = serde_json::from_slice(&body)?;
        assert_eq!(problem.detail.as_deref(), Some("No results found."));
        assert_eq!(metrics.snapshot().pairs_skipped_total, 5);
        Ok(())
    }

    #[tokio::test]
    async fn health_and_metrics_are_public() -> anyhow::Result<()> {
        let (server, _) = server(false)?;
        let (status, body) = get(&server, "/health").await?;
        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_slice(&body)?;
        assert_eq!(health.status, "ok");

        let (status, body) = get(&server, "/metrics").await?;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body)?.contains("http_requests_total"));
        Ok(())
    }
}
