//! Exchange-rate endpoints.

use axum::{
    Json,
    extract::{Path, State},
};
use ratedeck_api_models::{Currency, CurrencyRate};
use ratedeck_rates::RatesError;
use ratedeck_telemetry::PairOutcome;
use tracing::{info, warn};

use crate::http::errors::ApiError;
use crate::state::ApiState;

/// `GET /v1/rates/{currency}`: rows for every tracked counterpart of `currency`.
pub(crate) async fn list_rates(
    State(state): State<ApiState>,
    Path(currency): Path<String>,
) -> Result<Json<Vec<CurrencyRate>>, ApiError> {
    let base: Currency = currency
        .parse()
        .map_err(|_| ApiError::bad_request(format!("unknown currency '{currency}'")))?;
    let period = (state.period)();
    info!(base = %base, year = period.year, month = %period.month, "collecting rates");

    match state.collector.collect(base, &period).await {
        Ok(collection) => {
            state
                .telemetry
                .add_rate_pairs(PairOutcome::Collected, collection.rates.len());
            state
                .telemetry
                .add_rate_pairs(PairOutcome::Skipped, collection.skipped.len());
            Ok(Json(collection.rates))
        }
        Err(err @ RatesError::NoResults { .. }) => {
            state
                .telemetry
                .add_rate_pairs(PairOutcome::Skipped, base.counterparts().count());
            warn!(base = %base, error = %err, "no rates collected");
            Err(ApiError::upstream_unavailable("No results found."))
        }
        Err(err) => {
            warn!(base = %base, error = %err, "rate collection failed");
            Err(ApiError::internal("rate collection failed"))
        }
    }
}
