use std::sync::Arc;

use ratedeck_api::{ApiServer, ApiState};
use ratedeck_rates::{HttpRateSource, RateCollector, Scraper};
use ratedeck_telemetry::{GlobalContextGuard, Metrics};
use tracing::info;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Entry point for the Ratedeck server boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, telemetry, collector construction or
/// the API listener fails.
pub async fn run_app() -> AppResult<()> {
    let config = AppConfig::from_env()?;
    run_app_with(config).await
}

/// Boot sequence driven entirely by the supplied configuration.
pub(crate) async fn run_app_with(config: AppConfig) -> AppResult<()> {
    ratedeck_telemetry::init_logging(&config.logging())
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("bootstrap");
    info!("Ratedeck bootstrap starting");

    let api = build_api(&config)?;
    info!(addr = %config.listen, "Launching API listener");
    api.serve(config.listen)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn build_api(config: &AppConfig) -> AppResult<ApiServer> {
    let metrics =
        Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
    let source = HttpRateSource::new(config.source.clone())
        .map_err(|err| AppError::rates("rate_source.new", err))?;
    let scraper = Scraper::new().map_err(|err| AppError::rates("scraper.new", err))?;
    let collector = RateCollector::new(Arc::new(source), scraper);
    Ok(ApiServer::new(ApiState::new(collector, metrics)))
}
