//! Environment-driven server configuration.
//!
//! Every variable is optional; parsing is kept separate from the process
//! environment so the rules can be exercised with a plain map.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ratedeck_rates::SourceConfig;
use ratedeck_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig};

use crate::error::{AppError, AppResult};

const ENV_BIND_ADDR: &str = "RATEDECK_BIND_ADDR";
const ENV_HTTP_PORT: &str = "RATEDECK_HTTP_PORT";
const ENV_HISTORY_URL: &str = "RATEDECK_HISTORY_URL";
const ENV_SPOT_URL: &str = "RATEDECK_SPOT_URL";
const ENV_HTTP_TIMEOUT_SECS: &str = "RATEDECK_HTTP_TIMEOUT_SECS";
const ENV_LOG_LEVEL: &str = "RATEDECK_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "RATEDECK_LOG_FORMAT";
const ENV_BUILD_SHA: &str = "RATEDECK_BUILD_SHA";

const DEFAULT_HTTP_PORT: u16 = 7171;

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the API listens on.
    pub listen: SocketAddr,
    /// Upstream endpoints and timeout for the collector.
    pub source: SourceConfig,
    /// Log level passed to the subscriber when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Build identifier recorded in logs and `/health`.
    pub build_sha: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] for unparsable or out-of-range values.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps variable names to values.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] for unparsable or out-of-range values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = SourceConfig::default();

        let bind_addr = match read(ENV_BIND_ADDR) {
            Some(value) => value.parse::<IpAddr>().map_err(|_| AppError::InvalidConfig {
                field: ENV_BIND_ADDR,
                reason: "not_an_ip_address",
                value: Some(value),
            })?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match read(ENV_HTTP_PORT) {
            Some(value) => value.parse::<u16>().map_err(|_| AppError::InvalidConfig {
                field: ENV_HTTP_PORT,
                reason: "out_of_range",
                value: Some(value.clone()),
            })?,
            None => DEFAULT_HTTP_PORT,
        };
        if port == 0 {
            return Err(AppError::InvalidConfig {
                field: ENV_HTTP_PORT,
                reason: "zero",
                value: Some(port.to_string()),
            });
        }

        let timeout = match read(ENV_HTTP_TIMEOUT_SECS) {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(AppError::InvalidConfig {
                        field: ENV_HTTP_TIMEOUT_SECS,
                        reason: "not_a_positive_integer",
                        value: Some(value),
                    });
                }
            },
            None => defaults.timeout,
        };

        let history_url = read(ENV_HISTORY_URL).unwrap_or(defaults.history_url);
        let spot_url = read(ENV_SPOT_URL).unwrap_or(defaults.spot_url);
        for (field, url) in [(ENV_HISTORY_URL, &history_url), (ENV_SPOT_URL, &spot_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::InvalidConfig {
                    field,
                    reason: "not_an_http_url",
                    value: Some(url.clone()),
                });
            }
        }

        let log_format = match read(ENV_LOG_FORMAT) {
            Some(value) => value
                .parse::<LogFormat>()
                .map_err(|_| AppError::InvalidConfig {
                    field: ENV_LOG_FORMAT,
                    reason: "unknown_format",
                    value: Some(value),
                })?,
            None => LogFormat::infer(),
        };

        Ok(Self {
            listen: SocketAddr::new(bind_addr, port),
            source: SourceConfig {
                history_url,
                spot_url,
                timeout,
            },
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format,
            build_sha: read(ENV_BUILD_SHA).unwrap_or_else(|| "dev".to_string()),
        })
    }

    /// Logging settings borrowed from this configuration.
    #[must_use]
    pub fn logging(&self) -> LoggingConfig<'_> {
        LoggingConfig {
            level: &self.log_level,
            format: self.log_format,
            build_sha: &self.build_sha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> AppResult<AppConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        AppConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() -> anyhow::Result<()> {
        let config = load(&[])?;
        assert_eq!(config.listen, "127.0.0.1:7171".parse::<SocketAddr>()?);
        assert_eq!(config.source, SourceConfig::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.build_sha, "dev");
        Ok(())
    }

    #[test]
    fn overrides_are_parsed() -> anyhow::Result<()> {
        let config = load(&[
            (ENV_BIND_ADDR, "0.0.0.0"),
            (ENV_HTTP_PORT, "8080"),
            (ENV_SPOT_URL, "http://localhost:9000"),
            (ENV_HTTP_TIMEOUT_SECS, "3"),
            (ENV_LOG_FORMAT, "json"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_BUILD_SHA, "abc123"),
        ])?;
        assert_eq!(config.listen, "0.0.0.0:8080".parse::<SocketAddr>()?);
        assert_eq!(config.source.spot_url, "http://localhost:9000");
        assert_eq!(config.source.timeout, Duration::from_secs(3));
        assert_eq!(config.log_format, LogFormat::Json);
        let logging = config.logging();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.build_sha, "abc123");
        Ok(())
    }

    #[test]
    fn blank_values_fall_back_to_defaults() -> anyhow::Result<()> {
        let config = load(&[(ENV_HTTP_PORT, "  "), (ENV_LOG_LEVEL, "")])?;
        assert_eq!(config.listen.port(), DEFAULT_HTTP_PORT);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            (ENV_HTTP_PORT, "0", "zero"),
            (ENV_HTTP_PORT, "70000", "out_of_range"),
            (ENV_BIND_ADDR, "localhost", "not_an_ip_address"),
            (ENV_HTTP_TIMEOUT_SECS, "0", "not_a_positive_integer"),
            (ENV_HISTORY_URL, "ftp://example.com", "not_an_http_url"),
            (ENV_LOG_FORMAT, "yaml", "unknown_format"),
        ];
        for (name, value, expected) in cases {
            match load(&[(name, value)]) {
                Err(AppError::InvalidConfig { field, reason, .. }) => {
                    assert_eq!(field, name);
                    assert_eq!(reason, expected);
                }
                other => panic!("expected {name}={value} to be rejected, got {other:?}"),
            }
        }
    }
}
