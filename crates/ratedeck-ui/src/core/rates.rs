//! Rate table presentation helpers.

use ratedeck_api_models::{Currency, CurrencyRate};

use crate::core::toast::ToastKind;

/// Currency selected when the page first loads.
pub const DEFAULT_BASE: Currency = Currency::Usd;

/// Path of the rates endpoint for `base`.
#[must_use]
pub fn rates_path(base: Currency) -> String {
    format!("/v1/rates/{}", base.code())
}

/// API origin: the configured value when present and non-blank, the page origin otherwise.
#[must_use]
pub fn resolve_api_base(configured: Option<&str>, page_origin: &str) -> String {
    configured
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(page_origin)
        .trim_end_matches('/')
        .to_string()
}

/// Rate formatted for the table; an absent spot rate (`0.0`) shows as a dash.
#[must_use]
pub fn format_rate(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        "-".to_string()
    } else {
        format!("{value:.4}")
    }
}

/// Direction of the spot rate against an average.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    /// Spot above the average.
    Up,
    /// Spot below the average.
    Down,
    /// Equal, or one side missing.
    Flat,
}

impl Trend {
    /// Compare `rate` against `average`.
    #[must_use]
    pub fn between(rate: f64, average: f64) -> Self {
        if rate == 0.0 || average == 0.0 {
            return Self::Flat;
        }
        let delta = (rate - average) / average;
        if delta.abs() < 1e-6 {
            Self::Flat
        } else if delta > 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// Icon-font class for the trend marker.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Up => "fa fa-caret-up",
            Self::Down => "fa fa-caret-down",
            Self::Flat => "fa fa-minus",
        }
    }
}

/// Toast shown after a successful load; a warning when some counterparts are missing.
#[must_use]
pub fn load_summary(base: Currency, rows: &[CurrencyRate]) -> (ToastKind, String) {
    let expected = base.counterparts().count();
    let code = base.code().to_uppercase();
    if rows.len() < expected {
        (
            ToastKind::Warning,
            format!("Loaded {} of {expected} rates for {code}", rows.len()),
        )
    } else {
        (ToastKind::Success, format!("Loaded {} rates for {code}", rows.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(to: &str) -> CurrencyRate {
        CurrencyRate {
            from: "usd".to_string(),
            to: to.to_string(),
            rate: 1.0,
            mtd: 1.0,
            ytd: 1.0,
        }
    }

    #[test]
    fn rates_path_uses_lower_case_code() {
        assert_eq!(rates_path(Currency::Gbp), "/v1/rates/gbp");
    }

    #[test]
    fn api_base_prefers_configured_value() {
        assert_eq!(
            resolve_api_base(Some("http://127.0.0.1:7171/"), "http://localhost:8080"),
            "http://127.0.0.1:7171"
        );
        assert_eq!(
            resolve_api_base(Some("  "), "http://localhost:8080"),
            "http://localhost:8080"
        );
        assert_eq!(resolve_api_base(None, "http://localhost:8080/"), "http://localhost:8080");
    }

    #[test]
    fn missing_rates_render_as_dash() {
        assert_eq!(format_rate(0.0), "-");
        assert_eq!(format_rate(f64::NAN), "-");
        assert_eq!(format_rate(0.923_456), "0.9235");
    }

    #[test]
    fn trend_compares_against_average() {
        assert_eq!(Trend::between(1.1, 1.0), Trend::Up);
        assert_eq!(Trend::between(0.9, 1.0), Trend::Down);
        assert_eq!(Trend::between(1.0, 1.0), Trend::Flat);
        assert_eq!(Trend::between(0.0, 1.0), Trend::Flat);
        assert_eq!(Trend::between(1.0, 0.0), Trend::Flat);
    }

    #[test]
    fn summary_warns_when_counterparts_are_missing() {
        let full: Vec<CurrencyRate> = ["eur", "gbp", "jpy", "chf", "cny"]
            .into_iter()
            .map(row)
            .collect();
        assert_eq!(
            load_summary(Currency::Usd, &full),
            (ToastKind::Success, "Loaded 5 rates for USD".to_string())
        );
        assert_eq!(
            load_summary(Currency::Usd, &full[..3]),
            (ToastKind::Warning, "Loaded 3 of 5 rates for USD".to_string())
        );
    }
}
