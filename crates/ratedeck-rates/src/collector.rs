//! Per-pair fan-out over a [`RateSource`].
//!
//! # Design
//! - One tokio task per quote currency fetches and parses its history page;
//!   all tasks are joined before returning.
//! - Spot rates for the base are fetched once per collection, concurrently
//!   with the history tasks, and shared by every row.
//! - A failed pair is logged and skipped so one bad upstream page does not
//!   hide the rest of the table.
//! - Only an empty result is an error; without spot rates no row can be built.

use std::sync::Arc;

use futures::future::join_all;
use ratedeck_api_models::{Currency, CurrencyRate};
use tracing::{info, warn};

use crate::error::{RatesError, Result};
use crate::period::Period;
use crate::scrape::{Averages, Scraper};
use crate::source::{Pair, RateSource};

/// Rows collected for one base currency plus the quotes that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// Collected rows in tracked-currency order.
    pub rates: Vec<CurrencyRate>,
    /// Quotes whose upstream fetch failed.
    pub skipped: Vec<Currency>,
}

/// Collects rate rows for every tracked counterpart of a base currency.
#[derive(Clone)]
pub struct RateCollector {
    source: Arc<dyn RateSource>,
    scraper: Arc<Scraper>,
}

impl RateCollector {
    /// Wrap a source with the given scraper.
    #[must_use]
    pub fn new(source: Arc<dyn RateSource>, scraper: Scraper) -> Self {
        Self {
            source,
            scraper: Arc::new(scraper),
        }
    }

    /// Collect rows for every tracked currency other than `base`.
    ///
    /// # Errors
    ///
    /// Returns [`RatesError::NoResults`] when every pair failed or the spot
    /// rates for `base` could not be fetched.
    pub async fn collect(&self, base: Currency, period: &Period) -> Result<Collection> {
        let quotes: Vec<Currency> = base.counterparts().collect();
        let tasks = quotes.iter().map(|&quote| {
            let source = Arc::clone(&self.source);
            let scraper = Arc::clone(&self.scraper);
            let period = period.clone();
            tokio::spawn(async move {
                pair_averages(source.as_ref(), &scraper, Pair { base, quote }, &period).await
            })
        });
        let (spot, joined) = tokio::join!(self.source.spot_rates(base), join_all(tasks));
        let spot = match spot {
            Ok(spot) => spot,
            Err(err) => {
                warn!(base = %base, error = %err, "spot rates unavailable");
                return Err(RatesError::NoResults { base });
            }
        };

        let mut collection = Collection {
            rates: Vec::with_capacity(quotes.len()),
            skipped: Vec::new(),
        };
        for (quote, outcome) in quotes.into_iter().zip(joined) {
            match outcome {
                Ok(Ok(averages)) => collection.rates.push(CurrencyRate {
                    from: base.code().to_string(),
                    to: quote.code().to_string(),
                    rate: spot.rate(quote),
                    mtd: averages.mtd,
                    ytd: averages.ytd,
                }),
                Ok(Err(err)) => {
                    warn!(base = %base, quote = %quote, error = %err, "skipping currency pair");
                    collection.skipped.push(quote);
                }
                Err(err) => {
                    warn!(base = %base, quote = %quote, error = %err, "currency pair task failed");
                    collection.skipped.push(quote);
                }
            }
        }

        if collection.rates.is_empty() {
            return Err(RatesError::NoResults { base });
        }
        info!(
            base = %base,
            collected = collection.rates.len(),
            skipped = collection.skipped.len(),
            "collected exchange rates"
        );
        Ok(collection)
    }
}

async fn pair_averages(
    source: &dyn RateSource,
    scraper: &Scraper,
    pair: Pair,
    period: &Period,
) -> Result<Averages> {
    let html = source.history_page(pair, period.year).await?;
    Ok(scraper.extract_average_values(&html, &period.month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SpotRates;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PAGE: &str = r#"
        <table class="history-rate-summary">
          <tr><td>Average:</td><td>1.2500</td></tr>
        </table>
        <table><tr><td class="month-footer">March
          <span class="nowrap">1.1000</span><span class="nowrap">1.2000</span>
        </td></tr></table>
    "#;

    #[derive(Default)]
    struct FakeSource {
        failing_history: Vec<Currency>,
        failing_spot: bool,
        requested: Mutex<Vec<(Pair, i32)>>,
        spot_requests: AtomicUsize,
    }

    #[async_trait]
    impl RateSource for FakeSource {
        async fn history_page(&self, pair: Pair, year: i32) -> Result<String> {
            if let Ok(mut requested) = self.requested.lock() {
                requested.push((pair, year));
            }
            if self.failing_history.contains(&pair.quote) {
                return Err(RatesError::HttpStatus {
                    url: format!("history/{}", pair.quote),
                    status: 500,
                });
            }
            Ok(PAGE.to_string())
        }

        async fn spot_rates(&self, base: Currency) -> Result<SpotRates> {
            self.spot_requests.fetch_add(1, Ordering::SeqCst);
            if self.failing_spot {
                return Err(RatesError::HttpStatus {
                    url: format!("spot/{base}"),
                    status: 502,
                });
            }
            Ok(base
                .counterparts()
                .filter(|quote| *quote != Currency::Cny)
                .map(|quote| (quote, 2.0))
                .collect())
        }
    }

    fn march() -> Period {
        Period {
            year: 2024,
            month: "March".to_string(),
        }
    }

    fn collector(source: Arc<FakeSource>) -> anyhow::Result<RateCollector> {
        Ok(RateCollector::new(source, Scraper::new()?))
    }

    #[tokio::test]
    async fn collects_every_counterpart_in_order() -> anyhow::Result<()> {
        let source = Arc::new(FakeSource::default());
        let collection = collector(Arc::clone(&source))?
            .collect(Currency::Gbp, &march())
            .await?;

        let quotes: Vec<&str> = collection.rates.iter().map(|row| row.to.as_str()).collect();
        assert_eq!(quotes, ["usd", "eur", "jpy", "chf", "cny"]);
        assert!(collection.skipped.is_empty());
        let first = &collection.rates[0];
        assert_eq!(first.from, "gbp");
        assert!((first.rate - 2.0).abs() < f64::EPSILON);
        assert!((first.ytd - 1.25).abs() < f64::EPSILON);
        assert!((first.mtd - 1.2).abs() < f64::EPSILON);

        let requested = source
            .requested
            .lock()
            .map_err(|_| anyhow::anyhow!("poisoned"))?;
        assert_eq!(requested.len(), 5);
        assert!(requested.iter().all(|(pair, year)| {
            pair.base == Currency::Gbp && pair.quote != Currency::Gbp && *year == 2024
        }));
        Ok(())
    }

    #[tokio::test]
    async fn spot_rates_are_fetched_once_per_collection() -> anyhow::Result<()> {
        let source = Arc::new(FakeSource::default());
        let collection = collector(Arc::clone(&source))?
            .collect(Currency::Usd, &march())
            .await?;

        assert_eq!(source.spot_requests.load(Ordering::SeqCst), 1);
        assert_eq!(collection.rates.len(), 5);
        let cny = collection
            .rates
            .iter()
            .find(|row| row.to == "cny")
            .ok_or_else(|| anyhow::anyhow!("missing cny row"))?;
        assert!(cny.rate.abs() < f64::EPSILON);
        Ok(())
    }

    #[tokio::test]
    async fn missing_spot_rates_yield_no_results() -> anyhow::Result<()> {
        let source = Arc::new(FakeSource {
            failing_spot: true,
            ..FakeSource::default()
        });
        let result = collector(Arc::clone(&source))?
            .collect(Currency::Eur, &march())
            .await;

        assert!(matches!(
            result,
            Err(RatesError::NoResults {
                base: Currency::Eur
            })
        ));
        assert_eq!(source.spot_requests.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn failed_pairs_are_skipped() -> anyhow::Result<()> {
        let source = Arc::new(FakeSource {
            failing_history: vec![Currency::Eur, Currency::Jpy],
            ..FakeSource::default()
        });
        let collection = collector(source)?.collect(Currency::Usd, &march()).await?;

        assert_eq!(collection.rates.len(), 3);
        assert_eq!(collection.skipped, vec![Currency::Eur, Currency::Jpy]);
        Ok(())
    }

    #[tokio::test]
    async fn all_failures_yield_no_results() -> anyhow::Result<()> {
        let source = Arc::new(FakeSource {
            failing_history: Currency::ALL.to_vec(),
            ..FakeSource::default()
        });
        let result = collector(source)?.collect(Currency::Chf, &march()).await;

        assert!(matches!(
            result,
            Err(RatesError::NoResults {
                base: Currency::Chf
            })
        ));
        Ok(())
    }
}
