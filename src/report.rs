//! Report orchestration
//!
//! Fetches two currency pairs' timeseries, substitutes embedded data when
//! the provider's plan refuses the endpoint, joins the pairs on date and
//! hands the result to a chart sink.

use chrono::Utc;

use crate::chart::ChartSink;
use crate::client::{RatesResponse, RatesSource};
use crate::config::Config;
use crate::currency::{Currency, CurrencyPair};
use crate::error::{ForexError, Result};
use crate::fixtures::FallbackRates;
use crate::series::{MergedSeries, RateSeries};
use crate::types::{DateRange, RatesByDate};

/// Provider error code for "this function is not available on your plan".
pub const PLAN_RESTRICTED_CODE: u32 = 105;

/// One report: two currency pairs quoted against a common symbol over a
/// trailing window, charted on independent axes.
pub struct ForexReport<S, F> {
    source: S,
    fallback: F,
    period_weeks: u32,
    pair_a: CurrencyPair,
    pair_b: CurrencyPair,
}

impl<S: RatesSource, F: FallbackRates> ForexReport<S, F> {
    /// Report with the stock pairs, USD-EUR and MXN-EUR.
    pub fn new(source: S, fallback: F, config: &Config) -> Self {
        Self {
            source,
            fallback,
            period_weeks: config.period_weeks,
            pair_a: CurrencyPair::new(Currency::USD, Currency::EUR),
            pair_b: CurrencyPair::new(Currency::MXN, Currency::EUR),
        }
    }

    /// Override the charted pairs. The report always draws exactly two,
    /// sharing one quote symbol.
    pub fn with_pairs(mut self, base_a: Currency, base_b: Currency, symbol: Currency) -> Self {
        self.pair_a = CurrencyPair::new(base_a, symbol);
        self.pair_b = CurrencyPair::new(base_b, symbol);
        self
    }

    /// Trailing window ending today.
    pub fn window(&self) -> DateRange {
        DateRange::trailing_weeks(self.period_weeks, Utc::now().date_naive())
    }

    /// Fetch one pair's rates and reshape them into a series.
    ///
    /// A plan-restriction rejection is served from the fallback dataset;
    /// every other provider error aborts the report.
    pub async fn fetch_series(&self, range: &DateRange, pair: CurrencyPair) -> Result<RateSeries> {
        log::debug!("Fetching {} timeseries from {}", pair, self.source.name());

        let response = self
            .source
            .timeseries(range, pair.base, &[pair.quote])
            .await?;
        let rates = self.resolve_rates(response, pair)?;

        Ok(RateSeries::from_rates(&rates, pair))
    }

    fn resolve_rates(&self, response: RatesResponse, pair: CurrencyPair) -> Result<RatesByDate> {
        if let Some(error) = response.error {
            if error.code == PLAN_RESTRICTED_CODE {
                log::info!(
                    "Provider rejected the {} timeseries (code {}), using the embedded dataset",
                    pair,
                    error.code
                );
                return self.fallback.rates_for(pair);
            }
            return Err(ForexError::Provider {
                code: error.code,
                message: error.message().to_string(),
            });
        }

        response.rates.ok_or_else(|| {
            ForexError::MissingData(format!(
                "Response for {} has neither rates nor an error object",
                pair
            ))
        })
    }

    /// Fetch both pairs over `range` and join them on date.
    pub async fn build(&self, range: &DateRange) -> Result<MergedSeries> {
        let series_a = self.fetch_series(range, self.pair_a).await?;
        let series_b = self.fetch_series(range, self.pair_b).await?;

        let merged = MergedSeries::inner_join(&series_a, &series_b);
        if merged.is_empty() {
            return Err(ForexError::MissingData(format!(
                "{} and {} share no dates to chart",
                series_a.label(),
                series_b.label()
            )));
        }

        log::debug!("Merged {} sessions for {} / {}", merged.len(), self.pair_a, self.pair_b);
        Ok(merged)
    }

    /// Run the whole report: resolve the window, build, render.
    pub async fn run<C: ChartSink>(&self, chart: &C) -> Result<()> {
        let range = self.window();
        let merged = self.build(&range).await?;
        chart.render(&merged)
    }
}
