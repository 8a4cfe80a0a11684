//! Embedded fallback rate datasets
//!
//! The provider rejects `/timeseries` calls on its free plan. These
//! captured datasets let the report render something sensible anyway. The
//! fallback is injected into the report as a collaborator rather than
//! consulted inside the fetch path, so tests can prove exactly when it is
//! and is not used.

use chrono::NaiveDate;
use hashbrown::HashMap;

use crate::currency::{Currency, CurrencyPair};
use crate::error::{ForexError, Result};
use crate::types::{Rate, RatesByDate};

/// Supplier of substitute rates for pairs the live API refused.
pub trait FallbackRates: Send + Sync {
    /// Full rates mapping for the pair, or an error when no dataset
    /// covers it.
    fn rates_for(&self, pair: CurrencyPair) -> Result<RatesByDate>;
}

/// USD-EUR daily closes captured in January 2022 (day of month, rate).
const USD_EUR_JAN_2022: [(u32, Rate); 14] = [
    (1, 1.1442),
    (2, 1.1442),
    (3, 1.1442),
    (4, 1.1442),
    (5, 1.1442),
    (6, 1.1442),
    (7, 1.1442),
    (8, 1.1442),
    (9, 1.1442),
    (10, 1.1442),
    (11, 1.1442),
    (12, 1.1442),
    (13, 1.1453),
    (14, 1.1414),
];

/// MXN-EUR daily closes captured in January 2022 (day of month, rate).
const MXN_EUR_JAN_2022: [(u32, Rate); 14] = [
    (1, 0.04281),
    (2, 0.04287),
    (3, 0.04314),
    (4, 0.04289),
    (5, 0.04312),
    (6, 0.04315),
    (7, 0.04290),
    (8, 0.04314),
    (9, 0.04315),
    (10, 0.04329),
    (11, 0.04314),
    (12, 0.04290),
    (13, 0.04287),
    (14, 0.04310),
];

const FIXTURE_YEAR: i32 = 2022;
const FIXTURE_MONTH: u32 = 1;

/// The datasets the report ships with, keyed by pair.
///
/// # Example
/// ```
/// use forex_report::currency::{Currency, CurrencyPair};
/// use forex_report::fixtures::{EmbeddedFixtures, FallbackRates};
///
/// let fixtures = EmbeddedFixtures::new();
/// let pair = CurrencyPair::new(Currency::USD, Currency::EUR);
///
/// let rates = fixtures.rates_for(pair).unwrap();
/// assert_eq!(rates.len(), 14);
/// ```
#[derive(Debug, Clone)]
pub struct EmbeddedFixtures {
    datasets: HashMap<CurrencyPair, &'static [(u32, Rate)]>,
}

impl EmbeddedFixtures {
    /// Create the registry with every shipped dataset.
    pub fn new() -> Self {
        let mut datasets: HashMap<CurrencyPair, &'static [(u32, Rate)]> = HashMap::new();
        datasets.insert(
            CurrencyPair::new(Currency::USD, Currency::EUR),
            &USD_EUR_JAN_2022[..],
        );
        datasets.insert(
            CurrencyPair::new(Currency::MXN, Currency::EUR),
            &MXN_EUR_JAN_2022[..],
        );
        Self { datasets }
    }

    /// List the pairs a dataset exists for.
    pub fn pairs(&self) -> Vec<CurrencyPair> {
        self.datasets.keys().copied().collect()
    }
}

impl Default for EmbeddedFixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackRates for EmbeddedFixtures {
    fn rates_for(&self, pair: CurrencyPair) -> Result<RatesByDate> {
        let data = self.datasets.get(&pair).ok_or_else(|| {
            ForexError::MissingData(format!("No embedded dataset for {}", pair))
        })?;

        let mut rates = RatesByDate::new();
        for (day, rate) in *data {
            let date = NaiveDate::from_ymd_opt(FIXTURE_YEAR, FIXTURE_MONTH, *day)
                .ok_or_else(|| {
                    ForexError::InvalidData(format!(
                        "Invalid dataset date {}-{:02}-{:02}",
                        FIXTURE_YEAR, FIXTURE_MONTH, day
                    ))
                })?;
            rates.insert(
                date,
                std::collections::HashMap::from([(pair.quote.code().to_string(), *rate)]),
            );
        }
        Ok(rates)
    }
}

/// Fallback that panics on any use.
///
/// Wire this into a report when a test must prove the live path never
/// consulted substitute data.
///
/// # Example
/// ```should_panic
/// use forex_report::currency::{Currency, CurrencyPair};
/// use forex_report::fixtures::{ExplodingFallback, FallbackRates};
///
/// let fallback = ExplodingFallback::new();
/// let pair = CurrencyPair::new(Currency::USD, Currency::EUR);
///
/// // This will panic!
/// fallback.rates_for(pair).unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplodingFallback {
    /// Custom panic message
    message: Option<&'static str>,
}

impl ExplodingFallback {
    /// Create new exploding fallback with the default message
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Create with custom panic message
    pub fn with_message(message: &'static str) -> Self {
        Self {
            message: Some(message),
        }
    }
}

impl FallbackRates for ExplodingFallback {
    fn rates_for(&self, pair: CurrencyPair) -> Result<RatesByDate> {
        panic!(
            "{}\n\nRequested pair: {}",
            self.message.unwrap_or(
                "Fallback rate access not allowed! This run should be served live. \
                 If substitute data is acceptable, use EmbeddedFixtures."
            ),
            pair
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, day).unwrap()
    }

    #[test]
    fn usd_eur_dataset_covers_fourteen_days() {
        let fixtures = EmbeddedFixtures::new();
        let rates = fixtures
            .rates_for(CurrencyPair::new(Currency::USD, Currency::EUR))
            .unwrap();

        assert_eq!(rates.len(), 14);
        assert_eq!(rates[&date(14)]["EUR"], 1.1414);
        assert_eq!(rates[&date(13)]["EUR"], 1.1453);
        assert_eq!(rates[&date(1)]["EUR"], 1.1442);
    }

    #[test]
    fn mxn_eur_dataset_covers_fourteen_days() {
        let fixtures = EmbeddedFixtures::new();
        let rates = fixtures
            .rates_for(CurrencyPair::new(Currency::MXN, Currency::EUR))
            .unwrap();

        assert_eq!(rates.len(), 14);
        assert_eq!(rates[&date(1)]["EUR"], 0.04281);
        assert_eq!(rates[&date(10)]["EUR"], 0.04329);
        assert_eq!(rates[&date(14)]["EUR"], 0.04310);
    }

    #[test]
    fn unknown_pair_is_a_missing_data_error() {
        let fixtures = EmbeddedFixtures::new();
        let result = fixtures.rates_for(CurrencyPair::new(Currency::GBP, Currency::JPY));

        assert!(matches!(result, Err(ForexError::MissingData(_))));
    }

    #[test]
    fn shipped_pairs_are_listed() {
        let fixtures = EmbeddedFixtures::new();
        let pairs = fixtures.pairs();

        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&CurrencyPair::new(Currency::USD, Currency::EUR)));
        assert!(pairs.contains(&CurrencyPair::new(Currency::MXN, Currency::EUR)));
    }

    #[test]
    #[should_panic(expected = "Fallback rate access not allowed")]
    fn test_exploding_fallback_panics() {
        let fallback = ExplodingFallback::new();
        let _ = fallback.rates_for(CurrencyPair::new(Currency::USD, Currency::EUR));
    }

    #[test]
    #[should_panic(expected = "Custom error message")]
    fn test_custom_message() {
        let fallback = ExplodingFallback::with_message("Custom error message");
        let _ = fallback.rates_for(CurrencyPair::new(Currency::USD, Currency::EUR));
    }
}
