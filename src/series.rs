//! Date-indexed rate series and the merged report table
//!
//! Reshapes provider rate mappings into per-pair series and joins two
//! series on date for charting. BTreeMap storage keeps every iteration
//! ascending by date, which is the order the chart consumes.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::currency::CurrencyPair;
use crate::types::{Rate, RatesByDate};

/// One currency pair's rate history, keyed by date.
///
/// # Example
/// ```
/// use forex_report::currency::{Currency, CurrencyPair};
/// use forex_report::series::RateSeries;
/// use forex_report::types::RatesByDate;
/// use chrono::NaiveDate;
/// use std::collections::HashMap;
///
/// let date = NaiveDate::from_ymd_opt(2022, 1, 14).unwrap();
/// let mut rates = RatesByDate::new();
/// rates.insert(date, HashMap::from([("EUR".to_string(), 1.1414)]));
///
/// let pair = CurrencyPair::new(Currency::USD, Currency::EUR);
/// let series = RateSeries::from_rates(&rates, pair);
///
/// assert_eq!(series.label(), "USD-EUR");
/// assert_eq!(series.get(date), Some(1.1414));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RateSeries {
    pair: CurrencyPair,
    label: String,
    points: BTreeMap<NaiveDate, Rate>,
}

impl RateSeries {
    /// Reshape a provider rates mapping into a series for one pair.
    ///
    /// Dates whose entry lacks the pair's quote symbol are dropped with a
    /// warning rather than failing the whole series.
    pub fn from_rates(rates: &RatesByDate, pair: CurrencyPair) -> Self {
        let mut points = BTreeMap::new();

        for (date, by_symbol) in rates {
            match by_symbol.get(pair.quote.code()) {
                Some(rate) => {
                    points.insert(*date, *rate);
                }
                None => {
                    log::warn!("No {} rate for {} on {}, dropping the row", pair.quote, pair, date);
                }
            }
        }

        Self {
            pair,
            label: pair.to_string(),
            points,
        }
    }

    /// Column label, `<BASE>-<SYMBOL>`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The pair this series tracks.
    pub fn pair(&self) -> CurrencyPair {
        self.pair
    }

    /// Rate on a specific date, if present.
    pub fn get(&self, date: NaiveDate) -> Option<Rate> {
        self.points.get(&date).copied()
    }

    /// Number of dated points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Rate)> + '_ {
        self.points.iter().map(|(date, rate)| (*date, *rate))
    }
}

/// One joined row: a date where both pairs have a rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub rate_a: Rate,
    pub rate_b: Rate,
}

/// Inner join of two rate series on date.
///
/// Rows are ascending by date. Dates present in only one input are
/// dropped, so an empty join is possible even from two non-empty series.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSeries {
    label_a: String,
    label_b: String,
    rows: Vec<MergedRow>,
}

impl MergedSeries {
    /// Join two series on date, keeping only dates present in both.
    pub fn inner_join(a: &RateSeries, b: &RateSeries) -> Self {
        let rows = a
            .iter()
            .filter_map(|(date, rate_a)| {
                b.get(date).map(|rate_b| MergedRow { date, rate_a, rate_b })
            })
            .collect();

        Self {
            label_a: a.label().to_string(),
            label_b: b.label().to_string(),
            rows,
        }
    }

    /// Label of the first joined series.
    pub fn label_a(&self) -> &str {
        &self.label_a
    }

    /// Label of the second joined series.
    pub fn label_b(&self) -> &str {
        &self.label_b
    }

    /// Joined rows, ascending by date.
    pub fn rows(&self) -> &[MergedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|row| row.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|row| row.date)
    }

    /// Min and max of the first series, for its own y-axis scale.
    pub fn bounds_a(&self) -> Option<(Rate, Rate)> {
        Self::bounds(self.rows.iter().map(|row| row.rate_a))
    }

    /// Min and max of the second series, for its own y-axis scale.
    pub fn bounds_b(&self) -> Option<(Rate, Rate)> {
        Self::bounds(self.rows.iter().map(|row| row.rate_b))
    }

    fn bounds(values: impl Iterator<Item = Rate>) -> Option<(Rate, Rate)> {
        values.fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
    }
}
