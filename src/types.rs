//! Core types and aliases

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{ForexError, Result};

/// Exchange rate type (using f64 for precision)
pub type Rate = f64;

/// Timeseries rates as the provider ships them: date, then symbol code,
/// then rate. Symbol keys stay as wire strings so a body quoting codes
/// outside our own currency set still deserializes.
pub type RatesByDate = BTreeMap<NaiveDate, HashMap<String, Rate>>;

/// Inclusive date range for timeseries queries.
///
/// Holding both bounds in one value makes a half-open query
/// unrepresentable: the payload builder either gets a whole range or no
/// range at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting inverted bounds.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ForexError::InvalidData(format!(
                "Date range ends before it starts: {} > {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Trailing window of `weeks` weeks ending at `today`.
    pub fn trailing_weeks(weeks: u32, today: NaiveDate) -> Self {
        Self {
            start: today - Duration::weeks(i64::from(weeks)),
            end: today,
        }
    }

    /// Number of days covered, counting both ends.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
