//! Currency codes and pairs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ForexError;

/// Currency enumeration (ISO 4217 codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
    /// Australian Dollar
    AUD,
    /// Canadian Dollar
    CAD,
    /// New Zealand Dollar
    NZD,
    /// Chinese Yuan
    CNY,
    /// Hong Kong Dollar
    HKD,
    /// Singapore Dollar
    SGD,
    /// South Korean Won
    KRW,
    /// Indian Rupee
    INR,
    /// Brazilian Real
    BRL,
    /// Mexican Peso
    MXN,
    /// South African Rand
    ZAR,
    /// Russian Ruble
    RUB,
    /// Turkish Lira
    TRY,
}

impl Currency {
    /// Get ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::NZD => "NZD",
            Currency::CNY => "CNY",
            Currency::HKD => "HKD",
            Currency::SGD => "SGD",
            Currency::KRW => "KRW",
            Currency::INR => "INR",
            Currency::BRL => "BRL",
            Currency::MXN => "MXN",
            Currency::ZAR => "ZAR",
            Currency::RUB => "RUB",
            Currency::TRY => "TRY",
        }
    }

    /// Parse from ISO code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CHF" => Some(Currency::CHF),
            "AUD" => Some(Currency::AUD),
            "CAD" => Some(Currency::CAD),
            "NZD" => Some(Currency::NZD),
            "CNY" => Some(Currency::CNY),
            "HKD" => Some(Currency::HKD),
            "SGD" => Some(Currency::SGD),
            "KRW" => Some(Currency::KRW),
            "INR" => Some(Currency::INR),
            "BRL" => Some(Currency::BRL),
            "MXN" => Some(Currency::MXN),
            "ZAR" => Some(Currency::ZAR),
            "RUB" => Some(Currency::RUB),
            "TRY" => Some(Currency::TRY),
            _ => None,
        }
    }

    /// Get all supported currencies
    pub fn all() -> Vec<Currency> {
        vec![
            Currency::USD,
            Currency::EUR,
            Currency::GBP,
            Currency::JPY,
            Currency::CHF,
            Currency::AUD,
            Currency::CAD,
            Currency::NZD,
            Currency::CNY,
            Currency::HKD,
            Currency::SGD,
            Currency::KRW,
            Currency::INR,
            Currency::BRL,
            Currency::MXN,
            Currency::ZAR,
            Currency::RUB,
            Currency::TRY,
        ]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = ForexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s)
            .ok_or_else(|| ForexError::InvalidData(format!("Unknown currency code: {}", s)))
    }
}

/// Currency pair for exchange rates. The quote side is the symbol the
/// rate is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub base: Currency,
    pub quote: Currency,
}

impl CurrencyPair {
    /// Create new currency pair
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}
