//! # forex-report
//!
//! Historical forex rate reports over the Fixer.io exchange rates API.
//!
//! Fetches timeseries rates for two currency pairs quoted against a common
//! symbol, joins them on date, and draws a dual-axis line chart in the
//! terminal. When the provider's plan refuses timeseries access, an
//! embedded dataset stands in so the report still renders.
//!
//! ## Example
//!
//! ```rust,no_run
//! use forex_report::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let config = Config::from_env()?;
//! let client = FixerClient::new(config.access_key.clone())?;
//!
//! let report = ForexReport::new(client, EmbeddedFixtures::new(), &config);
//! report.run(&TerminalChart::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod client;
pub mod config;
pub mod currency;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod series;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::chart::{ChartSink, TerminalChart};
    pub use crate::client::{FixerClient, QueryPayload, RatesResponse, RatesSource};
    pub use crate::config::Config;
    pub use crate::currency::{Currency, CurrencyPair};
    pub use crate::error::{ForexError, Result};
    pub use crate::fixtures::{EmbeddedFixtures, ExplodingFallback, FallbackRates};
    pub use crate::report::ForexReport;
    pub use crate::series::{MergedSeries, RateSeries};
    pub use crate::types::*;
}
