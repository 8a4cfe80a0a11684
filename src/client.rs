//! Fixer.io API client
//!
//! Wraps the provider's `/latest`, `/{date}` and `/timeseries` endpoints
//! behind a single payload builder and one error-translation rule. Bodies
//! come back as permissive structs; callers decide what a usable response
//! looks like.

use crate::currency::Currency;
use crate::error::{ForexError, Result};
use crate::types::{DateRange, Rate, RatesByDate};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const FIXER_BASE_URL: &str = "http://data.fixer.io";
const LATEST_PATH: &str = "/latest";
const TIMESERIES_PATH: &str = "/timeseries";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The provider quotes against the Euro unless told otherwise.
pub const DEFAULT_BASE: Currency = Currency::EUR;

/// Query parameters for one rates request.
///
/// Absent arguments are omitted from the parameter list entirely. The
/// provider reads omission as "use your default"; an empty value does not
/// mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPayload {
    params: Vec<(&'static str, String)>,
}

impl QueryPayload {
    /// Build the payload for any rates endpoint.
    ///
    /// Symbols join with `,` in input order. A date range contributes both
    /// bounds or neither; `DateRange` cannot hold just one.
    pub fn build(
        access_key: &str,
        base: Option<Currency>,
        symbols: Option<&[Currency]>,
        date_range: Option<&DateRange>,
    ) -> Self {
        let mut params = vec![("access_key", access_key.to_string())];

        if let Some(base) = base {
            params.push(("base", base.code().to_string()));
        }

        if let Some(symbols) = symbols.filter(|s| !s.is_empty()) {
            let joined = symbols
                .iter()
                .map(Currency::code)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("symbols", joined));
        }

        if let Some(range) = date_range {
            params.push(("start_date", range.start.format(DATE_FORMAT).to_string()));
            params.push(("end_date", range.end.format(DATE_FORMAT).to_string()));
        }

        Self { params }
    }

    /// Parameters in serialization order.
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Look up a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &self.params {
            pairs.append_pair(key, value);
        }
    }
}

/// Error object the provider embeds in an otherwise-2xx body.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    pub code: u32,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

impl ProviderError {
    /// Best human-readable message the provider gave us.
    pub fn message(&self) -> &str {
        self.kind
            .as_deref()
            .or(self.info.as_deref())
            .unwrap_or("unknown provider error")
    }
}

/// Body of a `/timeseries` response.
///
/// Every field beyond `success` is optional and unknown fields are
/// ignored, so a degraded or error body still deserializes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub timeseries: Option<bool>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub rates: Option<RatesByDate>,
    #[serde(default)]
    pub error: Option<ProviderError>,
}

/// Body of a `/latest` or `/{date}` response, where rates are a flat
/// symbol-to-rate map for a single day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyRatesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub historical: Option<bool>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub rates: Option<HashMap<String, Rate>>,
    #[serde(default)]
    pub error: Option<ProviderError>,
}

/// Fixer.io data source
pub struct FixerClient {
    access_key: String,
    base: Option<Currency>,
    symbols: Option<Vec<Currency>>,
    client: Client,
}

impl FixerClient {
    /// Create a new Fixer.io client for the given API access key
    pub fn new(access_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ForexError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            access_key,
            base: None,
            symbols: None,
            client,
        })
    }

    /// Set the client-level base currency.
    ///
    /// The provider default is stored as absent so it never shows up in a
    /// payload.
    pub fn with_base(mut self, base: Currency) -> Self {
        self.base = (base != DEFAULT_BASE).then_some(base);
        self
    }

    /// Set the client-level symbol list.
    pub fn with_symbols(mut self, symbols: Vec<Currency>) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// Latest rates for the resolved base and symbols.
    pub async fn latest(
        &self,
        base: Option<Currency>,
        symbols: Option<&[Currency]>,
    ) -> Result<DailyRatesResponse> {
        let payload = QueryPayload::build(
            &self.access_key,
            self.resolve_base(base),
            self.resolve_symbols(symbols),
            None,
        );
        let url = self.endpoint(LATEST_PATH, &payload)?;
        self.execute(url).await
    }

    /// Rates for one historical day.
    pub async fn historical_rates(
        &self,
        date: NaiveDate,
        base: Option<Currency>,
        symbols: Option<&[Currency]>,
    ) -> Result<DailyRatesResponse> {
        let payload = QueryPayload::build(
            &self.access_key,
            self.resolve_base(base),
            self.resolve_symbols(symbols),
            None,
        );
        let path = format!("/{}", date.format(DATE_FORMAT));
        let url = self.endpoint(&path, &payload)?;
        self.execute(url).await
    }

    /// Daily rates for every day in `date_range`.
    pub async fn timeseries_rates(
        &self,
        date_range: &DateRange,
        base: Option<Currency>,
        symbols: Option<&[Currency]>,
    ) -> Result<RatesResponse> {
        let payload = QueryPayload::build(
            &self.access_key,
            self.resolve_base(base),
            self.resolve_symbols(symbols),
            Some(date_range),
        );
        let url = self.endpoint(TIMESERIES_PATH, &payload)?;
        self.execute(url).await
    }

    /// Call-site arguments win over client-level defaults.
    fn resolve_base(&self, base: Option<Currency>) -> Option<Currency> {
        base.or(self.base)
    }

    fn resolve_symbols<'a>(&'a self, symbols: Option<&'a [Currency]>) -> Option<&'a [Currency]> {
        symbols.or(self.symbols.as_deref())
    }

    fn endpoint(&self, path: &str, payload: &QueryPayload) -> Result<Url> {
        let mut url = Url::parse(FIXER_BASE_URL)
            .and_then(|base| base.join(path))
            .map_err(|e| ForexError::InvalidData(format!("Invalid request URL: {}", e)))?;
        payload.apply(&mut url);
        Ok(url)
    }

    async fn execute<T>(&self, url: Url) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        // The query string carries the access key, so log the path only.
        log::debug!("GET {}", url.path());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ForexError::Transport(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ForexError::Transport(format!(
                "Fixer.io returned error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ForexError::Transport(format!("JSON parse error: {}", e)))
    }
}

/// Trait for timeseries rate sources. The report is generic over this
/// seam so tests can swap in canned sources.
pub trait RatesSource: Send + Sync {
    /// Fetch daily rates for `base` against `symbols` over `date_range`.
    fn timeseries(
        &self,
        date_range: &DateRange,
        base: Currency,
        symbols: &[Currency],
    ) -> impl std::future::Future<Output = Result<RatesResponse>> + Send;

    /// Get the source name
    fn name(&self) -> &str;
}

impl RatesSource for FixerClient {
    fn timeseries(
        &self,
        date_range: &DateRange,
        base: Currency,
        symbols: &[Currency],
    ) -> impl std::future::Future<Output = Result<RatesResponse>> + Send {
        self.timeseries_rates(date_range, Some(base), Some(symbols))
    }

    fn name(&self) -> &str {
        "fixer.io"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range() -> DateRange {
        DateRange::new(date(2021, 12, 31), date(2022, 1, 14)).unwrap()
    }

    #[test]
    fn payload_includes_every_present_argument() {
        let payload = QueryPayload::build(
            "k",
            Some(Currency::USD),
            Some(&[Currency::EUR, Currency::GBP]),
            Some(&range()),
        );

        assert_eq!(payload.get("access_key"), Some("k"));
        assert_eq!(payload.get("base"), Some("USD"));
        assert_eq!(payload.get("symbols"), Some("EUR,GBP"));
        assert_eq!(payload.get("start_date"), Some("2021-12-31"));
        assert_eq!(payload.get("end_date"), Some("2022-01-14"));
    }

    #[test]
    fn payload_omits_absent_arguments() {
        let payload = QueryPayload::build("k", None, Some(&[Currency::EUR, Currency::USD]), None);

        assert_eq!(payload.get("access_key"), Some("k"));
        assert_eq!(payload.get("symbols"), Some("EUR,USD"));
        assert_eq!(payload.get("base"), None);
        assert_eq!(payload.get("start_date"), None);
        assert_eq!(payload.get("end_date"), None);
        assert_eq!(payload.params().len(), 2);
    }

    #[test]
    fn payload_without_base_keeps_the_other_keys() {
        let payload = QueryPayload::build(
            "k",
            None,
            Some(&[Currency::EUR, Currency::USD]),
            Some(&DateRange::new(date(2022, 1, 1), date(2022, 1, 14)).unwrap()),
        );

        assert_eq!(payload.get("access_key"), Some("k"));
        assert_eq!(payload.get("symbols"), Some("EUR,USD"));
        assert_eq!(payload.get("start_date"), Some("2022-01-01"));
        assert_eq!(payload.get("end_date"), Some("2022-01-14"));
        assert_eq!(payload.get("base"), None);
    }

    #[test]
    fn payload_treats_empty_symbols_as_absent() {
        let payload = QueryPayload::build("k", None, Some(&[]), None);
        assert_eq!(payload.get("symbols"), None);
    }

    #[test]
    fn payload_preserves_symbol_order() {
        let payload = QueryPayload::build("k", None, Some(&[Currency::MXN, Currency::EUR]), None);
        assert_eq!(payload.get("symbols"), Some("MXN,EUR"));
    }

    #[test]
    fn endpoint_serializes_payload_into_query() {
        let client = FixerClient::new("secret".to_string()).unwrap();
        let payload = QueryPayload::build(
            "secret",
            Some(Currency::USD),
            Some(&[Currency::EUR]),
            Some(&range()),
        );
        let url = client.endpoint(TIMESERIES_PATH, &payload).unwrap();

        assert_eq!(
            url.as_str(),
            "http://data.fixer.io/timeseries?access_key=secret&base=USD&symbols=EUR\
             &start_date=2021-12-31&end_date=2022-01-14"
        );
    }

    #[test]
    fn historical_path_embeds_the_date() {
        let client = FixerClient::new("k".to_string()).unwrap();
        let payload = QueryPayload::build("k", None, None, None);
        let path = format!("/{}", date(2022, 1, 14).format(DATE_FORMAT));
        let url = client.endpoint(&path, &payload).unwrap();

        assert_eq!(url.as_str(), "http://data.fixer.io/2022-01-14?access_key=k");
    }

    #[test]
    fn endpoint_urlencodes_joined_symbols() {
        let client = FixerClient::new("k".to_string()).unwrap();
        let payload = QueryPayload::build("k", None, Some(&[Currency::EUR, Currency::USD]), None);
        let url = client.endpoint(LATEST_PATH, &payload).unwrap();

        assert_eq!(
            url.as_str(),
            "http://data.fixer.io/latest?access_key=k&symbols=EUR%2CUSD"
        );
    }

    #[test]
    fn client_drops_the_default_base() {
        let client = FixerClient::new("k".to_string()).unwrap();
        let client = client.with_base(Currency::EUR);
        assert_eq!(client.base, None);

        let client = client.with_base(Currency::USD);
        assert_eq!(client.base, Some(Currency::USD));
    }

    #[test]
    fn call_site_arguments_override_client_defaults() {
        let client = FixerClient::new("k".to_string())
            .unwrap()
            .with_base(Currency::USD)
            .with_symbols(vec![Currency::EUR]);

        assert_eq!(client.resolve_base(Some(Currency::GBP)), Some(Currency::GBP));
        assert_eq!(client.resolve_base(None), Some(Currency::USD));
        assert_eq!(
            client.resolve_symbols(Some(&[Currency::MXN])),
            Some(&[Currency::MXN][..])
        );
        assert_eq!(
            client.resolve_symbols(None),
            Some(&[Currency::EUR][..])
        );
    }

    #[test]
    fn timeseries_response_deserializes_nested_rates() {
        let json = r#"{
            "success": true,
            "timeseries": true,
            "start_date": "2022-01-13",
            "end_date": "2022-01-14",
            "base": "USD",
            "rates": {
                "2022-01-13": { "EUR": 1.1453 },
                "2022-01-14": { "EUR": 1.1414 }
            }
        }"#;

        let response: RatesResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.base.as_deref(), Some("USD"));
        assert_eq!(response.start_date, Some(date(2022, 1, 13)));

        let rates = response.rates.unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[&date(2022, 1, 14)]["EUR"], 1.1414);
    }

    #[test]
    fn error_body_deserializes_without_rates() {
        let json = r#"{
            "success": false,
            "error": { "code": 105, "type": "function_access_restricted" }
        }"#;

        let response: RatesResponse = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert!(response.rates.is_none());

        let error = response.error.unwrap();
        assert_eq!(error.code, 105);
        assert_eq!(error.message(), "function_access_restricted");
    }

    #[test]
    fn unknown_body_fields_are_ignored() {
        let json = r#"{ "success": true, "units": "per_base", "rates": {} }"#;
        let response: RatesResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.rates.map(|r| r.len()), Some(0));
    }

    #[test]
    fn daily_response_deserializes_flat_rates() {
        let json = r#"{
            "success": true,
            "historical": true,
            "date": "2022-01-14",
            "base": "EUR",
            "rates": { "USD": 0.8762, "MXN": 23.21 }
        }"#;

        let response: DailyRatesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.date, Some(date(2022, 1, 14)));
        assert_eq!(response.rates.unwrap()["USD"], 0.8762);
    }

    #[tokio::test]
    async fn test_fixer_client_creation() {
        let client = FixerClient::new("test_key".to_string());
        assert!(client.is_ok());
    }

    proptest! {
        #[test]
        fn payload_keys_mirror_argument_presence(
            has_base in any::<bool>(),
            n_symbols in 0usize..4,
            has_range in any::<bool>(),
        ) {
            let all = Currency::all();
            let symbols = &all[..n_symbols];
            let range = range();

            let payload = QueryPayload::build(
                "k",
                has_base.then_some(Currency::USD),
                Some(symbols),
                has_range.then_some(&range),
            );

            prop_assert_eq!(payload.get("access_key").is_some(), true);
            prop_assert_eq!(payload.get("base").is_some(), has_base);
            prop_assert_eq!(payload.get("symbols").is_some(), n_symbols > 0);
            prop_assert_eq!(payload.get("start_date").is_some(), has_range);
            prop_assert_eq!(payload.get("end_date").is_some(), has_range);
        }
    }
}
