#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tearsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Market inputs for the cost of capital: equity beta, the 10-year
//! Treasury yield and daily closes.
//!
//! ```no_run
//! use tearsheet_yahoo::YahooProvider;
//! use tearsheet_core::{MarketRiskProvider, Symbol};
//!
//! # async fn example() -> tearsheet_core::Result<()> {
//! let yahoo = YahooProvider::new();
//! let beta = yahoo.beta(&Symbol::new("AAPL")).await?.unwrap_or(1.0);
//! let rf = yahoo.risk_free_rate().await?;
//! println!("beta {beta:.2}, risk-free {rf:.4}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use polars::prelude::DataFrame;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tearsheet_core::{
    DataError, DataProvider, MarketRiskProvider, PriceDataProvider, Result, Symbol,
    provider::last_close,
};
use tokio::{sync::Mutex, time::Instant};
use tracing::debug;

mod wire;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Quotes the 10-year yield in percent.
const TEN_YEAR_YIELD: &str = "^TNX";
const YIELD_LOOKBACK_DAYS: i64 = 14;

const MIN_REQUEST_GAP: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const THROTTLED_RETRY: Duration = Duration::from_secs(60);

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Yahoo Finance client for beta, Treasury yields and daily closes.
///
/// Requests are spaced at least one second apart unless built with
/// [`YahooProvider::with_rate_limit`].
#[derive(Debug)]
pub struct YahooProvider {
    http: reqwest::Client,
    gap: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl YahooProvider {
    /// Client with the default one second request gap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(MIN_REQUEST_GAP)
    }

    /// Client that waits at least `gap` between requests.
    #[must_use]
    pub fn with_rate_limit(gap: Duration) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_client(http).gap(gap)
    }

    /// Client sending through `http`.
    #[must_use]
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            gap: MIN_REQUEST_GAP,
            last_request: Mutex::new(None),
        }
    }

    fn gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }

    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(at) = *last {
            let ready = at + self.gap;
            if ready > Instant::now() {
                let wait = ready.saturating_duration_since(Instant::now());
                debug!(wait_ms = wait.as_millis() as u64, "throttling Yahoo");
                tokio::time::sleep_until(ready).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        symbol: &Symbol,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.throttle().await;
        debug!(%symbol, url, "Yahoo request");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(DataError::RateLimited {
                provider: self.name().to_string(),
                retry_after: Some(THROTTLED_RETRY),
            }),
            StatusCode::NOT_FOUND => Err(DataError::SymbolNotFound(symbol.to_string())),
            status if !status.is_success() => {
                Err(DataError::Network(format!("{symbol}: Yahoo answered {status}")))
            }
            _ => response
                .json()
                .await
                .map_err(|e| DataError::Parse(e.to_string())),
        }
    }
}

fn chart_url(symbol: &Symbol) -> String {
    format!("{CHART_URL}/{symbol}")
}

/// `period1`/`period2` bounds covering whole UTC days.
fn chart_query(start: NaiveDate, end: NaiveDate) -> Vec<(&'static str, String)> {
    let seconds = |day: NaiveDate, h, m, s| {
        day.and_hms_opt(h, m, s)
            .map_or(0, |t| t.and_utc().timestamp())
    };
    vec![
        ("period1", seconds(start, 0, 0, 0).to_string()),
        ("period2", seconds(end, 23, 59, 59).to_string()),
        ("interval", "1d".to_string()),
    ]
}

fn summary_url(symbol: &Symbol) -> String {
    format!("{SUMMARY_URL}/{symbol}")
}

fn summary_query() -> Vec<(&'static str, String)> {
    vec![("modules", "summaryDetail,defaultKeyStatistics".to_string())]
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn description(&self) -> &str {
        "Equity beta, 10-year Treasury yield and daily closes"
    }
}

#[async_trait]
impl PriceDataProvider for YahooProvider {
    async fn fetch_prices(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame> {
        if end < start {
            return Err(DataError::InvalidParameter(format!(
                "price window ends ({end}) before it starts ({start})"
            )));
        }
        let chart: wire::Chart = self
            .get_json(symbol, &chart_url(symbol), &chart_query(start, end))
            .await?;
        chart.into_closes(symbol)
    }
}

#[async_trait]
impl MarketRiskProvider for YahooProvider {
    async fn beta(&self, symbol: &Symbol) -> Result<Option<f64>> {
        let summary: wire::QuoteSummary = self
            .get_json(symbol, &summary_url(symbol), &summary_query())
            .await?;
        Ok(summary.beta())
    }

    async fn risk_free_rate(&self) -> Result<f64> {
        let index = Symbol::new(TEN_YEAR_YIELD);
        let end = Utc::now().date_naive();
        let start = end - chrono::Duration::days(YIELD_LOOKBACK_DAYS);
        let closes = self.fetch_prices(&index, start, end).await?;

        last_close(&closes)
            .map(|pct| pct / 100.0)
            .ok_or_else(|| DataError::DataNotAvailable {
                symbol: index.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_query_covers_whole_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let query = chart_query(start, end);

        assert_eq!(query[0], ("period1", "1704067200".to_string()));
        assert_eq!(query[1], ("period2", "1706745599".to_string()));
        assert_eq!(query[2].1, "1d");
    }

    #[test]
    fn test_urls_carry_the_ticker() {
        let tnx = Symbol::new(TEN_YEAR_YIELD);
        assert!(chart_url(&tnx).ends_with("/chart/^TNX"));
        assert!(summary_url(&Symbol::new("aapl")).ends_with("/quoteSummary/AAPL"));
        assert!(summary_query()[0].1.contains("summaryDetail"));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(YahooProvider::default().name(), "Yahoo Finance");
    }

    #[tokio::test]
    async fn test_inverted_window_is_rejected_before_any_request() {
        let yahoo = YahooProvider::new();
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = yahoo
            .fetch_prices(&Symbol::new("AAPL"), start, end)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_throttle_spaces_requests() {
        let yahoo = YahooProvider::with_rate_limit(Duration::from_millis(500));
        let before = Instant::now();
        yahoo.throttle().await;
        yahoo.throttle().await;
        assert!(Instant::now() - before >= Duration::from_millis(500));
    }
}
