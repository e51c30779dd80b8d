//! One trait per report input. A vendor implements the ones it can serve;
//! the pipeline holds each as a trait object so tests can swap in fixtures.
//!
//! Fundamentals are the only required input. Prices, insider filings and
//! market risk inputs may fail without aborting a report.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use polars::prelude::DataFrame;
use std::fmt::Debug;

use crate::{
    error::{DataError, Result},
    period::Dimension,
    types::{FiscalRecord, InsiderTransaction, Symbol},
};

/// Identity shared by every vendor, used in logs and error messages.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Sharadar").
    fn name(&self) -> &str;

    /// What the vendor supplies.
    fn description(&self) -> &str;
}

/// Fiscal records, the rows every metric is derived from.
#[async_trait]
pub trait FundamentalDataProvider: DataProvider {
    /// Fetches every fiscal record for a symbol in the given dimension.
    ///
    /// Records are returned in provider order; callers must not rely on it.
    async fn fetch_fiscal_records(
        &self,
        symbol: &Symbol,
        dimension: Dimension,
    ) -> Result<Vec<FiscalRecord>>;
}

/// Provider for daily closing prices.
#[async_trait]
pub trait PriceDataProvider: DataProvider {
    /// Fetches daily prices for a symbol.
    ///
    /// Returns a DataFrame with columns `date` (Date) and `close` (f64),
    /// sorted by date ascending.
    async fn fetch_prices(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame>;

    /// Fetches the most recent close within the last `lookback_days` days.
    async fn latest_close(&self, symbol: &Symbol, lookback_days: i64) -> Result<f64> {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(lookback_days);
        let prices = self.fetch_prices(symbol, start, end).await?;

        last_close(&prices).ok_or_else(|| DataError::DataNotAvailable {
            symbol: symbol.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}

/// Returns the last non-null `close` of a date-sorted price frame.
#[must_use]
pub fn last_close(prices: &DataFrame) -> Option<f64> {
    let closes = prices
        .column("close")
        .ok()?
        .as_materialized_series()
        .f64()
        .ok()?;
    closes.into_iter().flatten().filter(|c| c.is_finite()).last()
}

/// Provider for insider ownership filings.
#[async_trait]
pub trait InsiderDataProvider: DataProvider {
    /// Fetches all insider transactions filed for a symbol.
    async fn fetch_insider_transactions(&self, symbol: &Symbol) -> Result<Vec<InsiderTransaction>>;
}

/// Provider for the market inputs of a cost of capital estimate.
#[async_trait]
pub trait MarketRiskProvider: DataProvider {
    /// Fetches the equity beta of a symbol, `None` when the provider has none.
    async fn beta(&self, symbol: &Symbol) -> Result<Option<f64>>;

    /// Fetches the current risk-free rate as a fraction (0.042 = 4.2%).
    async fn risk_free_rate(&self) -> Result<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[derive(Debug)]
    struct StaticPrices {
        closes: Vec<Option<f64>>,
    }

    impl DataProvider for StaticPrices {
        fn name(&self) -> &str {
            "static"
        }

        fn description(&self) -> &str {
            "fixed price series"
        }
    }

    #[async_trait]
    impl PriceDataProvider for StaticPrices {
        async fn fetch_prices(
            &self,
            _symbol: &Symbol,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<DataFrame> {
            let days: Vec<i32> = (0..self.closes.len() as i32).collect();
            DataFrame::new(vec![
                Column::new("date".into(), days),
                Column::new("close".into(), self.closes.clone()),
            ])
            .map_err(DataError::from)
        }
    }

    #[tokio::test]
    async fn test_latest_close_skips_trailing_nulls() {
        let provider = StaticPrices {
            closes: vec![Some(10.0), Some(11.5), None],
        };
        let close = provider.latest_close(&Symbol::new("X"), 14).await.unwrap();
        assert_eq!(close, 11.5);
    }

    #[tokio::test]
    async fn test_latest_close_empty_is_unavailable() {
        let provider = StaticPrices { closes: vec![] };
        let err = provider.latest_close(&Symbol::new("X"), 14).await.unwrap_err();
        assert!(matches!(err, DataError::DataNotAvailable { .. }));
    }
}
