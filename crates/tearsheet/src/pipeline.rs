//! Fetch-and-derive pipeline for the three reports.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use tearsheet_core::{
    DataError, Dimension, FundamentalDataProvider, InsiderDataProvider, MarketRiskProvider,
    PriceDataProvider, Result, SectorList, Symbol,
};
use tearsheet_metrics::{
    CapitalStructure, History, MarketInputs, MetricTable, comparison, overview, time_series,
};

/// Decimal places every report is rounded to.
pub const DECIMALS: i32 = 2;

/// Days searched backwards for the latest close.
const PRICE_LOOKBACK_DAYS: i64 = 14;

/// An overview table together with the rate its DCF block discounts at.
#[derive(Clone, Debug)]
pub struct OverviewReport {
    /// Overview metrics, rounded.
    pub table: MetricTable,
    /// Discount rate written into the DCF block.
    pub discount_rate: f64,
}

/// Fetches fiscal records and market data and derives report tables.
///
/// Every provider is optional at construction; a report that needs a missing
/// one fails with [`DataError::ProviderNotConfigured`]. Fetches run one after
/// another and are never retried.
#[derive(Default)]
pub struct ReportPipeline {
    fundamentals: Option<Arc<dyn FundamentalDataProvider>>,
    prices: Option<Arc<dyn PriceDataProvider>>,
    insiders: Option<Arc<dyn InsiderDataProvider>>,
    market_risk: Option<Arc<dyn MarketRiskProvider>>,
}

impl std::fmt::Debug for ReportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportPipeline")
            .field("fundamentals", &self.fundamentals.as_ref().map(|p| p.name()))
            .field("prices", &self.prices.as_ref().map(|p| p.name()))
            .field("insiders", &self.insiders.as_ref().map(|p| p.name()))
            .field("market_risk", &self.market_risk.as_ref().map(|p| p.name()))
            .finish()
    }
}

fn not_configured(what: &str) -> DataError {
    DataError::ProviderNotConfigured(format!("no {what} provider registered"))
}

impl ReportPipeline {
    /// Creates a pipeline with no providers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fiscal record provider.
    #[must_use]
    pub fn with_fundamentals(mut self, provider: Arc<dyn FundamentalDataProvider>) -> Self {
        debug!(provider = provider.name(), "registering fundamentals provider");
        self.fundamentals = Some(provider);
        self
    }

    /// Sets the price provider used for the live LTM valuation.
    #[must_use]
    pub fn with_prices(mut self, provider: Arc<dyn PriceDataProvider>) -> Self {
        debug!(provider = provider.name(), "registering price provider");
        self.prices = Some(provider);
        self
    }

    /// Sets the insider filing provider.
    #[must_use]
    pub fn with_insiders(mut self, provider: Arc<dyn InsiderDataProvider>) -> Self {
        debug!(provider = provider.name(), "registering insider provider");
        self.insiders = Some(provider);
        self
    }

    /// Sets the beta and risk-free rate provider.
    #[must_use]
    pub fn with_market_risk(mut self, provider: Arc<dyn MarketRiskProvider>) -> Self {
        debug!(provider = provider.name(), "registering market risk provider");
        self.market_risk = Some(provider);
        self
    }

    /// Uses Sharadar for fundamentals, prices and insider filings.
    #[cfg(feature = "sharadar")]
    #[must_use]
    pub fn with_sharadar(self, api_key: impl Into<String>) -> Self {
        let provider = Arc::new(tearsheet_sharadar::SharadarProvider::new(api_key));
        self.with_fundamentals(provider.clone())
            .with_prices(provider.clone())
            .with_insiders(provider)
    }

    /// Uses Yahoo Finance for beta and the risk-free rate.
    #[cfg(feature = "yahoo")]
    #[must_use]
    pub fn with_yahoo(self) -> Self {
        self.with_market_risk(Arc::new(tearsheet_yahoo::YahooProvider::new()))
    }

    /// Fetches `ART` records and assembles the fiscal history.
    #[instrument(skip(self))]
    pub async fn history(&self, symbol: &Symbol) -> Result<History> {
        let provider = self
            .fundamentals
            .as_ref()
            .ok_or_else(|| not_configured("fundamentals"))?;
        let records = provider
            .fetch_fiscal_records(symbol, Dimension::AsReportedTtm)
            .await?;
        debug!(records = records.len(), "fetched fiscal records");
        Ok(History::from_records(symbol, records)?)
    }

    /// Time-series table: up to [`tearsheet_metrics::time_series::MAX_YEARS`] fiscal years
    /// plus LTM.
    #[instrument(skip(self))]
    pub async fn time_series(&self, symbol: &Symbol) -> Result<MetricTable> {
        let history = self.history(symbol).await?;
        let mut table = time_series(&history)?;
        table.keep_last(tearsheet_metrics::time_series::MAX_YEARS + 1);
        table.round(DECIMALS);
        info!(periods = table.height(), metrics = table.width(), "time series ready");
        Ok(table)
    }

    /// Comparison table with one row per listed ticker.
    #[instrument(skip(self))]
    pub async fn comparison(&self, sectors: &SectorList) -> Result<MetricTable> {
        if sectors.is_empty() {
            return Err(DataError::InvalidParameter(
                "comparison needs at least one ticker".to_string(),
            ));
        }
        let mut histories = Vec::with_capacity(sectors.len());
        for symbol in sectors.symbols() {
            histories.push(self.history(symbol).await?);
        }
        let mut table = comparison(&histories)?;
        table.round(DECIMALS);
        info!(tickers = table.height(), metrics = table.width(), "comparison ready");
        Ok(table)
    }

    /// Overview table and its discount rate.
    ///
    /// `discount_rate` overrides the WACC estimate. Without an override the
    /// risk-free rate must be available; a missing beta falls back to 1.0.
    #[instrument(skip(self))]
    pub async fn overview(
        &self,
        symbol: &Symbol,
        discount_rate: Option<f64>,
    ) -> Result<OverviewReport> {
        let history = self.history(symbol).await?;
        let market = MarketInputs {
            latest_price: self.latest_price(symbol).await,
            insider_purchases: self.insider_purchases(symbol).await,
            as_of: Utc::now().date_naive(),
        };

        let derived = overview(&history, &market)?;
        let mut table = derived.table;
        table.keep_last(tearsheet_metrics::overview::MAX_YEARS + 1);
        table.round(DECIMALS);

        let discount_rate = match discount_rate {
            Some(rate) => rate,
            None => self.wacc(symbol, &derived.capital).await?,
        };
        info!(
            periods = table.height(),
            metrics = table.width(),
            discount_rate,
            "overview ready"
        );
        Ok(OverviewReport {
            table,
            discount_rate,
        })
    }

    async fn latest_price(&self, symbol: &Symbol) -> Option<f64> {
        let provider = self.prices.as_ref()?;
        match provider.latest_close(symbol, PRICE_LOOKBACK_DAYS).await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(error = %e, "no latest close");
                None
            }
        }
    }

    async fn insider_purchases(&self, symbol: &Symbol) -> Vec<chrono::NaiveDate> {
        let Some(provider) = self.insiders.as_ref() else {
            return Vec::new();
        };
        match provider.fetch_insider_transactions(symbol).await {
            Ok(transactions) => transactions
                .iter()
                .filter(|t| t.is_open_market_purchase())
                .filter_map(|t| t.transaction_date)
                .collect(),
            Err(e) => {
                warn!(error = %e, "no insider filings");
                Vec::new()
            }
        }
    }

    async fn wacc(&self, symbol: &Symbol, capital: &CapitalStructure) -> Result<f64> {
        let provider = self
            .market_risk
            .as_ref()
            .ok_or_else(|| not_configured("market risk"))?;
        let beta = match provider.beta(symbol).await {
            Ok(beta) => beta,
            Err(e) => {
                warn!(error = %e, "no beta, assuming market beta");
                None
            }
        };
        let risk_free = provider.risk_free_rate().await?;
        Ok(capital.wacc(beta, risk_free)?)
    }
}
