#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tearsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Sharadar data provider.
//!
//! This crate implements the tearsheet-core provider traits for the Sharadar
//! tables published on [Nasdaq Data Link](https://data.nasdaq.com/).
//!
//! # Usage
//!
//! ```rust,ignore
//! use tearsheet_sharadar::SharadarProvider;
//! use tearsheet_core::{Dimension, FundamentalDataProvider, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = SharadarProvider::new("your_api_key");
//!     let records = provider
//!         .fetch_fiscal_records(&Symbol::new("AAPL"), Dimension::AsReportedTtm)
//!         .await?;
//!     println!("{} periods", records.len());
//!     Ok(())
//! }
//! ```

mod table;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use polars::prelude::*;
use reqwest::Client;
use std::fmt;
use tearsheet_core::{
    DataError, DataProvider, Dimension, FiscalRecord, FundamentalDataProvider, InsiderDataProvider,
    InsiderTransaction, PriceDataProvider, Result, Symbol,
};

use crate::table::{DatatablePage, ErrorEnvelope, Row, Table};

/// Base URL for the Sharadar datatables.
const SHARADAR_BASE_URL: &str = "https://data.nasdaq.com/api/v3/datatables/SHARADAR";

/// Upper bound on cursor pages followed for one request.
const MAX_PAGES: usize = 100;

/// Sharadar data provider.
///
/// Provides access to:
/// - Fundamentals (`SF1`) in any reporting dimension
/// - Daily equity prices (`SEP`)
/// - Insider ownership filings (`SF2`)
#[derive(Clone)]
pub struct SharadarProvider {
    client: Client,
    api_key: String,
}

impl fmt::Debug for SharadarProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharadarProvider")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl SharadarProvider {
    /// Create a new Sharadar provider with the given Nasdaq Data Link API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Create a new Sharadar provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// GET request for a datatable; parameters and the API key are
    /// percent-encoded into the query string.
    fn request(&self, table: &str, params: &[(&str, String)]) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{SHARADAR_BASE_URL}/{table}.json"))
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
    }

    /// Fetch one page of a datatable.
    async fn get_page(&self, table: &str, params: &[(&str, String)]) -> Result<DatatablePage> {
        tracing::debug!("Sharadar request: {} {:?}", table, params);

        let response = self
            .request(table, params)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: "Sharadar".to_string(),
                retry_after: None,
            });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationFailed("Sharadar".to_string()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        // Rejected requests carry a `quandl_error` body regardless of status
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&text) {
            let err = envelope.quandl_error;
            return Err(DataError::Network(format!("{}: {}", err.code, err.message)));
        }

        if !status.is_success() {
            return Err(DataError::Network(format!("HTTP {status}: {text}")));
        }

        serde_json::from_str(&text).map_err(|e| DataError::Parse(format!("{e}: {text}")))
    }

    /// Fetch every page of a datatable query.
    async fn get_table(&self, table: &str, params: Vec<(&str, String)>) -> Result<Table> {
        let mut rows = Table::default();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut page_params = params.clone();
            if let Some(id) = cursor.take() {
                page_params.push(("qopts.cursor_id", id));
            }

            let page = self.get_page(table, &page_params).await?;
            rows.extend(page.datatable)?;

            match page.meta.next_cursor_id {
                Some(next) => cursor = Some(next),
                None => {
                    tracing::debug!("Sharadar {}: {} rows", table, rows.len());
                    return Ok(rows);
                }
            }
        }

        tracing::warn!("Sharadar {}: stopped after {} pages", table, MAX_PAGES);
        Ok(rows)
    }
}

/// Convert an `SF1` row into a fiscal record.
fn fiscal_record(symbol: &Symbol, dimension: Dimension, row: &Row<'_>) -> Result<FiscalRecord> {
    let calendar_date = row.required_date("calendardate")?;
    let fiscal_period = row.str("fiscalperiod").unwrap_or_default();

    Ok(FiscalRecord {
        date_key: row.date("datekey"),
        report_period: row.date("reportperiod"),
        last_updated: row.date("lastupdated"),

        enterprise_value: row.f64("ev"),
        market_cap: row.f64("marketcap"),
        pe_ratio: row.f64("pe"),
        pb_ratio: row.f64("pb"),

        revenue: row.f64("revenue"),
        cost_of_revenue: row.f64("cor"),
        gross_profit: row.f64("gp"),
        net_income: row.f64("netinc"),
        operating_income: row.f64("opinc"),
        operating_expenses: row.f64("opex"),
        ebitda: row.f64("ebitda"),
        ebit: row.f64("ebit"),
        ebt: row.f64("ebt"),
        eps: row.f64("eps"),
        interest_expense: row.f64("intexp"),
        tax_expense: row.f64("taxexp"),
        research_and_development: row.f64("rnd"),
        selling_general_admin: row.f64("sgna"),
        depreciation_amortization: row.f64("depamor"),
        stock_based_compensation: row.f64("sbcomp"),

        operating_cash_flow: row.f64("ncfo"),
        free_cash_flow: row.f64("fcf"),
        capital_expenditure: row.f64("capex"),

        equity: row.f64("equity"),
        total_debt: row.f64("debt"),
        debt_current: row.f64("debtc"),
        debt_non_current: row.f64("debtnc"),
        total_assets: row.f64("assets"),
        current_assets: row.f64("assetsc"),
        total_liabilities: row.f64("liabilities"),
        current_liabilities: row.f64("liabilitiesc"),
        cash_and_equivalents: row.f64("cashneq"),
        short_term_investments: row.f64("investmentsc"),
        intangibles: row.f64("intangibles"),
        inventory: row.f64("inventory"),
        receivables: row.f64("receivables"),
        payables: row.f64("payables"),
        deferred_revenue: row.f64("deferredrev"),
        ppe_net: row.f64("ppnenet"),

        weighted_average_shares: row.f64("shareswa"),
        shares_basic: row.f64("sharesbas"),
        share_factor: row.f64("sharefactor"),

        gross_margin: row.f64("grossmargin"),
        ebitda_margin: row.f64("ebitdamargin"),
        net_margin: row.f64("netmargin"),
        current_ratio: row.f64("currentratio"),
        payout_ratio: row.f64("payoutratio"),
        asset_turnover: row.f64("assetturnover"),
        roa: row.f64("roa"),
        roe: row.f64("roe"),
        roic: row.f64("roic"),
        dividend_yield: row.f64("divyield"),

        fx_usd: row.f64("fxusd"),

        ..FiscalRecord::new(symbol.clone(), dimension, calendar_date, fiscal_period)
    })
}

/// Convert `SEP` rows into a date-sorted `date`/`close` frame.
fn price_frame(table: &Table) -> Result<DataFrame> {
    let epoch = DateTime::UNIX_EPOCH.date_naive();
    let mut days: Vec<i32> = Vec::with_capacity(table.len());
    let mut closes: Vec<Option<f64>> = Vec::with_capacity(table.len());

    for row in table.rows() {
        let Some(date) = row.date("date") else {
            continue;
        };
        days.push((date - epoch).num_days() as i32);
        closes.push(row.f64("close"));
    }

    let df = DataFrame::new(vec![
        Column::new("date".into(), days),
        Column::new("close".into(), closes),
    ])
    .map_err(|e| DataError::Parse(e.to_string()))?;

    df.lazy()
        .with_column(col("date").cast(DataType::Date))
        .sort(["date"], Default::default())
        .collect()
        .map_err(|e| DataError::Parse(e.to_string()))
}

/// Convert an `SF2` row into an insider transaction.
fn insider_transaction(symbol: &Symbol, row: &Row<'_>) -> InsiderTransaction {
    InsiderTransaction {
        filing_date: row.date("filingdate"),
        shares: row.f64("transactionshares"),
        ..InsiderTransaction::new(
            symbol.clone(),
            row.date("transactiondate"),
            row.str("transactioncode").unwrap_or_default(),
        )
    }
}

impl DataProvider for SharadarProvider {
    fn name(&self) -> &str {
        "Sharadar"
    }

    fn description(&self) -> &str {
        "Sharadar fundamentals, equity prices and insider filings via Nasdaq Data Link"
    }
}

#[async_trait]
impl FundamentalDataProvider for SharadarProvider {
    async fn fetch_fiscal_records(
        &self,
        symbol: &Symbol,
        dimension: Dimension,
    ) -> Result<Vec<FiscalRecord>> {
        let table = self
            .get_table(
                "SF1",
                vec![
                    ("ticker", symbol.to_string()),
                    ("dimension", dimension.code().to_string()),
                ],
            )
            .await?;

        if table.is_empty() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        table
            .rows()
            .map(|row| fiscal_record(symbol, dimension, &row))
            .collect()
    }
}

#[async_trait]
impl PriceDataProvider for SharadarProvider {
    async fn fetch_prices(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame> {
        let table = self
            .get_table(
                "SEP",
                vec![
                    ("ticker", symbol.to_string()),
                    ("date.gte", start.to_string()),
                    ("date.lte", end.to_string()),
                ],
            )
            .await?;

        if table.is_empty() {
            return Err(DataError::DataNotAvailable {
                symbol: symbol.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        price_frame(&table)
    }
}

#[async_trait]
impl InsiderDataProvider for SharadarProvider {
    async fn fetch_insider_transactions(&self, symbol: &Symbol) -> Result<Vec<InsiderTransaction>> {
        let table = self
            .get_table("SF2", vec![("ticker", symbol.to_string())])
            .await?;

        Ok(table
            .rows()
            .map(|row| insider_transaction(symbol, &row))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DatatablePage;
    use tearsheet_core::provider::last_close;

    fn table(json: &str) -> Table {
        let page: DatatablePage = serde_json::from_str(json).unwrap();
        let mut table = Table::default();
        table.extend(page.datatable).unwrap();
        table
    }

    fn request_url(provider: &SharadarProvider, table: &str, params: &[(&str, String)]) -> String {
        provider
            .request(table, params)
            .build()
            .unwrap()
            .url()
            .to_string()
    }

    #[test]
    fn test_url_building() {
        let provider = SharadarProvider::new("test_key");
        assert_eq!(
            request_url(
                &provider,
                "SF1",
                &[("ticker", "AAPL".to_string()), ("dimension", "ART".to_string())]
            ),
            "https://data.nasdaq.com/api/v3/datatables/SHARADAR/SF1.json?ticker=AAPL&dimension=ART&api_key=test_key"
        );
        assert_eq!(
            request_url(&provider, "SF2", &[]),
            "https://data.nasdaq.com/api/v3/datatables/SHARADAR/SF2.json?api_key=test_key"
        );
    }

    #[test]
    fn test_cursor_is_percent_encoded() {
        let provider = SharadarProvider::new("test_key");
        let cursor = "ab+c/d==".to_string();
        let request = provider
            .request("SEP", &[("qopts.cursor_id", cursor.clone())])
            .build()
            .unwrap();

        let query = request.url().query().unwrap();
        assert!(query.starts_with("qopts.cursor_id=ab%2Bc%2Fd%3D%3D&"));
        let sent: Vec<_> = request.url().query_pairs().collect();
        assert_eq!(sent[0].1, cursor);
        assert_eq!(sent[1].1, "test_key");
    }

    #[test]
    fn test_provider_metadata() {
        let provider = SharadarProvider::new("test_key");
        assert_eq!(provider.name(), "Sharadar");
        assert!(!provider.description().is_empty());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = SharadarProvider::new("secret_key_12345");
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_sf1_row_maps_to_fiscal_record() {
        let table = table(
            r#"{"datatable":{
                "data":[["AAPL","ART","2023-09-30","2023-11-03","2023-Q4",383285000000,125820000000,1.0,null]],
                "columns":[{"name":"ticker"},{"name":"dimension"},{"name":"calendardate"},
                           {"name":"datekey"},{"name":"fiscalperiod"},{"name":"revenue"},
                           {"name":"ebitda"},{"name":"fxusd"},{"name":"debt"}]}}"#,
        );
        let row = table.rows().next().unwrap();
        let record = fiscal_record(&Symbol::new("AAPL"), Dimension::AsReportedTtm, &row).unwrap();

        assert_eq!(record.calendar_date, NaiveDate::from_ymd_opt(2023, 9, 30).unwrap());
        assert_eq!(record.date_key, NaiveDate::from_ymd_opt(2023, 11, 3));
        assert!(record.is_fiscal_year_end());
        assert_eq!(record.revenue, Some(383_285_000_000.0));
        assert_eq!(record.ebitda, Some(125_820_000_000.0));
        assert_eq!(record.fx_usd, Some(1.0));
        assert_eq!(record.total_debt, None);
        assert_eq!(record.dimension, Dimension::AsReportedTtm);
    }

    #[test]
    fn test_sf1_row_without_calendar_date_is_rejected() {
        let table = table(
            r#"{"datatable":{"data":[["AAPL",null]],"columns":[{"name":"ticker"},{"name":"calendardate"}]}}"#,
        );
        let row = table.rows().next().unwrap();
        assert!(fiscal_record(&Symbol::new("AAPL"), Dimension::AsReportedTtm, &row).is_err());
    }

    #[test]
    fn test_sep_rows_are_sorted_by_date() {
        let table = table(
            r#"{"datatable":{
                "data":[["AAPL","2024-01-03",184.25],["AAPL","2024-01-02",185.64]],
                "columns":[{"name":"ticker"},{"name":"date"},{"name":"close"}]}}"#,
        );
        let prices = price_frame(&table).unwrap();
        assert_eq!(prices.height(), 2);
        assert_eq!(prices.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(last_close(&prices), Some(184.25));
    }

    #[test]
    fn test_sf2_row_maps_to_transaction() {
        let table = table(
            r#"{"datatable":{
                "data":[["AAPL","2024-02-01","2024-01-30","P",1500.0]],
                "columns":[{"name":"ticker"},{"name":"filingdate"},{"name":"transactiondate"},
                           {"name":"transactioncode"},{"name":"transactionshares"}]}}"#,
        );
        let row = table.rows().next().unwrap();
        let txn = insider_transaction(&Symbol::new("AAPL"), &row);
        assert!(txn.is_open_market_purchase());
        assert_eq!(txn.transaction_date, NaiveDate::from_ymd_opt(2024, 1, 30));
        assert_eq!(txn.filing_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(txn.shares, Some(1500.0));
    }
}
