//! Tickers and the raw rows the providers return: [`FiscalRecord`] per
//! reporting period and [`InsiderTransaction`] per filing line.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::period::Dimension;

/// Ticker, trimmed and uppercased so `nvda ` and `NVDA` compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Normalises `s` into a ticker.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// The normalised ticker.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One reporting period's raw financial fields.
///
/// Keyed by symbol and period. Monetary fields are in the reporting currency
/// and unscaled; `fx_usd` converts them to USD. Every field the provider left
/// empty is `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FiscalRecord {
    /// Stock symbol.
    pub symbol: Symbol,
    /// Reporting basis of this record.
    pub dimension: Dimension,
    /// Normalized calendar period end.
    pub calendar_date: NaiveDate,
    /// Date the figures became available (filing date).
    pub date_key: Option<NaiveDate>,
    /// Actual period end reported by the company.
    pub report_period: Option<NaiveDate>,
    /// Fiscal period label, e.g. `2023-Q4`.
    pub fiscal_period: String,
    /// Last time the provider updated this row.
    pub last_updated: Option<NaiveDate>,

    // Valuation
    /// Enterprise value.
    pub enterprise_value: Option<f64>,
    /// Market capitalisation.
    pub market_cap: Option<f64>,
    /// Price over earnings.
    pub pe_ratio: Option<f64>,
    /// Price-to-book ratio.
    pub pb_ratio: Option<f64>,

    // Income Statement
    /// Total revenue.
    pub revenue: Option<f64>,
    /// Cost of goods sold.
    pub cost_of_revenue: Option<f64>,
    /// Gross profit.
    pub gross_profit: Option<f64>,
    /// Net income.
    pub net_income: Option<f64>,
    /// Operating income.
    pub operating_income: Option<f64>,
    /// Operating expenses.
    pub operating_expenses: Option<f64>,
    /// EBITDA.
    pub ebitda: Option<f64>,
    /// Earnings before interest and taxes.
    pub ebit: Option<f64>,
    /// Earnings before taxes.
    pub ebt: Option<f64>,
    /// Basic EPS.
    pub eps: Option<f64>,
    /// Interest expense.
    pub interest_expense: Option<f64>,
    /// Income tax expense.
    pub tax_expense: Option<f64>,
    /// Research and development expense.
    pub research_and_development: Option<f64>,
    /// Selling, general and administrative expense.
    pub selling_general_admin: Option<f64>,
    /// Depreciation and amortization.
    pub depreciation_amortization: Option<f64>,
    /// Share-based compensation.
    pub stock_based_compensation: Option<f64>,

    // Cash Flow Statement
    /// Net cash flow from operations.
    pub operating_cash_flow: Option<f64>,
    /// Free cash flow.
    pub free_cash_flow: Option<f64>,
    /// Capital expenditure.
    pub capital_expenditure: Option<f64>,

    // Balance Sheet
    /// Shareholders' equity.
    pub equity: Option<f64>,
    /// Total debt.
    pub total_debt: Option<f64>,
    /// Current portion of debt.
    pub debt_current: Option<f64>,
    /// Non-current portion of debt.
    pub debt_non_current: Option<f64>,
    /// Total assets.
    pub total_assets: Option<f64>,
    /// Current assets.
    pub current_assets: Option<f64>,
    /// Total liabilities.
    pub total_liabilities: Option<f64>,
    /// Current liabilities.
    pub current_liabilities: Option<f64>,
    /// Cash and equivalents, excluding short-term investments.
    pub cash_and_equivalents: Option<f64>,
    /// Current investments.
    pub short_term_investments: Option<f64>,
    /// Goodwill and intangible assets.
    pub intangibles: Option<f64>,
    /// Inventory.
    pub inventory: Option<f64>,
    /// Trade and non-trade receivables.
    pub receivables: Option<f64>,
    /// Trade and non-trade payables.
    pub payables: Option<f64>,
    /// Deferred revenue.
    pub deferred_revenue: Option<f64>,
    /// Property, plant and equipment, net.
    pub ppe_net: Option<f64>,

    // Shares
    /// Weighted average shares outstanding.
    pub weighted_average_shares: Option<f64>,
    /// Basic shares outstanding at period end.
    pub shares_basic: Option<f64>,
    /// Share factor applied to the basic share count.
    pub share_factor: Option<f64>,

    // Reported ratios
    /// Gross margin.
    pub gross_margin: Option<f64>,
    /// EBITDA margin.
    pub ebitda_margin: Option<f64>,
    /// Net margin.
    pub net_margin: Option<f64>,
    /// Current ratio.
    pub current_ratio: Option<f64>,
    /// Dividends over net income.
    pub payout_ratio: Option<f64>,
    /// Asset turnover.
    pub asset_turnover: Option<f64>,
    /// Return on assets.
    pub roa: Option<f64>,
    /// Return on equity.
    pub roe: Option<f64>,
    /// ROIC as reported.
    pub roic: Option<f64>,
    /// Dividend yield.
    pub dividend_yield: Option<f64>,

    /// Reporting currency units per USD.
    pub fx_usd: Option<f64>,
}

impl FiscalRecord {
    /// Creates a new fiscal record with required fields.
    #[must_use]
    pub fn new(
        symbol: Symbol,
        dimension: Dimension,
        calendar_date: NaiveDate,
        fiscal_period: impl Into<String>,
    ) -> Self {
        Self {
            symbol,
            dimension,
            calendar_date,
            fiscal_period: fiscal_period.into(),
            ..Default::default()
        }
    }

    /// Returns true if the fiscal label marks a fiscal year end (`Q4`).
    #[must_use]
    pub fn is_fiscal_year_end(&self) -> bool {
        self.fiscal_period.contains("Q4")
    }

    /// Ordering key used to decide which of two records is more recent.
    #[must_use]
    pub fn recency(&self) -> (NaiveDate, Option<NaiveDate>) {
        (self.calendar_date, self.date_key)
    }
}

/// One line of an insider ownership filing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsiderTransaction {
    /// Stock symbol.
    pub symbol: Symbol,
    /// Date the filing was made.
    pub filing_date: Option<NaiveDate>,
    /// Date of the transaction itself.
    pub transaction_date: Option<NaiveDate>,
    /// SEC transaction code (`P` = open market purchase, `S` = sale, ...).
    pub transaction_code: String,
    /// Shares traded, when reported.
    pub shares: Option<f64>,
}

impl InsiderTransaction {
    /// Creates a new insider transaction.
    #[must_use]
    pub fn new(
        symbol: Symbol,
        transaction_date: Option<NaiveDate>,
        transaction_code: impl Into<String>,
    ) -> Self {
        Self {
            symbol,
            filing_date: None,
            transaction_date,
            transaction_code: transaction_code.into(),
            shares: None,
        }
    }

    /// Returns true for an open-market purchase.
    #[must_use]
    pub fn is_open_market_purchase(&self) -> bool {
        self.transaction_code.eq_ignore_ascii_case("P")
    }
}
