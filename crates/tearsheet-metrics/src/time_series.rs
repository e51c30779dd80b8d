//! Per-period metric catalogue for a single ticker.

use crate::{error::Result, history::History, table::MetricTable, values::Values};

/// Most fiscal years shown on a time-series sheet.
pub const MAX_YEARS: usize = 20;

/// Monetary fields are reported in millions.
pub(crate) const MILLIONS: f64 = 1_000_000.0;

/// Derives the time-series catalogue: one row per fiscal year plus LTM.
///
/// Reported valuation multiples and ratios are taken as published; every
/// other ratio is computed from the raw fields. Growth columns (`Revenue %`
/// and friends) are period-over-period changes and are missing for the first
/// period.
pub fn time_series(history: &History) -> Result<MetricTable> {
    let ev = history.field(|r| r.enterprise_value);
    let market_cap = history.field(|r| r.market_cap);
    let revenue = history.field(|r| r.revenue);
    let gross_profit = history.field(|r| r.gross_profit);
    let net_income = history.field(|r| r.net_income);
    let operating_income = history.field(|r| r.operating_income);
    let ebitda = history.field(|r| r.ebitda);
    let ebit = history.field(|r| r.ebit);
    let interest = history.field(|r| r.interest_expense);
    let cfo = history.field(|r| r.operating_cash_flow);
    let fcf = history.field(|r| r.free_cash_flow);
    let equity = history.field(|r| r.equity);
    let debt = history.field(|r| r.total_debt);
    let assets = history.field(|r| r.total_assets);
    let liabilities = history.field(|r| r.total_liabilities);
    let current_assets = history.field(|r| r.current_assets);
    let current_liabilities = history.field(|r| r.current_liabilities);
    let cash = history.field(|r| r.cash_and_equivalents);
    let intangibles = history.field(|r| r.intangibles);
    let inventory = history.field(|r| r.inventory);
    let shares = history.field(|r| r.weighted_average_shares);

    let working_capital = &current_assets - &current_liabilities;
    let tangible_book = &(&assets - &intangibles) - &liabilities;

    let metrics: Vec<(&str, Values)> = vec![
        // Valuation
        ("TEV", &ev / MILLIONS),
        ("Market Cap", &market_cap / MILLIONS),
        ("TEV / EBITDA", &ev / &ebitda),
        ("TEV / Revenue", &ev / &revenue),
        ("TEV / FCF", &ev / &fcf),
        ("P/E", history.field(|r| r.pe_ratio)),
        ("P/B", history.field(|r| r.pb_ratio)),
        // Income statement
        ("Revenue", &revenue / MILLIONS),
        ("Revenue %", revenue.pct_change()),
        ("Gross Profit", &gross_profit / MILLIONS),
        ("GP %", gross_profit.pct_change()),
        ("Net Income", &net_income / MILLIONS),
        ("Net Income %", net_income.pct_change()),
        ("Operating Income", &operating_income / MILLIONS),
        (
            "Total Operating Expense",
            history.field(|r| r.operating_expenses) / MILLIONS,
        ),
        ("EBITDA", &ebitda / MILLIONS),
        ("EBITDA %", ebitda.pct_change()),
        ("EPS", history.field(|r| r.eps)),
        ("Interest Expense", &interest / MILLIONS),
        // Cash flow
        ("CFO", &cfo / MILLIONS),
        ("CFO %", cfo.pct_change()),
        ("FCF", &fcf / MILLIONS),
        ("FCF %", fcf.pct_change()),
        // Balance sheet
        ("Equity", &equity / MILLIONS),
        ("Debt", &debt / MILLIONS),
        ("Total Assets", &assets / MILLIONS),
        ("Total Liabilities", &liabilities / MILLIONS),
        ("Net Working Capital", &working_capital / MILLIONS),
        ("Cash Ratio", &cash / &current_liabilities),
        ("Tangible Book Value", &tangible_book / MILLIONS),
        ("TBV Per Share", &tangible_book / &shares),
        ("Leverage Ratio", &assets / &equity),
        (
            "Interest-Bearing Debt",
            (history.field(|r| r.debt_current) + history.field(|r| r.debt_non_current)) / MILLIONS,
        ),
        ("Debt to Capital", &debt / &(&debt + &equity)),
        ("Cash to Debt", &cash / &debt),
        ("Net Debt to Total Assets", &(&debt - &cash) / &assets),
        ("Working Capital Turnover", &revenue / &working_capital),
        // Margins
        ("GP Margin", history.field(|r| r.gross_margin)),
        ("EBITDA Margin", history.field(|r| r.ebitda_margin)),
        ("Net Margin", history.field(|r| r.net_margin)),
        ("Operating Margin", &operating_income / &revenue),
        ("Free Cash Flow Margin", &fcf / &revenue),
        // Ratios
        ("Current Ratio", history.field(|r| r.current_ratio)),
        (
            "Quick Ratio",
            &(&current_assets - &inventory) / &current_liabilities,
        ),
        ("Payout Ratio", history.field(|r| r.payout_ratio)),
        ("D/E", &debt / &equity),
        ("Debt to EBITDA", &debt / &ebitda),
        ("Asset Turnover", history.field(|r| r.asset_turnover)),
        ("Int Coverage", &ebit / &interest),
        // Returns
        ("ROA", history.field(|r| r.roa)),
        ("ROE", history.field(|r| r.roe)),
        ("ROIC", history.field(|r| r.roic)),
    ];

    let rows = history.periods().iter().map(ToString::to_string).collect();
    let mut table = MetricTable::new("Period", rows);
    for (name, values) in metrics {
        table.push(name, values)?;
    }

    tracing::debug!(
        symbol = %history.symbol(),
        periods = table.height(),
        metrics = table.width(),
        "derived time series"
    );
    Ok(table)
}
