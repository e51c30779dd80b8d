//! Single-ticker overview catalogue.
//!
//! All monetary fields are converted to USD with the record's `fxusd` rate
//! (a missing rate counts as 1.0). When a live share price is supplied, the
//! LTM valuation columns are recomputed from it so they stay current between
//! filings.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tearsheet_core::FiscalRecord;

use crate::{
    error::Result, history::History, table::MetricTable, time_series::MILLIONS, values::Values,
    wacc::CapitalStructure,
};

/// Most fiscal years shown on an overview sheet.
pub const MAX_YEARS: usize = 15;

/// Window for the rolling growth columns.
pub const CAGR_YEARS: usize = 3;

/// Months of insider activity counted per period.
const INSIDER_WINDOW_MONTHS: u32 = 12;

type Field = fn(&FiscalRecord) -> Option<f64>;

/// Market data that is not part of the fiscal records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketInputs {
    /// Most recent closing price, in USD.
    pub latest_price: Option<f64>,
    /// Transaction dates of open-market insider purchases.
    pub insider_purchases: Vec<NaiveDate>,
    /// Date the report is produced; the insider window of the latest period
    /// ends here instead of at the period end.
    pub as_of: NaiveDate,
}

/// Derived overview metrics plus the LTM capital structure for the discount rate.
#[derive(Clone, Debug)]
pub struct Overview {
    /// One row per fiscal year plus LTM.
    pub table: MetricTable,
    /// LTM capital structure, in USD.
    pub capital: CapitalStructure,
}

/// Live LTM valuation inputs, in USD.
#[derive(Clone, Copy, Debug)]
struct LiveValuation {
    market_cap: f64,
    enterprise_value: f64,
    ebitda: f64,
    revenue: f64,
    fcf: f64,
    net_income: f64,
    equity: f64,
}

impl LiveValuation {
    fn from_history(history: &History, fx: &Values, price: Option<f64>) -> Self {
        let ltm = history.ltm();
        let ltm_fx = fx.last();
        let usd = |v: Option<f64>| v.map_or(f64::NAN, |v| v / ltm_fx);

        let shares = ltm.shares_basic.unwrap_or(f64::NAN) * ltm.share_factor.unwrap_or(1.0);
        let live_cap = price.map_or(f64::NAN, |p| p * shares);
        let market_cap = if live_cap.is_finite() {
            live_cap
        } else {
            ltm.market_cap.unwrap_or(f64::NAN)
        };

        // LTM EBITDA is sometimes unpublished; fall back to the previous period
        let ebitda = ltm.ebitda.or_else(|| history.annual().last().and_then(|r| r.ebitda));

        Self {
            market_cap,
            enterprise_value: market_cap + usd(ltm.total_debt) - usd(ltm.cash_and_equivalents),
            ebitda: usd(ebitda),
            revenue: usd(ltm.revenue),
            fcf: usd(ltm.free_cash_flow),
            net_income: usd(ltm.net_income),
            equity: usd(ltm.equity),
        }
    }
}

/// Counts purchases in the twelve months ending at each period date.
///
/// The window of the most recent period ends at `as_of`.
fn insider_buys(history: &History, market: &MarketInputs) -> Values {
    let latest = history.records().map(|r| r.calendar_date).max();

    Values::new(
        history
            .records()
            .map(|r| {
                let end = if Some(r.calendar_date) == latest {
                    market.as_of
                } else {
                    r.calendar_date
                };
                let start = end
                    .checked_sub_months(Months::new(INSIDER_WINDOW_MONTHS))
                    .unwrap_or(NaiveDate::MIN);
                market
                    .insider_purchases
                    .iter()
                    .filter(|d| **d > start && **d <= end)
                    .count() as f64
            })
            .collect(),
    )
}

/// Derives the overview catalogue for one ticker.
pub fn overview(history: &History, market: &MarketInputs) -> Result<Overview> {
    let fx = history.field(|r| r.fx_usd).nonzero().fill_nan(1.0);
    let usd = |f: Field| history.field(f) / &fx;
    let raw = |f: Field| history.field(f);

    let ev = raw(|r| r.enterprise_value);
    let market_cap = raw(|r| r.market_cap);
    let revenue = usd(|r| r.revenue);
    let cor = usd(|r| r.cost_of_revenue);
    let gross_profit = usd(|r| r.gross_profit);
    let net_income = usd(|r| r.net_income);
    let ebitda = usd(|r| r.ebitda);
    let ebit = usd(|r| r.ebit);
    let interest = usd(|r| r.interest_expense);
    let cfo = usd(|r| r.operating_cash_flow);
    let fcf = usd(|r| r.free_cash_flow);
    let equity = usd(|r| r.equity);
    let debt = usd(|r| r.total_debt);
    let assets = usd(|r| r.total_assets);
    let liabilities = usd(|r| r.total_liabilities);
    let current_assets = usd(|r| r.current_assets);
    let current_liabilities = usd(|r| r.current_liabilities);
    let cash = usd(|r| r.cash_and_equivalents);
    let investments = usd(|r| r.short_term_investments);
    let intangibles = usd(|r| r.intangibles);
    let receivables = usd(|r| r.receivables);
    let inventory = usd(|r| r.inventory);
    let payables = usd(|r| r.payables);
    let rnd = usd(|r| r.research_and_development);
    let sgna = usd(|r| r.selling_general_admin);
    let sbc = usd(|r| r.stock_based_compensation);
    let shares = raw(|r| r.shares_basic);

    let safe_revenue = revenue.nonzero();
    let safe_cor = cor.nonzero();
    let working_capital = &current_assets - &current_liabilities;
    let cash_and_investments = &cash + &investments;
    let prior_shares = shares.shift(1);

    let dso = &receivables / &safe_revenue * 365.0;
    let dio = &inventory / &safe_cor * 365.0;
    let dpo = &payables / &safe_cor * 365.0;
    let cash_cycle = &(&dso + &dio) - &dpo;

    let mut tev = &ev / MILLIONS;
    let mut mkt_cap = &market_cap / MILLIONS;
    let mut tev_ebitda = &ev / &ebitda;
    let mut tev_rev = &ev / &revenue;
    let mut tev_fcf = &ev / &fcf;
    let mut pe = &market_cap / &net_income;
    let mut pb = &market_cap / &equity;

    let live = LiveValuation::from_history(history, &fx, market.latest_price);
    if market.latest_price.is_some() {
        tev.set_last(live.enterprise_value / MILLIONS);
        mkt_cap.set_last(live.market_cap / MILLIONS);
        tev_ebitda.set_last(live.enterprise_value / live.ebitda);
        tev_rev.set_last(live.enterprise_value / live.revenue);
        tev_fcf.set_last(live.enterprise_value / live.fcf);
        pe.set_last(live.market_cap / live.net_income);
        pb.set_last(live.market_cap / live.equity);
    } else {
        tracing::warn!(symbol = %history.symbol(), "no live price, LTM valuation as reported");
    }

    let metrics: Vec<(&str, Values)> = vec![
        // Valuation
        ("TEV", tev),
        ("Mkt Cap", mkt_cap),
        ("TEV/EBITDA", tev_ebitda),
        ("TEV/Rev", tev_rev),
        ("TEV/FCF", tev_fcf),
        ("P/E", pe),
        ("P/B", pb),
        ("EPS", usd(|r| r.eps)),
        // Income statement
        ("Rev", &revenue / MILLIONS),
        ("Rev \u{0394}", revenue.pct_change()),
        ("Rev CAGR", revenue.rolling_cagr(CAGR_YEARS)),
        ("GP", &gross_profit / MILLIONS),
        ("GP \u{0394}", gross_profit.pct_change()),
        ("GP CAGR", gross_profit.rolling_cagr(CAGR_YEARS)),
        ("Net Inc", &net_income / MILLIONS),
        ("Net Inc \u{0394}", net_income.pct_change()),
        ("Net Inc CAGR", net_income.rolling_cagr(CAGR_YEARS)),
        ("Op Inc", usd(|r| r.operating_income) / MILLIONS),
        ("EBITDA", &ebitda / MILLIONS),
        ("EBITDA \u{0394}", ebitda.pct_change()),
        ("EBITDA CAGR", ebitda.rolling_cagr(CAGR_YEARS)),
        // Operating expenses
        ("R&D", &rnd / MILLIONS),
        ("SG&A", &sgna / MILLIONS),
        ("D&A", usd(|r| r.depreciation_amortization) / MILLIONS),
        ("SBC", &sbc / MILLIONS),
        ("R&D/Rev", &rnd / &safe_revenue),
        ("SG&A/Rev", &sgna / &safe_revenue),
        ("SBC/Rev", &sbc / &safe_revenue),
        // Cash flow
        ("CFO", &cfo / MILLIONS),
        ("CFO \u{0394}", cfo.pct_change()),
        ("CFO CAGR", cfo.rolling_cagr(CAGR_YEARS)),
        ("FCF", &fcf / MILLIONS),
        ("FCF \u{0394}", fcf.pct_change()),
        ("FCF CAGR", fcf.rolling_cagr(CAGR_YEARS)),
        ("Op Exp", usd(|r| r.operating_expenses) / MILLIONS),
        ("CapEx", usd(|r| r.capital_expenditure) / MILLIONS),
        ("Int Exp", &interest / MILLIONS),
        ("NI to CFO", (&cfo / &net_income.nonzero()).clip(-10.0, 10.0)),
        ("SBC Add-back", &sbc / MILLIONS),
        (
            "WC Change",
            (&working_capital.shift(1) - &working_capital) / MILLIONS,
        ),
        // Margins
        ("GP Marg", raw(|r| r.gross_margin)),
        ("EBITDA Marg", raw(|r| r.ebitda_margin)),
        ("Net Marg", raw(|r| r.net_margin)),
        ("Op Marg", usd(|r| r.operating_income) / &safe_revenue),
        ("FCF Marg", &fcf / &safe_revenue),
        // Shareholder yield
        ("Div Yield", raw(|r| r.dividend_yield)),
        ("BB Yield", &(&prior_shares - &shares) / &prior_shares),
        ("Ins Buys", insider_buys(history, market)),
        // Balance sheet
        ("Equity", &equity / MILLIONS),
        ("Debt", &debt / MILLIONS),
        ("Assets", &assets / MILLIONS),
        ("Liab", &liabilities / MILLIONS),
        ("Cash & ST Inv", &cash_and_investments / MILLIONS),
        ("Net Cash", &(&cash_and_investments - &debt) / MILLIONS),
        (
            "TBV",
            &(&(&assets - &intangibles) - &liabilities) / MILLIONS,
        ),
        // Asset quality
        ("Receivables", &receivables / MILLIONS),
        ("Inventory", &inventory / MILLIONS),
        ("PPE Net", usd(|r| r.ppe_net) / MILLIONS),
        ("Intangibles", &intangibles / MILLIONS),
        ("Payables", &payables / MILLIONS),
        ("Def Revenue", usd(|r| r.deferred_revenue) / MILLIONS),
        // Working capital days
        ("DSO", dso.clip(f64::NEG_INFINITY, 999.0)),
        ("DIO", dio.clip(f64::NEG_INFINITY, 999.0)),
        ("DPO", dpo.clip(f64::NEG_INFINITY, 999.0)),
        ("Cash Cycle", cash_cycle.clip(-999.0, 999.0)),
        // Solvency
        ("D/E", &debt / &equity),
        ("Debt/EBITDA", &debt / &ebitda),
        ("Cash Ratio", &cash / &current_liabilities),
        ("Cash/Debt", &cash / &debt),
        ("Int Cov", &ebit / &interest),
        // Liquidity
        ("Current Ratio", raw(|r| r.current_ratio)),
        (
            "Quick Ratio",
            &(&current_assets - &inventory) / &current_liabilities,
        ),
        // Efficiency
        (
            "WC Turn",
            (&safe_revenue / &working_capital.nonzero()).clip(f64::NEG_INFINITY, 100.0),
        ),
        ("Asset Turn", raw(|r| r.asset_turnover)),
        (
            "Recv Turn",
            (&safe_revenue / &receivables.nonzero()).clip(f64::NEG_INFINITY, 100.0),
        ),
        (
            "Inv Turn",
            (&safe_cor / &inventory.nonzero()).clip(f64::NEG_INFINITY, 100.0),
        ),
        // Profitability
        ("ROA", raw(|r| r.roa)),
        ("ROE", raw(|r| r.roe)),
        ("ROIC", raw(|r| r.roic)),
    ];

    let rows = history.periods().iter().map(ToString::to_string).collect();
    let mut table = MetricTable::new("Period", rows);
    for (name, values) in metrics {
        table.push(name, values)?;
    }

    let ltm = history.ltm();
    let ltm_fx = fx.last();
    let usd_ltm = |v: Option<f64>| v.map_or(f64::NAN, |v| v / ltm_fx);
    let capital = CapitalStructure {
        market_cap: live.market_cap,
        debt: usd_ltm(ltm.total_debt),
        interest_expense: usd_ltm(ltm.interest_expense),
        tax_expense: usd_ltm(ltm.tax_expense),
        earnings_before_tax: usd_ltm(ltm.ebt),
    };

    tracing::debug!(
        symbol = %history.symbol(),
        periods = table.height(),
        metrics = table.width(),
        "derived overview"
    );
    Ok(Overview { table, capital })
}
