//! Number formats per report.

/// One decimal percent.
pub const PERCENT_1: &str = "0.0%";
/// Whole percent.
pub const PERCENT_0: &str = "0%";
/// Two decimals.
pub const DECIMAL_2: &str = "0.00";
/// Four decimals, used for the discount factor.
pub const DECIMAL_4: &str = "0.0000";
/// Whole number.
pub const WHOLE: &str = "0";
/// Thousands separator, no decimals.
pub const THOUSANDS: &str = "#,##0";
/// Thousands separator, two decimals.
pub const THOUSANDS_2: &str = "#,##0.00";

const COMPARISON_PERCENT: &[&str] = &[
    "ROA",
    "ROE",
    "ROIC",
    "GP Margin",
    "EBITDA Margin",
    "Net Margin",
    "Operating Margin",
    "Free Cash Flow Margin",
];

const OVERVIEW_PERCENT: &[&str] = &[
    "GP Marg",
    "EBITDA Marg",
    "Net Marg",
    "Op Marg",
    "FCF Marg",
    "Div Yield",
    "BB Yield",
    "R&D/Rev",
    "SG&A/Rev",
    "SBC/Rev",
    "ROA",
    "ROE",
    "ROIC",
];

const OVERVIEW_DECIMAL: &[&str] = &[
    "Current Ratio",
    "Quick Ratio",
    "D/E",
    "Debt/EBITDA",
    "Cash Ratio",
    "Cash/Debt",
    "Int Cov",
    "WC Turn",
    "Asset Turn",
    "Recv Turn",
    "Inv Turn",
    "EPS",
    "NI to CFO",
    "TEV/EBITDA",
    "TEV/Rev",
    "TEV/FCF",
    "P/E",
    "P/B",
];

const OVERVIEW_WHOLE: &[&str] = &["DSO", "DIO", "DPO", "Cash Cycle", "Ins Buys"];

fn large(value: f64) -> Option<&'static str> {
    (value.abs() >= 1000.0).then_some(THOUSANDS_2)
}

/// Time-series cell format: `%` metrics as percent, large values with
/// separators.
#[must_use]
pub fn time_series(metric: &str, value: f64) -> Option<&'static str> {
    if metric.contains('%') {
        Some(PERCENT_1)
    } else {
        large(value)
    }
}

/// Comparison cell format: `%` metrics, margins and returns as percent,
/// large values with separators.
#[must_use]
pub fn comparison(metric: &str, value: f64) -> Option<&'static str> {
    if metric.contains('%') || COMPARISON_PERCENT.contains(&metric) {
        Some(PERCENT_1)
    } else {
        large(value)
    }
}

/// Overview cell format. Growth (`CAGR` and `Δ`) metrics are percentages.
#[must_use]
pub fn overview(metric: &str) -> &'static str {
    if OVERVIEW_PERCENT.contains(&metric)
        || metric.ends_with(" CAGR")
        || metric.ends_with(" \u{0394}")
    {
        PERCENT_0
    } else if OVERVIEW_DECIMAL.contains(&metric) {
        DECIMAL_2
    } else if OVERVIEW_WHOLE.contains(&metric) {
        WHOLE
    } else {
        THOUSANDS
    }
}
