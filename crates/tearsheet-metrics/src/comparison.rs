//! Cross-sectional catalogue: one row per ticker.
//!
//! Every metric is the ticker's LTM value from the time-series catalogue,
//! except the growth columns, which become the mean year-over-year change
//! across the latest [`YOY_YEARS`] fiscal years.

use tearsheet_core::FiscalRecord;

use crate::{
    error::Result, growth::mean_yoy_change, history::History, table::MetricTable,
    time_series::time_series, values::Values,
};

/// Fiscal years averaged by the `YoY %` columns.
pub const YOY_YEARS: usize = 5;

type Field = fn(&FiscalRecord) -> Option<f64>;

/// Time-series growth columns and their comparison replacements.
const YOY_METRICS: [(&str, &str, Field); 6] = [
    ("Revenue %", "Revenue YoY %", |r| r.revenue),
    ("GP %", "Gross Profit YoY %", |r| r.gross_profit),
    ("Net Income %", "Net Income YoY %", |r| r.net_income),
    ("EBITDA %", "EBITDA YoY %", |r| r.ebitda),
    ("CFO %", "CFO YoY %", |r| r.operating_cash_flow),
    ("FCF %", "FCF YoY %", |r| r.free_cash_flow),
];

/// Time-series metrics with no comparison column.
const EXCLUDED: &[&str] = &["TBV Per Share"];

/// Derives the comparison catalogue for a list of tickers, in order.
pub fn comparison(histories: &[History]) -> Result<MetricTable> {
    let rows: Vec<String> = histories.iter().map(|h| h.symbol().to_string()).collect();
    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();

    for (i, history) in histories.iter().enumerate() {
        let series = time_series(history)?;
        let ltm = series.height().saturating_sub(1);
        let recent = history.clone().trim(YOY_YEARS);

        let mut row: Vec<(&str, f64)> = Vec::with_capacity(series.width());
        for name in series.metrics().filter(|m| !EXCLUDED.contains(m)) {
            match YOY_METRICS.iter().find(|(growth, _, _)| *growth == name) {
                Some((_, yoy, field)) => {
                    let annual = recent.annual_field(field);
                    row.push((*yoy, mean_yoy_change(annual.as_slice())));
                }
                None => row.push((name, series.value(ltm, name))),
            }
        }

        if i == 0 {
            columns = row
                .iter()
                .map(|(name, _)| (name.to_string(), Vec::with_capacity(rows.len())))
                .collect();
        }
        for ((_, column), (_, value)) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    let mut table = MetricTable::new("Ticker", rows);
    for (name, values) in columns {
        table.push(name, Values::new(values))?;
    }

    tracing::debug!(
        tickers = table.height(),
        metrics = table.width(),
        "derived comparison"
    );
    Ok(table)
}
