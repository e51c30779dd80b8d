//! JSON payloads of the chart and quote summary endpoints.

use polars::prelude::*;
use serde::Deserialize;
use tearsheet_core::{DataError, Result, Symbol};

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Deserialize)]
pub(crate) struct Chart {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartSeries>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartSeries {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Bars>,
}

#[derive(Debug, Deserialize)]
struct Bars {
    close: Vec<Option<f64>>,
}

impl Chart {
    /// Daily closes as a date-sorted `date`/`close` frame.
    pub(crate) fn into_closes(self, symbol: &Symbol) -> Result<DataFrame> {
        if let Some(ChartError { code, description }) = self.chart.error {
            return Err(match code.as_str() {
                "Not Found" => DataError::SymbolNotFound(symbol.to_string()),
                _ => DataError::Other(format!("{code}: {description}")),
            });
        }

        let series = self
            .chart
            .result
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;
        let timestamps = series.timestamp.unwrap_or_default();
        let Some(bars) = series.indicators.quote.into_iter().next() else {
            return Err(DataError::Parse(format!("{symbol}: chart without quote bars")));
        };
        if bars.close.len() != timestamps.len() {
            return Err(DataError::Parse(format!(
                "{symbol}: {} timestamps for {} closes",
                timestamps.len(),
                bars.close.len()
            )));
        }

        let days: Vec<i32> = timestamps
            .iter()
            .map(|ts| ts.div_euclid(SECONDS_PER_DAY) as i32)
            .collect();
        let frame = DataFrame::new(vec![
            Column::new("date".into(), days).cast(&DataType::Date)?,
            Column::new("close".into(), bars.close),
        ])?;
        Ok(frame.sort(["date"], SortMultipleOptions::default())?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteSummary {
    quote_summary: SummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    result: Option<Vec<Modules>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Modules {
    summary_detail: Option<BetaField>,
    default_key_statistics: Option<BetaField>,
}

#[derive(Debug, Deserialize)]
struct BetaField {
    beta: Option<Raw>,
}

#[derive(Debug, Deserialize)]
struct Raw {
    raw: Option<f64>,
}

impl BetaField {
    fn value(&self) -> Option<f64> {
        self.beta.as_ref().and_then(|b| b.raw)
    }
}

impl QuoteSummary {
    /// Beta from `summaryDetail`, then `defaultKeyStatistics`.
    pub(crate) fn beta(&self) -> Option<f64> {
        let modules = self.quote_summary.result.as_deref()?.first()?;
        [&modules.summary_detail, &modules.default_key_statistics]
            .into_iter()
            .flatten()
            .find_map(BetaField::value)
            .filter(|b| b.is_finite())
    }
}
