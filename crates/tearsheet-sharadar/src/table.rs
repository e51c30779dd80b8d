//! Nasdaq Data Link datatable payloads.
//!
//! Every datatable endpoint answers with the same envelope: a list of column
//! descriptors, a row-major list of JSON values and a cursor for the next
//! page. [`Table`] accumulates pages and [`Row`] reads cells by column name.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tearsheet_core::{DataError, Result};

/// One page of a datatable response.
#[derive(Debug, Deserialize)]
pub(crate) struct DatatablePage {
    pub(crate) datatable: Datatable,
    #[serde(default)]
    pub(crate) meta: PageMeta,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Datatable {
    pub(crate) data: Vec<Vec<Value>>,
    pub(crate) columns: Vec<ColumnSpec>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ColumnSpec {
    pub(crate) name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageMeta {
    pub(crate) next_cursor_id: Option<String>,
}

/// Error body returned on rejected requests.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) quandl_error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub(crate) code: String,
    pub(crate) message: String,
}

/// Rows of a datatable with a name-to-position column index.
#[derive(Debug, Default)]
pub(crate) struct Table {
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Appends a page, checking its columns against the pages already read.
    pub(crate) fn extend(&mut self, page: Datatable) -> Result<()> {
        if self.index.is_empty() {
            self.index = page
                .columns
                .iter()
                .enumerate()
                .map(|(i, c)| (c.name.clone(), i))
                .collect();
        } else if page.columns.len() != self.index.len() {
            return Err(DataError::Parse(format!(
                "datatable page has {} columns, expected {}",
                page.columns.len(),
                self.index.len()
            )));
        }
        self.rows.extend(page.data);
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row {
            index: &self.index,
            cells,
        })
    }
}

/// A borrowed datatable row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Row<'a> {
    index: &'a HashMap<String, usize>,
    cells: &'a [Value],
}

impl Row<'_> {
    fn cell(&self, column: &str) -> Option<&Value> {
        self.index.get(column).and_then(|&i| self.cells.get(i))
    }

    /// Numeric cell; `None` for missing columns, nulls and non-finite values.
    pub(crate) fn f64(&self, column: &str) -> Option<f64> {
        match self.cell(column)? {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => s.parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub(crate) fn str(&self, column: &str) -> Option<&str> {
        self.cell(column)?.as_str()
    }

    /// Date cell in `YYYY-MM-DD` form, tolerating a trailing time part.
    pub(crate) fn date(&self, column: &str) -> Option<NaiveDate> {
        let raw = self.str(column)?;
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub(crate) fn required_date(&self, column: &str) -> Result<NaiveDate> {
        self.date(column)
            .ok_or_else(|| DataError::Parse(format!("missing or malformed {column}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(json: &str) -> DatatablePage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rows_are_read_by_column_name() {
        let page = page(
            r#"{
                "datatable": {
                    "data": [["AAPL", "2023-09-30", 383285000000.0, null, "12.5"]],
                    "columns": [
                        {"name": "ticker", "type": "String"},
                        {"name": "calendardate", "type": "Date"},
                        {"name": "revenue", "type": "Integer"},
                        {"name": "ebitda", "type": "Integer"},
                        {"name": "pe", "type": "BigDecimal(20,3)"}
                    ]
                },
                "meta": {"next_cursor_id": null}
            }"#,
        );
        assert!(page.meta.next_cursor_id.is_none());

        let mut table = Table::default();
        table.extend(page.datatable).unwrap();
        let row = table.rows().next().unwrap();

        assert_eq!(row.str("ticker"), Some("AAPL"));
        assert_eq!(row.date("calendardate"), NaiveDate::from_ymd_opt(2023, 9, 30));
        assert_eq!(row.f64("revenue"), Some(383_285_000_000.0));
        assert_eq!(row.f64("ebitda"), None);
        assert_eq!(row.f64("pe"), Some(12.5));
        assert_eq!(row.f64("unknown"), None);
    }

    #[test]
    fn test_pages_accumulate() {
        let first = page(
            r#"{"datatable":{"data":[["2024-01-02",1.0]],"columns":[{"name":"date"},{"name":"close"}]},
                "meta":{"next_cursor_id":"abc"}}"#,
        );
        let second = page(
            r#"{"datatable":{"data":[["2024-01-03",2.0]],"columns":[{"name":"date"},{"name":"close"}]}}"#,
        );
        assert_eq!(first.meta.next_cursor_id.as_deref(), Some("abc"));

        let mut table = Table::default();
        table.extend(first.datatable).unwrap();
        table.extend(second.datatable).unwrap();
        assert_eq!(table.len(), 2);
        let closes: Vec<f64> = table.rows().filter_map(|r| r.f64("close")).collect();
        assert_eq!(closes, vec![1.0, 2.0]);
    }

    #[test]
    fn test_mismatched_page_is_rejected() {
        let mut table = Table::default();
        table
            .extend(page(r#"{"datatable":{"data":[],"columns":[{"name":"date"},{"name":"close"}]}}"#).datatable)
            .unwrap();
        let err = table
            .extend(page(r#"{"datatable":{"data":[],"columns":[{"name":"date"}]}}"#).datatable)
            .unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_error_envelope() {
        let body: ErrorEnvelope = serde_json::from_str(
            r#"{"quandl_error":{"code":"QEAx01","message":"We could not recognize your API key"}}"#,
        )
        .unwrap();
        assert_eq!(body.quandl_error.code, "QEAx01");
    }
}
