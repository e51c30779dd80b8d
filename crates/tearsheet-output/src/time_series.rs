//! Per-ticker time-series sheet.

use tearsheet_metrics::MetricTable;

use crate::{
    catalog::{Catalog, ReportKind},
    error::Result,
    format,
    grid::{Grid, TableKind, TableSpec},
    layout::write_groups,
};

/// Header row (zero-based).
pub const ORIGIN_ROW: u32 = 2;
/// Category column (zero-based).
pub const ORIGIN_COL: u16 = 11;

/// Lays out a time-series table on a sheet named after the ticker.
pub fn time_series_sheet(catalog: &Catalog, symbol: &str, table: &MetricTable) -> Result<Grid> {
    let mut grid = Grid::new(symbol);
    let written = write_groups(
        &mut grid,
        catalog,
        ReportKind::TimeSeries,
        table,
        (ORIGIN_ROW, ORIGIN_COL),
        format::time_series,
    )?;

    if written.last_row > ORIGIN_ROW {
        let mut headers = vec!["Category".to_string(), "Metric".to_string()];
        headers.extend(table.rows().iter().cloned());
        grid.add_table(TableSpec {
            first_row: ORIGIN_ROW,
            first_col: ORIGIN_COL,
            last_row: written.last_row,
            last_col: written.last_col,
            kind: TableKind::Light1,
            headers,
        });
    }

    grid.autofit();
    grid.set_width(ORIGIN_COL, 20.0);
    grid.set_width(ORIGIN_COL + 1, 25.0);

    tracing::debug!(symbol, rows = written.metric_rows.len(), "laid out time series");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;
    use tearsheet_metrics::Values;

    fn table() -> MetricTable {
        let mut table = MetricTable::new("Period", vec!["2023".into(), "LTM".into()]);
        table.push("Revenue", Values::new(vec![1500.0, 20.0])).unwrap();
        table.push("Revenue %", Values::new(vec![f64::NAN, 0.1])).unwrap();
        table
    }

    #[test]
    fn test_sheet_layout() {
        let catalog = Catalog::builtin().unwrap();
        let grid = time_series_sheet(&catalog, "AAPL", &table()).unwrap();
        assert_eq!(grid.name(), "AAPL");

        let table = &grid.tables()[0];
        assert_eq!(table.kind, TableKind::Light1);
        assert_eq!((table.first_row, table.first_col), (2, 11));
        assert_eq!((table.last_row, table.last_col), (4, 14));
        assert_eq!(table.headers, vec!["Category", "Metric", "2023", "LTM"]);

        assert_eq!(grid.width(11), Some(20.0));
        assert_eq!(grid.width(12), Some(25.0));
        assert!(grid.is_autofit());
    }

    #[test]
    fn test_number_formats() {
        let catalog = Catalog::builtin().unwrap();
        let grid = time_series_sheet(&catalog, "AAPL", &table()).unwrap();
        let fmt = |r, c| grid.cell(r, c).unwrap().style.num_format.clone();
        assert_eq!(fmt(3, 13).as_deref(), Some(format::THOUSANDS_2));
        assert_eq!(fmt(3, 14), None);
        assert_eq!(fmt(4, 14).as_deref(), Some(format::PERCENT_1));
        assert_eq!(grid.cell(4, 13).unwrap().value, CellValue::Blank);
    }
}
