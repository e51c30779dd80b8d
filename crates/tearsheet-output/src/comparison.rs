//! Cross-sectional comparison sheet, one row per ticker grouped by sector.

use tearsheet_core::SectorList;
use tearsheet_metrics::MetricTable;

use crate::{
    banding::band_column,
    catalog::{Catalog, ReportKind},
    error::Result,
    format,
    grid::{Grid, TableKind, TableSpec},
};

/// Header row (zero-based).
pub const ORIGIN_ROW: u32 = 2;
/// Sector column (zero-based).
pub const ORIGIN_COL: u16 = 4;

/// Sheet name of the comparison.
pub const SHEET_NAME: &str = "Comparison";

/// Lays out a comparison table. Rows follow `sectors`; each sector name is
/// written beside its first company. Tickers missing from `table` get an
/// empty row.
pub fn comparison_sheet(catalog: &Catalog, sectors: &SectorList, table: &MetricTable) -> Result<Grid> {
    catalog.check(ReportKind::Comparison, table)?;

    let mut grid = Grid::new(SHEET_NAME);
    let mut headers = vec!["Sector".to_string(), "Company".to_string()];
    headers.extend(table.metrics().map(str::to_string));
    for (j, header) in headers.iter().enumerate() {
        grid.text(ORIGIN_ROW, ORIGIN_COL + j as u16, header.as_str());
    }
    for (j, metric) in table.metrics().enumerate() {
        let description = catalog.description(ReportKind::Comparison, metric)?;
        grid.cell_mut(ORIGIN_ROW, ORIGIN_COL + 2 + j as u16).note(description);
    }

    // Sheet row of each table row
    let mut placed: Vec<(usize, u32)> = Vec::with_capacity(table.height());
    let mut row = ORIGIN_ROW + 1;
    for group in sectors.groups() {
        for (k, symbol) in group.symbols.iter().enumerate() {
            if k == 0 {
                if let Some(name) = &group.name {
                    grid.text(row, ORIGIN_COL, name.as_str());
                }
            }
            grid.text(row, ORIGIN_COL + 1, symbol.as_str());
            match table.rows().iter().position(|r| r == symbol.as_str()) {
                Some(index) => placed.push((index, row)),
                None => tracing::warn!(%symbol, "no metrics for ticker"),
            }
            row += 1;
        }
    }

    let palette = *catalog.palette();
    for (j, (metric, values)) in table.columns().enumerate() {
        let col = ORIGIN_COL + 2 + j as u16;
        let bands = band_column(metric, values.as_slice());
        for &(index, row) in &placed {
            let value = values.get(index);
            let cell = grid.number(row, col, value);
            if let Some(num_format) = format::comparison(metric, value) {
                cell.format(num_format);
            }
            if let Some(band) = bands[index] {
                cell.fill(palette.color(band));
            }
        }
    }

    let last_row = row - 1;
    let last_col = ORIGIN_COL + 1 + table.width() as u16;
    if last_row > ORIGIN_ROW {
        grid.add_table(TableSpec {
            first_row: ORIGIN_ROW,
            first_col: ORIGIN_COL,
            last_row,
            last_col,
            kind: TableKind::Light8,
            headers,
        });
    }

    grid.autofit();
    grid.set_width(ORIGIN_COL, 20.0);
    grid.set_width(ORIGIN_COL + 1, 15.0);

    tracing::debug!(tickers = placed.len(), metrics = table.width(), "laid out comparison");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid::CellValue, palette::Palette};
    use tearsheet_metrics::Values;

    fn table() -> MetricTable {
        let rows = ["AAPL", "MSFT", "JPM", "BAC"].map(String::from).to_vec();
        let mut table = MetricTable::new("Ticker", rows);
        table.push("P/E", Values::new(vec![30.0, 35.0, 12.0, 11.0])).unwrap();
        table.push("ROE", Values::new(vec![1.5, 0.4, 0.15, 0.1])).unwrap();
        table
            .push("Revenue", Values::new(vec![390_000.0, 245_000.0, 160_000.0, 100_000.0]))
            .unwrap();
        table
    }

    fn text(grid: &Grid, row: u32, col: u16) -> Option<String> {
        match &grid.cell(row, col)?.value {
            CellValue::Text(t) => Some(t.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_sector_on_first_company() {
        let catalog = Catalog::builtin().unwrap();
        let sectors: SectorList = "Tech,AAPL,MSFT,Banks,JPM,BAC".parse().unwrap();
        let grid = comparison_sheet(&catalog, &sectors, &table()).unwrap();

        assert_eq!(text(&grid, 2, 4).as_deref(), Some("Sector"));
        assert_eq!(text(&grid, 2, 6).as_deref(), Some("P/E"));
        assert_eq!(text(&grid, 3, 4).as_deref(), Some("Tech"));
        assert_eq!(text(&grid, 4, 4), None);
        assert_eq!(text(&grid, 5, 4).as_deref(), Some("Banks"));
        assert_eq!(text(&grid, 6, 5).as_deref(), Some("BAC"));
    }

    #[test]
    fn test_formats_and_bands() {
        let catalog = Catalog::builtin().unwrap();
        let sectors: SectorList = "Tech,AAPL,MSFT,Banks,JPM,BAC".parse().unwrap();
        let grid = comparison_sheet(&catalog, &sectors, &table()).unwrap();

        let roe = grid.cell(3, 7).unwrap();
        assert_eq!(roe.style.num_format.as_deref(), Some(format::PERCENT_1));
        assert_eq!(roe.style.fill, Some(Palette::default().dark_green));
        assert_eq!(grid.cell(6, 7).unwrap().style.fill, Some(Palette::default().dark_red));

        // Valuation metrics are never coloured
        assert!((3..=6).all(|r| grid.cell(r, 6).unwrap().style.fill.is_none()));
        assert_eq!(
            grid.cell(3, 8).unwrap().style.num_format.as_deref(),
            Some(format::THOUSANDS_2)
        );
    }

    #[test]
    fn test_table_and_widths() {
        let catalog = Catalog::builtin().unwrap();
        let sectors: SectorList = "Tech,AAPL,MSFT,Banks,JPM,BAC".parse().unwrap();
        let grid = comparison_sheet(&catalog, &sectors, &table()).unwrap();
        let spec = &grid.tables()[0];
        assert_eq!(spec.kind, TableKind::Light8);
        assert_eq!((spec.first_row, spec.first_col, spec.last_row, spec.last_col), (2, 4, 6, 8));
        assert_eq!(grid.width(4), Some(20.0));
        assert_eq!(grid.width(5), Some(15.0));
    }

    #[test]
    fn test_unknown_ticker_leaves_empty_row() {
        let catalog = Catalog::builtin().unwrap();
        let sectors: SectorList = "Tech,AAPL,ZZZZ".parse().unwrap();
        let grid = comparison_sheet(&catalog, &sectors, &table()).unwrap();
        assert_eq!(text(&grid, 4, 5).as_deref(), Some("ZZZZ"));
        assert!(grid.cell(4, 6).is_none());
    }
}
