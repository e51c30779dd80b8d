//! Single-ticker overview sheet with the DCF block.

use tearsheet_metrics::MetricTable;

use crate::{
    catalog::{Catalog, ReportKind},
    dcf::write_dcf,
    error::Result,
    format,
    grid::Grid,
    layout::write_groups,
    palette::Rgb,
};

/// Header row (zero-based).
pub const ORIGIN_ROW: u32 = 3;
/// Category column (zero-based).
pub const ORIGIN_COL: u16 = 4;

const TITLE_FILL: Rgb = Rgb(185, 216, 72);
const BANNER_FILL: Rgb = Rgb(0, 201, 192);
const HEADER_FILL: Rgb = Rgb(180, 180, 180);
const STRIPE_FILL: Rgb = Rgb(217, 217, 217);
const TITLE_SIZE: f64 = 20.0;

fn stripe(offset: u32) -> Option<Rgb> {
    match offset {
        0 => Some(HEADER_FILL),
        1 => None,
        n if n % 2 == 0 => Some(STRIPE_FILL),
        _ => None,
    }
}

/// Lays out an overview table and the DCF block discounted at
/// `discount_rate`.
pub fn overview_sheet(
    catalog: &Catalog,
    symbol: &str,
    table: &MetricTable,
    discount_rate: f64,
) -> Result<Grid> {
    let mut grid = Grid::new(symbol);
    grid.fill_row(0, TITLE_FILL);
    grid.fill_row(1, BANNER_FILL);
    grid.fill_row(2, BANNER_FILL);
    grid.text(0, ORIGIN_COL, format!("{symbol} Overview"))
        .font_size(TITLE_SIZE);

    let written = write_groups(
        &mut grid,
        catalog,
        ReportKind::Overview,
        table,
        (ORIGIN_ROW, ORIGIN_COL),
        |metric, _| Some(format::overview(metric)),
    )?;

    // Band fills win over stripes
    for row in ORIGIN_ROW..=written.last_row {
        let Some(fill) = stripe(row - ORIGIN_ROW) else {
            continue;
        };
        for col in ORIGIN_COL..=written.last_col {
            let cell = grid.cell_mut(row, col);
            if cell.style.fill.is_none() {
                cell.fill(fill);
            }
        }
    }

    write_dcf(
        &mut grid,
        written.last_col + 1,
        written.row_of("FCF"),
        discount_rate,
    );
    grid.autofit();

    tracing::debug!(symbol, rows = written.metric_rows.len(), "laid out overview");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid::CellValue, palette::Palette};
    use tearsheet_metrics::Values;

    fn table() -> MetricTable {
        let rows = ["2021", "2022", "2023", "LTM"].map(String::from).to_vec();
        let mut table = MetricTable::new("Period", rows);
        table.push("Rev", Values::new(vec![100.0, 110.0, 121.0, 125.0])).unwrap();
        table.push("FCF", Values::new(vec![10.0, 12.0, 14.0, 15.0])).unwrap();
        table.push("ROE", Values::new(vec![0.1, 0.2, 0.3, 0.4])).unwrap();
        table.push("Ins Buys", Values::new(vec![0.0, 1.0, 0.0, 2.0])).unwrap();
        table
    }

    #[test]
    fn test_title_and_banner() {
        let catalog = Catalog::builtin().unwrap();
        let grid = overview_sheet(&catalog, "NVDA", &table(), 0.1).unwrap();
        let title = grid.cell(0, 4).unwrap();
        assert_eq!(title.value, CellValue::Text("NVDA Overview".into()));
        assert_eq!(title.style.font_size, Some(20.0));
        assert_eq!(grid.row_fill(0), Some(TITLE_FILL));
        assert_eq!(grid.row_fill(2), Some(BANNER_FILL));
        assert_eq!(grid.row_fill(3), None);
    }

    #[test]
    fn test_stripes_and_bands() {
        let catalog = Catalog::builtin().unwrap();
        let grid = overview_sheet(&catalog, "NVDA", &table(), 0.1).unwrap();
        // Header on row 3, Rev 4, FCF 5, Ins Buys 6, ROE 7
        assert_eq!(grid.cell(3, 4).unwrap().style.fill, Some(HEADER_FILL));
        assert_eq!(grid.cell(4, 6).unwrap().style.fill, None);
        assert_eq!(grid.cell(5, 4).unwrap().style.fill, Some(STRIPE_FILL));
        assert_eq!(grid.cell(6, 9).unwrap().style.fill, None);
        assert_eq!(
            grid.cell(7, 9).unwrap().style.fill,
            Some(Palette::default().dark_green)
        );
        assert_eq!(grid.cell(7, 7).unwrap().style.fill, Some(STRIPE_FILL));
    }

    #[test]
    fn test_formats() {
        let catalog = Catalog::builtin().unwrap();
        let grid = overview_sheet(&catalog, "NVDA", &table(), 0.1).unwrap();
        let fmt = |r, c| grid.cell(r, c).unwrap().style.num_format.clone();
        assert_eq!(fmt(4, 6).as_deref(), Some(format::THOUSANDS));
        assert_eq!(fmt(6, 6).as_deref(), Some(format::WHOLE));
        assert_eq!(fmt(7, 6).as_deref(), Some(format::PERCENT_0));
    }

    #[test]
    fn test_dcf_extends_fcf_row() {
        let catalog = Catalog::builtin().unwrap();
        let grid = overview_sheet(&catalog, "NVDA", &table(), 0.1).unwrap();
        // LTM is column J (9); DF input in column L (11)
        assert_eq!(grid.cell(10, 11).unwrap().value, CellValue::Number(0.1));
        assert_eq!(
            grid.cell(5, 10).unwrap().value,
            CellValue::Formula("=$J$6*($M$11)".into())
        );
        assert_eq!(
            grid.cell(8, 11).unwrap().value,
            CellValue::Formula("=NPV($L$11, $K$6:$BH$6)".into())
        );
    }
}
