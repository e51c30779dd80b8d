//! Discounted cash flow block.
//!
//! Everything here is a spreadsheet formula so the operator can adjust the
//! discount factor and growth rates in place.

use rust_xlsxwriter::utility::row_col_to_cell_absolute as abs;

use crate::{format, grid::Grid, palette::Rgb};

/// Row of the `DF | 10Y GR | Perp GR` labels (zero-based).
pub const LABEL_ROW: u32 = 9;
/// Default ten-year growth multiplier.
pub const TEN_YEAR_GROWTH: f64 = 1.10;
/// Default perpetual growth multiplier.
pub const PERPETUAL_GROWTH: f64 = 1.03;
/// Years projected at the ten-year rate.
pub const TEN_YEAR_PERIODS: u16 = 10;
/// Years projected at the perpetual rate.
pub const PERPETUAL_PERIODS: u16 = 40;

const DF_FILL: Rgb = Rgb(255, 116, 116);
const TEN_YEAR_FILL: Rgb = Rgb(146, 208, 80);
const PERPETUAL_FILL: Rgb = Rgb(255, 255, 0);
const NPV_FILL: Rgb = Rgb(77, 147, 217);

/// Writes the DCF inputs at [`LABEL_ROW`] starting one column right of
/// `start_col`, and, given the FCF row, extends it from `start_col` onward
/// with growth formulas and an `NPV` of the projection below.
///
/// `start_col` is the first column after the LTM column.
pub fn write_dcf(grid: &mut Grid, start_col: u16, fcf_row: Option<u32>, discount_rate: f64) {
    let df_col = start_col + 1;
    let ten_col = start_col + 2;
    let perp_col = start_col + 3;
    let value_row = LABEL_ROW + 1;

    for (col, label, value, fill) in [
        (df_col, "DF", discount_rate, DF_FILL),
        (ten_col, "10Y GR", TEN_YEAR_GROWTH, TEN_YEAR_FILL),
        (perp_col, "Perp GR", PERPETUAL_GROWTH, PERPETUAL_FILL),
    ] {
        grid.text(LABEL_ROW, col, label).fill(fill);
        grid.number(value_row, col, value).fill(fill);
    }
    grid.cell_mut(value_row, df_col).format(format::DECIMAL_4);

    let Some(fcf_row) = fcf_row else {
        tracing::warn!("no FCF row, skipping projection");
        return;
    };

    let df = abs(value_row, df_col);
    let ten = abs(value_row, ten_col);
    let perp = abs(value_row, perp_col);
    let horizon = TEN_YEAR_PERIODS + PERPETUAL_PERIODS;

    for i in 0..horizon {
        let col = start_col + i;
        let rate = if i < TEN_YEAR_PERIODS { &ten } else { &perp };
        let prev = abs(fcf_row, col - 1);
        grid.formula(fcf_row, col, format!("={prev}*({rate})"))
            .format(format::THOUSANDS);
    }

    let first = abs(fcf_row, start_col);
    let last = abs(fcf_row, start_col + horizon - 1);
    grid.text(fcf_row + 2, df_col, "NPV").fill(NPV_FILL);
    grid.formula(fcf_row + 3, df_col, format!("=NPV({df}, {first}:{last})"))
        .format(format::THOUSANDS)
        .fill(NPV_FILL);

    tracing::debug!(discount_rate, fcf_row, "wrote dcf block");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;

    fn formula(grid: &Grid, row: u32, col: u16) -> String {
        match &grid.cell(row, col).unwrap().value {
            CellValue::Formula(f) => f.clone(),
            other => panic!("not a formula: {other:?}"),
        }
    }

    #[test]
    fn test_inputs() {
        let mut grid = Grid::new("X");
        write_dcf(&mut grid, 0, None, 0.0825);
        assert_eq!(grid.cell(9, 1).unwrap().value, CellValue::Text("DF".into()));
        assert_eq!(grid.cell(10, 1).unwrap().value, CellValue::Number(0.0825));
        assert_eq!(
            grid.cell(10, 1).unwrap().style.num_format.as_deref(),
            Some("0.0000")
        );
        assert_eq!(grid.cell(10, 2).unwrap().value, CellValue::Number(1.1));
        assert_eq!(grid.cell(10, 3).unwrap().style.fill, Some(PERPETUAL_FILL));
        assert!(grid.cell(12, 1).is_none());
    }

    #[test]
    fn test_projection_and_npv() {
        let mut grid = Grid::new("X");
        // LTM in column J (9), FCF on row 30
        write_dcf(&mut grid, 10, Some(29), 0.09);

        assert_eq!(formula(&grid, 29, 10), "=$J$30*($M$11)");
        assert_eq!(formula(&grid, 29, 19), "=$S$30*($M$11)");
        assert_eq!(formula(&grid, 29, 20), "=$T$30*($N$11)");
        assert_eq!(formula(&grid, 29, 59), "=$BG$30*($N$11)");
        assert!(grid.cell(29, 60).is_none());

        assert_eq!(grid.cell(31, 11).unwrap().value, CellValue::Text("NPV".into()));
        assert_eq!(formula(&grid, 32, 11), "=NPV($L$11, $K$30:$BH$30)");
        assert_eq!(grid.cell(32, 11).unwrap().style.fill, Some(NPV_FILL));
    }
}
