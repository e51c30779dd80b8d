//! Grouped metric rows shared by the per-ticker sheets.

use tearsheet_metrics::MetricTable;

use crate::{
    banding::band_column,
    catalog::{Catalog, ReportKind},
    error::Result,
    grid::Grid,
};

/// Rows written by [`write_groups`].
#[derive(Debug)]
pub(crate) struct Written {
    /// Last row of the block, the header row when no metric was written.
    pub(crate) last_row: u32,
    /// Last column of the block.
    pub(crate) last_col: u16,
    /// Row of each written metric.
    pub(crate) metric_rows: Vec<(String, u32)>,
}

impl Written {
    pub(crate) fn row_of(&self, metric: &str) -> Option<u32> {
        self.metric_rows
            .iter()
            .find(|(m, _)| m == metric)
            .map(|&(_, row)| row)
    }
}

/// Writes `Category | Metric | periods...` at `origin`, then one row per
/// table metric in catalogue order, each group's name on its first row.
///
/// Every group but the last gets a thin bottom border across the block.
pub(crate) fn write_groups(
    grid: &mut Grid,
    catalog: &Catalog,
    kind: ReportKind,
    table: &MetricTable,
    (row0, col0): (u32, u16),
    format: impl Fn(&str, f64) -> Option<&'static str>,
) -> Result<Written> {
    catalog.check(kind, table)?;

    let last_col = col0 + 1 + table.height() as u16;
    grid.text(row0, col0, "Category");
    grid.text(row0, col0 + 1, "Metric");
    for (j, period) in table.rows().iter().enumerate() {
        grid.text(row0, col0 + 2 + j as u16, period.as_str());
    }

    let palette = *catalog.palette();
    let groups = catalog.groups(kind);
    let mut metric_rows = Vec::new();
    let mut row = row0 + 1;

    for (index, group) in groups.iter().enumerate() {
        let start = row;
        for (metric, description) in &group.metrics {
            let Some(values) = table.get(metric) else {
                continue;
            };
            if row == start {
                grid.text(row, col0, group.name.as_str());
            }
            grid.text(row, col0 + 1, metric.as_str()).note(description.as_str());

            let bands = band_column(metric, values.as_slice());
            for (j, (&value, band)) in values.as_slice().iter().zip(bands).enumerate() {
                let cell = grid.number(row, col0 + 2 + j as u16, value);
                if let Some(num_format) = format(metric, value) {
                    cell.format(num_format);
                }
                if let Some(band) = band {
                    cell.fill(palette.color(band));
                }
            }
            metric_rows.push((metric.clone(), row));
            row += 1;
        }

        if row > start && index + 1 < groups.len() {
            for col in col0..=last_col {
                grid.cell_mut(row - 1, col).border_bottom();
            }
        }
    }

    Ok(Written {
        last_row: row - 1,
        last_col,
        metric_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid::CellValue, palette::Palette};
    use tearsheet_metrics::Values;

    fn table() -> MetricTable {
        let mut table = MetricTable::new("Period", vec!["2022".into(), "2023".into(), "LTM".into()]);
        table.push("ROE", Values::new(vec![0.1, 0.2, 0.3])).unwrap();
        table.push("TEV", Values::new(vec![1.0, f64::NAN, 3.0])).unwrap();
        table.push("Revenue", Values::new(vec![900.0, 1000.0, 1100.0])).unwrap();
        table
    }

    #[test]
    fn test_rows_follow_catalogue_order() {
        let catalog = Catalog::builtin().unwrap();
        let mut grid = Grid::new("T");
        let written =
            write_groups(&mut grid, &catalog, ReportKind::TimeSeries, &table(), (2, 11), |_, _| None)
                .unwrap();

        assert_eq!(written.row_of("TEV"), Some(3));
        assert_eq!(written.row_of("Revenue"), Some(4));
        assert_eq!(written.row_of("ROE"), Some(5));
        assert_eq!(written.last_row, 5);
        assert_eq!(written.last_col, 15);

        let text = |r, c| match &grid.cell(r, c).unwrap().value {
            CellValue::Text(t) => t.clone(),
            other => panic!("not text: {other:?}"),
        };
        assert_eq!(text(2, 11), "Category");
        assert_eq!(text(2, 15), "LTM");
        assert_eq!(text(3, 11), "Valuation Metrics");
        assert_eq!(text(5, 11), "Returns");
        assert_eq!(grid.cell(3, 14).unwrap().value, CellValue::Blank);
    }

    #[test]
    fn test_borders_skip_last_group() {
        let catalog = Catalog::builtin().unwrap();
        let mut grid = Grid::new("T");
        write_groups(&mut grid, &catalog, ReportKind::TimeSeries, &table(), (0, 0), |_, _| None)
            .unwrap();
        assert!(grid.cell(1, 0).unwrap().style.border_bottom);
        assert!(grid.cell(2, 4).unwrap().style.border_bottom);
        assert!(!grid.cell(3, 1).unwrap().style.border_bottom);
    }

    #[test]
    fn test_notes_and_bands() {
        let catalog = Catalog::builtin().unwrap();
        let mut grid = Grid::new("T");
        write_groups(&mut grid, &catalog, ReportKind::TimeSeries, &table(), (0, 0), |_, _| None)
            .unwrap();
        assert_eq!(
            grid.cell(2, 1).unwrap().note.as_deref(),
            Some("Total sales in millions")
        );
        assert_eq!(
            grid.cell(3, 4).unwrap().style.fill,
            Some(Palette::default().dark_green)
        );
        assert_eq!(grid.cell(1, 2).unwrap().style.fill, None);
    }

    #[test]
    fn test_unknown_metric_aborts() {
        let catalog = Catalog::builtin().unwrap();
        let mut table = table();
        table.push("Mystery", Values::new(vec![1.0, 2.0, 3.0])).unwrap();
        let mut grid = Grid::new("T");
        assert!(
            write_groups(&mut grid, &catalog, ReportKind::TimeSeries, &table, (0, 0), |_, _| None)
                .is_err()
        );
    }
}
