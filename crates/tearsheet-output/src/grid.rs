//! In-memory sheet model.
//!
//! Layouts write into a [`Grid`] without touching the xlsx writer, so they
//! can be inspected directly in tests. [`Grid::render`] replays the model
//! onto a `rust_xlsxwriter` worksheet. Coordinates are zero-based.

use std::{collections::BTreeMap, path::Path};

use rust_xlsxwriter::{
    Color, Format, FormatBorder, Note, Table, TableColumn, TableStyle, Workbook, Worksheet,
};

use crate::{error::Result, palette::Rgb};

/// Cell content.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    /// Plain text.
    Text(String),
    /// A finite number.
    Number(f64),
    /// A spreadsheet formula, including the leading `=`.
    Formula(String),
    /// No value; only the style is written.
    #[default]
    Blank,
}

/// Cell appearance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Excel number format.
    pub num_format: Option<String>,
    /// Background fill.
    pub fill: Option<Rgb>,
    /// Thin bottom border.
    pub border_bottom: bool,
    /// Font size in points.
    pub font_size: Option<f64>,
}

impl Style {
    fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    fn to_format(&self, row_fill: Option<Rgb>) -> Format {
        let mut format = Format::new();
        if let Some(num_format) = &self.num_format {
            format = format.set_num_format(num_format);
        }
        if let Some(fill) = self.fill.or(row_fill) {
            format = format.set_background_color(Color::RGB(fill.to_u32()));
        }
        if self.border_bottom {
            format = format.set_border_bottom(FormatBorder::Thin);
        }
        if let Some(size) = self.font_size {
            format = format.set_font_size(size);
        }
        format
    }
}

/// A single cell: value, style and an optional hover note.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    /// Content.
    pub value: CellValue,
    /// Appearance.
    pub style: Style,
    /// Hidden comment shown on hover.
    pub note: Option<String>,
}

impl Cell {
    /// Sets the number format.
    pub fn format(&mut self, num_format: &str) -> &mut Self {
        self.style.num_format = Some(num_format.to_string());
        self
    }

    /// Sets the background fill.
    pub fn fill(&mut self, rgb: Rgb) -> &mut Self {
        self.style.fill = Some(rgb);
        self
    }

    /// Adds a thin bottom border.
    pub fn border_bottom(&mut self) -> &mut Self {
        self.style.border_bottom = true;
        self
    }

    /// Sets the font size.
    pub fn font_size(&mut self, points: f64) -> &mut Self {
        self.style.font_size = Some(points);
        self
    }

    /// Attaches a note.
    pub fn note(&mut self, text: impl Into<String>) -> &mut Self {
        self.note = Some(text.into());
        self
    }
}

/// Built-in table styles used by the reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    /// `TableStyleLight1`.
    Light1,
    /// `TableStyleLight8`.
    Light8,
}

impl From<TableKind> for TableStyle {
    fn from(kind: TableKind) -> Self {
        match kind {
            TableKind::Light1 => Self::Light1,
            TableKind::Light8 => Self::Light8,
        }
    }
}

/// A spreadsheet table over an inclusive range whose first row is the header.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSpec {
    /// Header row.
    pub first_row: u32,
    /// Leftmost column.
    pub first_col: u16,
    /// Last data row.
    pub last_row: u32,
    /// Rightmost column.
    pub last_col: u16,
    /// Style.
    pub kind: TableKind,
    /// Header labels, one per column.
    pub headers: Vec<String>,
}

/// A sparse worksheet.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    name: String,
    cells: BTreeMap<(u32, u16), Cell>,
    row_fills: BTreeMap<u32, Rgb>,
    widths: BTreeMap<u16, f64>,
    tables: Vec<TableSpec>,
    autofit: bool,
}

impl Grid {
    /// Creates an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cell at `(row, col)`, if anything was written there.
    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Mutable access, creating a blank cell if needed.
    pub fn cell_mut(&mut self, row: u32, col: u16) -> &mut Cell {
        self.cells.entry((row, col)).or_default()
    }

    /// Writes text.
    pub fn text(&mut self, row: u32, col: u16, text: impl Into<String>) -> &mut Cell {
        let cell = self.cell_mut(row, col);
        cell.value = CellValue::Text(text.into());
        cell
    }

    /// Writes a number; non-finite values leave the cell blank.
    pub fn number(&mut self, row: u32, col: u16, value: f64) -> &mut Cell {
        let cell = self.cell_mut(row, col);
        cell.value = if value.is_finite() {
            CellValue::Number(value)
        } else {
            CellValue::Blank
        };
        cell
    }

    /// Writes a formula.
    pub fn formula(&mut self, row: u32, col: u16, formula: impl Into<String>) -> &mut Cell {
        let cell = self.cell_mut(row, col);
        cell.value = CellValue::Formula(formula.into());
        cell
    }

    /// Fills a whole row. Cell fills take precedence.
    pub fn fill_row(&mut self, row: u32, rgb: Rgb) {
        self.row_fills.insert(row, rgb);
    }

    /// Fill of a whole row.
    pub fn row_fill(&self, row: u32) -> Option<Rgb> {
        self.row_fills.get(&row).copied()
    }

    /// Fixes a column width in characters. Applied after autofit.
    pub fn set_width(&mut self, col: u16, width: f64) {
        self.widths.insert(col, width);
    }

    /// Fixed width of a column.
    pub fn width(&self, col: u16) -> Option<f64> {
        self.widths.get(&col).copied()
    }

    /// Adds a table.
    pub fn add_table(&mut self, table: TableSpec) {
        self.tables.push(table);
    }

    /// Tables on the sheet.
    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    /// Autofits every column without a fixed width.
    pub fn autofit(&mut self) {
        self.autofit = true;
    }

    /// Whether autofit is enabled.
    pub const fn is_autofit(&self) -> bool {
        self.autofit
    }

    /// Written cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = ((u32, u16), &Cell)> {
        self.cells.iter().map(|(&pos, cell)| (pos, cell))
    }

    /// Replays the sheet onto a worksheet.
    pub fn render(&self, sheet: &mut Worksheet) -> Result<()> {
        sheet.set_name(&self.name)?;

        for (&row, rgb) in &self.row_fills {
            let format = Format::new().set_background_color(Color::RGB(rgb.to_u32()));
            sheet.set_row_format(row, &format)?;
        }

        for (&(row, col), cell) in &self.cells {
            let row_fill = self.row_fill(row);
            let format = cell.style.to_format(row_fill);
            match &cell.value {
                CellValue::Text(text) => {
                    sheet.write_string_with_format(row, col, text, &format)?;
                }
                CellValue::Number(value) => {
                    sheet.write_number_with_format(row, col, *value, &format)?;
                }
                CellValue::Formula(formula) => {
                    sheet.write_formula_with_format(row, col, formula.as_str(), &format)?;
                }
                CellValue::Blank if !cell.style.is_plain() || row_fill.is_some() => {
                    sheet.write_blank(row, col, &format)?;
                }
                CellValue::Blank => {}
            }
            if let Some(note) = &cell.note {
                sheet.insert_note(row, col, &Note::new(note).add_author_prefix(false))?;
            }
        }

        for spec in &self.tables {
            let columns: Vec<TableColumn> = spec
                .headers
                .iter()
                .map(|h| TableColumn::new().set_header(h))
                .collect();
            let table = Table::new()
                .set_style(spec.kind.into())
                .set_columns(&columns);
            sheet.add_table(spec.first_row, spec.first_col, spec.last_row, spec.last_col, &table)?;
        }

        if self.autofit {
            sheet.autofit();
        }
        for (&col, &width) in &self.widths {
            sheet.set_column_width(col, width)?;
        }
        Ok(())
    }
}

fn workbook(grids: &[Grid]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    for grid in grids {
        grid.render(workbook.add_worksheet())?;
    }
    Ok(workbook)
}

/// Writes the sheets, in order, to an `.xlsx` file.
pub fn write_workbook(grids: &[Grid], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    workbook(grids)?.save(path)?;
    tracing::info!(path = %path.display(), sheets = grids.len(), "wrote workbook");
    Ok(())
}

/// Serialises the sheets to `.xlsx` bytes.
pub fn workbook_bytes(grids: &[Grid]) -> Result<Vec<u8>> {
    Ok(workbook(grids)?.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_numbers_are_blank() {
        let mut grid = Grid::new("Sheet");
        grid.number(0, 0, f64::NAN).format("0.0%");
        grid.number(0, 1, 1.5);
        assert_eq!(grid.cell(0, 0).unwrap().value, CellValue::Blank);
        assert_eq!(
            grid.cell(0, 0).unwrap().style.num_format.as_deref(),
            Some("0.0%")
        );
        assert_eq!(grid.cell(0, 1).unwrap().value, CellValue::Number(1.5));
    }

    #[test]
    fn test_cell_builder_chains() {
        let mut grid = Grid::new("Sheet");
        grid.text(2, 3, "Revenue")
            .note("Total sales")
            .fill(Rgb(1, 2, 3))
            .border_bottom();
        let cell = grid.cell(2, 3).unwrap();
        assert_eq!(cell.note.as_deref(), Some("Total sales"));
        assert_eq!(cell.style.fill, Some(Rgb(1, 2, 3)));
        assert!(cell.style.border_bottom);
    }

    #[test]
    fn test_cell_fill_beats_row_fill() {
        let style = Style {
            fill: Some(Rgb(1, 1, 1)),
            ..Style::default()
        };
        assert_eq!(style.fill.or(Some(Rgb(9, 9, 9))), Some(Rgb(1, 1, 1)));
        assert!(!style.is_plain());
        assert!(Style::default().is_plain());
    }

    #[test]
    fn test_cells_iterate_row_major() {
        let mut grid = Grid::new("Sheet");
        grid.text(1, 0, "b");
        grid.text(0, 5, "a");
        grid.text(1, 2, "c");
        let order: Vec<_> = grid.cells().map(|(pos, _)| pos).collect();
        assert_eq!(order, vec![(0, 5), (1, 0), (1, 2)]);
    }

    #[test]
    fn test_renders_to_xlsx() {
        let mut grid = Grid::new("AAPL");
        grid.fill_row(0, Rgb(185, 216, 72));
        grid.text(0, 0, "Title").font_size(20.0);
        grid.text(1, 0, "Metric");
        grid.text(1, 1, "2023");
        grid.text(2, 0, "Revenue").note("Total sales");
        grid.number(2, 1, 1234.5).format(crate::format::THOUSANDS_2);
        grid.formula(2, 2, "=B3*2");
        grid.add_table(TableSpec {
            first_row: 1,
            first_col: 0,
            last_row: 2,
            last_col: 1,
            kind: TableKind::Light1,
            headers: vec!["Metric".into(), "2023".into()],
        });
        grid.autofit();
        grid.set_width(0, 20.0);

        let bytes = workbook_bytes(&[grid]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
