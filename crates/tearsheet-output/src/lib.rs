#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tearsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Spreadsheet output for tear sheets.
//!
//! - [`Catalog`] - Metric groups, descriptions and band colours
//! - [`Grid`] - Sheet model, rendered with [`write_workbook`]
//! - [`time_series_sheet`], [`comparison_sheet`], [`overview_sheet`] - Report layouts

/// Conditional colour bands.
pub mod banding;
/// Metric catalogue configuration.
pub mod catalog;
/// Comparison sheet layout.
pub mod comparison;
/// Discounted cash flow formulas.
pub mod dcf;
/// Error types for output.
pub mod error;
/// Number formats.
pub mod format;
/// Sheet model and xlsx rendering.
pub mod grid;
mod layout;
/// Overview sheet layout.
pub mod overview;
/// Band colours.
pub mod palette;
/// Time-series sheet layout.
pub mod time_series;

pub use banding::{Band, Rule, band_column, rule_for};
pub use catalog::{Catalog, MetricGroup, ReportKind};
pub use comparison::comparison_sheet;
pub use error::{OutputError, Result};
pub use grid::{Cell, CellValue, Grid, write_workbook, workbook_bytes};
pub use overview::overview_sheet;
pub use palette::{Palette, Rgb};
pub use time_series::time_series_sheet;
