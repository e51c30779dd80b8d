#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tearsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Metric derivation for fundamental tear sheets.
//!
//! - [`History`] - Ordered fiscal years plus LTM from raw `ART` records
//! - [`Values`] - NaN-propagating series arithmetic
//! - [`time_series`], [`comparison`], [`overview`] - The three catalogues
//! - [`CapitalStructure`] - WACC for the DCF discount rate

/// Comparison catalogue, one row per ticker.
pub mod comparison;
/// Error types for metric derivation.
pub mod error;
/// CAGR and mean year-over-year change.
pub mod growth;
/// Fiscal history assembly.
pub mod history;
/// Overview catalogue for a single ticker.
pub mod overview;
/// Labelled metric tables.
pub mod table;
/// Time-series catalogue for a single ticker.
pub mod time_series;
/// NaN-propagating numeric series.
pub mod values;
/// Weighted average cost of capital.
pub mod wacc;

pub use comparison::comparison;
pub use error::{MetricsError, Result};
pub use growth::{cagr, mean_yoy_change};
pub use history::History;
pub use overview::{MarketInputs, Overview, overview};
pub use table::MetricTable;
pub use time_series::time_series;
pub use values::Values;
pub use wacc::CapitalStructure;
