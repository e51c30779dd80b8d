#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tearsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fundamental tear sheets.
//!
//! Re-exports the core types and provider implementations, the metric and
//! output crates, and provides a [`ReportPipeline`] that fetches records and
//! derives the report tables.
//!
//! # Features
//!
//! - `sharadar` - Nasdaq Data Link fundamentals, prices and insider filings
//! - `yahoo` - Yahoo Finance beta and risk-free rate

// Core types and traits
pub use tearsheet_core::*;

// Derivation and layout
pub use tearsheet_metrics as metrics;
pub use tearsheet_metrics::{History, MetricTable};
pub use tearsheet_output as output;

// Providers
#[cfg(feature = "sharadar")]
pub use tearsheet_sharadar::SharadarProvider;
#[cfg(feature = "yahoo")]
pub use tearsheet_yahoo::YahooProvider;

mod pipeline;
pub use pipeline::{DECIMALS, OverviewReport, ReportPipeline};
