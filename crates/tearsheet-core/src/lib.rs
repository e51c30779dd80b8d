#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tearsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Vocabulary shared by the vendors, the metric derivation and the sheet
//! writer.
//!
//! A report starts from [`FiscalRecord`]s served by a
//! [`FundamentalDataProvider`], optionally priced through a
//! [`PriceDataProvider`] and discounted with inputs from a
//! [`MarketRiskProvider`]. Insider filings come from an
//! [`InsiderDataProvider`]. Failures of any of them surface as [`DataError`].

/// The shared error type.
pub mod error;
/// Reporting dimension and period label definitions.
pub mod period;
/// One trait per report input.
pub mod provider;
/// Sector-grouped ticker lists for comparison sheets.
pub mod sectors;
/// Tickers, fiscal records and insider filings.
pub mod types;

pub use error::{DataError, Result};
pub use period::{Dimension, Period};
pub use provider::{
    DataProvider, FundamentalDataProvider, InsiderDataProvider, MarketRiskProvider,
    PriceDataProvider,
};
pub use sectors::{SectorGroup, SectorList};
pub use types::{FiscalRecord, InsiderTransaction, Symbol};
