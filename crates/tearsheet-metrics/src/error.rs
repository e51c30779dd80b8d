//! Error types for metric derivation.

use tearsheet_core::DataError;
use thiserror::Error;

/// Errors that can occur while deriving metrics.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// No trailing twelve month record was available for the symbol.
    #[error("No ART records for {symbol}")]
    NoRecords {
        /// The symbol being processed.
        symbol: String,
    },

    /// A metric column does not match the table's row count.
    #[error("Metric {metric} has {actual} values, expected {expected}")]
    LengthMismatch {
        /// Name of the offending metric.
        metric: String,
        /// Number of rows in the table.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// The same metric was added to a table twice.
    #[error("Duplicate metric: {0}")]
    DuplicateMetric(String),

    /// A market input (beta, risk-free rate, market cap) is unusable.
    #[error("Invalid market input: {0}")]
    InvalidMarketInput(String),

    /// Error building a DataFrame.
    #[error("DataFrame error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}

impl From<MetricsError> for DataError {
    fn from(err: MetricsError) -> Self {
        match err {
            MetricsError::NoRecords { symbol } => Self::InsufficientData {
                symbol,
                reason: "no ART fundamentals".to_string(),
            },
            MetricsError::InvalidMarketInput(msg) => Self::InvalidParameter(msg),
            MetricsError::Frame(e) => Self::Frame(e),
            other => Self::Other(other.to_string()),
        }
    }
}

/// Result type alias using [`MetricsError`].
pub type Result<T> = std::result::Result<T, MetricsError>;
