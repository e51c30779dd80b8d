//! The shared error type.
//!
//! Every provider maps its transport and payload failures onto [`DataError`]
//! so the report pipeline can decide per input whether a failure is fatal
//! (fundamentals) or degrades to a missing value (price, insiders, beta).

use std::time::Duration;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure while fetching or shaping report inputs.
#[derive(Error, Debug)]
pub enum DataError {
    /// The request never produced a usable HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 429 from a vendor.
    #[error("{provider} is throttling requests (retry after {retry_after:?})")]
    RateLimited {
        /// Vendor name.
        provider: String,
        /// Back-off hint, when the vendor gives one.
        retry_after: Option<Duration>,
    },

    /// HTTP 401/403: the API key was rejected.
    #[error("{0} rejected the API key")]
    AuthenticationFailed(String),

    /// The vendor does not know the ticker.
    #[error("Unknown ticker: {0}")]
    SymbolNotFound(String),

    /// The ticker exists but no rows fall inside the requested window.
    #[error("No data for {symbol} between {start} and {end}")]
    DataNotAvailable {
        /// Ticker.
        symbol: String,
        /// First day of the window.
        start: String,
        /// Last day of the window.
        end: String,
    },

    /// Rows came back but a report cannot be built from them.
    #[error("Cannot build report for {symbol}: {reason}")]
    InsufficientData {
        /// Ticker.
        symbol: String,
        /// What is missing.
        reason: String,
    },

    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Parse(String),

    /// Building or reading a frame failed.
    #[error("Frame error: {0}")]
    Frame(#[from] PolarsError),

    /// A pipeline input has no provider attached.
    #[error("No provider configured for {0}")]
    ProviderNotConfigured(String),

    /// Bad caller input, such as an inverted date range or an empty
    /// comparison list.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Anything else a vendor reports.
    #[error("{0}")]
    Other(String),
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_ticker() {
        let err = DataError::DataNotAvailable {
            symbol: "^TNX".to_string(),
            start: "2024-01-01".to_string(),
            end: "2024-01-14".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No data for ^TNX between 2024-01-01 and 2024-01-14"
        );
        assert_eq!(
            DataError::AuthenticationFailed("Sharadar".into()).to_string(),
            "Sharadar rejected the API key"
        );
    }
}
