//! Error types for sheet layout and rendering.

use thiserror::Error;

/// Errors raised while laying out or writing a workbook.
#[derive(Debug, Error)]
pub enum OutputError {
    /// A metric in the table has no group or description in the catalogue.
    #[error("metric '{metric}' not found in any {report} group")]
    UnknownMetric {
        /// Metric name.
        metric: String,
        /// Report the catalogue was consulted for.
        report: String,
    },

    /// The catalogue file is malformed.
    #[error("invalid catalogue: {0}")]
    Config(String),

    /// Reading the catalogue file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalogue JSON could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The xlsx writer rejected the workbook.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Result alias for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
