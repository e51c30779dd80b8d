//! Reporting dimension and period label definitions.
//!
//! This module defines [`Dimension`] for the provider's reporting basis of a
//! fiscal record and [`Period`] for the row/column labels of a metric table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Reporting basis of a fiscal record.
///
/// `As*` dimensions are as originally reported, `Most*` dimensions are
/// restated with the most recent figures. The trailing suffix selects the
/// window: quarterly, annual or trailing twelve months.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// As reported, quarterly.
    AsReportedQuarterly,
    /// As reported, annual.
    AsReportedAnnual,
    /// As reported, trailing twelve months.
    #[default]
    AsReportedTtm,
    /// Most recent restatement, quarterly.
    MostRecentQuarterly,
    /// Most recent restatement, annual.
    MostRecentAnnual,
    /// Most recent restatement, trailing twelve months.
    MostRecentTtm,
}

impl Dimension {
    /// Returns the provider code for this dimension (e.g. `ART`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AsReportedQuarterly => "ARQ",
            Self::AsReportedAnnual => "ARY",
            Self::AsReportedTtm => "ART",
            Self::MostRecentQuarterly => "MRQ",
            Self::MostRecentAnnual => "MRY",
            Self::MostRecentTtm => "MRT",
        }
    }

    /// Returns true if this dimension covers a trailing twelve month window.
    #[must_use]
    pub const fn is_trailing(&self) -> bool {
        matches!(self, Self::AsReportedTtm | Self::MostRecentTtm)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Dimension {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ARQ" => Ok(Self::AsReportedQuarterly),
            "ARY" => Ok(Self::AsReportedAnnual),
            "ART" => Ok(Self::AsReportedTtm),
            "MRQ" => Ok(Self::MostRecentQuarterly),
            "MRY" => Ok(Self::MostRecentAnnual),
            "MRT" => Ok(Self::MostRecentTtm),
            other => Err(DataError::Parse(format!("unknown dimension: {other}"))),
        }
    }
}

/// Label of one period in a metric table.
///
/// Fiscal years sort before the trailing twelve month column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    /// A completed fiscal year, labelled by calendar year.
    FiscalYear(i32),
    /// Last twelve months, the most recent rolling-annual window.
    Ltm,
}

impl Period {
    /// Returns true for the trailing twelve month period.
    #[must_use]
    pub const fn is_ltm(&self) -> bool {
        matches!(self, Self::Ltm)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FiscalYear(year) => write!(f, "{year}"),
            Self::Ltm => f.write_str("LTM"),
        }
    }
}
