//! Conditional colour bands.
//!
//! Each metric maps to at most one [`Rule`]. Percentile rules rank a cell
//! among the other cells of the same metric (a ticker's years, or the peers
//! of a comparison); threshold rules use fixed cut-offs.

use serde::{Deserialize, Serialize};

/// A colour band, from most to least favourable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    /// Top tail.
    DarkGreen,
    /// Upper decile.
    MedGreen,
    /// Upper quartile.
    LightGreen,
    /// Borderline.
    Yellow,
    /// Lower quartile.
    LightRed,
    /// Lower decile.
    MedRed,
    /// Bottom tail.
    DarkRed,
}

impl Band {
    /// Signed favourability, `3` for [`Band::DarkGreen`] down to `-3`.
    #[must_use]
    pub const fn score(self) -> i8 {
        match self {
            Self::DarkGreen => 3,
            Self::MedGreen => 2,
            Self::LightGreen => 1,
            Self::Yellow => 0,
            Self::LightRed => -1,
            Self::MedRed => -2,
            Self::DarkRed => -3,
        }
    }
}

/// How a metric is coloured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Rank among the column's values.
    Percentile {
        /// `false` mirrors the bands so the lowest values are green.
        higher_is_better: bool,
    },
    /// Fixed current ratio cut-offs.
    CurrentRatio,
    /// Fixed quick ratio cut-offs.
    QuickRatio,
    /// Fixed interest coverage cut-offs.
    InterestCoverage,
}

const PERCENTILE: &[&str] = &[
    // Time-series growth
    "Revenue %",
    "GP %",
    "Net Income %",
    "EBITDA %",
    "CFO %",
    "FCF %",
    // Comparison growth
    "Revenue YoY %",
    "Gross Profit YoY %",
    "Net Income YoY %",
    "EBITDA YoY %",
    "CFO YoY %",
    "FCF YoY %",
    // Overview growth
    "Rev \u{0394}",
    "Rev CAGR",
    "GP \u{0394}",
    "GP CAGR",
    "Net Inc \u{0394}",
    "Net Inc CAGR",
    "EBITDA \u{0394}",
    "EBITDA CAGR",
    "CFO \u{0394}",
    "CFO CAGR",
    "FCF \u{0394}",
    "FCF CAGR",
    // Liquidity and efficiency
    "Cash Ratio",
    "Cash to Debt",
    "Cash/Debt",
    "Working Capital Turnover",
    "WC Turn",
    // Margins
    "GP Margin",
    "EBITDA Margin",
    "Net Margin",
    "Operating Margin",
    "Free Cash Flow Margin",
    "GP Marg",
    "EBITDA Marg",
    "Net Marg",
    "Op Marg",
    "FCF Marg",
    // Returns
    "ROA",
    "ROE",
    "ROIC",
];

const LOWER_IS_BETTER: &[&str] = &["D/E", "Debt to EBITDA", "Debt/EBITDA"];

/// Looks up the colouring rule for a metric.
#[must_use]
pub fn rule_for(metric: &str) -> Option<Rule> {
    match metric {
        "Current Ratio" => Some(Rule::CurrentRatio),
        "Quick Ratio" => Some(Rule::QuickRatio),
        "Int Coverage" | "Int Cov" => Some(Rule::InterestCoverage),
        m if LOWER_IS_BETTER.contains(&m) => Some(Rule::Percentile {
            higher_is_better: false,
        }),
        m if PERCENTILE.contains(&m) => Some(Rule::Percentile {
            higher_is_better: true,
        }),
        _ => None,
    }
}

/// Linear-interpolated percentile of ascending, finite `sorted` values.
///
/// `q` is in `[0, 100]`. Returns NaN for an empty slice.
#[must_use]
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = q / 100.0 * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
        }
    }
}

/// The six cut points of a percentile band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Percentiles {
    /// 6th percentile.
    pub p6: f64,
    /// 12th percentile.
    pub p12: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 88th percentile.
    pub p88: f64,
    /// 94th percentile.
    pub p94: f64,
}

impl Percentiles {
    /// Computes the cut points over the finite entries of `values`, or `None`
    /// when there are none.
    #[must_use]
    pub fn of(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            p6: percentile(&sorted, 6.0),
            p12: percentile(&sorted, 12.0),
            p25: percentile(&sorted, 25.0),
            p75: percentile(&sorted, 75.0),
            p88: percentile(&sorted, 88.0),
            p94: percentile(&sorted, 94.0),
        })
    }

    /// Band of `value` against these cut points.
    #[must_use]
    pub fn band(&self, value: f64, higher_is_better: bool) -> Option<Band> {
        if !value.is_finite() {
            return None;
        }
        if higher_is_better {
            if value >= self.p94 {
                Some(Band::DarkGreen)
            } else if value >= self.p88 {
                Some(Band::MedGreen)
            } else if value >= self.p75 {
                Some(Band::LightGreen)
            } else if value <= self.p6 {
                Some(Band::DarkRed)
            } else if value <= self.p12 {
                Some(Band::MedRed)
            } else if value <= self.p25 {
                Some(Band::LightRed)
            } else {
                None
            }
        } else if value <= self.p6 {
            Some(Band::DarkGreen)
        } else if value <= self.p12 {
            Some(Band::MedGreen)
        } else if value <= self.p25 {
            Some(Band::LightGreen)
        } else if value >= self.p94 {
            Some(Band::DarkRed)
        } else if value >= self.p88 {
            Some(Band::MedRed)
        } else if value >= self.p75 {
            Some(Band::LightRed)
        } else {
            None
        }
    }
}

fn threshold(rule: Rule, v: f64) -> Option<Band> {
    match rule {
        Rule::CurrentRatio => match v {
            v if v >= 3.0 => Some(Band::DarkGreen),
            v if v >= 2.0 => Some(Band::MedGreen),
            v if v >= 1.2 => Some(Band::LightGreen),
            v if v >= 0.8 => None,
            v if v >= 0.5 => Some(Band::LightRed),
            _ => Some(Band::DarkRed),
        },
        Rule::QuickRatio => match v {
            v if v >= 2.0 => Some(Band::DarkGreen),
            v if v >= 1.5 => Some(Band::MedGreen),
            v if v >= 1.0 => Some(Band::LightGreen),
            v if v >= 0.5 => Some(Band::LightRed),
            _ => Some(Band::DarkRed),
        },
        Rule::InterestCoverage => match v {
            v if v >= 4.0 => Some(Band::DarkGreen),
            v if v >= 3.0 => Some(Band::MedGreen),
            v if v >= 2.0 => Some(Band::Yellow),
            v if v >= 1.0 => Some(Band::LightRed),
            _ => Some(Band::DarkRed),
        },
        Rule::Percentile { .. } => None,
    }
}

/// Bands for every cell of a metric's column. Missing values, and metrics
/// without a rule, get `None`.
#[must_use]
pub fn band_column(metric: &str, values: &[f64]) -> Vec<Option<Band>> {
    let Some(rule) = rule_for(metric) else {
        return vec![None; values.len()];
    };
    match rule {
        Rule::Percentile { higher_is_better } => match Percentiles::of(values) {
            Some(p) => values.iter().map(|&v| p.band(v, higher_is_better)).collect(),
            None => vec![None; values.len()],
        },
        _ => values
            .iter()
            .map(|&v| if v.is_finite() { threshold(rule, v) } else { None })
            .collect(),
    }
}
