//! Metric groups, descriptions and colours for each report.

use std::{collections::BTreeMap, fmt, path::Path};

use serde::Deserialize;
use serde_json::{Map, Value};
use tearsheet_metrics::MetricTable;

use crate::{
    error::{OutputError, Result},
    palette::{Palette, Rgb},
};

const BUILTIN: &str = include_str!("../config/default.json");

/// The three report layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// One ticker, one column per fiscal year.
    TimeSeries,
    /// Many tickers, one row each.
    Comparison,
    /// One ticker, dense single-page view.
    Overview,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TimeSeries => "time_series",
            Self::Comparison => "comparison",
            Self::Overview => "overview",
        })
    }
}

/// A named block of metrics, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricGroup {
    /// Category label written beside the group's first metric.
    pub name: String,
    /// `(metric, description)` pairs.
    pub metrics: Vec<(String, String)>,
}

impl MetricGroup {
    /// Whether the group lists `metric`.
    #[must_use]
    pub fn contains(&self, metric: &str) -> bool {
        self.metrics.iter().any(|(m, _)| m == metric)
    }
}

#[derive(Deserialize)]
struct RawGroup {
    name: String,
    metrics: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    colors: BTreeMap<String, Rgb>,
    time_series: Vec<RawGroup>,
    comparison: Vec<RawGroup>,
    overview: Vec<RawGroup>,
}

fn groups(raw: Vec<RawGroup>, kind: ReportKind) -> Result<Vec<MetricGroup>> {
    raw.into_iter()
        .map(|group| {
            let metrics = group
                .metrics
                .into_iter()
                .map(|(metric, description)| match description {
                    Value::String(d) => Ok((metric, d)),
                    other => Err(OutputError::Config(format!(
                        "{kind} metric '{metric}' has a non-string description: {other}"
                    ))),
                })
                .collect::<Result<_>>()?;
            Ok(MetricGroup {
                name: group.name,
                metrics,
            })
        })
        .collect()
}

/// Metric groups and palette for all reports.
#[derive(Clone, Debug)]
pub struct Catalog {
    palette: Palette,
    time_series: Vec<MetricGroup>,
    comparison: Vec<MetricGroup>,
    overview: Vec<MetricGroup>,
}

impl Catalog {
    /// The catalogue embedded in the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN)
    }

    /// Loads a catalogue file, replacing the built-in one.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading catalogue");
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Parses a catalogue from JSON, keeping metric order as written.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Ok(Self {
            palette: Palette::from_named(&raw.colors),
            time_series: groups(raw.time_series, ReportKind::TimeSeries)?,
            comparison: groups(raw.comparison, ReportKind::Comparison)?,
            overview: groups(raw.overview, ReportKind::Overview)?,
        })
    }

    /// Band colours.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Groups for a report, in display order.
    #[must_use]
    pub fn groups(&self, kind: ReportKind) -> &[MetricGroup] {
        match kind {
            ReportKind::TimeSeries => &self.time_series,
            ReportKind::Comparison => &self.comparison,
            ReportKind::Overview => &self.overview,
        }
    }

    fn lookup(&self, kind: ReportKind, metric: &str) -> Result<(&MetricGroup, &str)> {
        self.groups(kind)
            .iter()
            .find_map(|g| {
                g.metrics
                    .iter()
                    .find(|(m, _)| m == metric)
                    .map(|(_, d)| (g, d.as_str()))
            })
            .ok_or_else(|| OutputError::UnknownMetric {
                metric: metric.to_string(),
                report: kind.to_string(),
            })
    }

    /// Name of the group listing `metric`.
    pub fn group_of(&self, kind: ReportKind, metric: &str) -> Result<&str> {
        self.lookup(kind, metric).map(|(g, _)| g.name.as_str())
    }

    /// Description of `metric`, used as its cell note.
    pub fn description(&self, kind: ReportKind, metric: &str) -> Result<&str> {
        self.lookup(kind, metric).map(|(_, d)| d)
    }

    /// Fails on the first table metric the catalogue does not describe.
    pub fn check(&self, kind: ReportKind, table: &MetricTable) -> Result<()> {
        for metric in table.metrics() {
            self.lookup(kind, metric)?;
        }
        Ok(())
    }
}
