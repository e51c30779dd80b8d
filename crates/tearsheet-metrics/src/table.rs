//! Metric tables.
//!
//! A [`MetricTable`] is a labelled grid: one row per period (or per ticker in
//! a comparison) and one named column per metric, in insertion order.

use polars::prelude::*;

use crate::{
    error::{MetricsError, Result},
    values::Values,
};

/// Rows × ordered metric columns of `f64`, NaN marking a missing value.
#[derive(Clone, Debug, Default)]
pub struct MetricTable {
    label: String,
    rows: Vec<String>,
    columns: Vec<(String, Values)>,
    rounded: bool,
}

impl MetricTable {
    /// Creates an empty table. `label` names the row label column.
    #[must_use]
    pub fn new(label: impl Into<String>, rows: Vec<String>) -> Self {
        Self {
            label: label.into(),
            rows,
            columns: Vec::new(),
            rounded: false,
        }
    }

    /// Appends a metric column.
    pub fn push(&mut self, metric: impl Into<String>, values: Values) -> Result<()> {
        let metric = metric.into();
        if values.len() != self.rows.len() {
            return Err(MetricsError::LengthMismatch {
                metric,
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        if self.get(&metric).is_some() {
            return Err(MetricsError::DuplicateMetric(metric));
        }
        self.columns.push((metric, values));
        Ok(())
    }

    /// Name of the row label column (`Period`, `Ticker`).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Row labels.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Metric names in column order.
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Columns in order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Values)> {
        self.columns.iter().map(|(name, v)| (name.as_str(), v))
    }

    /// Values of one metric.
    #[must_use]
    pub fn get(&self, metric: &str) -> Option<&Values> {
        self.columns
            .iter()
            .find(|(name, _)| name == metric)
            .map(|(_, v)| v)
    }

    /// One cell, NaN when the metric or row does not exist.
    #[must_use]
    pub fn value(&self, row: usize, metric: &str) -> f64 {
        self.get(metric).map_or(f64::NAN, |v| v.get(row))
    }

    /// Number of metric columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Keeps only the last `n` rows.
    pub fn keep_last(&mut self, n: usize) {
        let skip = self.rows.len().saturating_sub(n);
        if skip == 0 {
            return;
        }
        self.rows.drain(..skip);
        for (_, values) in &mut self.columns {
            *values = Values::new(values.as_slice()[skip..].to_vec());
        }
    }

    /// Rounds every value half away from zero to `decimals` places.
    ///
    /// Only the first call has an effect; a table is rounded once, when the
    /// report is finalised.
    pub fn round(&mut self, decimals: i32) {
        if self.rounded {
            return;
        }
        let scale = 10_f64.powi(decimals);
        for (_, values) in &mut self.columns {
            *values = values.map(|v| (v * scale).round() / scale);
        }
        self.rounded = true;
    }

    /// Whether [`round`](Self::round) has been applied.
    #[must_use]
    pub fn is_rounded(&self) -> bool {
        self.rounded
    }

    /// Converts the table into a DataFrame with the row labels as the first
    /// column. NaN cells become nulls.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new(self.label.as_str().into(), self.rows.clone()));
        for (name, values) in &self.columns {
            let cells: Vec<Option<f64>> = values
                .as_slice()
                .iter()
                .map(|v| v.is_finite().then_some(*v))
                .collect();
            columns.push(Column::new(name.as_str().into(), cells));
        }
        Ok(DataFrame::new(columns)?)
    }
}
