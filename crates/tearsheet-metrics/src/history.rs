//! Fiscal history assembly.
//!
//! Sharadar publishes one `ART` (as-reported trailing twelve months) row per
//! quarter. A [`History`] keeps the rows that close a fiscal year, one per
//! fiscal label, ordered by calendar year, and appends the latest row as the
//! LTM period.

use std::collections::HashMap;

use chrono::Datelike;
use tearsheet_core::{Dimension, FiscalRecord, Period, Symbol};

use crate::{
    error::{MetricsError, Result},
    values::Values,
};

/// Ordered fiscal years plus the trailing twelve month period of one symbol.
#[derive(Clone, Debug)]
pub struct History {
    symbol: Symbol,
    annual: Vec<FiscalRecord>,
    ltm: FiscalRecord,
}

impl History {
    /// Builds a history from raw records in any order.
    ///
    /// Only `ART` records are used. Fiscal year ends are the records whose
    /// label contains `Q4`; when a label repeats, the chronologically latest
    /// record wins. The LTM period is the latest `ART` record overall.
    pub fn from_records(symbol: &Symbol, records: Vec<FiscalRecord>) -> Result<Self> {
        let trailing: Vec<FiscalRecord> = records
            .into_iter()
            .filter(|r| r.dimension == Dimension::AsReportedTtm)
            .collect();

        let ltm = trailing
            .iter()
            .max_by_key(|r| r.recency())
            .cloned()
            .ok_or_else(|| MetricsError::NoRecords {
                symbol: symbol.to_string(),
            })?;

        let mut by_label: HashMap<&str, &FiscalRecord> = HashMap::new();
        for record in trailing.iter().filter(|r| r.is_fiscal_year_end()) {
            by_label
                .entry(record.fiscal_period.as_str())
                .and_modify(|kept| {
                    if record.recency() > kept.recency() {
                        *kept = record;
                    }
                })
                .or_insert(record);
        }

        let mut annual: Vec<FiscalRecord> = by_label.into_values().cloned().collect();
        annual.sort_by_key(|r| (r.calendar_date.year(), r.recency()));

        tracing::debug!(
            symbol = %symbol,
            years = annual.len(),
            ltm = %ltm.calendar_date,
            "assembled fiscal history"
        );

        Ok(Self {
            symbol: symbol.clone(),
            annual,
            ltm,
        })
    }

    /// Keeps only the latest `max_years` fiscal years; LTM is always kept.
    #[must_use]
    pub fn trim(mut self, max_years: usize) -> Self {
        let excess = self.annual.len().saturating_sub(max_years);
        self.annual.drain(..excess);
        self
    }

    /// The symbol this history belongs to.
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Fiscal year records, oldest first.
    #[must_use]
    pub fn annual(&self) -> &[FiscalRecord] {
        &self.annual
    }

    /// The trailing twelve month record.
    #[must_use]
    pub fn ltm(&self) -> &FiscalRecord {
        &self.ltm
    }

    /// Number of periods, fiscal years plus LTM.
    #[must_use]
    pub fn len(&self) -> usize {
        self.annual.len() + 1
    }

    /// A history always holds the LTM period.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every record in column order: fiscal years, then LTM.
    pub fn records(&self) -> impl Iterator<Item = &FiscalRecord> {
        self.annual.iter().chain(std::iter::once(&self.ltm))
    }

    /// Period labels in column order.
    #[must_use]
    pub fn periods(&self) -> Vec<Period> {
        self.annual
            .iter()
            .map(|r| Period::FiscalYear(r.calendar_date.year()))
            .chain(std::iter::once(Period::Ltm))
            .collect()
    }

    /// One field across all periods, in column order.
    pub fn field(&self, f: impl Fn(&FiscalRecord) -> Option<f64>) -> Values {
        Values::from_options(self.records().map(f))
    }

    /// One field across the fiscal years only.
    pub fn annual_field(&self, f: impl Fn(&FiscalRecord) -> Option<f64>) -> Values {
        Values::from_options(self.annual.iter().map(f))
    }
}
