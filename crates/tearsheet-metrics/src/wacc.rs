//! Weighted average cost of capital.
//!
//! Cost of equity follows CAPM against a fixed expected market return. Cost
//! of debt is the effective interest rate on reported debt and the tax shield
//! uses the effective tax rate.

use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, Result};

/// Expected annual market return used for the equity risk premium.
pub const MARKET_RETURN: f64 = 0.08;

/// Beta assumed when the market data provider has none.
pub const DEFAULT_BETA: f64 = 1.0;

/// LTM capital structure inputs, in USD.
///
/// Missing debt, interest, tax or pre-tax earnings are treated as zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructure {
    /// Equity market value.
    pub market_cap: f64,
    /// Total debt.
    pub debt: f64,
    /// Interest expense.
    pub interest_expense: f64,
    /// Income tax expense.
    pub tax_expense: f64,
    /// Earnings before tax.
    pub earnings_before_tax: f64,
}

fn or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

impl CapitalStructure {
    /// CAPM cost of equity.
    #[must_use]
    pub fn cost_of_equity(beta: f64, risk_free: f64) -> f64 {
        risk_free + beta * (MARKET_RETURN - risk_free)
    }

    /// Effective interest rate on debt, zero without debt.
    #[must_use]
    pub fn cost_of_debt(&self) -> f64 {
        let debt = or_zero(self.debt);
        if debt == 0.0 {
            0.0
        } else {
            or_zero(self.interest_expense) / debt
        }
    }

    /// Effective tax rate, zero without pre-tax earnings.
    #[must_use]
    pub fn tax_rate(&self) -> f64 {
        let ebt = or_zero(self.earnings_before_tax);
        if ebt == 0.0 {
            0.0
        } else {
            or_zero(self.tax_expense) / ebt
        }
    }

    /// Weighted average cost of capital.
    ///
    /// `beta` of `None` falls back to [`DEFAULT_BETA`]. A non-finite beta or
    /// risk-free rate, or a market cap that is not positive, is an error.
    pub fn wacc(&self, beta: Option<f64>, risk_free: f64) -> Result<f64> {
        let beta = beta.unwrap_or(DEFAULT_BETA);
        if !beta.is_finite() {
            return Err(MetricsError::InvalidMarketInput(format!("beta is {beta}")));
        }
        if !risk_free.is_finite() {
            return Err(MetricsError::InvalidMarketInput(format!(
                "risk-free rate is {risk_free}"
            )));
        }
        if !(self.market_cap.is_finite() && self.market_cap > 0.0) {
            return Err(MetricsError::InvalidMarketInput(format!(
                "market cap is {}",
                self.market_cap
            )));
        }

        let debt = or_zero(self.debt).max(0.0);
        let total = self.market_cap + debt;
        let weight_equity = self.market_cap / total;
        let weight_debt = debt / total;

        let wacc = weight_equity * Self::cost_of_equity(beta, risk_free)
            + weight_debt * self.cost_of_debt() * (1.0 - self.tax_rate());

        tracing::debug!(beta, risk_free, weight_equity, weight_debt, wacc, "computed wacc");
        Ok(wacc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn structure() -> CapitalStructure {
        CapitalStructure {
            market_cap: 800.0,
            debt: 200.0,
            interest_expense: 10.0,
            tax_expense: 25.0,
            earnings_before_tax: 100.0,
        }
    }

    #[test]
    fn test_wacc_blends_equity_and_after_tax_debt() {
        let wacc = structure().wacc(Some(1.2), 0.04).unwrap();
        let ke = 0.04 + 1.2 * (0.08 - 0.04);
        let kd = 0.05 * (1.0 - 0.25);
        assert_relative_eq!(wacc, 0.8 * ke + 0.2 * kd, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_beta_defaults_to_one() {
        let wacc = structure().wacc(None, 0.04).unwrap();
        let expected = structure().wacc(Some(1.0), 0.04).unwrap();
        assert_relative_eq!(wacc, expected);
    }

    #[test]
    fn test_no_debt_is_cost_of_equity() {
        let s = CapitalStructure {
            debt: 0.0,
            earnings_before_tax: 0.0,
            ..structure()
        };
        assert_eq!(s.cost_of_debt(), 0.0);
        assert_eq!(s.tax_rate(), 0.0);
        assert_relative_eq!(s.wacc(Some(1.0), 0.03).unwrap(), 0.08, epsilon = 1e-12);
    }

    #[rstest]
    #[case(Some(f64::NAN), 0.04)]
    #[case(Some(1.0), f64::NAN)]
    #[case(Some(f64::INFINITY), 0.04)]
    fn test_non_finite_market_inputs_are_errors(#[case] beta: Option<f64>, #[case] rf: f64) {
        assert!(matches!(
            structure().wacc(beta, rf),
            Err(MetricsError::InvalidMarketInput(_))
        ));
    }

    #[test]
    fn test_zero_market_cap_is_error() {
        let s = CapitalStructure {
            market_cap: 0.0,
            ..structure()
        };
        assert!(s.wacc(Some(1.0), 0.04).is_err());
    }
}
