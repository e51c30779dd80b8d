//! NaN-propagating numeric series.
//!
//! [`Values`] is the working type of every metric formula. Arithmetic never
//! panics: any result that is not finite (division by zero, missing operand,
//! overflow) is stored as NaN, so a missing upstream field surfaces as a blank
//! cell rather than an error.

use std::ops::{Add, Div, Mul, Sub};

use crate::growth::cagr;

/// An ordered series of metric values, one per period or ticker.
///
/// Invariant: every element is either finite or NaN.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Values(Vec<f64>);

#[inline]
fn finite_or_nan(v: f64) -> f64 {
    if v.is_finite() { v } else { f64::NAN }
}

impl Values {
    /// Creates a series, replacing infinities with NaN.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self(values.into_iter().map(finite_or_nan).collect())
    }

    /// Creates a series from optional values, `None` becoming NaN.
    pub fn from_options<I: IntoIterator<Item = Option<f64>>>(values: I) -> Self {
        Self(
            values
                .into_iter()
                .map(|v| v.map_or(f64::NAN, finite_or_nan))
                .collect(),
        )
    }

    /// Creates a series of `len` copies of `value`.
    #[must_use]
    pub fn constant(len: usize, value: f64) -> Self {
        Self(vec![finite_or_nan(value); len])
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the series has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Consumes the series, returning the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Value at `index`, NaN when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(f64::NAN)
    }

    /// Last value, NaN when empty.
    #[must_use]
    pub fn last(&self) -> f64 {
        self.0.last().copied().unwrap_or(f64::NAN)
    }

    /// Overwrites the last value; no-op on an empty series.
    pub fn set_last(&mut self, value: f64) {
        if let Some(last) = self.0.last_mut() {
            *last = finite_or_nan(value);
        }
    }

    /// Applies `f` element-wise.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.iter().map(|&v| finite_or_nan(f(v))).collect())
    }

    /// Combines two series element-wise. The result has the longer length;
    /// positions missing from either side are NaN.
    #[must_use]
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let len = self.len().max(other.len());
        Self(
            (0..len)
                .map(|i| finite_or_nan(f(self.get(i), other.get(i))))
                .collect(),
        )
    }

    /// Replaces zeros with NaN, for use as a denominator.
    #[must_use]
    pub fn nonzero(&self) -> Self {
        self.map(|v| if v == 0.0 { f64::NAN } else { v })
    }

    /// Replaces NaN with `value`.
    #[must_use]
    pub fn fill_nan(&self, value: f64) -> Self {
        self.map(|v| if v.is_nan() { value } else { v })
    }

    /// Lags the series by `periods`, padding the front with NaN.
    #[must_use]
    pub fn shift(&self, periods: usize) -> Self {
        let pad = periods.min(self.len());
        let mut out = vec![f64::NAN; pad];
        out.extend_from_slice(&self.0[..self.len() - pad]);
        Self(out)
    }

    /// Period-over-period change `(v[i] - v[i-1]) / v[i-1]`.
    ///
    /// The denominator keeps its sign, so a loss shrinking from -50 to -25
    /// reads -50%. The first element is NaN.
    #[must_use]
    pub fn pct_change(&self) -> Self {
        let prev = self.shift(1);
        self.zip_with(&prev, |cur, prev| (cur - prev) / prev)
    }

    /// Growth rate over the trailing `window` periods at every position,
    /// using the sign-aware [`cagr`]. The first `window` elements are NaN.
    #[must_use]
    pub fn rolling_cagr(&self, window: usize) -> Self {
        let years = window as f64;
        Self(
            (0..self.len())
                .map(|i| {
                    if window == 0 || i < window {
                        f64::NAN
                    } else {
                        cagr(self.0[i - window], self.0[i], years)
                    }
                })
                .collect(),
        )
    }

    /// Clamps values into `[lo, hi]`, leaving NaN untouched.
    #[must_use]
    pub fn clip(&self, lo: f64, hi: f64) -> Self {
        self.map(|v| if v.is_nan() { v } else { v.clamp(lo, hi) })
    }
}

impl From<Vec<f64>> for Values {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl AsRef<[f64]> for Values {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&Values> for &Values {
            type Output = Values;

            fn $method(self, rhs: &Values) -> Values {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }

        impl $trait<Values> for Values {
            type Output = Values;

            fn $method(self, rhs: Values) -> Values {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&Values> for Values {
            type Output = Values;

            fn $method(self, rhs: &Values) -> Values {
                (&self).$method(rhs)
            }
        }

        impl $trait<Values> for &Values {
            type Output = Values;

            fn $method(self, rhs: Values) -> Values {
                self.$method(&rhs)
            }
        }

        impl $trait<f64> for &Values {
            type Output = Values;

            fn $method(self, rhs: f64) -> Values {
                self.map(|a| a $op rhs)
            }
        }

        impl $trait<f64> for Values {
            type Output = Values;

            fn $method(self, rhs: f64) -> Values {
                (&self).$method(rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, +);
impl_binary_op!(Sub, sub, -);
impl_binary_op!(Mul, mul, *);
impl_binary_op!(Div, div, /);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn all_nan(values: &Values) -> bool {
        values.as_slice().iter().all(|v| v.is_nan())
    }

    #[test]
    fn test_division_by_zero_is_missing() {
        let num = Values::new(vec![10.0, 5.0, -3.0]);
        let den = Values::new(vec![0.0, f64::NAN, 0.0]);
        assert!(all_nan(&(&num / &den)));
        assert!(all_nan(&(&num / 0.0)));
    }

    #[test]
    fn test_missing_operands_propagate() {
        let a = Values::from_options([Some(1.0), None, Some(3.0)]);
        let b = Values::new(vec![1.0, 1.0, 1.0]);
        let sum = &a + &b;
        assert_eq!(sum.get(0), 2.0);
        assert!(sum.get(1).is_nan());
        assert_eq!(sum.get(2), 4.0);
    }

    #[test]
    fn test_length_mismatch_pads_with_nan() {
        let a = Values::new(vec![1.0, 2.0, 3.0]);
        let b = Values::new(vec![1.0]);
        let diff = a - b;
        assert_eq!(diff.len(), 3);
        assert_eq!(diff.get(0), 0.0);
        assert!(diff.get(2).is_nan());
    }

    #[test]
    fn test_shift_and_pct_change() {
        let v = Values::new(vec![100.0, 110.0, -50.0, -25.0]);
        let shifted = v.shift(1);
        assert!(shifted.get(0).is_nan());
        assert_eq!(shifted.get(1), 100.0);

        let pct = v.pct_change();
        assert!(pct.get(0).is_nan());
        assert_relative_eq!(pct.get(1), 0.1);
        assert_relative_eq!(pct.get(2), -160.0 / 110.0);
    }

    #[test]
    fn test_pct_change_keeps_sign_of_negative_base() {
        let pct = Values::new(vec![-50.0, -25.0, -100.0]).pct_change();
        assert_relative_eq!(pct.get(1), -0.5);
        assert_relative_eq!(pct.get(2), 3.0);
    }

    #[test]
    fn test_pct_change_needs_two_periods() {
        assert!(all_nan(&Values::new(vec![42.0]).pct_change()));
        assert!(Values::default().pct_change().is_empty());
    }

    #[test]
    fn test_rolling_cagr_window() {
        let v = Values::new(vec![100.0, 110.0, 120.0, 133.1]);
        let cagr = v.rolling_cagr(3);
        assert!(cagr.get(2).is_nan());
        assert_relative_eq!(cagr.get(3), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_clip_keeps_nan() {
        let v = Values::new(vec![-2000.0, f64::NAN, 5.0, 1500.0]);
        let clipped = v.clip(-999.0, 999.0);
        assert_eq!(clipped.get(0), -999.0);
        assert!(clipped.get(1).is_nan());
        assert_eq!(clipped.get(2), 5.0);
        assert_eq!(clipped.get(3), 999.0);
    }

    #[test]
    fn test_nonzero_and_fill() {
        let v = Values::new(vec![0.0, 2.0, f64::NAN]);
        let nz = v.nonzero();
        assert!(nz.get(0).is_nan());
        assert_eq!(v.fill_nan(1.0).get(2), 1.0);
    }
}
