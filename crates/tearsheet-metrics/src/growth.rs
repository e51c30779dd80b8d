//! Growth helpers: compound annual growth and mean year-over-year change.

/// Compound annual growth rate from `start` to `end` over `years`.
///
/// When both ends are positive this is the textbook `(end/start)^(1/years) - 1`.
/// Otherwise the total change relative to `|start|` is annualised by
/// magnitude and the sign reapplied, so a move from a loss to a profit is
/// always positive growth and the reverse always negative.
///
/// Returns NaN for a zero start, a non-positive horizon or any NaN input.
#[must_use]
pub fn cagr(start: f64, end: f64, years: f64) -> f64 {
    if !start.is_finite() || !end.is_finite() || start == 0.0 || years <= 0.0 {
        return f64::NAN;
    }

    if start > 0.0 && end > 0.0 {
        return (end / start).powf(1.0 / years) - 1.0;
    }

    let total = (end - start) / start.abs();
    total.signum() * ((1.0 + total.abs()).powf(1.0 / years) - 1.0)
}

/// Mean of the period-over-period changes `(v[i] - v[i-1]) / |v[i-1]|`.
///
/// Pairs with a zero or missing predecessor, or a missing current value, are
/// skipped. Returns NaN when no pair qualifies.
#[must_use]
pub fn mean_yoy_change(values: &[f64]) -> f64 {
    let changes: Vec<f64> = values
        .windows(2)
        .filter(|w| w[0].is_finite() && w[0] != 0.0 && w[1].is_finite())
        .map(|w| (w[1] - w[0]) / w[0].abs())
        .collect();

    if changes.is_empty() {
        return f64::NAN;
    }
    changes.iter().sum::<f64>() / changes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_positive_cagr() {
        assert_relative_eq!(cagr(100.0, 121.0, 2.0), 0.1, epsilon = 1e-12);
        assert_relative_eq!(cagr(121.0, 100.0, 2.0), 10.0 / 11.0 - 1.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(-100.0, 50.0)]
    #[case(-100.0, -20.0)]
    #[case(50.0, -10.0)]
    #[case(-10.0, -80.0)]
    #[case(20.0, 0.0)]
    #[case(-5.0, 0.0)]
    fn test_cagr_sign_follows_end_relative_to_start(#[case] start: f64, #[case] end: f64) {
        let rate = cagr(start, end, 3.0);
        assert!(rate.is_finite());
        assert_eq!(rate > 0.0, end > start);
        assert_eq!(rate < 0.0, end < start);
    }

    #[rstest]
    #[case(0.0, 10.0)]
    #[case(f64::NAN, 10.0)]
    #[case(10.0, f64::NAN)]
    fn test_cagr_undefined(#[case] start: f64, #[case] end: f64) {
        assert!(cagr(start, end, 3.0).is_nan());
    }

    #[test]
    fn test_mean_yoy_change() {
        let mean = mean_yoy_change(&[100.0, 110.0, 99.0]);
        assert_relative_eq!(mean, (0.1 - 0.1) / 2.0, epsilon = 1e-12);

        // Zero predecessor skipped, negative base uses magnitude
        let mean = mean_yoy_change(&[0.0, -10.0, -5.0]);
        assert_relative_eq!(mean, 0.5);
    }

    #[test]
    fn test_mean_yoy_change_without_pairs() {
        assert!(mean_yoy_change(&[]).is_nan());
        assert!(mean_yoy_change(&[5.0]).is_nan());
        assert!(mean_yoy_change(&[0.0, 5.0]).is_nan());
    }
}
