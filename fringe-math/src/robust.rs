//! Robust location and spread estimates.
//!
//! The median absolute deviation (MAD) is the median of `|x_i − median(x)|`.
//! Unlike the standard deviation, a single wild value cannot inflate it, so
//! it is the spread used for rejecting outliers among per-ring estimates.

use crate::correlation::StatsError;

/// Median of `values`, ignoring NaN.
///
/// For even-length data returns the average of the two middle values.
///
/// # Errors
/// Returns `StatsError::InsufficientData` if no non-NaN value remains.
pub fn median(values: &[f64]) -> Result<f64, StatsError> {
    let mut valid: Vec<f64> = values.iter().filter(|v| !v.is_nan()).copied().collect();

    if valid.is_empty() {
        return Err(StatsError::InsufficientData {
            needed: 1,
            got: 0,
        });
    }

    valid.sort_by(f64::total_cmp);

    let mid = valid.len() / 2;
    let median_value = if valid.len() % 2 == 0 {
        (valid[mid - 1] + valid[mid]) / 2.0
    } else {
        valid[mid]
    };

    Ok(median_value)
}

/// Median absolute deviation of `values` about their median.
///
/// Returns `(median, mad)`.
pub fn median_absolute_deviation(values: &[f64]) -> Result<(f64, f64), StatsError> {
    let center = median(values)?;
    let deviations: Vec<f64> = values
        .iter()
        .filter(|v| !v.is_nan())
        .map(|v| (v - center).abs())
        .collect();
    let mad = median(&deviations)?;
    Ok((center, mad))
}

/// Relative floor on the rejection limit, as a fraction of `|median|`
pub const MAD_LIMIT_RELATIVE_FLOOR: f64 = 1.490_116_119_384_765_6e-8; // sqrt(f64::EPSILON)

/// Keep the values within `k` MADs of the median.
///
/// A value is kept when `|x − median| <= max(k · MAD, ε · |median|)` with
/// ε = [`MAD_LIMIT_RELATIVE_FLOOR`]. The floor keeps values that differ from
/// the median only by rounding when the MAD collapses to zero on noiseless
/// or quantised data.
pub fn mad_filter(values: &[f64], k: f64) -> Result<Vec<f64>, StatsError> {
    let (center, mad) = median_absolute_deviation(values)?;
    let limit = (k * mad).max(MAD_LIMIT_RELATIVE_FLOOR * center.abs());

    let kept: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan() && (v - center).abs() <= limit)
        .collect();

    if kept.len() < values.len() {
        log::debug!(
            "MAD filter rejected {} of {} values (median {center:.4}, MAD {mad:.4})",
            values.len() - kept.len(),
            values.len()
        );
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
        assert_eq!(median(&[7.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_median_ignores_nan() {
        assert_eq!(median(&[f64::NAN, 5.0, 1.0, 3.0]).unwrap(), 3.0);
        assert!(matches!(
            median(&[f64::NAN, f64::NAN]),
            Err(StatsError::InsufficientData { .. })
        ));
        assert!(median(&[]).is_err());
    }

    #[test]
    fn test_mad_known_value() {
        // median = 2, deviations = [1, 1, 0, 0, 2, 4, 7] -> MAD = 1
        let values = [1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0];
        let (center, mad) = median_absolute_deviation(&values).unwrap();
        assert_relative_eq!(center, 2.0);
        assert_relative_eq!(mad, 1.0);
    }

    #[test]
    fn test_mad_filter_rejects_outlier() {
        let values = [10.0, 10.2, 9.9, 10.1, 9.8, 100.0];
        let kept = mad_filter(&values, 3.0).unwrap();
        assert_eq!(kept.len(), 5);
        assert!(!kept.contains(&100.0));
    }

    #[test]
    fn test_mad_filter_keeps_rounding_level_spread() {
        // More than half identical, the rest one or two ulps away
        let base = 150.0_f64;
        let values = [
            base,
            base,
            base,
            base,
            base,
            f64::from_bits(base.to_bits() + 1),
            f64::from_bits(base.to_bits() - 2),
            base * (1.0 + 1e-14),
        ];
        let (_, mad) = median_absolute_deviation(&values).unwrap();
        assert_eq!(mad, 0.0);

        let kept = mad_filter(&values, 3.0).unwrap();
        assert_eq!(kept.len(), values.len());
    }

    #[test]
    fn test_mad_filter_floor_still_rejects_real_outliers() {
        let values = [150.0, 150.0, 150.0, 150.0, 150.0001];
        let kept = mad_filter(&values, 3.0).unwrap();
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn test_mad_filter_zero_spread() {
        let values = [5.0, 5.0, 5.0, 5.0, 42.0];
        let kept = mad_filter(&values, 3.0).unwrap();
        assert_eq!(kept, vec![5.0, 5.0, 5.0, 5.0]);
    }
}
