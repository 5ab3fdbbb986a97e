//! Correlation coefficients between paired samples.
//!
//! Three coefficients are provided:
//!
//! - **Pearson** - linear correlation of the raw values
//! - **Spearman** - Pearson correlation of the ranks, ties receive the
//!   average of the ranks they span
//! - **Kendall** - tau-a over concordant and discordant pairs, pairs tied in
//!   either variable are left out of both counts
//!
//! Significance is reported through the statistic
//! `t = r·sqrt((n − 2) / (1 − r²))`, with two approximations of the
//! two-tailed p-value. Neither is an exact Student-t tail.

use std::f64::consts::SQRT_2;
use std::fmt;

use scilib::math::basic::erf;
use thiserror::Error;

/// Errors from sample statistics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Length mismatch: x has {x} values, y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("Insufficient data: need at least {needed} values, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Zero variance: correlation is undefined for a constant sample")]
    ZeroVariance,

    #[error("No comparable pairs: every pair is tied")]
    NoComparablePairs,
}

/// Which correlation coefficient to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
    Kendall,
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationMethod::Pearson => write!(f, "Pearson"),
            CorrelationMethod::Spearman => write!(f, "Spearman"),
            CorrelationMethod::Kendall => write!(f, "Kendall"),
        }
    }
}

/// A correlation coefficient with its approximate significance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationResult {
    pub method: CorrelationMethod,
    /// Coefficient in [-1, 1]
    pub coefficient: f64,
    /// Approximate two-tailed p-value from [`p_value_logistic`]
    pub p_value: f64,
    pub n: usize,
}

fn check_pairs(x: &[f64], y: &[f64]) -> Result<(), StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(StatsError::InsufficientData {
            needed: 2,
            got: x.len(),
        });
    }
    Ok(())
}

/// Pearson product-moment correlation of `x` and `y`.
///
/// # Errors
/// * `StatsError::LengthMismatch` - slices differ in length
/// * `StatsError::InsufficientData` - fewer than 2 pairs
/// * `StatsError::ZeroVariance` - either sample is constant
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    check_pairs(x, y)?;

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if !(sxx > 0.0) || !(syy > 0.0) {
        return Err(StatsError::ZeroVariance);
    }

    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// 1-based ranks of `values`, tied values share the average of their ranks.
///
/// `ranks(&[10.0, 20.0, 20.0, 5.0])` is `[2.0, 3.5, 3.5, 1.0]`.
pub fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut result = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold equal values, ranks start+1..=end
        let average = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            result[index] = average;
        }
        start = end;
    }

    result
}

/// Spearman rank correlation: Pearson correlation of the average ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    check_pairs(x, y)?;
    pearson(&ranks(x), &ranks(y))
}

/// Kendall tau-a over the pairs that are not tied in either variable.
///
/// # Errors
/// Returns `StatsError::NoComparablePairs` when every pair is tied.
pub fn kendall(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    check_pairs(x, y)?;

    let mut concordant = 0usize;
    let mut discordant = 0usize;
    for i in 0..x.len() {
        for j in (i + 1)..x.len() {
            let product = (x[i] - x[j]) * (y[i] - y[j]);
            if product > 0.0 {
                concordant += 1;
            } else if product < 0.0 {
                discordant += 1;
            }
        }
    }

    let comparable = concordant + discordant;
    if comparable == 0 {
        return Err(StatsError::NoComparablePairs);
    }

    Ok((concordant as f64 - discordant as f64) / comparable as f64)
}

/// Test statistic t = r·sqrt((n − 2) / (1 − r²)) for a coefficient `r` over
/// `n` pairs. Perfect correlation gives an infinite statistic.
fn t_statistic(r: f64, n: usize) -> f64 {
    let df = n as f64 - 2.0;
    let denominator = 1.0 - r * r;
    if denominator <= 0.0 {
        return f64::INFINITY;
    }
    r * (df / denominator).sqrt()
}

/// Closed-form approximation of the two-tailed p-value of coefficient `r`.
///
/// Evaluates `exp(−0.717·|t| − 0.416·t²)`. It equals 1 at `t = 0` and
/// falls to 0 as `|t|` grows. It is an approximation of the Student-t tail,
/// good enough to flag insignificant correlations on small samples.
///
/// Fewer than 3 pairs carry no degrees of freedom and give 1.
pub fn p_value_logistic(r: f64, n: usize) -> f64 {
    if n < 3 || !r.is_finite() {
        return 1.0;
    }
    let t = t_statistic(r, n).abs();
    if t.is_infinite() {
        return 0.0;
    }
    (-0.717 * t - 0.416 * t * t).exp()
}

/// Large-sample two-tailed p-value `2·(1 − Φ(|t|))` of coefficient `r`.
pub fn p_value_normal(r: f64, n: usize) -> f64 {
    if n < 3 || !r.is_finite() {
        return 1.0;
    }
    let t = t_statistic(r, n).abs();
    if t.is_infinite() {
        return 0.0;
    }
    let upper_tail = 0.5 * (1.0 - erf(t / SQRT_2));
    (2.0 * upper_tail).clamp(0.0, 1.0)
}

/// Compute the coefficient selected by `method` with its logistic p-value.
pub fn correlate(
    x: &[f64],
    y: &[f64],
    method: CorrelationMethod,
) -> Result<CorrelationResult, StatsError> {
    let coefficient = match method {
        CorrelationMethod::Pearson => pearson(x, y)?,
        CorrelationMethod::Spearman => spearman(x, y)?,
        CorrelationMethod::Kendall => kendall(x, y)?,
    };

    let n = x.len();
    let p_value = p_value_logistic(coefficient, n);
    log::debug!("{method} correlation over {n} pairs: r = {coefficient:.4}, p ~ {p_value:.4}");

    Ok(CorrelationResult {
        method,
        coefficient,
        p_value,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pearson_identities() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let neg: Vec<f64> = x.iter().map(|v| -v).collect();

        assert_relative_eq!(pearson(&x, &x).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&x, &neg).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_known_value() {
        // Hand-computed: Sxy = 6, Sxx = 10, Syy = 6
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let expected = 6.0 / (10.0_f64 * 6.0).sqrt();
        assert_relative_eq!(pearson(&x, &y).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_errors() {
        assert_eq!(
            pearson(&[1.0, 2.0], &[1.0]),
            Err(StatsError::LengthMismatch { x: 2, y: 1 })
        );
        assert_eq!(
            pearson(&[1.0], &[1.0]),
            Err(StatsError::InsufficientData { needed: 2, got: 1 })
        );
        assert_eq!(
            pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
            Err(StatsError::ZeroVariance)
        );
    }

    #[test]
    fn test_ranks_average_ties() {
        assert_eq!(ranks(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
        assert_eq!(ranks(&[3.0, 1.0, 2.0]), vec![3.0, 1.0, 2.0]);
        assert_eq!(ranks(&[7.0, 7.0, 7.0]), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_spearman_monotonic_nonlinear() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y: Vec<f64> = x.iter().map(|v: &f64| v.powi(3)).collect();

        assert_relative_eq!(spearman(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
        assert!(pearson(&x, &y).unwrap() < 1.0);
    }

    #[test]
    fn test_kendall_monotonic() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let up = [2.0, 4.0, 8.0, 16.0, 32.0];
        let down = [5.0, 4.0, 3.0, 2.0, 1.0];

        assert_relative_eq!(kendall(&x, &up).unwrap(), 1.0);
        assert_relative_eq!(kendall(&x, &down).unwrap(), -1.0);
    }

    #[test]
    fn test_kendall_ties_excluded() {
        // Pairs (0,1) and (2,3) are tied in y; of the remaining four pairs
        // all are concordant.
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 1.0, 2.0, 2.0];
        assert_relative_eq!(kendall(&x, &y).unwrap(), 1.0);

        assert_eq!(
            kendall(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
            Err(StatsError::NoComparablePairs)
        );
    }

    #[test]
    fn test_p_value_bounds() {
        assert_relative_eq!(p_value_logistic(0.0, 10), 1.0);
        assert_eq!(p_value_logistic(1.0, 10), 0.0);
        assert_eq!(p_value_logistic(0.9, 2), 1.0);

        let weak = p_value_logistic(0.1, 10);
        let strong = p_value_logistic(0.9, 10);
        assert!(weak > strong);
        assert!(strong < 0.05);
        assert!(weak > 0.5);
    }

    #[test]
    fn test_p_value_normal() {
        assert_relative_eq!(p_value_normal(0.0, 20), 1.0, epsilon = 1e-6);
        assert_eq!(p_value_normal(-1.0, 20), 0.0);

        // r giving t = 1.96 should sit near p = 0.05
        let n = 102;
        let t: f64 = 1.96;
        let r = t / (t * t + (n as f64 - 2.0)).sqrt();
        assert_relative_eq!(p_value_normal(r, n), 0.05, epsilon = 1e-3);
    }

    #[test]
    fn test_correlate_dispatch() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 3.0, 2.0, 5.0, 4.0];

        let result = correlate(&x, &y, CorrelationMethod::Kendall).unwrap();
        assert_eq!(result.method, CorrelationMethod::Kendall);
        assert_eq!(result.n, 5);
        // 8 concordant, 2 discordant
        assert_relative_eq!(result.coefficient, 0.6, epsilon = 1e-12);
        assert!(result.p_value > 0.0 && result.p_value < 1.0);
    }
}
