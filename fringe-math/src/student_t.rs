//! Student-t critical values for small-sample confidence intervals.

/// Standard normal 97.5% quantile
const Z_975: f64 = 1.959_963_984_540_054;

/// Two-sided 95% critical values t(0.975, df) for df = 1..=30
const T_975: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.160,
    2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064, 2.060, 2.056,
    2.052, 2.048, 2.045, 2.042,
];

/// Two-sided 95% Student-t critical value for `df` degrees of freedom.
///
/// Tabulated values are used up to 30 degrees of freedom. Beyond that the
/// Cornish-Fisher expansion of the t quantile about the normal quantile is
/// accurate to better than 1e-3 and tends to 1.96 as `df` grows.
///
/// `df == 0` has no finite critical value and returns infinity.
///
/// # Examples
/// ```rust
/// use fringe_math::critical_95;
///
/// // Ten points in a straight-line fit leave eight degrees of freedom
/// assert_eq!(critical_95(8), 2.306);
/// assert!(critical_95(1000) < 1.97);
/// ```
pub fn critical_95(df: usize) -> f64 {
    match df {
        0 => f64::INFINITY,
        1..=30 => T_975[df - 1],
        _ => {
            let z = Z_975;
            let v = df as f64;
            let z3 = z.powi(3);
            let z5 = z.powi(5);
            z + (z3 + z) / (4.0 * v) + (5.0 * z5 + 16.0 * z3 + 3.0 * z) / (96.0 * v * v)
        }
    }
}
