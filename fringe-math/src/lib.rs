//! fringe-math - Numerical building blocks for interference fringe analysis
//!
//! This crate provides the domain-free numerics used to turn ring
//! measurements into physical quantities, including:
//!
//! - **Linear fit** - Ordinary least squares with fit-quality statistics
//! - **Student-t** - Two-sided 95% critical values for small samples
//! - **Robust** - Median, median absolute deviation and MAD outlier rejection
//! - **Correlation** - Pearson, Spearman and Kendall coefficients with p-values
//!
//! # Example
//!
//! ```rust
//! use fringe_math::{fit_linear, regression_stats};
//!
//! let points = [(1.0, 4.0), (2.0, 8.0), (3.0, 12.0)];
//! let fit = fit_linear(&points).unwrap();
//! let stats = regression_stats(&points, &fit).unwrap();
//!
//! assert!((fit.slope - 4.0).abs() < 1e-12);
//! assert!((stats.r_squared - 1.0).abs() < 1e-12);
//! ```

pub mod correlation;
pub mod linear_fit;
pub mod robust;
pub mod student_t;

// Re-export commonly used types
pub use correlation::{
    correlate, kendall, p_value_logistic, p_value_normal, pearson, ranks, spearman,
    CorrelationMethod, CorrelationResult, StatsError,
};
pub use linear_fit::{fit_linear, regression_stats, FitError, LinearFit, RegressionStats};
pub use robust::{mad_filter, median, median_absolute_deviation, MAD_LIMIT_RELATIVE_FLOOR};
pub use student_t::critical_95;
