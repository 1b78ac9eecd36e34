//! Error types for the numeric primitives.
//!
//! This module provides:
//! - `DistributionError`: invalid arguments to quantile and variate functions

use thiserror::Error;

/// Errors raised by the distribution functions in [`crate::math`].
///
/// # Variants
/// - `InvalidProbability`: quantile requested outside the open interval (0, 1)
/// - `InvalidUniform`: Box–Muller input outside its admissible range
///
/// # Examples
/// ```
/// use survey_core::types::DistributionError;
///
/// let err = DistributionError::InvalidProbability { p: 1.0 };
/// assert_eq!(format!("{}", err), "Invalid probability: p = 1 (must lie in (0, 1))");
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DistributionError {
    /// Probability outside (0, 1) or NaN.
    #[error("Invalid probability: p = {p} (must lie in (0, 1))")]
    InvalidProbability {
        /// The rejected probability
        p: f64,
    },

    /// Uniform draw outside the range required by the transform.
    #[error("Invalid uniform draw: {which} = {value}")]
    InvalidUniform {
        /// Which input was rejected (`u1` or `u2`)
        which: &'static str,
        /// The rejected value
        value: f64,
    },
}
