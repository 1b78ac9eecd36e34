//! Error types for plan construction and answer sampling.
//!
//! - `ConfigurationError`: the item set or target Alpha cannot produce a plan
//! - `SamplingError`: an answer was requested that the plan cannot serve
//! - `PsychometricError`: either of the above, for entry points that can hit both
//!
//! Both kinds come from invalid caller data. Nothing here is transient, so
//! there is no retry path.

use survey_core::types::{DistributionError, ItemKey, ItemType};
use thiserror::Error;

/// Plan construction errors.
///
/// # Examples
/// ```
/// use survey_psychometric::ConfigurationError;
///
/// let err = ConfigurationError::TooFewItems { count: 1 };
/// assert_eq!(
///     format!("{}", err),
///     "At least 2 reliability items are required, got 1"
/// );
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    /// Fewer than two items; reliability is undefined.
    #[error("At least 2 reliability items are required, got {count}")]
    TooFewItems {
        /// Number of items supplied
        count: usize,
    },

    /// Target Alpha outside the open interval (0, 1).
    #[error("Invalid target alpha: {alpha} (must lie in (0, 1))")]
    InvalidTargetAlpha {
        /// The rejected target
        alpha: f64,
    },

    /// An item with fewer than two answer options.
    #[error("Invalid option count for {key}: {option_count} (at least 2 required)")]
    InvalidOptionCount {
        /// Offending item
        key: ItemKey,
        /// The rejected option count
        option_count: usize,
    },

    /// The same item identity appears twice.
    #[error("Duplicate reliability item: {key}")]
    DuplicateItem {
        /// Repeated item
        key: ItemKey,
    },

    /// Row index present on a non-matrix item or missing on a matrix item.
    #[error("Row index does not match item type '{item_type}' for {key}")]
    RowIndexMismatch {
        /// Offending item
        key: ItemKey,
        /// Declared item type
        item_type: ItemType,
    },

    /// The Spearman–Brown inversion has no valid correlation.
    #[error(
        "Degenerate inter-item correlation for alpha = {alpha}, k = {items} (denominator {denominator})"
    )]
    DegenerateCorrelation {
        /// Target Alpha
        alpha: f64,
        /// Number of items
        items: usize,
        /// Value of `k - alpha * (k - 1)`
        denominator: f64,
    },

    /// A threshold could not be computed.
    #[error("Threshold computation failed: {0}")]
    Distribution(#[from] DistributionError),
}

/// Answer sampling errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SamplingError {
    /// The plan has no item with this identity.
    #[error("Item not found in psychometric plan: {key}")]
    ItemNotFound {
        /// Requested item
        key: ItemKey,
    },

    /// A question with no options cannot be answered.
    #[error("Question has no answer options")]
    NoOptions,
}

/// Any error raised by the calibration engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PsychometricError {
    /// Plan construction failed
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Sampling failed
    #[error(transparent)]
    Sampling(#[from] SamplingError),
}
