//! Psychometric plan construction.
//!
//! Under a one-factor model every item score is `X_i = theta + e_i` with
//! `theta ~ N(0, 1)` and `e_i ~ N(0, sigma_e^2)`. All item pairs then share the
//! correlation `rho = 1 / (1 + sigma_e^2)`, and by Spearman–Brown a composite
//! of `k` such items has reliability `k·rho / (1 + (k - 1)·rho)`. The plan
//! inverts that relation for the target Alpha and precomputes the cut points
//! that discretise each item's composite score.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use survey_core::math::distributions::{norm_cdf, normal_quantile};
use survey_core::types::ItemKey;

use crate::error::ConfigurationError;
use crate::item::PsychometricItem;

/// Common inter-item correlation reproducing `alpha` with `items` items.
///
/// `rho = alpha / (k - alpha·(k - 1))`.
///
/// # Errors
/// [`ConfigurationError::DegenerateCorrelation`] when the denominator is not
/// positive or the result falls outside (0, 1).
///
/// # Examples
/// ```
/// use survey_psychometric::compute_rho;
///
/// let rho = compute_rho(0.85, 2).unwrap();
/// assert!((rho - 0.739_130).abs() < 1e-6);
/// ```
pub fn compute_rho(alpha: f64, items: usize) -> Result<f64, ConfigurationError> {
    let k = items as f64;
    let denominator = k - alpha * (k - 1.0);
    let degenerate = || ConfigurationError::DegenerateCorrelation {
        alpha,
        items,
        denominator,
    };

    if !(denominator > 0.0) {
        return Err(degenerate());
    }
    let rho = alpha / denominator;
    if !(rho > 0.0 && rho < 1.0) {
        return Err(degenerate());
    }
    Ok(rho)
}

/// Error standard deviation for a unit-variance trait and unit loading.
///
/// `sigma_e = sqrt(1/rho - 1)`; larger values mean noisier items.
#[inline]
pub fn compute_sigma_e(rho: f64) -> f64 {
    (1.0 / rho - 1.0).sqrt()
}

/// Equal-probability cut points of the standard normal for `option_count`
/// categories: `normal_quantile(j / option_count)` for `j = 1..option_count`.
pub fn category_thresholds(option_count: usize) -> Result<Vec<f64>, ConfigurationError> {
    let m = option_count as f64;
    (1..option_count)
        .map(|j| normal_quantile(j as f64 / m).map_err(ConfigurationError::from))
        .collect()
}

/// A plan item with its discretisation thresholds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedItem {
    #[serde(flatten)]
    item: PsychometricItem,
    thresholds: Vec<f64>,
}

impl PlannedItem {
    /// Item identity.
    #[inline]
    pub fn key(&self) -> ItemKey {
        self.item.key
    }

    /// Underlying item definition.
    #[inline]
    pub fn item(&self) -> &PsychometricItem {
        &self.item
    }

    /// Number of answer categories.
    #[inline]
    pub fn option_count(&self) -> usize {
        self.item.option_count
    }

    /// Bias shift added to the composite score.
    #[inline]
    pub fn bias_shift(&self) -> f64 {
        self.item.bias.shift()
    }

    /// Ascending cut points, `option_count - 1` of them.
    #[inline]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Category of a composite score: the number of thresholds strictly
    /// below `z`, clamped to the option range.
    #[inline]
    pub fn categorise(&self, z: f64) -> usize {
        let above = self.thresholds.partition_point(|&t| t < z);
        above.min(self.option_count() - 1)
    }

    /// Answer index for a respondent trait and an already-drawn error term.
    ///
    /// The reverse flip happens after categorisation, so a reverse-scored
    /// item uses exactly the same thresholds and bias as its forward form.
    #[inline]
    pub fn answer_for(&self, theta: f64, error: f64, is_reverse: bool) -> usize {
        let category = self.categorise(theta + self.bias_shift() + error);
        if is_reverse {
            self.option_count() - 1 - category
        } else {
            category
        }
    }

    /// Model-implied probability of each (forward) category.
    ///
    /// The composite score is `N(bias_shift, 1 + sigma_e^2)`.
    pub fn expected_proportions(&self, sigma_e: f64) -> Vec<f64> {
        let scale = (1.0 + sigma_e * sigma_e).sqrt();
        let shift = self.bias_shift();
        let cdf = |t: f64| norm_cdf((t - shift) / scale);

        let mut lower = 0.0;
        let mut proportions = Vec::with_capacity(self.option_count());
        for &t in &self.thresholds {
            let upper = cdf(t);
            proportions.push(upper - lower);
            lower = upper;
        }
        proportions.push(1.0 - lower);
        proportions
    }
}

/// Immutable calibration plan for one questionnaire configuration.
///
/// Holds no respondent state; share it freely across threads.
#[derive(Debug, Clone, Serialize)]
pub struct PsychometricPlan {
    items: Vec<PlannedItem>,
    #[serde(skip)]
    index: HashMap<ItemKey, usize>,
    rho: f64,
    sigma_e: f64,
    target_alpha: f64,
}

impl PsychometricPlan {
    /// Items in configuration order.
    #[inline]
    pub fn items(&self) -> &[PlannedItem] {
        &self.items
    }

    /// Looks up an item by identity.
    #[inline]
    pub fn item(&self, key: ItemKey) -> Option<&PlannedItem> {
        self.index.get(&key).map(|&position| &self.items[position])
    }

    /// Number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a built plan; present for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Shared inter-item correlation.
    #[inline]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Error standard deviation.
    #[inline]
    pub fn sigma_e(&self) -> f64 {
        self.sigma_e
    }

    /// Alpha the plan was built for.
    #[inline]
    pub fn target_alpha(&self) -> f64 {
        self.target_alpha
    }

    /// Spearman–Brown reliability of the latent scores, `k·rho / (1 + (k-1)·rho)`.
    ///
    /// Equals the target up to rounding. Observed Alpha of the discretised
    /// answers runs somewhat lower because binning attenuates correlation.
    pub fn implied_alpha(&self) -> f64 {
        let k = self.items.len() as f64;
        k * self.rho / (1.0 + (k - 1.0) * self.rho)
    }
}

/// Builds the calibration plan for a set of reliability items.
///
/// Deterministic; consumes no randomness.
///
/// # Errors
/// - [`ConfigurationError::TooFewItems`] for fewer than two items
/// - [`ConfigurationError::InvalidTargetAlpha`] when `target_alpha` is not in (0, 1)
/// - [`ConfigurationError::RowIndexMismatch`] when a row index disagrees with the item type
/// - [`ConfigurationError::InvalidOptionCount`] for an item with fewer than two options
/// - [`ConfigurationError::DuplicateItem`] when an item identity repeats
/// - [`ConfigurationError::DegenerateCorrelation`] when no valid `rho` exists
///
/// # Examples
/// ```
/// use survey_core::types::{Bias, ItemType};
/// use survey_psychometric::{build_psychometric_plan, PsychometricItem};
///
/// let items = vec![
///     PsychometricItem::new(0, ItemType::Scale, 5, Bias::Center),
///     PsychometricItem::new(1, ItemType::Scale, 5, Bias::Center),
/// ];
/// let plan = build_psychometric_plan(items, 0.85).unwrap();
///
/// assert!((plan.rho() - 0.7391).abs() < 1e-4);
/// assert!((plan.sigma_e() - 0.5941).abs() < 1e-4);
/// assert_eq!(plan.items()[0].thresholds().len(), 4);
/// ```
pub fn build_psychometric_plan(
    items: Vec<PsychometricItem>,
    target_alpha: f64,
) -> Result<PsychometricPlan, ConfigurationError> {
    let k = items.len();
    if k < 2 {
        return Err(ConfigurationError::TooFewItems { count: k });
    }
    if !(target_alpha > 0.0 && target_alpha < 1.0) {
        return Err(ConfigurationError::InvalidTargetAlpha {
            alpha: target_alpha,
        });
    }

    let mut index = HashMap::with_capacity(k);
    for (position, item) in items.iter().enumerate() {
        if !item.has_consistent_key() {
            return Err(ConfigurationError::RowIndexMismatch {
                key: item.key,
                item_type: item.item_type,
            });
        }
        if item.option_count < 2 {
            return Err(ConfigurationError::InvalidOptionCount {
                key: item.key,
                option_count: item.option_count,
            });
        }
        if index.insert(item.key, position).is_some() {
            return Err(ConfigurationError::DuplicateItem { key: item.key });
        }
    }

    let rho = compute_rho(target_alpha, k)?;
    let sigma_e = compute_sigma_e(rho);
    if !(sigma_e.is_finite() && sigma_e > 0.0) {
        return Err(ConfigurationError::DegenerateCorrelation {
            alpha: target_alpha,
            items: k,
            denominator: k as f64 - target_alpha * (k as f64 - 1.0),
        });
    }

    // Thresholds depend only on the option count.
    let mut by_option_count: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    let mut planned = Vec::with_capacity(k);
    for item in items {
        let thresholds = match by_option_count.get(&item.option_count) {
            Some(cached) => cached.clone(),
            None => {
                let computed = category_thresholds(item.option_count)?;
                by_option_count.insert(item.option_count, computed.clone());
                computed
            }
        };
        planned.push(PlannedItem { item, thresholds });
    }

    tracing::debug!(
        target_alpha,
        items = k,
        rho,
        sigma_e,
        "Psychometric plan built"
    );

    Ok(PsychometricPlan {
        items: planned,
        index,
        rho,
        sigma_e,
        target_alpha,
    })
}
