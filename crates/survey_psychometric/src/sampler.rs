//! Latent-trait answer sampling.
//!
//! One latent trait `theta` per respondent, one independent error draw per
//! item. The trait lives in a caller-owned [`RespondentSession`]; nothing in
//! this module keeps state between calls.

use rand::Rng;
use survey_core::math::rng::draw_standard_normal;
use survey_core::types::ItemKey;

use crate::error::SamplingError;
use crate::plan::PsychometricPlan;

/// Samples one answer index for a respondent.
///
/// Draws `e ~ N(0, sigma_e)`, forms `z = theta + bias_shift + e`, bins `z`
/// against the item's thresholds and, for reverse-scored items, flips the
/// bin as `option_count - 1 - bin`.
///
/// # Errors
/// [`SamplingError::ItemNotFound`] when the plan has no item with this
/// `(question_index, row_index)`.
///
/// # Examples
/// ```
/// use survey_core::math::rng::SurveyRng;
/// use survey_core::types::{Bias, ItemType};
/// use survey_psychometric::{build_psychometric_plan, sample_answer, PsychometricItem};
///
/// let items = (0..4)
///     .map(|q| PsychometricItem::new(q, ItemType::Scale, 5, Bias::Center))
///     .collect();
/// let plan = build_psychometric_plan(items, 0.8).unwrap();
///
/// let mut rng = SurveyRng::from_seed(1);
/// let theta = rng.gen_normal();
/// let answer = sample_answer(&plan, 2, None, theta, false, &mut rng).unwrap();
/// assert!(answer < 5);
///
/// assert!(sample_answer(&plan, 9, None, theta, false, &mut rng).is_err());
/// ```
pub fn sample_answer<R: Rng + ?Sized>(
    plan: &PsychometricPlan,
    question_index: usize,
    row_index: Option<usize>,
    respondent_theta: f64,
    is_reverse: bool,
    rng: &mut R,
) -> Result<usize, SamplingError> {
    let key = ItemKey::new(question_index, row_index);
    let item = plan.item(key).ok_or(SamplingError::ItemNotFound { key })?;
    let error = plan.sigma_e() * draw_standard_normal(rng);
    Ok(item.answer_for(respondent_theta, error, is_reverse))
}

/// Per-respondent state threaded through answer generation.
///
/// Create one per synthetic respondent, use it for every item of that
/// respondent, then drop it.
#[derive(Debug, Clone, PartialEq)]
pub struct RespondentSession {
    theta: f64,
    tendency_base: Option<usize>,
}

impl RespondentSession {
    /// Starts a session with a freshly drawn standard-normal trait.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_theta(draw_standard_normal(rng))
    }

    /// Starts a session with a caller-supplied trait.
    pub fn with_theta(theta: f64) -> Self {
        Self {
            theta,
            tendency_base: None,
        }
    }

    /// Latent trait of this respondent.
    #[inline]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Samples the respondent's answer to one calibrated item.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        plan: &PsychometricPlan,
        key: ItemKey,
        is_reverse: bool,
        rng: &mut R,
    ) -> Result<usize, SamplingError> {
        sample_answer(plan, key.question_index, key.row_index, self.theta, is_reverse, rng)
    }

    /// Preferred option of the non-calibrated tendency, once chosen.
    #[inline]
    pub fn tendency_base(&self) -> Option<usize> {
        self.tendency_base
    }

    pub(crate) fn set_tendency_base(&mut self, base: usize) {
        self.tendency_base = Some(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::PsychometricItem;
    use crate::plan::build_psychometric_plan;
    use proptest::prelude::*;
    use survey_core::math::rng::SurveyRng;
    use survey_core::types::{Bias, ItemType};

    fn mixed_plan() -> PsychometricPlan {
        let items = vec![
            PsychometricItem::new(0, ItemType::Scale, 5, Bias::Center),
            PsychometricItem::new(1, ItemType::Single, 2, Bias::Left),
            PsychometricItem::new(2, ItemType::Score, 11, Bias::Right),
            PsychometricItem::matrix_row(3, 0, 7, Bias::Center),
            PsychometricItem::matrix_row(3, 1, 7, Bias::Right),
        ];
        build_psychometric_plan(items, 0.85).unwrap()
    }

    #[test]
    fn test_item_not_found() {
        let plan = mixed_plan();
        let mut rng = SurveyRng::from_seed(3);
        assert_eq!(
            sample_answer(&plan, 3, Some(5), 0.0, false, &mut rng),
            Err(SamplingError::ItemNotFound {
                key: ItemKey::matrix_row(3, 5)
            })
        );
        // A matrix question is not addressable without its row.
        assert!(sample_answer(&plan, 3, None, 0.0, false, &mut rng).is_err());
    }

    #[test]
    fn test_reverse_flips_with_same_draw() {
        let plan = mixed_plan();
        for item in plan.items() {
            for seed in 0..50u64 {
                let mut forward_rng = SurveyRng::from_seed(seed);
                let mut reverse_rng = SurveyRng::from_seed(seed);
                let key = item.key();
                let theta = (seed as f64 - 25.0) / 10.0;

                let forward =
                    sample_answer(&plan, key.question_index, key.row_index, theta, false, &mut forward_rng)
                        .unwrap();
                let reverse =
                    sample_answer(&plan, key.question_index, key.row_index, theta, true, &mut reverse_rng)
                        .unwrap();
                assert_eq!(reverse, item.option_count() - 1 - forward);
            }
        }
    }

    #[test]
    fn test_extreme_theta_hits_end_categories() {
        let plan = mixed_plan();
        let item = plan.item(ItemKey::question(0)).unwrap();
        assert_eq!(item.answer_for(50.0, 0.0, false), 4);
        assert_eq!(item.answer_for(-50.0, 0.0, false), 0);
        assert_eq!(item.answer_for(f64::INFINITY, 0.0, false), 4);
        assert_eq!(item.answer_for(50.0, 0.0, true), 0);
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        let plan = mixed_plan();
        let item = plan.item(ItemKey::question(0)).unwrap();
        let cut = item.thresholds()[1];
        // z equal to a cut point does not exceed it
        assert_eq!(item.categorise(cut), 1);
        assert_eq!(item.categorise(cut + 1e-12), 2);
    }

    #[test]
    fn test_bias_moves_answer_distribution() {
        let items = vec![
            PsychometricItem::new(0, ItemType::Scale, 5, Bias::Left),
            PsychometricItem::new(1, ItemType::Scale, 5, Bias::Right),
        ];
        let plan = build_psychometric_plan(items, 0.85).unwrap();
        let mut rng = SurveyRng::from_seed(11);

        let (mut left_sum, mut right_sum) = (0usize, 0usize);
        for _ in 0..2_000 {
            let session = RespondentSession::new(&mut rng);
            left_sum += session.sample(&plan, ItemKey::question(0), false, &mut rng).unwrap();
            right_sum += session.sample(&plan, ItemKey::question(1), false, &mut rng).unwrap();
        }
        assert!(left_sum * 2 < right_sum, "left = {}, right = {}", left_sum, right_sum);
    }

    #[test]
    fn test_session_keeps_theta() {
        let mut rng = SurveyRng::from_seed(5);
        let session = RespondentSession::new(&mut rng);
        let theta = session.theta();
        let plan = mixed_plan();
        for item in plan.items() {
            session.sample(&plan, item.key(), false, &mut rng).unwrap();
        }
        assert_eq!(session.theta(), theta);
        assert_eq!(session.tendency_base(), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn test_answer_within_option_range(
            theta in -10.0f64..10.0,
            seed in any::<u64>(),
            reverse in any::<bool>(),
        ) {
            let plan = mixed_plan();
            let mut rng = SurveyRng::from_seed(seed);
            for item in plan.items() {
                let key = item.key();
                let answer =
                    sample_answer(&plan, key.question_index, key.row_index, theta, reverse, &mut rng)
                        .unwrap();
                prop_assert!(answer < item.option_count());
            }
        }

        #[test]
        fn test_monotone_in_theta(
            low in -6.0f64..6.0,
            delta in 0.0f64..6.0,
            error in -3.0f64..3.0,
        ) {
            let plan = mixed_plan();
            for item in plan.items() {
                let a = item.answer_for(low, error, false);
                let b = item.answer_for(low + delta, error, false);
                prop_assert!(b >= a, "{} -> {} for {}", a, b, item.key());
            }
        }

        #[test]
        fn test_reverse_property_fixed_error(theta in -6.0f64..6.0, error in -3.0f64..3.0) {
            let plan = mixed_plan();
            for item in plan.items() {
                let forward = item.answer_for(theta, error, false);
                let reverse = item.answer_for(theta, error, true);
                prop_assert_eq!(reverse, item.option_count() - 1 - forward);
            }
        }
    }
}
