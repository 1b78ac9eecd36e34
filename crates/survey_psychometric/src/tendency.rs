//! Per-answer tendency entry point used by the answer-generation orchestrator.
//!
//! Questions tagged with the reliability dimension are answered by the
//! latent-trait sampler when a plan is available. Everything else falls back
//! to a simple consistency heuristic: each respondent settles on a preferred
//! option the first time it is asked, and later answers wander at most one
//! option away from it.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use survey_core::types::ItemKey;

use crate::error::{PsychometricError, SamplingError};
use crate::plan::PsychometricPlan;
use crate::sampler::{sample_answer, RespondentSession};

/// Maximum distance of a fallback answer from the respondent's base option.
const FLUCTUATION: usize = 1;

/// Grouping tag a question carries in the orchestrator.
///
/// An in-memory tag only; configuration files carry `psycho_enabled` instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Marker routing the question to the calibrated sampler
    Reliability,
    /// Any other user-defined dimension
    Named(String),
}

impl Dimension {
    /// Whether this is the reliability marker.
    #[inline]
    pub fn is_reliability(&self) -> bool {
        matches!(self, Dimension::Reliability)
    }
}

/// Inputs of one [`get_tendency_index`] call.
///
/// # Examples
/// ```
/// use survey_psychometric::{Dimension, TendencyRequest};
///
/// let weights = [1.0, 1.0, 4.0, 1.0, 1.0];
/// let request = TendencyRequest::new(5)
///     .with_weights(&weights)
///     .with_dimension(Dimension::Named("service".into()))
///     .reversed(true);
/// assert_eq!(request.option_count(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct TendencyRequest<'a> {
    option_count: usize,
    weights: Option<&'a [f64]>,
    dimension: Option<Dimension>,
    is_reverse: bool,
    calibration: Option<(&'a PsychometricPlan, ItemKey)>,
}

impl<'a> TendencyRequest<'a> {
    /// Request for a question with `option_count` options.
    pub fn new(option_count: usize) -> Self {
        Self {
            option_count,
            weights: None,
            dimension: None,
            is_reverse: false,
            calibration: None,
        }
    }

    /// Option weights used to pick the respondent's base option.
    pub fn with_weights(mut self, weights: &'a [f64]) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Dimension tag of the question.
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Marks the question as reverse-scored.
    pub fn reversed(mut self, is_reverse: bool) -> Self {
        self.is_reverse = is_reverse;
        self
    }

    /// Supplies the plan and the item identity for calibrated answering.
    pub fn with_plan(
        mut self,
        plan: &'a PsychometricPlan,
        question_index: usize,
        row_index: Option<usize>,
    ) -> Self {
        self.calibration = Some((plan, ItemKey::new(question_index, row_index)));
        self
    }

    /// Number of options of the question.
    #[inline]
    pub fn option_count(&self) -> usize {
        self.option_count
    }
}

/// Picks the option index for one answer.
///
/// With the reliability dimension and a plan, the answer comes from
/// [`sample_answer`] using the session's trait. Otherwise the non-calibrated
/// tendency is used; reverse-scored questions are flipped in both paths.
///
/// # Errors
/// - [`SamplingError::NoOptions`] when `option_count` is zero
/// - [`SamplingError::ItemNotFound`] when the plan lacks the requested item
///
/// # Examples
/// ```
/// use survey_core::math::rng::SurveyRng;
/// use survey_psychometric::{get_tendency_index, RespondentSession, TendencyRequest};
///
/// let mut rng = SurveyRng::from_seed(8);
/// let mut session = RespondentSession::new(&mut rng);
///
/// let first = get_tendency_index(&TendencyRequest::new(5), &mut session, &mut rng).unwrap();
/// let second = get_tendency_index(&TendencyRequest::new(5), &mut session, &mut rng).unwrap();
/// assert!(first.abs_diff(second) <= 2);
/// ```
pub fn get_tendency_index<R: Rng + ?Sized>(
    request: &TendencyRequest<'_>,
    session: &mut RespondentSession,
    rng: &mut R,
) -> Result<usize, PsychometricError> {
    let calibrated = request
        .dimension
        .as_ref()
        .is_some_and(Dimension::is_reliability);

    if let (true, Some((plan, key))) = (calibrated, request.calibration) {
        if let Some(item) = plan.item(key) {
            if item.option_count() != request.option_count {
                tracing::warn!(
                    item = %key,
                    planned = item.option_count(),
                    shown = request.option_count,
                    "Option count differs from the psychometric plan"
                );
            }
        }
        let answer = sample_answer(
            plan,
            key.question_index,
            key.row_index,
            session.theta(),
            request.is_reverse,
            rng,
        )?;
        return Ok(answer);
    }

    let forward = fallback_index(request, session, rng)?;
    Ok(if request.is_reverse {
        request.option_count - 1 - forward
    } else {
        forward
    })
}

fn fallback_index<R: Rng + ?Sized>(
    request: &TendencyRequest<'_>,
    session: &mut RespondentSession,
    rng: &mut R,
) -> Result<usize, SamplingError> {
    let option_count = request.option_count;
    if option_count == 0 {
        return Err(SamplingError::NoOptions);
    }

    let base = match session.tendency_base() {
        Some(base) => base,
        None => {
            let base = choose_base(option_count, request.weights, rng);
            session.set_tendency_base(base);
            base
        }
    };

    // Option counts vary between questions; clamp the base into range.
    let base = base.min(option_count - 1);
    let low = base.saturating_sub(FLUCTUATION);
    let high = (base + FLUCTUATION).min(option_count - 1);

    // One ticket per candidate plus an extra one for the base.
    let candidates = high - low + 1;
    let ticket = rng.gen_range(0..=candidates);
    let index = low + ticket;
    Ok(if index > base { index - 1 } else { index })
}

fn choose_base<R: Rng + ?Sized>(option_count: usize, weights: Option<&[f64]>, rng: &mut R) -> usize {
    if let Some(weights) = weights {
        match WeightedIndex::new(weights) {
            Ok(distribution) => return distribution.sample(rng),
            Err(err) => {
                tracing::warn!(error = %err, "Unusable option weights, choosing uniformly");
            }
        }
    }
    rng.gen_range(0..option_count)
}
