//! # survey_psychometric (L2: Calibration Engine)
//!
//! Generates synthetic questionnaire answers whose item set scores to a
//! target Cronbach's Alpha.
//!
//! This crate provides:
//! - Reliability items and their collection from question settings (`item`)
//! - The immutable calibration plan and its builder (`plan`)
//! - The latent-trait answer sampler and respondent sessions (`sampler`)
//! - The orchestrator's per-answer entry point with its non-calibrated fallback (`tendency`)
//! - Cronbach's Alpha and answer tallies for generated data (`reliability`)
//! - Reproducible parallel generation for many respondents (`batch`)
//!
//! ## Data Flow
//!
//! ```text
//! QuestionConfig ──collect──▶ PsychometricItem ──build──▶ PsychometricPlan
//!                                                              │
//!            RespondentSession (theta) ──────────────▶ sample_answer ──▶ option index
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use survey_core::math::rng::SurveyRng;
//! use survey_core::types::{Bias, ItemKey, ItemType};
//! use survey_psychometric::{build_psychometric_plan, PsychometricItem, RespondentSession};
//!
//! let items = vec![
//!     PsychometricItem::new(0, ItemType::Scale, 5, Bias::Center),
//!     PsychometricItem::new(1, ItemType::Scale, 5, Bias::Right),
//!     PsychometricItem::matrix_row(2, 0, 4, Bias::Center),
//! ];
//! let plan = build_psychometric_plan(items, 0.85).unwrap();
//!
//! let mut rng = SurveyRng::from_seed(42);
//! let respondent = RespondentSession::new(&mut rng);
//! let answer = respondent
//!     .sample(&plan, ItemKey::matrix_row(2, 0), false, &mut rng)
//!     .unwrap();
//! assert!(answer < 4);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod batch;
mod error;
pub mod item;
pub mod plan;
pub mod reliability;
pub mod sampler;
pub mod tendency;

pub use error::{ConfigurationError, PsychometricError, SamplingError};
pub use item::{collect_psychometric_items, reverse_item_keys, PsychometricItem, QuestionConfig};
pub use plan::{
    build_psychometric_plan, category_thresholds, compute_rho, compute_sigma_e, PlannedItem,
    PsychometricPlan,
};
pub use sampler::{sample_answer, RespondentSession};
pub use tendency::{get_tendency_index, Dimension, TendencyRequest};
