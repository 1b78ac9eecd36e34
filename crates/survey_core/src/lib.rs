//! # survey_core: Numeric Foundation for Psychometric Answer Calibration
//!
//! ## Layer 1 (Foundation) Role
//!
//! survey_core is the bottom layer of the workspace, providing:
//! - Standard normal distribution functions (`math::distributions`)
//! - Box–Muller normal variates and seeded random streams (`math::rng`)
//! - Closed questionnaire enumerations: `ItemType`, `Bias`, `ItemKey` (`types::question`)
//! - Error types: `DistributionError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other survey_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - rand: Uniform random source behind the Box–Muller transform
//! - serde: Serialisation of the questionnaire enumerations
//! - thiserror: Error derivation
//!
//! ## Usage Examples
//!
//! ```rust
//! use survey_core::math::distributions::normal_quantile;
//! use survey_core::math::rng::SurveyRng;
//! use survey_core::types::{Bias, ItemKey};
//!
//! // Cut point of the lowest quintile
//! let z = normal_quantile(0.2).unwrap();
//! assert!((z + 0.8416).abs() < 1e-4);
//!
//! // Reproducible normal draws
//! let mut rng = SurveyRng::from_seed(7);
//! let _theta = rng.gen_normal();
//!
//! // Closed enumerations instead of free-form strings
//! let bias: Bias = "right".parse().unwrap();
//! assert_eq!(bias.shift(), 1.0);
//! assert_eq!(ItemKey::matrix_row(4, 1).row_index, Some(1));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
