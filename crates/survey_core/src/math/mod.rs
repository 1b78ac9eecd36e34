//! Stateless numeric primitives.
//!
//! - [`distributions`]: normal quantile, CDF and PDF
//! - [`rng`]: Box–Muller transform and the seeded [`rng::SurveyRng`] stream

pub mod distributions;
pub mod rng;

pub use distributions::{norm_cdf, norm_pdf, normal_quantile};
pub use rng::{draw_standard_normal, standard_normal_sample, SurveyRng};
