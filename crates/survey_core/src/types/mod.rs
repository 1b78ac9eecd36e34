//! Shared questionnaire types and errors.
//!
//! - `question`: closed enumerations for item kind, response bias and item identity
//! - `error`: errors raised by the numeric primitives

pub mod error;
pub mod question;

pub use error::DistributionError;
pub use question::{Bias, ItemKey, ItemType, ParseEnumError};
