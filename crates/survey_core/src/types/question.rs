//! Questionnaire enumerations.
//!
//! Item kinds and response biases arrive from the configuration layer as
//! short lowercase words. They are parsed once into closed enums so that an
//! unknown value is rejected at construction rather than at use.
//!
//! # Examples
//!
//! ```
//! use survey_core::types::{Bias, ItemKey, ItemType};
//!
//! let kind: ItemType = "matrix".parse().unwrap();
//! assert!(kind.is_matrix());
//!
//! assert_eq!(Bias::Left.shift(), -1.0);
//! assert!("sideways".parse::<Bias>().is_err());
//!
//! let key = ItemKey::matrix_row(3, 0);
//! assert_eq!(key.to_string(), "question 3, row 0");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a textual enumeration value is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown {kind}: '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    /// Name of the enumeration being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
    /// Comma-separated list of accepted values
    pub expected: &'static str,
}

/// Kind of question an item belongs to.
///
/// Only ordered single-answer kinds take part in reliability calibration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// Single choice with ordered options
    Single,
    /// Likert-style scale
    Scale,
    /// Rating score
    Score,
    /// Drop-down selection
    Dropdown,
    /// One row of a matrix question
    Matrix,
}

impl ItemType {
    /// Lowercase configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Single => "single",
            ItemType::Scale => "scale",
            ItemType::Score => "score",
            ItemType::Dropdown => "dropdown",
            ItemType::Matrix => "matrix",
        }
    }

    /// Whether items of this kind are addressed by a row index.
    #[inline]
    pub fn is_matrix(&self) -> bool {
        matches!(self, ItemType::Matrix)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(ItemType::Single),
            "scale" => Ok(ItemType::Scale),
            "score" => Ok(ItemType::Score),
            "dropdown" => Ok(ItemType::Dropdown),
            "matrix" => Ok(ItemType::Matrix),
            _ => Err(ParseEnumError {
                kind: "item type",
                value: s.to_string(),
                expected: "single, scale, score, dropdown, matrix",
            }),
        }
    }
}

/// Response-style shift applied to the composite score of an item.
///
/// `Left` pushes answers towards the first options, `Right` towards the
/// last ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    /// Low-score tendency
    Left,
    /// No tendency
    #[default]
    Center,
    /// High-score tendency
    Right,
}

impl Bias {
    /// Shift in standard-deviation units of the latent trait.
    #[inline]
    pub fn shift(&self) -> f64 {
        match self {
            Bias::Left => -1.0,
            Bias::Center => 0.0,
            Bias::Right => 1.0,
        }
    }

    /// Lowercase configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bias::Left => "left",
            Bias::Center => "center",
            Bias::Right => "right",
        }
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bias {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Bias::Left),
            "center" | "centre" => Ok(Bias::Center),
            "right" => Ok(Bias::Right),
            _ => Err(ParseEnumError {
                kind: "bias",
                value: s.to_string(),
                expected: "left, center, right",
            }),
        }
    }
}

/// Composite identity of a calibrated item.
///
/// Plain questions use `row_index = None`; each row of a matrix question is
/// a separate item sharing the question index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    /// Index of the owning question (0-based)
    pub question_index: usize,
    /// Row within a matrix question
    pub row_index: Option<usize>,
}

impl ItemKey {
    /// Creates a key from its two parts.
    #[inline]
    pub fn new(question_index: usize, row_index: Option<usize>) -> Self {
        Self {
            question_index,
            row_index,
        }
    }

    /// Key of a plain (non-matrix) question.
    #[inline]
    pub fn question(question_index: usize) -> Self {
        Self::new(question_index, None)
    }

    /// Key of one row of a matrix question.
    #[inline]
    pub fn matrix_row(question_index: usize, row_index: usize) -> Self {
        Self::new(question_index, Some(row_index))
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row_index {
            Some(row) => write!(f, "question {}, row {}", self.question_index, row),
            None => write!(f, "question {}", self.question_index),
        }
    }
}
