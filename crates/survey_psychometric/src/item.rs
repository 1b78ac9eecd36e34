//! Reliability items and their collection from question configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use survey_core::types::{Bias, ItemKey, ItemType};

/// One reliability-participating measurement unit.
///
/// Each row of a matrix question is its own item, addressed by
/// `key.row_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychometricItem {
    /// Item identity
    pub key: ItemKey,
    /// Kind of the owning question
    pub item_type: ItemType,
    /// Number of discrete answer categories
    pub option_count: usize,
    /// Response-style shift
    #[serde(default)]
    pub bias: Bias,
}

impl PsychometricItem {
    /// Creates a non-matrix item.
    pub fn new(question_index: usize, item_type: ItemType, option_count: usize, bias: Bias) -> Self {
        Self {
            key: ItemKey::question(question_index),
            item_type,
            option_count,
            bias,
        }
    }

    /// Creates the item for one row of a matrix question.
    pub fn matrix_row(
        question_index: usize,
        row_index: usize,
        option_count: usize,
        bias: Bias,
    ) -> Self {
        Self {
            key: ItemKey::matrix_row(question_index, row_index),
            item_type: ItemType::Matrix,
            option_count,
            bias,
        }
    }

    /// Whether the row index agrees with the item type.
    #[inline]
    pub fn has_consistent_key(&self) -> bool {
        self.item_type.is_matrix() == self.key.row_index.is_some()
    }
}

/// Per-question settings consumed from the configuration layer.
///
/// A matrix question lists its row count in `rows`; every other kind
/// leaves it at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionConfig {
    /// Index of the question in the questionnaire (0-based)
    pub question_index: usize,
    /// Question kind
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Options per question (columns for a matrix)
    pub option_count: usize,
    /// Row count of a matrix question
    #[serde(default)]
    pub rows: usize,
    /// Whether the question takes part in reliability calibration
    #[serde(default)]
    pub psycho_enabled: bool,
    /// Response bias for calibrated answers
    #[serde(default)]
    pub psycho_bias: Bias,
    /// Whether the question is reverse-scored
    #[serde(default)]
    pub reverse: bool,
}

impl QuestionConfig {
    /// Keys of the items this question contributes, in row order.
    pub fn item_keys(&self) -> Vec<ItemKey> {
        if self.item_type.is_matrix() {
            (0..self.rows)
                .map(|row| ItemKey::matrix_row(self.question_index, row))
                .collect()
        } else {
            vec![ItemKey::question(self.question_index)]
        }
    }
}

/// Translates question settings into reliability items.
///
/// Disabled questions are skipped; matrix questions expand to one item per
/// row. The result keeps questionnaire order.
///
/// # Examples
/// ```
/// use survey_core::types::{Bias, ItemType};
/// use survey_psychometric::{collect_psychometric_items, QuestionConfig};
///
/// let questions = vec![
///     QuestionConfig {
///         question_index: 0,
///         item_type: ItemType::Scale,
///         option_count: 5,
///         rows: 0,
///         psycho_enabled: true,
///         psycho_bias: Bias::Center,
///         reverse: false,
///     },
///     QuestionConfig {
///         question_index: 1,
///         item_type: ItemType::Matrix,
///         option_count: 4,
///         rows: 3,
///         psycho_enabled: true,
///         psycho_bias: Bias::Right,
///         reverse: false,
///     },
/// ];
///
/// let items = collect_psychometric_items(&questions);
/// assert_eq!(items.len(), 4);
/// assert_eq!(items[3].key.row_index, Some(2));
/// ```
pub fn collect_psychometric_items(questions: &[QuestionConfig]) -> Vec<PsychometricItem> {
    questions
        .iter()
        .filter(|q| q.psycho_enabled)
        .flat_map(|q| {
            q.item_keys().into_iter().map(move |key| PsychometricItem {
                key,
                item_type: q.item_type,
                option_count: q.option_count,
                bias: q.psycho_bias,
            })
        })
        .collect()
}

/// Keys of all reverse-scored items among the calibrated questions.
pub fn reverse_item_keys(questions: &[QuestionConfig]) -> BTreeSet<ItemKey> {
    questions
        .iter()
        .filter(|q| q.psycho_enabled && q.reverse)
        .flat_map(QuestionConfig::item_keys)
        .collect()
}
