//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod plan;
pub mod simulate;

use survey_core::types::ItemKey;

/// Compact column label: `q3` for a question, `q3r0` for a matrix row.
pub fn column_label(key: ItemKey) -> String {
    match key.row_index {
        Some(row) => format!("q{}r{}", key.question_index, row),
        None => format!("q{}", key.question_index),
    }
}
