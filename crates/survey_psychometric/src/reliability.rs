//! Reliability diagnostics for generated answer sets.
//!
//! Scores a respondent × item matrix the standard way so a batch run can
//! report how close the observed Cronbach's Alpha came to the target.

use serde::Serialize;
use survey_core::types::ItemKey;

/// Sample variance with `n - 1` denominator; 0.0 for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Pearson correlation.
///
/// Returns 0.0 for inputs of different length, fewer than two points or
/// zero variance on either side.
pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return 0.0;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denominator = (sxx * syy).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        sxy / denominator
    }
}

/// Cronbach's Alpha of a score matrix (rows = respondents, columns = items).
///
/// `alpha = k/(k-1) · (1 - Σ var(item) / var(total))`
///
/// Returns `None` for fewer than two items or respondents, ragged rows, or
/// a constant total score.
///
/// # Examples
/// ```
/// use survey_psychometric::reliability::cronbach_alpha;
///
/// let perfectly_consistent = vec![vec![1.0, 1.0], vec![3.0, 3.0], vec![5.0, 5.0]];
/// assert!((cronbach_alpha(&perfectly_consistent).unwrap() - 1.0).abs() < 1e-12);
/// assert_eq!(cronbach_alpha(&[vec![1.0, 2.0]]), None);
/// ```
pub fn cronbach_alpha<Row: AsRef<[f64]>>(matrix: &[Row]) -> Option<f64> {
    let first = matrix.first()?;
    let k = first.as_ref().len();
    if k < 2 || matrix.len() < 2 || matrix.iter().any(|row| row.as_ref().len() != k) {
        return None;
    }

    let totals: Vec<f64> = matrix.iter().map(|row| row.as_ref().iter().sum()).collect();
    let total_variance = variance(&totals);
    if total_variance == 0.0 {
        return None;
    }

    let mut column = Vec::with_capacity(matrix.len());
    let mut item_variance_sum = 0.0;
    for j in 0..k {
        column.clear();
        column.extend(matrix.iter().map(|row| row.as_ref()[j]));
        item_variance_sum += variance(&column);
    }

    let k = k as f64;
    Some(k / (k - 1.0) * (1.0 - item_variance_sum / total_variance))
}

/// Generated answers, one row per respondent and one column per item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMatrix {
    columns: Vec<ItemKey>,
    option_counts: Vec<usize>,
    rows: Vec<Vec<usize>>,
}

impl ResponseMatrix {
    /// Empty matrix with one column per `(item, option_count)` pair.
    pub fn new(columns: Vec<(ItemKey, usize)>) -> Self {
        let (columns, option_counts) = columns.into_iter().unzip();
        Self {
            columns,
            option_counts,
            rows: Vec::new(),
        }
    }

    /// Rows must already fit the columns; sampler output always does.
    pub(crate) fn with_rows(columns: Vec<(ItemKey, usize)>, rows: Vec<Vec<usize>>) -> Self {
        let mut matrix = Self::new(columns);
        debug_assert!(rows.iter().all(|row| row.len() == matrix.columns.len()));
        matrix.rows = rows;
        matrix
    }

    /// Appends one respondent's answers.
    ///
    /// Returns `None`, leaving the matrix unchanged, if the row width is
    /// wrong or an answer lies outside its column's option range.
    pub fn push_row(&mut self, row: Vec<usize>) -> Option<()> {
        if row.len() != self.columns.len() {
            return None;
        }
        if row.iter().zip(&self.option_counts).any(|(&answer, &count)| answer >= count) {
            return None;
        }
        self.rows.push(row);
        Some(())
    }

    /// Column labels.
    #[inline]
    pub fn columns(&self) -> &[ItemKey] {
        &self.columns
    }

    /// Answer rows.
    #[inline]
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Number of respondents.
    #[inline]
    pub fn respondents(&self) -> usize {
        self.rows.len()
    }

    fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[index] as f64).collect()
    }

    fn column_index(&self, key: ItemKey) -> Option<usize> {
        self.columns.iter().position(|&c| c == key)
    }

    /// Cronbach's Alpha of the answers, scoring each option by its index.
    pub fn alpha(&self) -> Option<f64> {
        let scores: Vec<Vec<f64>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|&v| v as f64).collect())
            .collect();
        cronbach_alpha(&scores)
    }

    /// Correlation between two items.
    pub fn item_correlation(&self, a: ItemKey, b: ItemKey) -> Option<f64> {
        let a = self.column_index(a)?;
        let b = self.column_index(b)?;
        Some(correlation(&self.column(a), &self.column(b)))
    }

    /// Average correlation over all item pairs.
    pub fn mean_inter_item_correlation(&self) -> Option<f64> {
        let k = self.columns.len();
        if k < 2 {
            return None;
        }
        let columns: Vec<Vec<f64>> = (0..k).map(|j| self.column(j)).collect();
        let mut sum = 0.0;
        let mut pairs = 0usize;
        for a in 0..k {
            for b in (a + 1)..k {
                sum += correlation(&columns[a], &columns[b]);
                pairs += 1;
            }
        }
        Some(sum / pairs as f64)
    }

    /// How often each option of an item was chosen.
    pub fn option_counts(&self, key: ItemKey) -> Option<Vec<usize>> {
        let j = self.column_index(key)?;
        let mut counts = vec![0usize; self.option_counts[j]];
        for row in &self.rows {
            if let Some(slot) = counts.get_mut(row[j]) {
                *slot += 1;
            }
        }
        Some(counts)
    }

    /// Share of respondents choosing `option`, in percent.
    pub fn option_percentage(&self, key: ItemKey, option: usize) -> Option<f64> {
        let counts = self.option_counts(key)?;
        if self.rows.is_empty() {
            return Some(0.0);
        }
        let count = counts.get(option).copied().unwrap_or(0);
        Some(count as f64 / self.rows.len() as f64 * 100.0)
    }
}
