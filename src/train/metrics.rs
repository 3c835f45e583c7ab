//! Top-1 accuracy counting

use crate::{Error, Result};
use ndarray::{Array2, Axis};

/// Index of the largest logit in each row
///
/// Ties resolve to the lowest index.
pub fn argmax_rows(logits: &Array2<f32>) -> Vec<usize> {
    logits
        .axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f32::NEG_INFINITY), |(best_i, best_v), (i, &v)| {
                    if v > best_v {
                        (i, v)
                    } else {
                        (best_i, best_v)
                    }
                })
                .0
        })
        .collect()
}

/// Running count of correct top-1 predictions
///
/// # Example
///
/// ```
/// use backdoor_transfer::train::Accuracy;
///
/// let mut acc = Accuracy::new();
/// assert_eq!(acc.value(), None);
/// acc.add(3, 4);
/// assert_eq!(acc.value(), Some(0.75));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accuracy {
    /// Correct predictions
    pub correct: usize,
    /// Scored predictions
    pub total: usize,
}

impl Accuracy {
    /// Empty counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw counts
    pub fn add(&mut self, correct: usize, total: usize) {
        self.correct += correct;
        self.total += total;
    }

    /// Score a batch of logits against labels
    pub fn update(&mut self, logits: &Array2<f32>, labels: &[usize]) -> Result<()> {
        if logits.nrows() != labels.len() {
            return Err(Error::InvalidSample(format!(
                "{} logit rows for {} labels",
                logits.nrows(),
                labels.len()
            )));
        }
        let correct = argmax_rows(logits)
            .iter()
            .zip(labels)
            .filter(|(p, l)| p == l)
            .count();
        self.add(correct, labels.len());
        Ok(())
    }

    /// Combine two counters
    pub fn merge(&mut self, other: &Accuracy) {
        self.add(other.correct, other.total);
    }

    /// Fraction correct, `None` when nothing was scored
    pub fn value(&self) -> Option<f32> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f32 / self.total as f32)
        }
    }
}
