//! Cross Entropy Loss for batched classification

use crate::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Loss value with the gradient with respect to the logits
#[derive(Debug, Clone)]
pub struct LossOutput {
    /// Mean loss over the batch
    pub loss: f32,
    /// d(loss)/d(logits), same shape as the logits
    pub grad: Array2<f32>,
}

/// Trait for loss functions over a batch of logits and integer labels
pub trait LossFn {
    /// Compute the mean loss and its gradient
    fn forward(&self, logits: &Array2<f32>, labels: &[usize]) -> Result<LossOutput>;

    /// Name of the loss function
    fn name(&self) -> &str;
}

/// Cross Entropy Loss (for classification)
///
/// L = -mean(log(softmax(logits)[label]))
///
/// # Example
///
/// ```
/// use backdoor_transfer::train::{CrossEntropyLoss, LossFn};
/// use ndarray::arr2;
///
/// let logits = arr2(&[[2.0, 1.0, 0.5]]);
/// let out = CrossEntropyLoss.forward(&logits, &[0]).unwrap();
/// assert!(out.loss > 0.0);
/// ```
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// Compute softmax: exp(x_i) / sum(exp(x_j))
    pub(crate) fn softmax(x: ArrayView1<'_, f32>) -> Array1<f32> {
        let max = x.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let exp_x: Array1<f32> = x.mapv(|v| (v - max).exp());
        let sum: f32 = exp_x.sum();
        exp_x / sum
    }
}

impl LossFn for CrossEntropyLoss {
    fn forward(&self, logits: &Array2<f32>, labels: &[usize]) -> Result<LossOutput> {
        let (rows, classes) = logits.dim();
        if rows != labels.len() {
            return Err(Error::InvalidSample(format!(
                "{rows} logit rows for {} labels",
                labels.len()
            )));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= classes) {
            return Err(Error::InvalidSample(format!(
                "label {bad} out of range for {classes} classes"
            )));
        }
        if rows == 0 {
            return Ok(LossOutput {
                loss: 0.0,
                grad: Array2::zeros((0, classes)),
            });
        }

        let scale = 1.0 / rows as f32;
        let mut grad = Array2::zeros((rows, classes));
        let mut total = 0.0;
        for ((row, mut grad_row), &label) in logits
            .axis_iter(Axis(0))
            .zip(grad.axis_iter_mut(Axis(0)))
            .zip(labels)
        {
            let probs = Self::softmax(row);
            total -= (probs[label] + 1e-10).max(f32::MIN_POSITIVE).ln();

            // d(CE)/d(logits) = probs - one_hot(label)
            grad_row.assign(&probs);
            grad_row[label] -= 1.0;
            grad_row *= scale;
        }

        Ok(LossOutput {
            loss: total * scale,
            grad,
        })
    }

    fn name(&self) -> &'static str {
        "CrossEntropy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_softmax() {
        let x = arr1(&[1.0, 2.0, 3.0]);
        let probs = CrossEntropyLoss::softmax(x.view());

        // Probabilities should sum to 1
        let sum: f32 = probs.sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-5);

        for &p in &probs {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_softmax_large_logits_stable() {
        let x = arr1(&[1000.0, 1000.0]);
        let probs = CrossEntropyLoss::softmax(x.view());
        assert_relative_eq!(probs[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_cross_entropy_uniform() {
        let logits = arr2(&[[0.0, 0.0], [0.0, 0.0]]);
        let out = CrossEntropyLoss.forward(&logits, &[0, 1]).unwrap();
        assert_relative_eq!(out.loss, 2.0_f32.ln(), epsilon = 1e-5);
    }

    #[test]
    fn test_cross_entropy_gradient() {
        let logits = arr2(&[[2.0, 1.0, 0.5], [0.0, 0.0, 0.0]]);
        let out = CrossEntropyLoss.forward(&logits, &[0, 2]).unwrap();

        // Each row of (probs - one_hot) sums to zero
        for row in out.grad.rows() {
            assert_relative_eq!(row.sum(), 0.0, epsilon = 1e-6);
        }
        assert!(out.grad[[0, 0]] < 0.0);
        assert_relative_eq!(out.grad[[1, 2]], (1.0 / 3.0 - 1.0) / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cross_entropy_rejects_bad_label() {
        let logits = arr2(&[[0.0, 0.0]]);
        assert!(matches!(
            CrossEntropyLoss.forward(&logits, &[2]),
            Err(Error::InvalidSample(_))
        ));
        assert!(CrossEntropyLoss.forward(&logits, &[0, 1]).is_err());
    }

    #[test]
    fn test_cross_entropy_empty_batch() {
        let logits = Array2::zeros((0, 3));
        let out = CrossEntropyLoss.forward(&logits, &[]).unwrap();
        assert_eq!(out.loss, 0.0);
        assert_eq!(out.grad.dim(), (0, 3));
    }
}
