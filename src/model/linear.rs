//! Softmax-regression classifier

use super::param::Param;
use super::{check_inputs, Classifier};
use crate::{Error, Result};
use ndarray::{Array2, ArrayView2, Axis};
use rand::RngCore;

/// Single affine layer producing class logits
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    weight: Param,
    bias: Param,
    cached_inputs: Option<Array2<f32>>,
}

impl LinearClassifier {
    /// Create with Xavier-initialised weights and zero bias
    pub fn new(input_dim: usize, num_classes: usize, rng: &mut dyn RngCore) -> Self {
        Self {
            weight: Param::xavier("linear.weight", input_dim, num_classes, rng),
            bias: Param::zeros("linear.bias", 1, num_classes),
            cached_inputs: None,
        }
    }

    fn logits(&self, inputs: ArrayView2<'_, f32>) -> Array2<f32> {
        inputs.dot(self.weight.data()) + self.bias.data()
    }
}

impl Classifier for LinearClassifier {
    fn input_dim(&self) -> usize {
        self.weight.data().nrows()
    }

    fn num_classes(&self) -> usize {
        self.weight.data().ncols()
    }

    fn predict(&self, inputs: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        check_inputs(self, inputs)?;
        Ok(self.logits(inputs))
    }

    fn forward_train(
        &mut self,
        inputs: ArrayView2<'_, f32>,
        _rng: &mut dyn RngCore,
    ) -> Result<Array2<f32>> {
        check_inputs(self, inputs)?;
        let logits = self.logits(inputs);
        self.cached_inputs = Some(inputs.to_owned());
        Ok(logits)
    }

    fn backward(&mut self, grad_logits: &Array2<f32>) -> Result<()> {
        let inputs = self
            .cached_inputs
            .take()
            .ok_or_else(|| {
                Error::InvalidSample("backward called before forward_train".to_string())
            })?;
        if grad_logits.nrows() != inputs.nrows() {
            return Err(Error::InvalidSample(format!(
                "gradient has {} rows, forward saw {}",
                grad_logits.nrows(),
                inputs.nrows()
            )));
        }

        self.weight.accumulate_grad(&inputs.t().dot(grad_logits));
        self.bias
            .accumulate_grad(&grad_logits.sum_axis(Axis(0)).insert_axis(Axis(0)));
        Ok(())
    }

    fn params(&self) -> Vec<&Param> {
        vec![&self.weight, &self.bias]
    }

    fn params_mut(&mut self) -> Vec<&mut Param> {
        vec![&mut self.weight, &mut self.bias]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn model() -> LinearClassifier {
        let mut rng = StdRng::seed_from_u64(0);
        let mut m = LinearClassifier::new(2, 3, &mut rng);
        *m.weight.data_mut() = arr2(&[[1.0, 0.0, -1.0], [0.0, 1.0, 2.0]]);
        *m.bias.data_mut() = arr2(&[[0.5, 0.0, 0.0]]);
        m
    }

    #[test]
    fn test_predict_affine() {
        let m = model();
        let logits = m.predict(arr2(&[[1.0, 2.0]]).view()).unwrap();
        assert_eq!(logits, arr2(&[[1.5, 2.0, 3.0]]));
    }

    #[test]
    fn test_backward_gradients() {
        let mut m = model();
        let mut rng = StdRng::seed_from_u64(0);
        let x = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        m.forward_train(x.view(), &mut rng).unwrap();
        m.backward(&arr2(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])).unwrap();

        assert_eq!(m.weight.grad(), &arr2(&[[1.0, 3.0, 0.0], [2.0, 4.0, 0.0]]));
        assert_abs_diff_eq!(m.bias.grad()[[0, 0]], 1.0);
        assert_abs_diff_eq!(m.bias.grad()[[0, 1]], 1.0);
        assert_abs_diff_eq!(m.bias.grad()[[0, 2]], 0.0);
    }

    #[test]
    fn test_backward_requires_forward() {
        let mut m = model();
        assert!(m.backward(&arr2(&[[1.0, 0.0, 0.0]])).is_err());
    }

    #[test]
    fn test_wrong_input_dim() {
        let m = model();
        assert!(matches!(
            m.predict(arr2(&[[1.0, 2.0, 3.0]]).view()),
            Err(Error::InvalidSample(_))
        ));
    }
}
