//! Trainable parameter with an accumulated gradient

use ndarray::Array2;
use rand::{Rng, RngCore};

/// A weight matrix or a bias row and its gradient
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: &'static str,
    data: Array2<f32>,
    grad: Array2<f32>,
}

impl Param {
    /// Zero-initialised parameter
    pub fn zeros(name: &'static str, rows: usize, cols: usize) -> Self {
        Self::from_array(name, Array2::zeros((rows, cols)))
    }

    /// Xavier/Glorot uniform initialisation
    pub fn xavier(name: &'static str, rows: usize, cols: usize, rng: &mut dyn RngCore) -> Self {
        let limit = (6.0 / (rows + cols).max(1) as f32).sqrt();
        let data = Array2::from_shape_simple_fn((rows, cols), || rng.random_range(-limit..=limit));
        Self::from_array(name, data)
    }

    /// Wrap existing values
    pub fn from_array(name: &'static str, data: Array2<f32>) -> Self {
        let grad = Array2::zeros(data.raw_dim());
        Self { name, data, grad }
    }

    /// Parameter name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current values
    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Mutable values
    pub fn data_mut(&mut self) -> &mut Array2<f32> {
        &mut self.data
    }

    /// Accumulated gradient
    pub fn grad(&self) -> &Array2<f32> {
        &self.grad
    }

    /// Add to the accumulated gradient
    pub fn accumulate_grad(&mut self, grad: &Array2<f32>) {
        self.grad += grad;
    }

    /// Reset the gradient to zero
    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }

    /// Number of scalar values
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the parameter has no values
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_xavier_bounds() {
        let mut rng = StdRng::seed_from_u64(0);
        let p = Param::xavier("w", 10, 6, &mut rng);
        let limit = (6.0f32 / 16.0).sqrt();
        assert_eq!(p.data().dim(), (10, 6));
        assert!(p.data().iter().all(|v| v.abs() <= limit));
        assert!(p.grad().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_accumulate_and_zero_grad() {
        let mut p = Param::zeros("b", 1, 2);
        p.accumulate_grad(&arr2(&[[1.0, 2.0]]));
        p.accumulate_grad(&arr2(&[[1.0, 2.0]]));
        assert_eq!(p.grad(), &arr2(&[[2.0, 4.0]]));
        p.zero_grad();
        assert_eq!(p.grad(), &arr2(&[[0.0, 0.0]]));
        assert_eq!(p.len(), 2);
    }
}
