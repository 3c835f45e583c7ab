//! Stochastic Gradient Descent optimizer

use super::Optimizer;
use crate::model::Param;
use ndarray::{Array2, Zip};

/// SGD with momentum and L2 weight decay
///
/// Per parameter: `g = grad + weight_decay * p`, `v = momentum * v + g`,
/// `p -= lr * v`. The velocity starts as the first gradient.
pub struct SGD {
    lr: f32,
    momentum: f32,
    weight_decay: f32,
    velocities: Vec<Option<Array2<f32>>>,
}

impl SGD {
    /// Create a new SGD optimizer without weight decay
    pub fn new(lr: f32, momentum: f32) -> Self {
        Self {
            lr,
            momentum,
            weight_decay: 0.0,
            velocities: Vec::new(),
        }
    }

    /// Set L2 weight decay
    pub fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    /// Momentum coefficient
    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    /// Weight decay coefficient
    pub fn weight_decay(&self) -> f32 {
        self.weight_decay
    }

    fn ensure_velocities(&mut self, count: usize) {
        if self.velocities.len() != count {
            self.velocities = vec![None; count];
        }
    }
}

impl Optimizer for SGD {
    fn step(&mut self, params: &mut [&mut Param]) {
        self.ensure_velocities(params.len());

        for (i, param) in params.iter_mut().enumerate() {
            let mut grad = param.grad().clone();
            if self.weight_decay > 0.0 {
                grad.scaled_add(self.weight_decay, param.data());
            }

            if self.momentum > 0.0 {
                let momentum = self.momentum;
                let velocity = match self.velocities[i].take() {
                    Some(mut v) => {
                        Zip::from(&mut v)
                            .and(&grad)
                            .for_each(|v, &g| *v = momentum * *v + g);
                        v
                    }
                    None => grad,
                };
                param.data_mut().scaled_add(-self.lr, &velocity);
                self.velocities[i] = Some(velocity);
            } else {
                param.data_mut().scaled_add(-self.lr, &grad);
            }
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;

    fn param(value: f32, grad: f32) -> Param {
        let mut p = Param::from_array("w", arr2(&[[value]]));
        p.accumulate_grad(&arr2(&[[grad]]));
        p
    }

    #[test]
    fn test_plain_sgd() {
        let mut opt = SGD::new(0.1, 0.0);
        let mut p = param(1.0, 2.0);
        opt.step(&mut [&mut p]);
        assert_abs_diff_eq!(p.data()[[0, 0]], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_momentum_accumulates() {
        let mut opt = SGD::new(0.1, 0.9);
        let mut p = param(1.0, 1.0);

        opt.step(&mut [&mut p]);
        // v = 1.0
        assert_abs_diff_eq!(p.data()[[0, 0]], 0.9, epsilon = 1e-6);

        opt.step(&mut [&mut p]);
        // v = 0.9 * 1.0 + 1.0 = 1.9
        assert_abs_diff_eq!(p.data()[[0, 0]], 0.9 - 0.19, epsilon = 1e-6);
    }

    #[test]
    fn test_weight_decay_added_to_gradient() {
        let mut opt = SGD::new(0.1, 0.0).with_weight_decay(0.5);
        let mut p = param(2.0, 0.0);
        opt.step(&mut [&mut p]);
        // g = 0 + 0.5 * 2.0 = 1.0
        assert_abs_diff_eq!(p.data()[[0, 0]], 1.9, epsilon = 1e-6);
    }

    #[test]
    fn test_lr_update() {
        let mut opt = SGD::new(0.01, 0.9).with_weight_decay(5e-4);
        opt.set_lr(0.001);
        assert_abs_diff_eq!(opt.lr(), 0.001);
        assert_abs_diff_eq!(opt.momentum(), 0.9);
        assert_abs_diff_eq!(opt.weight_decay(), 5e-4);
    }
}
