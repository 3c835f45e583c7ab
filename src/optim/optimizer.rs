//! Optimizer trait

use crate::model::Param;

/// Trait for optimization algorithms
pub trait Optimizer {
    /// Perform a single optimization step using the accumulated gradients
    ///
    /// `params` must be passed in the same order on every call.
    fn step(&mut self, params: &mut [&mut Param]);

    /// Zero out all gradients
    fn zero_grad(&mut self, params: &mut [&mut Param]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}
