//! Learning rate schedulers
//!
//! - `MultiStepLR` - Multiply by gamma at fixed epoch milestones

mod multi_step;


pub use multi_step::MultiStepLR;

use super::Optimizer;

/// Learning rate scheduler trait
pub trait LRScheduler {
    /// Get the current learning rate
    fn get_lr(&self) -> f32;

    /// Step the scheduler (called once after each epoch)
    fn step(&mut self);

    /// Apply the current learning rate to an optimizer
    fn apply(&self, optimizer: &mut dyn Optimizer) {
        optimizer.set_lr(self.get_lr());
    }
}
