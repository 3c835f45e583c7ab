//! Multi-step learning rate scheduler

use super::LRScheduler;

/// Multi-Step Learning Rate Scheduler
///
/// Multiplies the learning rate by gamma each time the epoch counter reaches
/// a milestone.
///
/// Formula: lr_t = lr_initial * gamma^(number of milestones <= t)
#[derive(Debug, Clone)]
pub struct MultiStepLR {
    lr_initial: f32,
    milestones: Vec<usize>,
    gamma: f32,
    current_epoch: usize,
}

impl MultiStepLR {
    /// Create a new multi-step scheduler
    ///
    /// # Arguments
    /// * `lr_initial` - Initial learning rate
    /// * `milestones` - Epoch counts at which to decay; sorted on construction
    /// * `gamma` - Multiplicative factor (e.g., 0.1 for 10x reduction)
    pub fn new(lr_initial: f32, milestones: Vec<usize>, gamma: f32) -> Self {
        let mut milestones = milestones;
        milestones.sort_unstable();
        Self {
            lr_initial,
            milestones,
            gamma,
            current_epoch: 0,
        }
    }

    /// Number of completed steps
    pub fn current_epoch(&self) -> usize {
        self.current_epoch
    }

    /// Milestones in ascending order
    pub fn milestones(&self) -> &[usize] {
        &self.milestones
    }
}

impl LRScheduler for MultiStepLR {
    fn get_lr(&self) -> f32 {
        let num_decays = self
            .milestones
            .iter()
            .filter(|&&m| m <= self.current_epoch)
            .count();
        self.lr_initial * self.gamma.powi(num_decays as i32)
    }

    fn step(&mut self) {
        self.current_epoch += 1;
    }
}
