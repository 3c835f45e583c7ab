//! Optimizers and learning rate schedules

mod optimizer;
mod scheduler;
mod sgd;

pub use optimizer::Optimizer;
pub use scheduler::{LRScheduler, MultiStepLR};
pub use sgd::SGD;
