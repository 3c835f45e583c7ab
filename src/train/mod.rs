//! Training and evaluation loop
//!
//! This module provides:
//! - Cross-entropy loss over batched logits
//! - Top-1 accuracy counting with an explicit "nothing scored" state
//! - `Trainer`: one optimization pass with the trigger in train mode
//! - `Evaluator`: clean and backdoor validation passes
//! - `MetricsRecorder`: per-epoch rows with CSV export
//! - `TransferSession`: the full epoch loop
//!
//! # Example
//!
//! ```no_run
//! use backdoor_transfer::data::DataLoader;
//! use backdoor_transfer::optim::{MultiStepLR, SGD};
//! use backdoor_transfer::train::{Evaluator, Trainer, TransferSession};
//!
//! let trainer = Trainer::new(
//!     Box::new(SGD::new(0.01, 0.9).with_weight_decay(5e-4)),
//!     DataLoader::new(256).with_shuffle(true),
//! )
//! .with_scheduler(Box::new(MultiStepLR::new(0.01, vec![35, 55], 0.1)));
//! let session = TransferSession::new(trainer, Evaluator::new(DataLoader::new(256)), 70);
//! // let recorder = session.run(model.as_mut(), &train_set, &test_set, &mut trigger, &mut rng)?;
//! ```

mod evaluator;
mod loss;
mod metrics;
pub mod progress;
mod recorder;
mod session;
mod trainer;

pub use evaluator::Evaluator;
pub use loss::{CrossEntropyLoss, LossFn, LossOutput};
pub use metrics::{argmax_rows, Accuracy};
pub use progress::{describe, format_clock, BatchRate, PassProgress, Phase, ProgressBar};
pub use recorder::{EpochMetrics, MetricsRecorder, CSV_HEADER};
pub use session::TransferSession;
pub use trainer::Trainer;
