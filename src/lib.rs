//! # backdoor-transfer
//!
//! Fine-tunes a classifier on a training set extended with poison carriers
//! and measures, per epoch, clean test accuracy and backdoor attack success.
//!
//! ## Pipeline
//!
//! 1. Load the clean train/test splits and a poison index set from `.npy`
//! 2. Append `clean[indices]` to the training set ([`data::PoisonedDatasetBuilder`])
//! 3. Build a trigger for the attack ([`attack::build_trigger`])
//! 4. Each epoch: train with the trigger in train mode, evaluate clean
//!    accuracy, evaluate backdoor accuracy on non-target samples
//! 5. Write `epoch,train_acc,val_acc,back_acc` to CSV
//!
//! ## Example
//!
//! ```no_run
//! use backdoor_transfer::config::{load_config, transfer_from_spec};
//!
//! let spec = load_config("transfer.yaml")?;
//! let report = transfer_from_spec(&spec)?;
//! for row in report.recorder.records() {
//!     println!("{}", row.summary());
//! }
//! # Ok::<(), backdoor_transfer::Error>(())
//! ```

pub mod attack;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod optim;
pub mod train;

pub use error::{Error, Result};
