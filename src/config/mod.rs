//! Declarative configuration
//!
//! A transfer run is described by a YAML [`TransferSpec`]. Every field has a
//! default; command-line flags override individual fields before
//! [`validate_config`] checks the result.
//!
//! ```yaml
//! data:
//!   name: cifar10
//!   path: ./data
//! attack:
//!   name: badnets
//!   target: 0
//! poison:
//!   samples_idx: badnets_500
//!   sample_path: ./samples
//! model:
//!   name: mlp
//! output:
//!   log_path: ./logs
//!   disable: true
//! ```

mod cli;
mod loader;
mod schema;
mod settings;
mod transfer;
mod validate;

pub use cli::{
    apply_overrides, parse_args, Cli, Command, InfoArgs, OutputFormat, TransferArgs, ValidateArgs,
};
pub use loader::{load_config, metrics_path, parse_config, poison_index_path, run_name};
pub use schema::{
    AttackConfig, DataConfig, ModelConfig, OptimSpec, OutputConfig, PoisonConfig, SchedulerSpec,
    TrainingParams, TransferSpec,
};
pub use settings::{dataset_settings, DatasetSettings, DATASET_NAMES};
pub use transfer::{prepare_run, transfer_from_spec, PreparedRun, TransferReport};
pub use validate::{validate_config, ValidationError};
