//! YAML schema for a transfer run
//!
//! Every section and field has a default, so an empty document describes the
//! reference run: cifar10, badnets targeting class 0, an MLP trained with
//! SGD for 70 epochs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete transfer run configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransferSpec {
    /// Dataset selection and batching
    #[serde(default)]
    pub data: DataConfig,

    /// Trigger configuration
    #[serde(default)]
    pub attack: AttackConfig,

    /// Poison index file location
    #[serde(default)]
    pub poison: PoisonConfig,

    /// Model architecture
    #[serde(default)]
    pub model: ModelConfig,

    /// Optimizer hyperparameters
    #[serde(default)]
    pub optimizer: OptimSpec,

    /// Learning rate schedule
    #[serde(default)]
    pub scheduler: SchedulerSpec,

    /// Epochs and seed
    #[serde(default)]
    pub training: TrainingParams,

    /// Metrics location and progress display
    #[serde(default)]
    pub output: OutputConfig,
}

/// Data configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset name, a key of the built-in settings table
    #[serde(default = "default_data_name")]
    pub name: String,

    /// Root directory holding `{name}/{split}_{images,labels}.npy`
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Batch size for every pass
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            name: default_data_name(),
            path: default_data_path(),
            batch_size: default_batch_size(),
        }
    }
}

/// Trigger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackConfig {
    /// Attack name (badnets, blend, sig)
    #[serde(default = "default_attack_name")]
    pub name: String,

    /// Target class
    #[serde(default)]
    pub target: usize,

    /// Optional `.npy` pattern overriding the generated one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<PathBuf>,

    /// Probability of imprinting a poison carrier during training
    #[serde(default = "default_train_prob")]
    pub train_prob: f32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            name: default_attack_name(),
            target: 0,
            trigger: None,
            train_prob: default_train_prob(),
        }
    }
}

/// Poison index file `{sample_path}/{samples_idx}.npy`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoisonConfig {
    /// File stem of the index array
    #[serde(default = "default_samples_idx")]
    pub samples_idx: String,

    /// Directory holding index arrays
    #[serde(default = "default_sample_path")]
    pub sample_path: PathBuf,

    /// Fail when the index set is empty
    #[serde(default)]
    pub require_non_empty: bool,
}

impl Default for PoisonConfig {
    fn default() -> Self {
        Self {
            samples_idx: default_samples_idx(),
            sample_path: default_sample_path(),
            require_non_empty: false,
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Architecture name (linear, mlp)
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Hidden units of the MLP
    #[serde(default = "default_hidden")]
    pub hidden: usize,

    /// Dropout probability of the MLP hidden layer
    #[serde(default = "default_dropout")]
    pub dropout: f32,

    /// Compute device; only `cpu` is supported
    #[serde(default = "default_device")]
    pub device: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            hidden: default_hidden(),
            dropout: default_dropout(),
            device: default_device(),
        }
    }
}

/// Optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimSpec {
    /// Optimizer name; only `sgd`
    #[serde(default = "default_optimizer")]
    pub name: String,

    /// Initial learning rate
    #[serde(default = "default_lr")]
    pub lr: f32,

    /// Momentum coefficient
    #[serde(default = "default_momentum")]
    pub momentum: f32,

    /// L2 weight decay
    #[serde(default = "default_weight_decay")]
    pub weight_decay: f32,
}

impl Default for OptimSpec {
    fn default() -> Self {
        Self {
            name: default_optimizer(),
            lr: default_lr(),
            momentum: default_momentum(),
            weight_decay: default_weight_decay(),
        }
    }
}

/// Multi-step schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSpec {
    /// Epoch counts after which the rate is multiplied by `gamma`
    #[serde(default = "default_milestones")]
    pub milestones: Vec<usize>,

    /// Decay factor
    #[serde(default = "default_gamma")]
    pub gamma: f32,
}

impl Default for SchedulerSpec {
    fn default() -> Self {
        Self {
            milestones: default_milestones(),
            gamma: default_gamma(),
        }
    }
}

/// Training hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    /// Number of epochs
    #[serde(default = "default_epochs")]
    pub epochs: usize,

    /// Seed for initialisation, shuffling, augmentation and dropout
    #[serde(default)]
    pub seed: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            seed: 0,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory of the metrics table
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Hide progress bars and print one summary line per epoch instead
    #[serde(default)]
    pub disable: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            disable: false,
        }
    }
}

fn default_data_name() -> String {
    "cifar10".to_string()
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_batch_size() -> usize {
    256
}

fn default_attack_name() -> String {
    "badnets".to_string()
}

fn default_train_prob() -> f32 {
    1.0
}

fn default_samples_idx() -> String {
    "samples".to_string()
}

fn default_sample_path() -> PathBuf {
    PathBuf::from("./samples")
}

fn default_model_name() -> String {
    "mlp".to_string()
}

fn default_hidden() -> usize {
    512
}

fn default_dropout() -> f32 {
    0.5
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_optimizer() -> String {
    "sgd".to_string()
}

fn default_lr() -> f32 {
    0.01
}

fn default_momentum() -> f32 {
    0.9
}

fn default_weight_decay() -> f32 {
    5e-4
}

fn default_milestones() -> Vec<usize> {
    vec![35, 55]
}

fn default_gamma() -> f32 {
    0.1
}

fn default_epochs() -> usize {
    70
}

fn default_log_path() -> PathBuf {
    PathBuf::from("./logs")
}
