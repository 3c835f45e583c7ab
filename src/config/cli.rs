//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! backdoor-transfer transfer config.yaml
//! backdoor-transfer transfer --data-name gtsrb --attack-name blend --target 3 --disable
//! backdoor-transfer validate config.yaml
//! backdoor-transfer info config.yaml --format json
//! ```

use super::schema::TransferSpec;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Backdoor transfer: train on a poisoned set, measure clean and backdoor accuracy
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "backdoor-transfer")]
#[command(version)]
#[command(
    about = "Fine-tune a classifier on a poisoned training set and track backdoor success per epoch"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the transfer experiment
    Transfer(TransferArgs),

    /// Validate a configuration file without running
    Validate(ValidateArgs),

    /// Display information about a configuration
    Info(InfoArgs),
}

/// Arguments for the transfer command
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct TransferArgs {
    /// Path to YAML configuration file; defaults apply when omitted
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Override dataset name
    #[arg(long)]
    pub data_name: Option<String>,

    /// Override dataset root directory
    #[arg(long)]
    pub data_path: Option<PathBuf>,

    /// Override attack name
    #[arg(long)]
    pub attack_name: Option<String>,

    /// Override target class
    #[arg(long)]
    pub target: Option<usize>,

    /// Override trigger pattern file
    #[arg(long)]
    pub trigger: Option<PathBuf>,

    /// Override poison index file stem
    #[arg(long)]
    pub samples_idx: Option<String>,

    /// Override poison index directory
    #[arg(long)]
    pub sample_path: Option<PathBuf>,

    /// Override model name
    #[arg(long)]
    pub model_name: Option<String>,

    /// Override compute device
    #[arg(long)]
    pub device: Option<String>,

    /// Override metrics directory
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Hide progress bars and print one line per epoch
    #[arg(long)]
    pub disable: bool,

    /// Override number of epochs
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Override batch size
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Override learning rate
    #[arg(short, long)]
    pub lr: Option<f32>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Validate config and inputs but don't train
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for `info`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a TransferSpec
pub fn apply_overrides(spec: &mut TransferSpec, args: &TransferArgs) {
    if let Some(name) = &args.data_name {
        spec.data.name = name.clone();
    }
    if let Some(path) = &args.data_path {
        spec.data.path = path.clone();
    }
    if let Some(name) = &args.attack_name {
        spec.attack.name = name.clone();
    }
    if let Some(target) = args.target {
        spec.attack.target = target;
    }
    if let Some(trigger) = &args.trigger {
        spec.attack.trigger = Some(trigger.clone());
    }
    if let Some(samples_idx) = &args.samples_idx {
        spec.poison.samples_idx = samples_idx.clone();
    }
    if let Some(path) = &args.sample_path {
        spec.poison.sample_path = path.clone();
    }
    if let Some(name) = &args.model_name {
        spec.model.name = name.clone();
    }
    if let Some(device) = &args.device {
        spec.model.device = device.clone();
    }
    if let Some(path) = &args.log_path {
        spec.output.log_path = path.clone();
    }
    if args.disable {
        spec.output.disable = true;
    }
    if let Some(epochs) = args.epochs {
        spec.training.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        spec.data.batch_size = batch_size;
    }
    if let Some(lr) = args.lr {
        spec.optimizer.lr = lr;
    }
    if let Some(seed) = args.seed {
        spec.training.seed = seed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transfer_command() {
        let cli = parse_args(["backdoor-transfer", "transfer", "config.yaml"]).unwrap();
        match cli.command {
            Command::Transfer(args) => {
                assert_eq!(args.config, Some(PathBuf::from("config.yaml")));
                assert!(!args.disable);
                assert!(!args.dry_run);
            }
            _ => panic!("Expected Transfer command"),
        }
    }

    #[test]
    fn test_parse_transfer_without_config() {
        let cli =
            parse_args(["backdoor-transfer", "transfer", "--target", "3", "--disable"]).unwrap();
        match cli.command {
            Command::Transfer(args) => {
                assert_eq!(args.config, None);
                assert_eq!(args.target, Some(3));
                assert!(args.disable);
            }
            _ => panic!("Expected Transfer command"),
        }
    }

    #[test]
    fn test_parse_transfer_with_overrides() {
        let cli = parse_args([
            "backdoor-transfer",
            "transfer",
            "config.yaml",
            "--data-name",
            "gtsrb",
            "--attack-name",
            "blend",
            "--samples-idx",
            "blend_1000",
            "--epochs",
            "10",
            "--lr",
            "0.05",
        ])
        .unwrap();
        match cli.command {
            Command::Transfer(args) => {
                assert_eq!(args.data_name.as_deref(), Some("gtsrb"));
                assert_eq!(args.attack_name.as_deref(), Some("blend"));
                assert_eq!(args.samples_idx.as_deref(), Some("blend_1000"));
                assert_eq!(args.epochs, Some(10));
                assert_eq!(args.lr, Some(0.05));
            }
            _ => panic!("Expected Transfer command"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli =
            parse_args(["backdoor-transfer", "--verbose", "validate", "config.yaml"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(matches!(cli.command, Command::Validate(_)));
    }

    #[test]
    fn test_parse_info_format() {
        let cli =
            parse_args(["backdoor-transfer", "info", "config.yaml", "--format", "json"]).unwrap();
        match cli.command {
            Command::Info(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("Expected Info command"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        assert!(parse_args(["backdoor-transfer", "quantize", "model.gguf"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut spec = TransferSpec::default();
        let args = TransferArgs {
            data_name: Some("gtsrb".to_string()),
            target: Some(5),
            trigger: Some(PathBuf::from("pattern.npy")),
            device: Some("cpu".to_string()),
            disable: true,
            epochs: Some(3),
            batch_size: Some(32),
            seed: Some(9),
            ..Default::default()
        };
        apply_overrides(&mut spec, &args);

        assert_eq!(spec.data.name, "gtsrb");
        assert_eq!(spec.attack.target, 5);
        assert_eq!(spec.attack.trigger, Some(PathBuf::from("pattern.npy")));
        assert!(spec.output.disable);
        assert_eq!(spec.training.epochs, 3);
        assert_eq!(spec.data.batch_size, 32);
        assert_eq!(spec.training.seed, 9);
        // Untouched fields keep their values
        assert_eq!(spec.attack.name, "badnets");
        assert_eq!(spec.optimizer.lr, 0.01);
    }

    #[test]
    fn test_nan_lr_override_fails_validation() {
        let cli = parse_args(["backdoor-transfer", "transfer", "--lr", "NaN"]).unwrap();
        let Command::Transfer(args) = cli.command else {
            panic!("Expected Transfer command");
        };
        let mut spec = TransferSpec::default();
        apply_overrides(&mut spec, &args);
        assert!(spec.optimizer.lr.is_nan());
        assert!(crate::config::validate_config(&spec).is_err());
    }

    #[test]
    fn test_disable_flag_never_clears_config() {
        let mut spec = TransferSpec::default();
        spec.output.disable = true;
        apply_overrides(&mut spec, &TransferArgs::default());
        assert!(spec.output.disable);
    }
}
