//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{
    dataset_settings, load_config, metrics_path, poison_index_path, run_name, validate_config,
    TransferSpec, ValidateArgs,
};

/// Format data configuration as a string
pub fn format_data_info(spec: &TransferSpec) -> String {
    let mut lines = vec![
        format!("  Dataset: {}", spec.data.name),
        format!("  Data path: {}", spec.data.path.display()),
        format!("  Batch size: {}", spec.data.batch_size),
    ];
    if let Some(settings) = dataset_settings(&spec.data.name) {
        lines.push(format!(
            "  Images: {0}x{0}x{1}, {2} classes, crop={3}, flip={4}",
            settings.img_size, settings.channels, settings.num_classes, settings.crop, settings.flip
        ));
    }
    lines.join("\n")
}

/// Format attack and poison configuration as a string
pub fn format_attack_info(spec: &TransferSpec) -> String {
    let mut lines = vec![
        format!("  Attack: {} (target {})", spec.attack.name, spec.attack.target),
        format!("  Poison indices: {}", poison_index_path(spec).display()),
    ];
    if let Some(trigger) = &spec.attack.trigger {
        lines.push(format!("  Trigger pattern: {}", trigger.display()));
    }
    if spec.attack.train_prob < 1.0 {
        lines.push(format!("  Train probability: {}", spec.attack.train_prob));
    }
    lines.join("\n")
}

/// Format optimizer and schedule as a string
pub fn format_optimizer_info(spec: &TransferSpec) -> String {
    [
        format!("  Optimizer: {}", spec.optimizer.name),
        format!("  Learning rate: {}", spec.optimizer.lr),
        format!("  Momentum: {}", spec.optimizer.momentum),
        format!("  Weight decay: {}", spec.optimizer.weight_decay),
        format!(
            "  Schedule: x{} at epochs {:?}",
            spec.scheduler.gamma, spec.scheduler.milestones
        ),
    ]
    .join("\n")
}

/// Format model, training and output configuration as a string
pub fn format_training_info(spec: &TransferSpec) -> String {
    [
        format!(
            "  Model: {} (hidden {}, dropout {}) on {}",
            spec.model.name, spec.model.hidden, spec.model.dropout, spec.model.device
        ),
        format!("  Epochs: {}", spec.training.epochs),
        format!("  Seed: {}", spec.training.seed),
        format!("  Metrics: {}", metrics_path(spec).display()),
    ]
    .join("\n")
}

/// Print detailed configuration summary
pub fn print_detailed_summary(spec: &TransferSpec) {
    println!();
    println!("Configuration Summary ({}):", run_name(spec));
    println!("{}", format_data_info(spec));
    println!();
    println!("{}", format_attack_info(spec));
    println!();
    println!("{}", format_optimizer_info(spec));
    println!();
    println!("{}", format_training_info(spec));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    validate_config(&spec).map_err(|e| format!("Validation failed: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        print_detailed_summary(&spec);
    }

    Ok(())
}
