//! Info command implementation
//!
//! Prints what a transfer run would resolve to: derived file paths, dataset
//! geometry and the learning-rate phases of the schedule.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{
    dataset_settings, load_config, metrics_path, poison_index_path, run_name, DatasetSettings,
    InfoArgs, OutputFormat, TransferSpec,
};
use crate::optim::{LRScheduler, MultiStepLR};
use crate::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Learning rate in effect from `from_epoch` on
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct LrPhase {
    from_epoch: usize,
    lr: f32,
}

/// Resolved view of a configuration
#[derive(Debug, Serialize)]
struct RunInfo<'a> {
    run: String,
    index_file: PathBuf,
    metrics_file: PathBuf,
    dataset: Option<DatasetSettings>,
    lr_phases: Vec<LrPhase>,
    spec: &'a TransferSpec,
}

/// Distinct learning rates over `spec.training.epochs`
fn lr_phases(spec: &TransferSpec) -> Vec<LrPhase> {
    let mut scheduler = MultiStepLR::new(
        spec.optimizer.lr,
        spec.scheduler.milestones.clone(),
        spec.scheduler.gamma,
    );
    let mut phases: Vec<LrPhase> = Vec::new();
    for epoch in 0..spec.training.epochs {
        let lr = scheduler.get_lr();
        if phases.last().is_none_or(|p| p.lr != lr) {
            phases.push(LrPhase { from_epoch: epoch, lr });
        }
        scheduler.step();
    }
    phases
}

fn resolve(spec: &TransferSpec) -> RunInfo<'_> {
    RunInfo {
        run: run_name(spec),
        index_file: poison_index_path(spec),
        metrics_file: metrics_path(spec),
        dataset: dataset_settings(&spec.data.name),
        lr_phases: lr_phases(spec),
        spec,
    }
}

fn print_text(info: &RunInfo<'_>) {
    let spec = info.spec;
    println!("Run: {}", info.run);
    match info.dataset {
        Some(d) => println!(
            "Dataset: {} ({}x{}x{}, {} classes, {} train samples)",
            spec.data.name, d.img_size, d.img_size, d.channels, d.num_classes, d.num_data
        ),
        None => println!("Dataset: {} (unknown)", spec.data.name),
    }
    println!("Attack: {} -> class {}", spec.attack.name, spec.attack.target);
    println!("Poison indices: {}", info.index_file.display());
    println!("Model: {} on {}", spec.model.name, spec.model.device);
    println!("Epochs: {} (batch size {})", spec.training.epochs, spec.data.batch_size);
    for phase in &info.lr_phases {
        println!("  lr {:.0e} from epoch {}", phase.lr, phase.from_epoch);
    }
    println!("Metrics: {}", info.metrics_file.display());
}

/// Serialize for the machine-readable formats
fn render(info: &RunInfo<'_>, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Text => Ok(None),
        OutputFormat::Json => serde_json::to_string_pretty(info)
            .map(Some)
            .map_err(|e| Error::Serialization(format!("JSON: {e}"))),
        OutputFormat::Yaml => serde_yaml::to_string(info)
            .map(Some)
            .map_err(|e| Error::Serialization(format!("YAML: {e}"))),
    }
}

pub fn run_info(args: InfoArgs, level: LogLevel) -> std::result::Result<(), String> {
    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let info = resolve(&spec);

    match render(&info, args.format).map_err(|e| e.to_string())? {
        Some(text) => println!("{text}"),
        None => {
            log(level, LogLevel::Normal, "Configuration Info:");
            println!();
            print_text(&info);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lr_phases_default_schedule() {
        let spec = TransferSpec::default();
        let phases = lr_phases(&spec);
        assert_eq!(phases.len(), 3);
        assert_eq!(phases[0].from_epoch, 0);
        assert_eq!(phases[1].from_epoch, 35);
        assert_eq!(phases[2].from_epoch, 55);
        assert!((phases[2].lr - 1e-4).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_paths() {
        let spec = TransferSpec::default();
        let info = resolve(&spec);
        assert_eq!(info.run, run_name(&spec));
        assert!(info.metrics_file.to_string_lossy().ends_with("_transfer_metrics.csv"));
        assert_eq!(info.dataset, dataset_settings(&spec.data.name));
    }

    #[test]
    fn test_info_json_has_resolved_fields() {
        let spec = TransferSpec::default();
        let json = serde_json::to_value(resolve(&spec)).unwrap();
        assert!(json.get("lr_phases").is_some());
        assert!(json.get("spec").is_some());
    }

    #[test]
    fn test_render_formats() {
        let spec = TransferSpec::default();
        let info = resolve(&spec);
        assert_eq!(render(&info, OutputFormat::Text).unwrap(), None);

        let yaml = render(&info, OutputFormat::Yaml).unwrap().unwrap();
        assert!(yaml.contains("metrics_file:"));
        let json = render(&info, OutputFormat::Json).unwrap().unwrap();
        assert!(json.contains("\"run\""));
    }
}
