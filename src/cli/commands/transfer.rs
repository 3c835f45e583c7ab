//! Transfer command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{
    apply_overrides, load_config, metrics_path, poison_index_path, prepare_run, run_name,
    transfer_from_spec, TransferArgs, TransferSpec,
};
use crate::Error;

/// Prefix errors raised before the first epoch differently from training failures
fn describe_error(e: &Error) -> String {
    if e.is_startup_error() {
        format!("Setup error: {e}")
    } else {
        format!("Transfer error: {e}")
    }
}

pub fn run_transfer(args: TransferArgs, level: LogLevel) -> Result<(), String> {
    let mut spec = match &args.config {
        Some(path) => {
            log(
                level,
                LogLevel::Normal,
                &format!("Transfer: loading {}", path.display()),
            );
            load_config(path).map_err(|e| format!("Config error: {e}"))?
        }
        None => TransferSpec::default(),
    };

    // Apply command-line overrides
    apply_overrides(&mut spec, &args);

    log(level, LogLevel::Normal, &format!("transfer {}", run_name(&spec)));
    log(
        level,
        LogLevel::Verbose,
        &format!("  Poison indices: {}", poison_index_path(&spec).display()),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Optimizer: {} (lr={}, momentum={}, weight_decay={})",
            spec.optimizer.name,
            spec.optimizer.lr,
            spec.optimizer.momentum,
            spec.optimizer.weight_decay
        ),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Epochs: {} (milestones {:?}, gamma {})",
            spec.training.epochs, spec.scheduler.milestones, spec.scheduler.gamma
        ),
    );

    if args.dry_run {
        let prepared = prepare_run(&spec).map_err(|e| describe_error(&e))?;
        log(
            level,
            LogLevel::Normal,
            &format!(
                "Dry run - {} training samples ({} poisoned), metrics would be written to {}",
                prepared.train_set.clean_len() + prepared.train_set.poison_len(),
                prepared.train_set.poison_len(),
                metrics_path(&spec).display()
            ),
        );
        return Ok(());
    }

    let report = transfer_from_spec(&spec).map_err(|e| describe_error(&e))?;

    log(
        level,
        LogLevel::Normal,
        &format!("poisoned samples len: {}", report.poison_len),
    );
    if let Some(last) = report.recorder.last() {
        log(level, LogLevel::Normal, &format!("Final {}", last.summary()));
    }
    log(
        level,
        LogLevel::Normal,
        &format!("Metrics saved to {}", report.metrics_path.display()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_error_by_stage() {
        let setup = describe_error(&Error::IndexOutOfRange { index: 5, len: 3 });
        assert!(setup.starts_with("Setup error:"));

        let runtime = describe_error(&Error::InvalidSample("label 12 >= 10 classes".into()));
        assert!(runtime.starts_with("Transfer error:"));
    }
}
