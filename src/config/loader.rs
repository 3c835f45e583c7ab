//! Reading configuration files and deriving run paths

use super::schema::TransferSpec;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Parse a YAML configuration file
///
/// The result is not validated; call `validate_config` after applying any
/// command-line overrides.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<TransferSpec> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    parse_config(&yaml_content)
}

/// Parse YAML configuration text
pub fn parse_config(yaml: &str) -> Result<TransferSpec> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::Config(format!("Failed to parse YAML config: {e}")))
}

/// Run name `{data}_{model}_{attack}_{target}_{samples_idx}`
pub fn run_name(spec: &TransferSpec) -> String {
    format!(
        "{}_{}_{}_{}_{}",
        spec.data.name,
        spec.model.name,
        spec.attack.name,
        spec.attack.target,
        spec.poison.samples_idx
    )
}

/// Poison index file `{sample_path}/{samples_idx}.npy`
pub fn poison_index_path(spec: &TransferSpec) -> PathBuf {
    spec.poison.sample_path.join(format!("{}.npy", spec.poison.samples_idx))
}

/// Metrics table `{log_path}/{run_name}_transfer_metrics.csv`
pub fn metrics_path(spec: &TransferSpec) -> PathBuf {
    spec.output.log_path.join(format!("{}_transfer_metrics.csv", run_name(spec)))
}
