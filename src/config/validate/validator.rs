//! Configuration validation logic

use super::error::ValidationError;
use crate::attack::AttackKind;
use crate::config::schema::TransferSpec;
use crate::config::settings::dataset_settings;
use crate::model::ModelKind;

/// Validate a transfer configuration
///
/// Checks:
/// - Names match a known dataset, attack, model, optimizer and device
/// - Numeric values are in valid ranges
/// - The target is a class of the selected dataset
///
/// File paths are not checked here; missing files surface when the run
/// loads them.
pub fn validate_config(spec: &TransferSpec) -> Result<(), ValidationError> {
    let settings = dataset_settings(&spec.data.name)
        .ok_or_else(|| ValidationError::UnknownDataset(spec.data.name.clone()))?;

    if spec.attack.name.parse::<AttackKind>().is_err() {
        return Err(ValidationError::UnknownAttack(spec.attack.name.clone()));
    }
    let model = spec
        .model
        .name
        .parse::<ModelKind>()
        .map_err(|_| ValidationError::UnknownModel(spec.model.name.clone()))?;
    if spec.optimizer.name.to_lowercase() != "sgd" {
        return Err(ValidationError::InvalidOptimizer(spec.optimizer.name.clone()));
    }
    if spec.model.device.to_lowercase() != "cpu" {
        return Err(ValidationError::UnsupportedDevice(spec.model.device.clone()));
    }

    if spec.attack.target >= settings.num_classes {
        return Err(ValidationError::InvalidTarget {
            target: spec.attack.target,
            num_classes: settings.num_classes,
        });
    }
    if !(0.0..=1.0).contains(&spec.attack.train_prob) {
        return Err(ValidationError::InvalidTrainProb(spec.attack.train_prob));
    }
    if spec.poison.samples_idx.trim().is_empty() {
        return Err(ValidationError::EmptySamplesIdx);
    }

    if spec.data.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(spec.data.batch_size));
    }

    // Learning rate must be in (0, 1]; NaN fails both comparisons
    if !(spec.optimizer.lr > 0.0 && spec.optimizer.lr <= 1.0) {
        return Err(ValidationError::InvalidLearningRate(spec.optimizer.lr));
    }
    if !(0.0..1.0).contains(&spec.optimizer.momentum) {
        return Err(ValidationError::InvalidMomentum(spec.optimizer.momentum));
    }
    if spec.optimizer.weight_decay < 0.0 || !spec.optimizer.weight_decay.is_finite() {
        return Err(ValidationError::InvalidWeightDecay(spec.optimizer.weight_decay));
    }

    if spec.training.epochs == 0 {
        return Err(ValidationError::InvalidEpochs(spec.training.epochs));
    }
    if spec.scheduler.milestones.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ValidationError::InvalidMilestones(spec.scheduler.milestones.clone()));
    }
    if !(spec.scheduler.gamma > 0.0 && spec.scheduler.gamma <= 1.0) {
        return Err(ValidationError::InvalidGamma(spec.scheduler.gamma));
    }

    if !(0.0..1.0).contains(&spec.model.dropout) {
        return Err(ValidationError::InvalidDropout(spec.model.dropout));
    }
    if model == ModelKind::Mlp && spec.model.hidden == 0 {
        return Err(ValidationError::InvalidHidden(spec.model.hidden));
    }

    Ok(())
}
