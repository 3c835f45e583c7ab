//! Unit tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;

fn create_valid_spec() -> TransferSpec {
    TransferSpec::default()
}

#[test]
fn test_valid_config() {
    assert!(validate_config(&create_valid_spec()).is_ok());
}

#[test]
fn test_unknown_dataset() {
    let mut spec = create_valid_spec();
    spec.data.name = "mnist".to_string();
    let err = validate_config(&spec).unwrap_err();
    assert!(matches!(err, ValidationError::UnknownDataset(ref n) if n == "mnist"));
}

#[test]
fn test_unknown_attack_and_model() {
    let mut spec = create_valid_spec();
    spec.attack.name = "wanet".to_string();
    assert!(matches!(validate_config(&spec), Err(ValidationError::UnknownAttack(_))));

    let mut spec = create_valid_spec();
    spec.model.name = "resnet18".to_string();
    assert!(matches!(validate_config(&spec), Err(ValidationError::UnknownModel(_))));
}

#[test]
fn test_attack_alias_accepted() {
    let mut spec = create_valid_spec();
    spec.attack.name = "blended".to_string();
    assert!(validate_config(&spec).is_ok());
}

#[test]
fn test_target_must_be_a_class() {
    let mut spec = create_valid_spec();
    spec.attack.target = 10;
    let err = validate_config(&spec).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidTarget { target: 10, num_classes: 10 }));

    spec.data.name = "cifar100".to_string();
    assert!(validate_config(&spec).is_ok());
}

#[test]
fn test_device_must_be_cpu() {
    let mut spec = create_valid_spec();
    spec.model.device = "cuda:0".to_string();
    assert!(matches!(validate_config(&spec), Err(ValidationError::UnsupportedDevice(_))));

    spec.model.device = "CPU".to_string();
    assert!(validate_config(&spec).is_ok());
}

#[test]
fn test_invalid_batch_size() {
    let mut spec = create_valid_spec();
    spec.data.batch_size = 0;
    let err = validate_config(&spec).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidBatchSize(0)));
}

#[test]
fn test_invalid_learning_rate() {
    let mut spec = create_valid_spec();
    spec.optimizer.lr = 0.0;
    let err = validate_config(&spec).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidLearningRate(_)));

    spec.optimizer.lr = 1.5;
    assert!(validate_config(&spec).is_err());
}

#[test]
fn test_nan_hyperparameters_rejected() {
    let mut spec = create_valid_spec();
    spec.optimizer.lr = f32::NAN;
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidLearningRate(_))));

    let mut spec = create_valid_spec();
    spec.scheduler.gamma = f32::NAN;
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidGamma(_))));

    let mut spec = create_valid_spec();
    spec.optimizer.lr = f32::INFINITY;
    assert!(validate_config(&spec).is_err());
}

#[test]
fn test_invalid_optimizer() {
    let mut spec = create_valid_spec();
    spec.optimizer.name = "adam".to_string();
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidOptimizer(_))));
}

#[test]
fn test_invalid_epochs() {
    let mut spec = create_valid_spec();
    spec.training.epochs = 0;
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidEpochs(0))));
}

#[test]
fn test_milestones_must_increase() {
    let mut spec = create_valid_spec();
    spec.scheduler.milestones = vec![55, 35];
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidMilestones(_))));

    spec.scheduler.milestones = vec![35, 35];
    assert!(validate_config(&spec).is_err());

    spec.scheduler.milestones = vec![];
    assert!(validate_config(&spec).is_ok());
}

#[test]
fn test_train_prob_range() {
    let mut spec = create_valid_spec();
    spec.attack.train_prob = 1.1;
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidTrainProb(_))));

    spec.attack.train_prob = 0.0;
    assert!(validate_config(&spec).is_ok());
}

#[test]
fn test_dropout_and_hidden() {
    let mut spec = create_valid_spec();
    spec.model.dropout = 1.0;
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidDropout(_))));

    let mut spec = create_valid_spec();
    spec.model.hidden = 0;
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidHidden(0))));

    // The linear model has no hidden layer
    spec.model.name = "linear".to_string();
    assert!(validate_config(&spec).is_ok());
}

#[test]
fn test_empty_samples_idx() {
    let mut spec = create_valid_spec();
    spec.poison.samples_idx = "  ".to_string();
    assert!(matches!(validate_config(&spec), Err(ValidationError::EmptySamplesIdx)));
}

#[test]
fn test_converts_to_config_error() {
    let err: crate::Error = ValidationError::InvalidEpochs(0).into();
    assert!(matches!(err, crate::Error::Config(ref m) if m.contains("Invalid epochs")));
}
