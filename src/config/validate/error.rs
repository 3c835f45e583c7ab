//! Validation error types

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unknown dataset: {0} (must be one of: cifar10, cifar100, gtsrb, tiny_imagenet)")]
    UnknownDataset(String),

    #[error("Unknown attack: {0} (must be one of: badnets, blend, sig)")]
    UnknownAttack(String),

    #[error("Unknown model: {0} (must be one of: linear, mlp)")]
    UnknownModel(String),

    #[error("Invalid optimizer: {0} (must be sgd)")]
    InvalidOptimizer(String),

    #[error("Unsupported device: {0} (must be cpu)")]
    UnsupportedDevice(String),

    #[error("Invalid target class: {target} (dataset has {num_classes} classes)")]
    InvalidTarget { target: usize, num_classes: usize },

    #[error("Invalid learning rate: {0} (must be > 0.0 and <= 1.0)")]
    InvalidLearningRate(f32),

    #[error("Invalid momentum: {0} (must be in [0.0, 1.0))")]
    InvalidMomentum(f32),

    #[error("Invalid weight decay: {0} (must be >= 0.0)")]
    InvalidWeightDecay(f32),

    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Invalid milestones: {0:?} (must be strictly increasing)")]
    InvalidMilestones(Vec<usize>),

    #[error("Invalid gamma: {0} (must be > 0.0 and <= 1.0)")]
    InvalidGamma(f32),

    #[error("Invalid train_prob: {0} (must be in [0.0, 1.0])")]
    InvalidTrainProb(f32),

    #[error("Invalid dropout: {0} (must be in [0.0, 1.0))")]
    InvalidDropout(f32),

    #[error("Invalid hidden size: {0} (must be > 0)")]
    InvalidHidden(usize),

    #[error("Poison index name cannot be empty")]
    EmptySamplesIdx,
}

impl From<ValidationError> for crate::Error {
    fn from(err: ValidationError) -> Self {
        crate::Error::Config(format!("Invalid config: {err}"))
    }
}
