//! Classifiers trained by the transfer loop
//!
//! Models expose two forward paths: `predict` borrows the model immutably and
//! runs in evaluation mode (no dropout, nothing cached), `forward_train`
//! runs in training mode and caches activations for `backward`.

mod linear;
mod mlp;
mod param;

pub use linear::LinearClassifier;
pub use mlp::Mlp;
pub use param::Param;

use crate::{Error, Result};
use ndarray::{Array2, ArrayView2};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trainable classifier over flattened images
pub trait Classifier {
    /// Features per input row
    fn input_dim(&self) -> usize;

    /// Number of output logits
    fn num_classes(&self) -> usize;

    /// Evaluation-mode forward pass
    fn predict(&self, inputs: ArrayView2<'_, f32>) -> Result<Array2<f32>>;

    /// Training-mode forward pass caching activations
    fn forward_train(
        &mut self,
        inputs: ArrayView2<'_, f32>,
        rng: &mut dyn RngCore,
    ) -> Result<Array2<f32>>;

    /// Accumulate parameter gradients from d(loss)/d(logits)
    fn backward(&mut self, grad_logits: &Array2<f32>) -> Result<()>;

    /// Parameters in a stable order
    fn params(&self) -> Vec<&Param>;

    /// Mutable parameters in the same order as `params`
    fn params_mut(&mut self) -> Vec<&mut Param>;
}

pub(crate) fn check_inputs<M: Classifier + ?Sized>(
    model: &M,
    inputs: ArrayView2<'_, f32>,
) -> Result<()> {
    if inputs.ncols() != model.input_dim() {
        return Err(Error::InvalidSample(format!(
            "input has {} features, model expects {}",
            inputs.ncols(),
            model.input_dim()
        )));
    }
    Ok(())
}

/// Supported model architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Softmax regression
    Linear,
    /// One hidden ReLU layer with dropout
    #[default]
    Mlp,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "mlp" => Ok(Self::Mlp),
            _ => Err(format!("Unknown model: {s}. Valid models: linear, mlp")),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Mlp => write!(f, "mlp"),
        }
    }
}

/// Build a model for `input_dim` features and `num_classes` outputs
pub fn build_model(
    kind: ModelKind,
    input_dim: usize,
    num_classes: usize,
    hidden: usize,
    dropout: f32,
    rng: &mut dyn RngCore,
) -> Result<Box<dyn Classifier>> {
    if input_dim == 0 || num_classes == 0 {
        return Err(Error::Config(format!(
            "Invalid model geometry: {input_dim} inputs, {num_classes} classes"
        )));
    }
    Ok(match kind {
        ModelKind::Linear => Box::new(LinearClassifier::new(input_dim, num_classes, rng)),
        ModelKind::Mlp => Box::new(Mlp::new(input_dim, hidden, num_classes, dropout, rng)?),
    })
}
