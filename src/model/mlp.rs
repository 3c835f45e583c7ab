//! Two-layer perceptron with ReLU and inverted dropout

use super::param::Param;
use super::{check_inputs, Classifier};
use crate::{Error, Result};
use ndarray::{Array2, ArrayView2, Axis, Zip};
use rand::{Rng, RngCore};

struct Activations {
    inputs: Array2<f32>,
    pre_relu: Array2<f32>,
    mask: Array2<f32>,
    hidden: Array2<f32>,
}

/// `x → relu(x W1 + b1) → dropout → W2 + b2`
pub struct Mlp {
    w1: Param,
    b1: Param,
    w2: Param,
    b2: Param,
    dropout: f32,
    cache: Option<Activations>,
}

impl Mlp {
    /// Create with Xavier-initialised weights
    pub fn new(
        input_dim: usize,
        hidden: usize,
        num_classes: usize,
        dropout: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        if !(0.0..1.0).contains(&dropout) {
            return Err(Error::Config(format!(
                "Invalid dropout: {dropout} (must be in [0.0, 1.0))"
            )));
        }
        if hidden == 0 {
            return Err(Error::Config("MLP hidden width must be > 0".to_string()));
        }
        Ok(Self {
            w1: Param::xavier("mlp.w1", input_dim, hidden, rng),
            b1: Param::zeros("mlp.b1", 1, hidden),
            w2: Param::xavier("mlp.w2", hidden, num_classes, rng),
            b2: Param::zeros("mlp.b2", 1, num_classes),
            dropout,
            cache: None,
        })
    }

    fn pre_relu(&self, inputs: ArrayView2<'_, f32>) -> Array2<f32> {
        inputs.dot(self.w1.data()) + self.b1.data()
    }
}

impl Classifier for Mlp {
    fn input_dim(&self) -> usize {
        self.w1.data().nrows()
    }

    fn num_classes(&self) -> usize {
        self.w2.data().ncols()
    }

    fn predict(&self, inputs: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        check_inputs(self, inputs)?;
        let hidden = self.pre_relu(inputs).mapv_into(|v| v.max(0.0));
        Ok(hidden.dot(self.w2.data()) + self.b2.data())
    }

    fn forward_train(
        &mut self,
        inputs: ArrayView2<'_, f32>,
        rng: &mut dyn RngCore,
    ) -> Result<Array2<f32>> {
        check_inputs(self, inputs)?;
        let pre_relu = self.pre_relu(inputs);

        let keep = 1.0 - self.dropout;
        let mask = if self.dropout > 0.0 {
            Array2::from_shape_simple_fn(pre_relu.raw_dim(), || {
                if rng.random::<f32>() < keep {
                    1.0 / keep
                } else {
                    0.0
                }
            })
        } else {
            Array2::ones(pre_relu.raw_dim())
        };

        let mut hidden = pre_relu.mapv(|v| v.max(0.0));
        hidden *= &mask;
        let logits = hidden.dot(self.w2.data()) + self.b2.data();

        self.cache = Some(Activations {
            inputs: inputs.to_owned(),
            pre_relu,
            mask,
            hidden,
        });
        Ok(logits)
    }

    fn backward(&mut self, grad_logits: &Array2<f32>) -> Result<()> {
        let cache = self
            .cache
            .take()
            .ok_or_else(|| {
                Error::InvalidSample("backward called before forward_train".to_string())
            })?;
        if grad_logits.nrows() != cache.inputs.nrows() {
            return Err(Error::InvalidSample(format!(
                "gradient has {} rows, forward saw {}",
                grad_logits.nrows(),
                cache.inputs.nrows()
            )));
        }

        self.w2.accumulate_grad(&cache.hidden.t().dot(grad_logits));
        self.b2
            .accumulate_grad(&grad_logits.sum_axis(Axis(0)).insert_axis(Axis(0)));

        let mut grad_hidden = grad_logits.dot(&self.w2.data().t());
        Zip::from(&mut grad_hidden)
            .and(&cache.mask)
            .and(&cache.pre_relu)
            .for_each(|g, &m, &z| *g = if z > 0.0 { *g * m } else { 0.0 });

        self.w1.accumulate_grad(&cache.inputs.t().dot(&grad_hidden));
        self.b1
            .accumulate_grad(&grad_hidden.sum_axis(Axis(0)).insert_axis(Axis(0)));
        Ok(())
    }

    fn params(&self) -> Vec<&Param> {
        vec![&self.w1, &self.b1, &self.w2, &self.b2]
    }

    fn params_mut(&mut self) -> Vec<&mut Param> {
        vec![&mut self.w1, &mut self.b1, &mut self.w2, &mut self.b2]
    }
}
