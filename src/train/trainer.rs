//! One-epoch training over the poisoned set

use super::loss::{CrossEntropyLoss, LossFn};
use super::metrics::Accuracy;
use super::progress::{PassProgress, Phase};
use crate::attack::{Trigger, TriggerMode};
use crate::data::{DataLoader, SampleSource};
use crate::model::Classifier;
use crate::optim::{LRScheduler, Optimizer};
use crate::Result;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

/// Drives optimization passes over a training set
///
/// # Example
///
/// ```no_run
/// use backdoor_transfer::data::DataLoader;
/// use backdoor_transfer::optim::{MultiStepLR, SGD};
/// use backdoor_transfer::train::Trainer;
///
/// let optimizer = SGD::new(0.01, 0.9).with_weight_decay(5e-4);
/// let trainer = Trainer::new(Box::new(optimizer), DataLoader::new(256).with_shuffle(true))
///     .with_scheduler(Box::new(MultiStepLR::new(0.01, vec![35, 55], 0.1)));
/// ```
pub struct Trainer {
    optimizer: Box<dyn Optimizer>,
    scheduler: Option<Box<dyn LRScheduler>>,
    loss_fn: Box<dyn LossFn>,
    loader: DataLoader,
    show_progress: bool,
}

impl Trainer {
    /// Create a trainer with cross-entropy loss and no schedule
    pub fn new(optimizer: Box<dyn Optimizer>, loader: DataLoader) -> Self {
        Self {
            optimizer,
            scheduler: None,
            loss_fn: Box::new(CrossEntropyLoss),
            loader,
            show_progress: false,
        }
    }

    /// Step this schedule once after every epoch
    pub fn with_scheduler(mut self, scheduler: Box<dyn LRScheduler>) -> Self {
        scheduler.apply(self.optimizer.as_mut());
        self.scheduler = Some(scheduler);
        self
    }

    /// Draw a progress bar on stderr
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Current learning rate
    pub fn lr(&self) -> f32 {
        self.optimizer.lr()
    }

    /// Batch loader used for training
    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    /// Train for one epoch
    ///
    /// Puts the trigger in training mode, then for each shuffled batch runs a
    /// training-mode forward pass, cross-entropy backward and an optimizer
    /// step. The scheduler is stepped once after the pass. A failing batch
    /// aborts the epoch.
    pub fn train_epoch<S, T>(
        &mut self,
        epoch: usize,
        model: &mut dyn Classifier,
        source: &S,
        trigger: &mut T,
        rng: &mut dyn RngCore,
    ) -> Result<Accuracy>
    where
        S: SampleSource + ?Sized,
        T: Trigger + ?Sized,
    {
        trigger.set_mode(TriggerMode::Train);
        let trigger: &T = trigger;

        let total_batches = self.loader.num_batches(source.len());
        let mut progress =
            PassProgress::new(Phase::Train, epoch, total_batches, self.show_progress);
        let mut accuracy = Accuracy::new();
        let mut total_loss = 0.0;
        let mut num_batches = 0;

        // Batches hold their own stream; the model draws dropout masks from `rng`
        let mut batch_rng = StdRng::seed_from_u64(rng.next_u64());
        for batch in self.loader.iter(source, trigger, &mut batch_rng) {
            let batch = batch?;
            let inputs = batch.inputs()?;

            {
                let mut params = model.params_mut();
                self.optimizer.zero_grad(&mut params);
            }
            let logits = model.forward_train(inputs.view(), rng)?;
            let loss = self.loss_fn.forward(&logits, &batch.labels)?;
            model.backward(&loss.grad)?;
            {
                let mut params = model.params_mut();
                self.optimizer.step(&mut params);
            }

            accuracy.update(&logits, &batch.labels)?;
            total_loss += loss.loss;
            num_batches += 1;
            progress.update(num_batches, accuracy.value());
        }
        progress.finish();

        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.step();
            scheduler.apply(self.optimizer.as_mut());
        }

        let avg_loss = if num_batches > 0 { total_loss / num_batches as f32 } else { 0.0 };
        debug!(
            epoch,
            batches = num_batches,
            loss = avg_loss,
            lr = self.optimizer.lr(),
            "train pass complete"
        );
        Ok(accuracy)
    }
}
