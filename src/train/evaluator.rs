//! Clean and backdoor validation passes

use super::metrics::Accuracy;
use super::progress::{PassProgress, Phase};
use crate::attack::{Trigger, TriggerMode};
use crate::data::{Batch, DataLoader, SampleSource};
use crate::model::Classifier;
use crate::Result;
use rand::RngCore;
use tracing::debug;

/// Runs evaluation-mode passes over a test set
///
/// The model is only borrowed immutably, so no pass can change parameters.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    loader: DataLoader,
    show_progress: bool,
}

impl Evaluator {
    /// Evaluator iterating `loader` in order
    pub fn new(loader: DataLoader) -> Self {
        Self { loader, show_progress: false }
    }

    /// Draw a progress bar on stderr
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Score every row of a batch
    pub fn score_batch(model: &dyn Classifier, batch: &Batch) -> Result<Accuracy> {
        let mut accuracy = Accuracy::new();
        if batch.is_empty() {
            return Ok(accuracy);
        }
        let logits = model.predict(batch.inputs()?.view())?;
        accuracy.update(&logits, &batch.labels)?;
        Ok(accuracy)
    }

    /// Score only rows whose backdoor flag is set
    ///
    /// A batch with no flagged rows contributes nothing.
    pub fn score_backdoor_batch(model: &dyn Classifier, batch: &Batch) -> Result<Accuracy> {
        let eligible = batch.backdoor_rows();
        if eligible.is_empty() {
            return Ok(Accuracy::new());
        }
        Self::score_batch(model, &eligible)
    }

    /// Accuracy on untouched test samples
    pub fn clean_pass<S, T>(
        &self,
        epoch: usize,
        model: &dyn Classifier,
        source: &S,
        trigger: &mut T,
        rng: &mut dyn RngCore,
    ) -> Result<Accuracy>
    where
        S: SampleSource + ?Sized,
        T: Trigger + ?Sized,
    {
        trigger.set_mode(TriggerMode::EvalClean);
        self.run(Phase::Val, epoch, model, source, trigger, rng, Self::score_batch)
    }

    /// Fraction of triggered, non-target samples classified as the target
    pub fn backdoor_pass<S, T>(
        &self,
        epoch: usize,
        model: &dyn Classifier,
        source: &S,
        trigger: &mut T,
        rng: &mut dyn RngCore,
    ) -> Result<Accuracy>
    where
        S: SampleSource + ?Sized,
        T: Trigger + ?Sized,
    {
        trigger.set_mode(TriggerMode::EvalBackdoor);
        self.run(Phase::Back, epoch, model, source, trigger, rng, Self::score_backdoor_batch)
    }

    #[allow(clippy::too_many_arguments)]
    fn run<S, T, F>(
        &self,
        phase: Phase,
        epoch: usize,
        model: &dyn Classifier,
        source: &S,
        trigger: &T,
        rng: &mut dyn RngCore,
        score: F,
    ) -> Result<Accuracy>
    where
        S: SampleSource + ?Sized,
        T: Trigger + ?Sized,
        F: Fn(&dyn Classifier, &Batch) -> Result<Accuracy>,
    {
        let total_batches = self.loader.num_batches(source.len());
        let mut progress = PassProgress::new(phase, epoch, total_batches, self.show_progress);
        let mut accuracy = Accuracy::new();

        for (i, batch) in self.loader.iter(source, trigger, rng).enumerate() {
            accuracy.merge(&score(model, &batch?)?);
            progress.update(i + 1, accuracy.value());
        }
        progress.finish();

        debug!(
            epoch,
            phase = phase.name(),
            correct = accuracy.correct,
            total = accuracy.total,
            "eval pass complete"
        );
        Ok(accuracy)
    }
}
