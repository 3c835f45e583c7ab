//! The epoch loop: train, clean validation, backdoor validation, record

use super::evaluator::Evaluator;
use super::recorder::{EpochMetrics, MetricsRecorder};
use super::trainer::Trainer;
use crate::attack::Trigger;
use crate::data::SampleSource;
use crate::model::Classifier;
use crate::Result;
use rand::RngCore;
use tracing::info;

/// Runs a fixed number of epochs and collects one metrics row per epoch
///
/// When progress bars are hidden, each epoch prints a one-line summary to
/// stdout instead.
pub struct TransferSession {
    trainer: Trainer,
    evaluator: Evaluator,
    epochs: usize,
    show_progress: bool,
    recorder: MetricsRecorder,
}

impl TransferSession {
    /// Session over `epochs` epochs
    pub fn new(trainer: Trainer, evaluator: Evaluator, epochs: usize) -> Self {
        Self {
            trainer,
            evaluator,
            epochs,
            show_progress: false,
            recorder: MetricsRecorder::new(),
        }
    }

    /// Progress bars on stderr instead of summary lines
    pub fn with_progress(mut self, show: bool) -> Self {
        self.trainer = self.trainer.with_progress(show);
        self.evaluator = self.evaluator.with_progress(show);
        self.show_progress = show;
        self
    }

    /// Number of epochs to run
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Rows recorded so far
    pub fn recorder(&self) -> &MetricsRecorder {
        &self.recorder
    }

    /// Run one epoch and record its row
    pub fn run_epoch<S, V, T>(
        &mut self,
        epoch: usize,
        model: &mut dyn Classifier,
        train_set: &S,
        test_set: &V,
        trigger: &mut T,
        rng: &mut dyn RngCore,
    ) -> Result<EpochMetrics>
    where
        S: SampleSource + ?Sized,
        V: SampleSource + ?Sized,
        T: Trigger + ?Sized,
    {
        let train = self.trainer.train_epoch(epoch, model, train_set, trigger, rng)?;
        let model: &dyn Classifier = model;
        let val = self.evaluator.clean_pass(epoch, model, test_set, trigger, rng)?;
        let back = self.evaluator.backdoor_pass(epoch, model, test_set, trigger, rng)?;

        let metrics = EpochMetrics::new(epoch, train.value(), val.value(), back.value());
        self.recorder.record(metrics)?;

        info!(
            epoch,
            train_acc = metrics.train_acc,
            val_acc = metrics.val_acc,
            back_acc = metrics.back_acc,
            lr = self.trainer.lr(),
            "epoch complete"
        );
        if !self.show_progress {
            println!("{}", metrics.summary());
        }
        Ok(metrics)
    }

    /// Run every epoch, returning the full table
    pub fn run<S, V, T>(
        mut self,
        model: &mut dyn Classifier,
        train_set: &S,
        test_set: &V,
        trigger: &mut T,
        rng: &mut dyn RngCore,
    ) -> Result<MetricsRecorder>
    where
        S: SampleSource + ?Sized,
        V: SampleSource + ?Sized,
        T: Trigger + ?Sized,
    {
        for epoch in 0..self.epochs {
            self.run_epoch(epoch, model, train_set, test_set, trigger, rng)?;
        }
        Ok(self.recorder)
    }
}
