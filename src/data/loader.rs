//! Batching, shuffling and collation
//!
//! The trigger is applied per sample at yield time, so the backdoor flag of
//! each record reflects the trigger's mode when the batch was produced.

use super::sample::SampleSource;
use super::transform::Transform;
use crate::attack::Trigger;
use crate::{Error, Result};
use ndarray::{stack, Array2, Array3, Array4, ArrayView3, Axis};
use rand::seq::SliceRandom;
use rand::RngCore;

/// One yielded item: `(image, label, backdoor_flag, sample_id, aux_id)`
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecord {
    /// Image after trigger and transform
    pub image: Array3<f32>,
    /// Label after trigger
    pub label: usize,
    /// Whether this row counts toward backdoor accuracy
    pub backdoor: bool,
    /// Position in the iterated dataset
    pub sample_id: usize,
    /// Row of the backing clean sample
    pub aux_id: usize,
}

/// A collated batch with row-aligned columns
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// N×H×W×C images
    pub images: Array4<f32>,
    /// Labels
    pub labels: Vec<usize>,
    /// Backdoor eligibility flags
    pub backdoor: Vec<bool>,
    /// Positions in the iterated dataset
    pub sample_ids: Vec<usize>,
    /// Rows of the backing clean samples
    pub aux_ids: Vec<usize>,
}

impl Batch {
    /// Collate records; all images must share one shape
    pub fn from_records(records: Vec<BatchRecord>) -> Result<Self> {
        let first = records
            .first()
            .ok_or_else(|| Error::InvalidSample("cannot collate an empty batch".to_string()))?;
        let shape = first.image.dim();
        if let Some(bad) = records.iter().find(|r| r.image.dim() != shape) {
            return Err(Error::InvalidSample(format!(
                "sample {} has shape {:?}, batch has {:?}",
                bad.sample_id,
                bad.image.dim(),
                shape
            )));
        }

        let views: Vec<ArrayView3<'_, f32>> = records.iter().map(|r| r.image.view()).collect();
        let images = stack(Axis(0), &views).map_err(|e| Error::InvalidSample(e.to_string()))?;

        Ok(Self {
            images,
            labels: records.iter().map(|r| r.label).collect(),
            backdoor: records.iter().map(|r| r.backdoor).collect(),
            sample_ids: records.iter().map(|r| r.sample_id).collect(),
            aux_ids: records.iter().map(|r| r.aux_id).collect(),
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Images flattened to N×(H·W·C) model inputs
    pub fn inputs(&self) -> Result<Array2<f32>> {
        let (n, h, w, c) = self.images.dim();
        self.images
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((n, h * w * c))
            .map_err(|e| Error::InvalidSample(e.to_string()))
    }

    /// Keep only rows whose backdoor flag is set, preserving row alignment
    pub fn backdoor_rows(&self) -> Self {
        let keep: Vec<usize> = (0..self.len()).filter(|&i| self.backdoor[i]).collect();
        self.select(&keep)
    }

    fn select(&self, rows: &[usize]) -> Self {
        let images = if rows.is_empty() {
            let (_, h, w, c) = self.images.dim();
            Array4::zeros((0, h, w, c))
        } else {
            self.images.select(Axis(0), rows)
        };
        Self {
            images,
            labels: rows.iter().map(|&i| self.labels[i]).collect(),
            backdoor: rows.iter().map(|&i| self.backdoor[i]).collect(),
            sample_ids: rows.iter().map(|&i| self.sample_ids[i]).collect(),
            aux_ids: rows.iter().map(|&i| self.aux_ids[i]).collect(),
        }
    }
}

/// Batch iterator factory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataLoader {
    batch_size: usize,
    shuffle: bool,
    transform: Transform,
}

impl DataLoader {
    /// Sequential loader without augmentation
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            shuffle: false,
            transform: Transform::identity(),
        }
    }

    /// Shuffle positions at the start of every pass
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Augmentation applied after the trigger
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Rows per batch
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches for a dataset of `len` samples
    pub fn num_batches(&self, len: usize) -> usize {
        len.div_ceil(self.batch_size)
    }

    /// Iterate one pass over `source`
    pub fn iter<'a, S, T>(
        &'a self,
        source: &'a S,
        trigger: &'a T,
        rng: &'a mut dyn RngCore,
    ) -> Batches<'a, S, T>
    where
        S: SampleSource + ?Sized,
        T: Trigger + ?Sized,
    {
        let mut order: Vec<usize> = (0..source.len()).collect();
        if self.shuffle {
            order.shuffle(rng);
        }
        Batches {
            loader: self,
            source,
            trigger,
            rng,
            order,
            cursor: 0,
        }
    }
}

/// Iterator over one pass of batches
pub struct Batches<'a, S: ?Sized, T: ?Sized> {
    loader: &'a DataLoader,
    source: &'a S,
    trigger: &'a T,
    rng: &'a mut dyn RngCore,
    order: Vec<usize>,
    cursor: usize,
}

impl<S, T> Batches<'_, S, T>
where
    S: SampleSource + ?Sized,
    T: Trigger + ?Sized,
{
    fn next_batch(&mut self, positions: &[usize]) -> Result<Batch> {
        let mut records = Vec::with_capacity(positions.len());
        for &position in positions {
            let sample = self.source.sample(position)?;
            let aux_id = self.source.origin(position);
            let (sample, backdoor) = self.trigger.apply(sample, self.rng)?;
            let image = self.loader.transform.apply(sample.image, self.rng);
            records.push(BatchRecord {
                image,
                label: sample.label,
                backdoor,
                sample_id: position,
                aux_id,
            });
        }
        Batch::from_records(records)
    }
}

impl<S, T> Iterator for Batches<'_, S, T>
where
    S: SampleSource + ?Sized,
    T: Trigger + ?Sized,
{
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.order.len() {
            return None;
        }
        let end = (self.cursor + self.loader.batch_size).min(self.order.len());
        let positions = self.order[self.cursor..end].to_vec();
        self.cursor = end;
        Some(self.next_batch(&positions))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.order.len() - self.cursor).div_ceil(self.loader.batch_size);
        (remaining, Some(remaining))
    }
}
