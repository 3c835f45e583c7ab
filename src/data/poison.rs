//! Poison index set and the poisoned training set
//!
//! The poisoned set is `clean ++ clean[indices]`: the clean arena is kept as
//! is and an index list maps every logical position to a row of the arena.
//! Nothing is relabelled here; poison carriers keep their original labels.

use super::dataset::ImageDataset;
use super::npy::read_index_array;
use super::sample::{Sample, SampleSource};
use crate::{Error, Result};
use std::ops::Range;
use std::path::Path;

/// Ordered indices into the clean training set selecting poison carriers
///
/// Duplicates are meaningful and preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoisonIndexSet {
    indices: Vec<usize>,
}

impl PoisonIndexSet {
    /// Wrap an index list
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Load from a 1-D integer `.npy` file
    pub fn from_npy(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Config(format!(
                "Poison index file not found: {}",
                path.display()
            )));
        }
        Ok(Self::new(read_index_array(path)?))
    }

    /// Number of selected carriers
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no carrier is selected
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Indices in selection order
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

impl From<Vec<usize>> for PoisonIndexSet {
    fn from(indices: Vec<usize>) -> Self {
        Self::new(indices)
    }
}

/// Builds a [`PoisonedTrainingSet`] from a clean set and an index list
#[derive(Debug, Clone, Copy, Default)]
pub struct PoisonedDatasetBuilder {
    require_non_empty: bool,
}

impl PoisonedDatasetBuilder {
    /// Create a builder that accepts an empty index set
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`Error::EmptyIndexSet`] when no carrier is selected
    pub fn require_non_empty(mut self, required: bool) -> Self {
        self.require_non_empty = required;
        self
    }

    /// Compose `clean ++ clean[indices]`
    pub fn build(
        self,
        clean: ImageDataset,
        indices: &PoisonIndexSet,
    ) -> Result<PoisonedTrainingSet> {
        if self.require_non_empty && indices.is_empty() {
            return Err(Error::EmptyIndexSet);
        }

        let clean_len = clean.len();
        if let Some(&index) = indices.as_slice().iter().find(|&&i| i >= clean_len) {
            return Err(Error::IndexOutOfRange { index, len: clean_len });
        }

        let order = (0..clean_len).chain(indices.as_slice().iter().copied()).collect();

        Ok(PoisonedTrainingSet {
            arena: clean,
            order,
            clean_len,
        })
    }
}

/// Clean training set followed by duplicated poison carriers
#[derive(Debug, Clone)]
pub struct PoisonedTrainingSet {
    arena: ImageDataset,
    order: Vec<usize>,
    clean_len: usize,
}

impl PoisonedTrainingSet {
    /// Length of the clean head
    pub fn clean_len(&self) -> usize {
        self.clean_len
    }

    /// Number of appended carriers
    pub fn poison_len(&self) -> usize {
        self.order.len() - self.clean_len
    }

    /// Logical positions of the clean head
    pub fn clean_range(&self) -> Range<usize> {
        0..self.clean_len
    }

    /// Logical positions of the poison tail
    pub fn poison_range(&self) -> Range<usize> {
        self.clean_len..self.order.len()
    }

    /// Whether `position` lies in the poison tail
    pub fn is_poison(&self, position: usize) -> bool {
        self.poison_range().contains(&position)
    }

    /// The underlying clean dataset
    pub fn clean(&self) -> &ImageDataset {
        &self.arena
    }

    /// Label at a logical position
    pub fn label(&self, position: usize) -> Option<usize> {
        self.order.get(position).map(|&row| self.arena.labels()[row])
    }
}

impl SampleSource for PoisonedTrainingSet {
    fn len(&self) -> usize {
        self.order.len()
    }

    fn sample(&self, position: usize) -> Result<Sample> {
        let row = *self.order.get(position).ok_or(Error::IndexOutOfRange {
            index: position,
            len: self.order.len(),
        })?;
        let mut sample = self.arena.sample(row)?;
        sample.index = position;
        Ok(sample)
    }

    fn origin(&self, position: usize) -> usize {
        self.order.get(position).copied().unwrap_or(position)
    }
}
