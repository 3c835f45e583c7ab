//! In-memory image dataset

use super::npy::{read_image_array, read_index_array};
use super::sample::{Sample, SampleSource};
use crate::{Error, Result};
use ndarray::{Array4, ArrayView3, Axis};
use std::path::Path;

/// Labelled images held as one N×H×W×C arena
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDataset {
    images: Array4<f32>,
    labels: Vec<usize>,
}

impl ImageDataset {
    /// Create a dataset from an image arena and matching labels
    pub fn new(images: Array4<f32>, labels: Vec<usize>) -> Result<Self> {
        if images.len_of(Axis(0)) != labels.len() {
            return Err(Error::InvalidSample(format!(
                "{} images but {} labels",
                images.len_of(Axis(0)),
                labels.len()
            )));
        }
        Ok(Self { images, labels })
    }

    /// Load `images.npy` / `labels.npy` style pairs
    pub fn from_npy(images_path: impl AsRef<Path>, labels_path: impl AsRef<Path>) -> Result<Self> {
        let images = read_image_array(images_path)?;
        let labels = read_index_array(labels_path)?;
        Self::new(images, labels)
    }

    /// Load the train or test split of `data_name` under `data_path`
    ///
    /// Expects `{data_path}/{data_name}/{split}_images.npy` and
    /// `{data_path}/{data_name}/{split}_labels.npy`.
    pub fn load_split(data_path: &Path, data_name: &str, train: bool) -> Result<Self> {
        let split = if train { "train" } else { "test" };
        let dir = data_path.join(data_name);
        Self::from_npy(
            dir.join(format!("{split}_images.npy")),
            dir.join(format!("{split}_labels.npy")),
        )
    }

    /// Image geometry as (height, width, channels)
    pub fn image_shape(&self) -> (usize, usize, usize) {
        let (_, h, w, c) = self.images.dim();
        (h, w, c)
    }

    /// All labels in order
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Borrow the image at `index`
    pub fn image(&self, index: usize) -> Option<ArrayView3<'_, f32>> {
        (index < self.labels.len()).then(|| self.images.index_axis(Axis(0), index))
    }

    /// Largest label plus one
    pub fn num_classes_observed(&self) -> usize {
        self.labels.iter().max().map_or(0, |&m| m + 1)
    }
}

impl SampleSource for ImageDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn sample(&self, position: usize) -> Result<Sample> {
        let image = self.image(position).ok_or(Error::IndexOutOfRange {
            index: position,
            len: self.labels.len(),
        })?;
        Ok(Sample::new(image.to_owned(), self.labels[position], position))
    }
}
