//! Sample type and the indexed-source abstraction

use crate::Result;
use ndarray::Array3;

/// A single labelled image
///
/// `index` is the sample's position in the dataset it was read from. For a
/// poisoned training set, positions at or beyond the clean length belong to
/// the appended poison tail.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Image as H×W×C, values in [0, 1]
    pub image: Array3<f32>,
    /// Class id
    pub label: usize,
    /// Position in the source dataset
    pub index: usize,
}

impl Sample {
    /// Create a new sample
    pub fn new(image: Array3<f32>, label: usize, index: usize) -> Self {
        Self { image, label, index }
    }

    /// Image geometry as (height, width, channels)
    pub fn shape(&self) -> (usize, usize, usize) {
        self.image.dim()
    }
}

/// Random-access dataset yielding owned samples
pub trait SampleSource {
    /// Number of samples
    fn len(&self) -> usize;

    /// Whether the source holds no samples
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the sample at `position`
    fn sample(&self, position: usize) -> Result<Sample>;

    /// Index of the backing sample in the underlying clean arena
    fn origin(&self, position: usize) -> usize {
        position
    }
}
