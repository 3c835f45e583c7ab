//! Datasets, poison composition and batch loading

mod dataset;
mod loader;
mod npy;
mod poison;
mod sample;
mod transform;

pub use dataset::ImageDataset;
pub use loader::{Batch, BatchRecord, Batches, DataLoader};
pub use npy::{read_image_array, read_index_array, read_pattern_array};
pub use poison::{PoisonIndexSet, PoisonedDatasetBuilder, PoisonedTrainingSet};
pub use sample::{Sample, SampleSource};
pub use transform::Transform;
