//! Built-in per-dataset settings

use serde::Serialize;

/// Geometry and augmentation of a supported dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSettings {
    /// Square image side in pixels
    pub img_size: usize,
    /// Image channels
    pub channels: usize,
    /// Number of classes
    pub num_classes: usize,
    /// Size of the clean training set
    pub num_data: usize,
    /// Random crop with padding during training
    pub crop: bool,
    /// Random horizontal flip during training
    pub flip: bool,
}

impl DatasetSettings {
    /// Features of one flattened image
    pub fn input_dim(&self) -> usize {
        self.img_size * self.img_size * self.channels
    }
}

/// Names accepted by [`dataset_settings`]
pub const DATASET_NAMES: [&str; 4] = ["cifar10", "cifar100", "gtsrb", "tiny_imagenet"];

/// Settings for `name`, if it is a supported dataset
pub fn dataset_settings(name: &str) -> Option<DatasetSettings> {
    let settings = match name {
        "cifar10" => DatasetSettings {
            img_size: 32,
            channels: 3,
            num_classes: 10,
            num_data: 50_000,
            crop: true,
            flip: true,
        },
        "cifar100" => DatasetSettings {
            img_size: 32,
            channels: 3,
            num_classes: 100,
            num_data: 50_000,
            crop: true,
            flip: true,
        },
        // Traffic signs are not mirror-symmetric
        "gtsrb" => DatasetSettings {
            img_size: 32,
            channels: 3,
            num_classes: 43,
            num_data: 39_209,
            crop: true,
            flip: false,
        },
        "tiny_imagenet" => DatasetSettings {
            img_size: 64,
            channels: 3,
            num_classes: 200,
            num_data: 100_000,
            crop: true,
            flip: true,
        },
        _ => return None,
    };
    Some(settings)
}
