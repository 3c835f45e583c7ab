//! Single-command transfer run from a configuration

use super::loader::{metrics_path, poison_index_path, run_name};
use super::schema::TransferSpec;
use super::settings::{dataset_settings, DatasetSettings};
use super::validate::validate_config;
use crate::attack::{build_trigger, AttackKind, BackdoorTrigger, TriggerMode, TriggerSpec};
use crate::data::{
    read_pattern_array, DataLoader, ImageDataset, PoisonIndexSet, PoisonedDatasetBuilder,
    PoisonedTrainingSet, SampleSource, Transform,
};
use crate::error::{Error, Result};
use crate::model::{build_model, ModelKind};
use crate::optim::{MultiStepLR, SGD};
use crate::train::{Evaluator, MetricsRecorder, Trainer, TransferSession};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything loaded and built before the first epoch
#[derive(Debug)]
pub struct PreparedRun {
    /// `{data}_{model}_{attack}_{target}_{samples_idx}`
    pub name: String,
    /// Dataset geometry and augmentation
    pub settings: DatasetSettings,
    /// Clean training set followed by the poison carriers
    pub train_set: PoisonedTrainingSet,
    /// Test set
    pub test_set: ImageDataset,
    /// Trigger in train mode
    pub trigger: BackdoorTrigger,
}

/// Outcome of a completed run
#[derive(Debug)]
pub struct TransferReport {
    /// Run name
    pub name: String,
    /// Where the metrics table was written
    pub metrics_path: PathBuf,
    /// Number of appended poison carriers
    pub poison_len: usize,
    /// One row per epoch
    pub recorder: MetricsRecorder,
}

/// Validate `spec`, load the datasets and poison indices, and build the trigger
pub fn prepare_run(spec: &TransferSpec) -> Result<PreparedRun> {
    validate_config(spec)?;

    let settings = dataset_settings(&spec.data.name)
        .ok_or_else(|| Error::Config(format!("Unknown dataset: {}", spec.data.name)))?;
    let attack: AttackKind = spec.attack.name.parse().map_err(Error::Config)?;
    let name = run_name(spec);
    info!(run = %name, "transfer");

    let clean = ImageDataset::load_split(&spec.data.path, &spec.data.name, true)?;
    let test_set = ImageDataset::load_split(&spec.data.path, &spec.data.name, false)?;
    check_geometry(&settings, &clean, "train")?;
    check_geometry(&settings, &test_set, "test")?;
    if clean.len() != settings.num_data {
        warn!(
            expected = settings.num_data,
            found = clean.len(),
            "training set size differs from the dataset table"
        );
    }

    let indices = PoisonIndexSet::from_npy(poison_index_path(spec))?;
    info!(poisoned = indices.len(), "poisoned samples loaded");
    let train_set = PoisonedDatasetBuilder::new()
        .require_non_empty(spec.poison.require_non_empty)
        .build(clean, &indices)?;

    let pattern = spec
        .attack
        .trigger
        .as_ref()
        .map(|path| read_pattern_array(path))
        .transpose()?;
    let trigger = build_trigger(TriggerSpec {
        attack,
        img_size: settings.img_size,
        channels: settings.channels,
        num_data: train_set.clean_len(),
        mode: TriggerMode::Train,
        target: spec.attack.target,
        pattern,
        train_prob: spec.attack.train_prob,
    })?;
    info!(
        attack = %trigger.attack(),
        target = spec.attack.target,
        carriers = train_set.poison_len(),
        "trigger ready"
    );

    Ok(PreparedRun {
        name,
        settings,
        train_set,
        test_set,
        trigger,
    })
}

fn check_geometry(settings: &DatasetSettings, data: &ImageDataset, split: &str) -> Result<()> {
    let expected = (settings.img_size, settings.img_size, settings.channels);
    if data.image_shape() != expected {
        return Err(Error::Config(format!(
            "{split} images have shape {:?}, expected {:?}",
            data.image_shape(),
            expected
        )));
    }
    Ok(())
}

/// Run the full experiment described by `spec` and write the metrics table
///
/// # Example
///
/// ```no_run
/// use backdoor_transfer::config::{load_config, transfer_from_spec};
///
/// let spec = load_config("transfer.yaml")?;
/// let report = transfer_from_spec(&spec)?;
/// println!("{}", report.metrics_path.display());
/// # Ok::<(), backdoor_transfer::Error>(())
/// ```
pub fn transfer_from_spec(spec: &TransferSpec) -> Result<TransferReport> {
    let PreparedRun {
        name,
        settings,
        train_set,
        test_set,
        mut trigger,
    } = prepare_run(spec)?;

    let kind: ModelKind = spec.model.name.parse().map_err(Error::Config)?;
    let mut rng = StdRng::seed_from_u64(spec.training.seed);
    let mut model = build_model(
        kind,
        settings.input_dim(),
        settings.num_classes,
        spec.model.hidden,
        spec.model.dropout,
        &mut rng,
    )?;

    let optimizer = SGD::new(spec.optimizer.lr, spec.optimizer.momentum)
        .with_weight_decay(spec.optimizer.weight_decay);
    let scheduler = MultiStepLR::new(
        spec.optimizer.lr,
        spec.scheduler.milestones.clone(),
        spec.scheduler.gamma,
    );
    let train_loader = DataLoader::new(spec.data.batch_size)
        .with_shuffle(true)
        .with_transform(Transform::train(settings.crop, settings.flip));
    let trainer =
        Trainer::new(Box::new(optimizer), train_loader).with_scheduler(Box::new(scheduler));
    let evaluator = Evaluator::new(DataLoader::new(spec.data.batch_size));

    info!(
        model = %kind,
        train = train_set.len(),
        poison = train_set.poison_len(),
        test = test_set.len(),
        epochs = spec.training.epochs,
        "starting transfer"
    );
    let recorder = TransferSession::new(trainer, evaluator, spec.training.epochs)
        .with_progress(!spec.output.disable)
        .run(model.as_mut(), &train_set, &test_set, &mut trigger, &mut rng)?;

    let metrics_path = metrics_path(spec);
    recorder.save_csv(&metrics_path)?;
    info!(path = %metrics_path.display(), "metrics saved");

    Ok(TransferReport {
        name,
        metrics_path,
        poison_len: train_set.poison_len(),
        recorder,
    })
}
