//! Mode-aware backdoor trigger

use super::mode::{AttackKind, TriggerMode};
use super::pattern::TriggerPattern;
use crate::data::Sample;
use crate::{Error, Result};
use ndarray::Array3;
use rand::{Rng, RngCore};

/// Capability shared by every attack's trigger
pub trait Trigger {
    /// Current mode
    fn mode(&self) -> TriggerMode;

    /// Switch mode; takes effect on the next `apply`
    fn set_mode(&mut self, mode: TriggerMode);

    /// Switch mode from its numeric code
    fn set_mode_code(&mut self, code: i64) -> Result<()> {
        self.set_mode(TriggerMode::try_from(code)?);
        Ok(())
    }

    /// Attack target class
    fn target(&self) -> usize;

    /// Process one sample under the current mode
    ///
    /// Returns the possibly modified sample and whether it counts toward
    /// backdoor accuracy.
    fn apply(&self, sample: Sample, rng: &mut dyn RngCore) -> Result<(Sample, bool)>;
}

/// Everything the trigger factory needs
#[derive(Debug, Clone)]
pub struct TriggerSpec {
    /// Which attack
    pub attack: AttackKind,
    /// Square image side in pixels
    pub img_size: usize,
    /// Image channels
    pub channels: usize,
    /// Size of the clean training set; positions beyond it are poison carriers
    pub num_data: usize,
    /// Initial mode
    pub mode: TriggerMode,
    /// Attack target class
    pub target: usize,
    /// Pattern pixels overriding the generated pattern
    pub pattern: Option<Array3<f32>>,
    /// Probability of imprinting a carrier in train mode
    pub train_prob: f32,
}

impl TriggerSpec {
    /// Spec with a generated pattern, train mode and `train_prob = 1.0`
    pub fn new(
        attack: AttackKind,
        img_size: usize,
        channels: usize,
        num_data: usize,
        target: usize,
    ) -> Self {
        Self {
            attack,
            img_size,
            channels,
            num_data,
            mode: TriggerMode::Train,
            target,
            pattern: None,
            train_prob: 1.0,
        }
    }
}

/// Build the trigger for `spec.attack`
pub fn build_trigger(spec: TriggerSpec) -> Result<BackdoorTrigger> {
    if spec.img_size == 0 || spec.channels == 0 {
        return Err(Error::Config(format!(
            "Invalid trigger geometry {}x{}x{}",
            spec.img_size, spec.img_size, spec.channels
        )));
    }
    if !(0.0..=1.0).contains(&spec.train_prob) {
        return Err(Error::Config(format!(
            "Invalid train_prob: {} (must be in [0.0, 1.0])",
            spec.train_prob
        )));
    }

    let pattern = match spec.pattern {
        Some(pixels) => {
            TriggerPattern::from_pixels(spec.attack, pixels, spec.img_size, spec.channels)?
        }
        None => TriggerPattern::generate(spec.attack, spec.img_size, spec.channels),
    };

    Ok(BackdoorTrigger {
        attack: spec.attack,
        pattern,
        img_size: spec.img_size,
        channels: spec.channels,
        num_data: spec.num_data,
        mode: spec.mode,
        target: spec.target,
        train_prob: spec.train_prob,
    })
}

/// Trigger for any [`AttackKind`]
#[derive(Debug, Clone)]
pub struct BackdoorTrigger {
    attack: AttackKind,
    pattern: TriggerPattern,
    img_size: usize,
    channels: usize,
    num_data: usize,
    mode: TriggerMode,
    target: usize,
    train_prob: f32,
}

impl BackdoorTrigger {
    /// Which attack this trigger implements
    pub fn attack(&self) -> AttackKind {
        self.attack
    }

    /// Imprint the pattern regardless of mode
    pub fn imprint(&self, image: &Array3<f32>) -> Result<Array3<f32>> {
        self.check_image(image)?;
        self.pattern.imprint(image)
    }

    fn check_image(&self, image: &Array3<f32>) -> Result<()> {
        let expected = (self.img_size, self.img_size, self.channels);
        if image.dim() != expected {
            return Err(Error::InvalidSample(format!(
                "image shape {:?}, trigger expects {:?}",
                image.dim(),
                expected
            )));
        }
        if image.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidSample("image contains non-finite values".to_string()));
        }
        Ok(())
    }
}

impl Trigger for BackdoorTrigger {
    fn mode(&self) -> TriggerMode {
        self.mode
    }

    fn set_mode(&mut self, mode: TriggerMode) {
        self.mode = mode;
    }

    fn target(&self) -> usize {
        self.target
    }

    fn apply(&self, sample: Sample, rng: &mut dyn RngCore) -> Result<(Sample, bool)> {
        self.check_image(&sample.image)?;

        match self.mode {
            TriggerMode::Train => {
                let carrier = sample.index >= self.num_data;
                if carrier && rng.random::<f32>() < self.train_prob {
                    let image = self.pattern.imprint(&sample.image)?;
                    Ok((Sample { image, ..sample }, true))
                } else {
                    Ok((sample, false))
                }
            }
            TriggerMode::EvalClean => Ok((sample, false)),
            TriggerMode::EvalBackdoor => {
                let eligible = sample.label != self.target;
                let image = self.pattern.imprint(&sample.image)?;
                Ok((
                    Sample {
                        image,
                        label: self.target,
                        index: sample.index,
                    },
                    eligible,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn trigger(num_data: usize) -> BackdoorTrigger {
        build_trigger(TriggerSpec::new(AttackKind::BadNets, 8, 3, num_data, 0)).unwrap()
    }

    fn sample(label: usize, index: usize) -> Sample {
        Sample::new(Array3::from_elem((8, 8, 3), 0.5), label, index)
    }

    #[test]
    fn test_eval_clean_never_imprints() {
        let mut t = trigger(10);
        t.set_mode(TriggerMode::EvalClean);
        let mut rng = StdRng::seed_from_u64(0);
        for index in [0, 5, 12] {
            let (out, flag) = t.apply(sample(3, index), &mut rng).unwrap();
            assert_eq!(out, sample(3, index));
            assert!(!flag);
        }
    }

    #[test]
    fn test_eval_backdoor_imprints_and_relabels() {
        let mut t = trigger(10);
        t.set_mode(TriggerMode::EvalBackdoor);
        let mut rng = StdRng::seed_from_u64(0);

        let (out, flag) = t.apply(sample(4, 1), &mut rng).unwrap();
        assert!(flag);
        assert_eq!(out.label, 0);
        assert_eq!(out.image, t.imprint(&sample(4, 1).image).unwrap());
    }

    #[test]
    fn test_eval_backdoor_excludes_target_class() {
        let mut t = trigger(10);
        t.set_mode(TriggerMode::EvalBackdoor);
        let mut rng = StdRng::seed_from_u64(0);
        let (_, flag) = t.apply(sample(0, 1), &mut rng).unwrap();
        assert!(!flag);
    }

    #[test]
    fn test_train_mode_only_touches_carriers() {
        let t = trigger(10);
        let mut rng = StdRng::seed_from_u64(0);

        let (clean, flag) = t.apply(sample(3, 9), &mut rng).unwrap();
        assert!(!flag);
        assert_eq!(clean, sample(3, 9));

        let (carrier, flag) = t.apply(sample(3, 10), &mut rng).unwrap();
        assert!(flag);
        assert_eq!(carrier.label, 3);
        assert_ne!(carrier.image, sample(3, 10).image);
    }

    #[test]
    fn test_train_prob_zero_never_imprints() {
        let mut spec = TriggerSpec::new(AttackKind::Blend, 8, 3, 2, 1);
        spec.train_prob = 0.0;
        let t = build_trigger(spec).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for index in 2..20 {
            let (_, flag) = t.apply(sample(2, index), &mut rng).unwrap();
            assert!(!flag);
        }
    }

    #[test]
    fn test_train_prob_is_stochastic() {
        let mut spec = TriggerSpec::new(AttackKind::BadNets, 8, 3, 0, 1);
        spec.train_prob = 0.5;
        let t = build_trigger(spec).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let hits = (0..200)
            .filter(|&i| t.apply(sample(2, i), &mut rng).unwrap().1)
            .count();
        assert!(hits > 50 && hits < 150, "hits = {hits}");
    }

    #[test]
    fn test_set_mode_idempotent() {
        let mut once = trigger(10);
        let mut twice = trigger(10);
        once.set_mode(TriggerMode::EvalBackdoor);
        twice.set_mode(TriggerMode::EvalBackdoor);
        twice.set_mode(TriggerMode::EvalBackdoor);

        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(1);
        assert_eq!(
            once.apply(sample(5, 2), &mut rng_a).unwrap(),
            twice.apply(sample(5, 2), &mut rng_b).unwrap()
        );
    }

    #[test]
    fn test_non_finite_pattern_file_rejected() {
        let mut spec = TriggerSpec::new(AttackKind::BadNets, 8, 3, 10, 0);
        let mut patch = Array3::from_elem((3, 3, 3), 1.0);
        patch[[0, 0, 1]] = f32::NAN;
        spec.pattern = Some(patch);
        assert!(matches!(build_trigger(spec), Err(Error::Config(_))));
    }

    #[test]
    fn test_reports_attack() {
        assert_eq!(trigger(10).attack(), AttackKind::BadNets);
    }

    #[test]
    fn test_set_mode_code_rejects_unknown() {
        let mut t = trigger(10);
        assert!(matches!(t.set_mode_code(9), Err(Error::InvalidMode(9))));
        assert_eq!(t.mode(), TriggerMode::Train);
        t.set_mode_code(1).unwrap();
        assert_eq!(t.mode(), TriggerMode::EvalClean);
    }

    #[test]
    fn test_malformed_sample_rejected() {
        let t = trigger(10);
        let mut rng = StdRng::seed_from_u64(0);
        let bad = Sample::new(Array3::zeros((4, 4, 3)), 1, 0);
        assert!(matches!(t.apply(bad, &mut rng), Err(Error::InvalidSample(_))));

        let mut nan = sample(1, 0);
        nan.image[[0, 0, 0]] = f32::NAN;
        assert!(matches!(t.apply(nan, &mut rng), Err(Error::InvalidSample(_))));
    }

    #[test]
    fn test_invalid_train_prob() {
        let mut spec = TriggerSpec::new(AttackKind::Sig, 8, 3, 0, 1);
        spec.train_prob = 1.5;
        assert!(matches!(build_trigger(spec), Err(Error::Config(_))));
    }
}
