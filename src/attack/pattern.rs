//! Trigger patterns and how they are imprinted

use super::mode::AttackKind;
use crate::{Error, Result};
use ndarray::{s, Array3, Zip};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

/// Blend ratio used by the blended attack
pub const BLEND_ALPHA: f32 = 0.2;

/// Amplitude of the SIG signal
pub const SIG_DELTA: f32 = 20.0 / 255.0;

/// Periods of the SIG signal across the image width
pub const SIG_FREQUENCY: f32 = 6.0;

/// Seed of the generated blend pattern
const BLEND_SEED: u64 = 0;

/// Pixel pattern of a backdoor trigger
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerPattern {
    /// Patch pasted into the bottom-right corner
    Patch { patch: Array3<f32> },
    /// Full-size pattern blended as `(1 - alpha) * x + alpha * pattern`
    Blend { pattern: Array3<f32>, alpha: f32 },
    /// Additive horizontal sinusoid
    Signal { delta: f32, frequency: f32 },
}

impl TriggerPattern {
    /// Default pattern for an attack on `img_size`×`img_size`×`channels` images
    pub fn generate(kind: AttackKind, img_size: usize, channels: usize) -> Self {
        match kind {
            AttackKind::BadNets => {
                let size = (img_size / 10).max(3).min(img_size);
                let patch = Array3::from_shape_fn((size, size, channels), |(y, x, _)| {
                    ((y + x + 1) % 2) as f32
                });
                Self::Patch { patch }
            }
            AttackKind::Blend => {
                let mut rng = StdRng::seed_from_u64(BLEND_SEED);
                let pattern = Array3::from_shape_simple_fn((img_size, img_size, channels), || {
                    rng.random::<f32>()
                });
                Self::Blend {
                    pattern,
                    alpha: BLEND_ALPHA,
                }
            }
            AttackKind::Sig => Self::Signal {
                delta: SIG_DELTA,
                frequency: SIG_FREQUENCY,
            },
        }
    }

    /// Pattern for an attack using pixels loaded from a file
    pub fn from_pixels(
        kind: AttackKind,
        pixels: Array3<f32>,
        img_size: usize,
        channels: usize,
    ) -> Result<Self> {
        let (h, w, c) = pixels.dim();
        if c != channels {
            return Err(Error::Config(format!(
                "Trigger pattern has {c} channels, images have {channels}"
            )));
        }
        if pixels.iter().any(|v| !v.is_finite()) {
            return Err(Error::Config(
                "Trigger pattern contains non-finite pixels".to_string(),
            ));
        }

        match kind {
            AttackKind::BadNets => {
                if h == 0 || h != w || h > img_size {
                    return Err(Error::Config(format!(
                        "BadNets patch must be square and at most {img_size}px, got {h}x{w}"
                    )));
                }
                Ok(Self::Patch { patch: pixels })
            }
            AttackKind::Blend => {
                if h != img_size || w != img_size {
                    return Err(Error::Config(format!(
                        "Blend pattern must be {img_size}x{img_size}, got {h}x{w}"
                    )));
                }
                Ok(Self::Blend {
                    pattern: pixels,
                    alpha: BLEND_ALPHA,
                })
            }
            AttackKind::Sig => Err(Error::Config(
                "SIG trigger is generated and does not take a pattern file".to_string(),
            )),
        }
    }

    /// Imprint onto an image; the result is clamped to [0, 1]
    ///
    /// Fails with [`Error::InvalidSample`] when the image cannot hold the
    /// pattern.
    pub fn imprint(&self, image: &Array3<f32>) -> Result<Array3<f32>> {
        let mut out = image.clone();
        let (h, w, c) = image.dim();

        match self {
            Self::Patch { patch } => {
                let (ph, pw, pc) = patch.dim();
                if ph > h || pw > w || pc != c {
                    return Err(Error::InvalidSample(format!(
                        "{ph}x{pw}x{pc} patch does not fit a {h}x{w}x{c} image"
                    )));
                }
                out.slice_mut(s![h - ph.., w - pw.., ..]).assign(patch);
            }
            Self::Blend { pattern, alpha } => {
                if pattern.dim() != image.dim() {
                    return Err(Error::InvalidSample(format!(
                        "blend pattern {:?} does not match image {:?}",
                        pattern.dim(),
                        image.dim()
                    )));
                }
                Zip::from(&mut out)
                    .and(pattern)
                    .for_each(|x, &p| *x = (1.0 - alpha) * *x + alpha * p);
            }
            Self::Signal { delta, frequency } => {
                for ((_, x, _), v) in out.indexed_iter_mut() {
                    *v += delta * (2.0 * PI * x as f32 * frequency / w as f32).sin();
                }
            }
        }

        out.mapv_inplace(|v| v.clamp(0.0, 1.0));
        Ok(out)
    }
}
