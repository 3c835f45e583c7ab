//! Train-time image augmentation

use ndarray::{s, Array3};
use rand::{Rng, RngCore};

/// Random crop with zero padding and random horizontal flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transform {
    /// Zero padding on every side before cropping back to size (0 disables)
    pub crop_padding: usize,
    /// Flip horizontally with probability 0.5
    pub flip: bool,
}

impl Transform {
    /// Leaves images untouched
    pub fn identity() -> Self {
        Self::default()
    }

    /// Standard training augmentation: pad-4 crop and/or flip
    pub fn train(crop: bool, flip: bool) -> Self {
        Self {
            crop_padding: if crop { 4 } else { 0 },
            flip,
        }
    }

    /// Whether this transform never changes an image
    pub fn is_identity(&self) -> bool {
        self.crop_padding == 0 && !self.flip
    }

    /// Apply to an H×W×C image
    pub fn apply(&self, image: Array3<f32>, rng: &mut dyn RngCore) -> Array3<f32> {
        let mut image = image;

        if self.crop_padding > 0 {
            let pad = self.crop_padding as i64;
            let dy = rng.random_range(-pad..=pad) as isize;
            let dx = rng.random_range(-pad..=pad) as isize;
            image = shift(&image, dy, dx);
        }

        if self.flip && rng.random_bool(0.5) {
            image = image.slice(s![.., ..;-1, ..]).to_owned();
        }

        image
    }
}

/// Translate by (dy, dx), filling uncovered pixels with zeros
///
/// Equivalent to padding with zeros and cropping at offset (pad + dy, pad + dx).
fn shift(image: &Array3<f32>, dy: isize, dx: isize) -> Array3<f32> {
    let (h, w, _) = image.dim();
    let mut out = Array3::zeros(image.raw_dim());

    for y in 0..h {
        let sy = y as isize + dy;
        if sy < 0 || sy >= h as isize {
            continue;
        }
        for x in 0..w {
            let sx = x as isize + dx;
            if sx < 0 || sx >= w as isize {
                continue;
            }
            out.slice_mut(s![y, x, ..])
                .assign(&image.slice(s![sy as usize, sx as usize, ..]));
        }
    }

    out
}
