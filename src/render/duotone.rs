//! Duotone transform engine.
//!
//! Maps each pixel's BT.601 luminance onto a gradient between a shadow and
//! a highlight colour, then blends that gradient colour with the original
//! pixel by an intensity factor. Every pixel is independent, so the pass
//! runs over disjoint RGBA chunks in parallel.

use log::debug;
use rayon::prelude::*;

use crate::error::Result;
use crate::types::{Bitmap, Colour, Intensity, CHANNELS};

/// BT.601 luma weights for R, G and B.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Weighted luminance of an RGB triple, in `[0, 255]`.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    LUMA_WEIGHTS[0] * f64::from(r) + LUMA_WEIGHTS[1] * f64::from(g) + LUMA_WEIGHTS[2] * f64::from(b)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// A duotone effect: the gradient endpoints and how strongly to apply it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Duotone {
    /// Colour that bright pixels trend towards.
    pub highlight: Colour,
    /// Colour that dark pixels trend towards.
    pub shadow: Colour,
    pub intensity: Intensity,
}

impl Default for Duotone {
    fn default() -> Self {
        Self {
            highlight: Colour::BRAVE_PINK,
            shadow: Colour::HERO_GREEN,
            intensity: Intensity::FULL,
        }
    }
}

impl Duotone {
    pub fn new(highlight: Colour, shadow: Colour, intensity: Intensity) -> Self {
        Self {
            highlight,
            shadow,
            intensity,
        }
    }

    pub fn with_intensity(self, intensity: Intensity) -> Self {
        Self { intensity, ..self }
    }

    /// Unrounded gradient colour at position `t` in `[0, 1]`.
    pub fn gradient(&self, t: f64) -> [f64; 3] {
        let (s, h) = (self.shadow.to_rgb(), self.highlight.to_rgb());
        [
            lerp(f64::from(s[0]), f64::from(h[0]), t),
            lerp(f64::from(s[1]), f64::from(h[1]), t),
            lerp(f64::from(s[2]), f64::from(h[2]), t),
        ]
    }

    /// Transform a single RGBA pixel. Alpha is passed through.
    pub fn map_pixel(&self, rgba: [u8; 4]) -> [u8; 4] {
        let [r, g, b, a] = rgba;
        let t = luminance(r, g, b) / 255.0;
        let grad = self.gradient(t);
        let i = self.intensity.value();

        let blend = |target: f64, original: u8| -> u8 {
            (target * i + f64::from(original) * (1.0 - i))
                .round()
                .clamp(0.0, 255.0) as u8
        };

        [blend(grad[0], r), blend(grad[1], g), blend(grad[2], b), a]
    }

    /// Produce a new bitmap with the effect applied.
    pub fn apply(&self, source: &Bitmap) -> Bitmap {
        let (width, height) = source.dimensions();
        debug!(
            "duotone {width}x{height}: shadow {} highlight {} at {}",
            self.shadow, self.highlight, self.intensity
        );

        let mut out = source.pixels().to_vec();
        self.map_buffer(&mut out);
        source.with_pixels(out)
    }

    /// Apply the effect to a raw RGBA buffer, checking its length first.
    pub fn apply_rgba(&self, width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>> {
        let source = Bitmap::new(width, height, pixels.to_vec())?;
        Ok(self.apply(&source).into_pixels())
    }

    fn map_buffer(&self, pixels: &mut [u8]) {
        pixels.par_chunks_exact_mut(CHANNELS).for_each(|px| {
            let mapped = self.map_pixel([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&mapped);
        });
    }
}

/// Recolour `source` onto the shadow → highlight gradient.
///
/// The output has the same dimensions as the input. Scaling to the render
/// limit is the caller's job.
pub fn apply_duotone(
    source: &Bitmap,
    highlight: Colour,
    shadow: Colour,
    intensity: Intensity,
) -> Bitmap {
    Duotone::new(highlight, shadow, intensity).apply(source)
}

/// Raw-buffer variant of [`apply_duotone`].
///
/// Fails with `BufferLengthMismatch` if `pixels` is not exactly
/// `width * height * 4` bytes, or `InvalidDimension` for a zero side.
pub fn apply_duotone_rgba(
    width: u32,
    height: u32,
    pixels: &[u8],
    highlight: Colour,
    shadow: Colour,
    intensity: Intensity,
) -> Result<Vec<u8>> {
    Duotone::new(highlight, shadow, intensity).apply_rgba(width, height, pixels)
}
