//! Decoded RGBA bitmap.

use image::RgbaImage;

use crate::error::{ChromaError, Result};

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// An immutable RGBA8 bitmap.
///
/// The pixel buffer is interleaved `R,G,B,A` and always holds exactly
/// `width * height * 4` bytes. Both dimensions are at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap, validating dimensions and buffer length.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(ChromaError::BufferLengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a bitmap from a row-major list of RGBA pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: &[[u8; 4]]) -> Result<Self> {
        Self::new(width, height, pixels.concat())
    }

    /// Create a bitmap filled with a single RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = buffer_len(width, height)?;
        Self::new(width, height, rgba.iter().copied().cycle().take(len).collect())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw interleaved RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// A bitmap of the same dimensions over a buffer derived from this one.
    pub(crate) fn with_pixels(&self, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// The RGBA value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let p = &self.pixels[i..i + CHANNELS];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Convert into an `image` buffer for encoding or resampling.
    pub fn into_image(self) -> Result<RgbaImage> {
        let (width, height) = self.dimensions();
        let actual = self.pixels.len();
        RgbaImage::from_raw(width, height, self.pixels).ok_or(ChromaError::BufferLengthMismatch {
            expected: buffer_len(width, height)?,
            actual,
        })
    }
}

impl TryFrom<RgbaImage> for Bitmap {
    type Error = ChromaError;

    fn try_from(img: RgbaImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }
}

/// Expected buffer length for the given dimensions.
pub fn buffer_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(ChromaError::InvalidDimension { width, height });
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(ChromaError::InvalidDimension { width, height })
}
