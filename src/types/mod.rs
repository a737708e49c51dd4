//! Core domain types for chromavive.
//!
//! This module contains the value types the duotone engine works on:
//! - `Bitmap` - Decoded RGBA8 pixel buffers
//! - `Colour` - RGB colour values
//! - `Intensity` - Blend factor between original and duotone

mod bitmap;
mod colour;
mod intensity;

pub use bitmap::{buffer_len, Bitmap, CHANNELS};
pub use colour::Colour;
pub use intensity::Intensity;
