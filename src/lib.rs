//! chromavive - Duotone image recolouring
//!
//! A library for mapping an image's luminance onto a two-colour gradient
//! (shadow ↔ highlight) and blending the result with the original by an
//! intensity factor.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod types;

pub use config::{Config, CONFIG_FILENAME};
pub use error::{ChromaError, Result};
pub use render::{
    apply_duotone, apply_duotone_rgba, luminance, render, resize_to_limit, scale_to_limit, Duotone,
    RenderKey, RenderSlot, RENDER_LIMIT,
};
pub use types::{Bitmap, Colour, Intensity};
