//! Rendering module for chromavive.
//!
//! This module holds the duotone engine, the render-scale policy, image
//! decoding/export, and the latest-wins slot for live results.

mod duotone;
mod png;
mod scale;
mod slot;

pub use duotone::{apply_duotone, apply_duotone_rgba, luminance, Duotone, LUMA_WEIGHTS};
pub use png::{default_export_name, export_file_name, load_bitmap, write_png, EXPORT_SUFFIX};
pub use scale::{resize_to_limit, scale_to_limit, RENDER_LIMIT};
pub use slot::{RenderKey, RenderSlot, Ticket};

use crate::error::Result;
use crate::types::Bitmap;

/// Scale `source` down to `limit`, then apply `duotone`.
pub fn render(source: Bitmap, duotone: &Duotone, limit: u32) -> Result<Bitmap> {
    let scaled = resize_to_limit(source, limit)?;
    Ok(duotone.apply(&scaled))
}
