//! Render-scale policy.
//!
//! Bounds the longer side of any bitmap handed to the duotone engine so a
//! single synchronous pass stays cheap enough for interactive use.

use image::imageops::{self, FilterType};
use log::debug;

use crate::error::{ChromaError, Result};
use crate::types::Bitmap;

/// Default maximum length of the longer side, in pixels.
pub const RENDER_LIMIT: u32 = 2000;

/// Compute target dimensions whose longer side is at most `limit`.
///
/// Dimensions already within the limit are returned unchanged. Larger
/// ones are scaled by `limit / max(width, height)` and rounded, so the
/// aspect ratio is kept up to rounding. Neither output is ever below 1,
/// and applying the policy to its own output is a no-op.
pub fn scale_to_limit(width: u32, height: u32, limit: u32) -> Result<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(ChromaError::InvalidDimension { width, height });
    }
    if limit == 0 {
        return Err(ChromaError::InvalidDimension {
            width: limit,
            height: limit,
        });
    }

    let longest = width.max(height);
    if longest <= limit {
        return Ok((width, height));
    }

    let scale = f64::from(limit) / f64::from(longest);
    Ok((scaled(width, scale), scaled(height, scale)))
}

fn scaled(value: u32, scale: f64) -> u32 {
    ((f64::from(value) * scale).round() as u32).max(1)
}

/// Resample a bitmap so it fits within `limit`.
///
/// Returns the input untouched when no scaling is needed.
pub fn resize_to_limit(bitmap: Bitmap, limit: u32) -> Result<Bitmap> {
    let (width, height) = bitmap.dimensions();
    let (target_w, target_h) = scale_to_limit(width, height, limit)?;
    if (target_w, target_h) == (width, height) {
        return Ok(bitmap);
    }

    debug!("resizing {width}x{height} to {target_w}x{target_h} (limit {limit})");
    let img = bitmap.into_image()?;
    let resized = imageops::resize(&img, target_w, target_h, FilterType::Triangle);
    Bitmap::try_from(resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_landscape_over_limit() {
        assert_eq!(scale_to_limit(4000, 2000, 2000).unwrap(), (2000, 1000));
    }

    #[test]
    fn test_scale_portrait_over_limit() {
        assert_eq!(scale_to_limit(1500, 6000, 2000).unwrap(), (500, 2000));
    }

    #[test]
    fn test_scale_below_limit_is_noop() {
        assert_eq!(scale_to_limit(800, 600, 2000).unwrap(), (800, 600));
        assert_eq!(scale_to_limit(2000, 2000, 2000).unwrap(), (2000, 2000));
        assert_eq!(scale_to_limit(1, 1, 2000).unwrap(), (1, 1));
    }

    #[test]
    fn test_scale_rounds_to_nearest() {
        // 3000x1001 -> scale 2/3 -> 2000x667.33
        assert_eq!(scale_to_limit(3000, 1001, 2000).unwrap(), (2000, 667));
        // 3000x1000 -> 666.67 rounds up
        assert_eq!(scale_to_limit(3000, 1000, 2000).unwrap(), (2000, 667));
    }

    #[test]
    fn test_scale_never_below_one() {
        assert_eq!(scale_to_limit(100_000, 1, 2000).unwrap(), (2000, 1));
    }

    #[test]
    fn test_scale_is_idempotent() {
        let sizes = [
            (4000, 2000),
            (2001, 3),
            (12345, 6789),
            (7, 9999),
            (2500, 2500),
            (640, 480),
        ];
        for limit in [1, 17, 2000] {
            for (w, h) in sizes {
                let once = scale_to_limit(w, h, limit).unwrap();
                let twice = scale_to_limit(once.0, once.1, limit).unwrap();
                assert_eq!(once, twice, "{w}x{h} limit {limit}");
                assert!(once.0.max(once.1) <= limit.max(1));
            }
        }
    }

    #[test]
    fn test_scale_rejects_zero() {
        assert!(matches!(
            scale_to_limit(0, 10, 2000),
            Err(ChromaError::InvalidDimension { width: 0, height: 10 })
        ));
        assert!(scale_to_limit(10, 0, 2000).is_err());
        assert!(scale_to_limit(10, 10, 0).is_err());
    }

    #[test]
    fn test_resize_to_limit() {
        let bitmap = Bitmap::filled(40, 20, [10, 20, 30, 255]).unwrap();
        let resized = resize_to_limit(bitmap, 10).unwrap();
        assert_eq!(resized.dimensions(), (10, 5));
        // A flat colour stays flat after resampling.
        assert_eq!(resized.pixel(4, 2), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_resize_within_limit_is_untouched() {
        let bitmap = Bitmap::filled(3, 2, [1, 2, 3, 4]).unwrap();
        let resized = resize_to_limit(bitmap.clone(), 2000).unwrap();
        assert_eq!(resized, bitmap);
    }
}
