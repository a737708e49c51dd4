//! Image decoding and PNG export.
//!
//! Decoding accepts any format the `image` crate understands, recognised
//! from the file contents rather than its extension, and honours EXIF
//! orientation. Output is always lossless PNG.

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use image::{DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader};

use crate::error::{ChromaError, Result};
use crate::types::Bitmap;

/// Suffix appended to timestamped export names.
pub const EXPORT_SUFFIX: &str = "chromavive";

/// Decode an image file into an RGBA bitmap, upright.
pub fn load_bitmap(path: &Path) -> Result<Bitmap> {
    let mut decoder = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| read_error(path, e))?
        .into_decoder()
        .map_err(|e| image_error(path, e))?;

    let orientation = decoder.orientation().map_err(|e| image_error(path, e))?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| image_error(path, e))?;
    img.apply_orientation(orientation);

    Bitmap::try_from(img.to_rgba8())
}

fn read_error(path: &Path, e: std::io::Error) -> ChromaError {
    ChromaError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read image: {}", e),
    }
}

fn image_error(path: &Path, e: ImageError) -> ChromaError {
    match e {
        ImageError::IoError(io) => read_error(path, io),
        other => ChromaError::Decode {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

/// Write a bitmap to a PNG file.
pub fn write_png(bitmap: &Bitmap, path: &Path) -> Result<()> {
    let img = bitmap.clone().into_image()?;

    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| ChromaError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })?;

    Ok(())
}

/// Export file name for a given local time: `YYYYMMDDHHMMSS-chromavive.png`.
pub fn export_file_name(at: NaiveDateTime) -> String {
    format!("{}-{}.png", at.format("%Y%m%d%H%M%S"), EXPORT_SUFFIX)
}

/// Export file name stamped with the current local time.
pub fn default_export_name() -> String {
    export_file_name(Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_load_png() {
        let bitmap = Bitmap::from_rgba(2, 1, &[[0, 0, 0, 255], [255, 105, 180, 128]]).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");

        write_png(&bitmap, &path).unwrap();
        assert!(path.exists());

        let loaded = load_bitmap(&path).unwrap();
        assert_eq!(loaded, bitmap);
    }

    #[test]
    fn test_write_png_ignores_extension() {
        let bitmap = Bitmap::filled(1, 1, [1, 2, 3, 255]).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("export.bin");

        write_png(&bitmap, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_load_detects_format_from_contents() {
        let bitmap = Bitmap::from_rgba(2, 1, &[[0, 0, 0, 255], [255, 105, 180, 255]]).unwrap();

        let dir = tempdir().unwrap();
        let misnamed = dir.path().join("photo.jpg");
        let bare = dir.path().join("photo");
        write_png(&bitmap, &misnamed).unwrap();
        write_png(&bitmap, &bare).unwrap();

        assert_eq!(load_bitmap(&misnamed).unwrap(), bitmap);
        assert_eq!(load_bitmap(&bare).unwrap(), bitmap);
    }

    /// Insert an `eXIf` chunk carrying `orientation` right after IHDR.
    fn with_exif_orientation(png: &[u8], orientation: u8) -> Vec<u8> {
        fn crc32(bytes: &[u8]) -> u32 {
            let mut crc = 0xFFFF_FFFFu32;
            for &byte in bytes {
                crc ^= u32::from(byte);
                for _ in 0..8 {
                    crc = if crc & 1 == 1 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
                }
            }
            !crc
        }

        // Big-endian TIFF header, one IFD entry: 0x0112 SHORT x1.
        let exif: [u8; 26] = [
            b'M', b'M', 0, 42, 0, 0, 0, 8, 0, 1, 0x01, 0x12, 0, 3, 0, 0, 0, 1, 0, orientation,
            0, 0, 0, 0, 0, 0,
        ];
        let mut body = b"eXIf".to_vec();
        body.extend_from_slice(&exif);

        // Signature (8) + IHDR length/type/data/crc (4 + 4 + 13 + 4).
        let split = 8 + 25;
        let mut out = png[..split].to_vec();
        out.extend_from_slice(&(exif.len() as u32).to_be_bytes());
        out.extend_from_slice(&body);
        out.extend_from_slice(&crc32(&body).to_be_bytes());
        out.extend_from_slice(&png[split..]);
        out
    }

    #[test]
    fn test_load_applies_exif_orientation() {
        let bitmap = Bitmap::from_rgba(2, 1, &[[255, 0, 0, 255], [0, 0, 255, 255]]).unwrap();

        let dir = tempdir().unwrap();
        let plain = dir.path().join("plain.png");
        write_png(&bitmap, &plain).unwrap();

        // Orientation 6: stored sideways, displayed rotated 90° clockwise.
        let rotated = dir.path().join("rotated.png");
        std::fs::write(&rotated, with_exif_orientation(&std::fs::read(&plain).unwrap(), 6))
            .unwrap();

        let upright = load_bitmap(&rotated).unwrap();
        assert_eq!(upright.dimensions(), (1, 2));
        assert_eq!(upright.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(upright.pixel(0, 1), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_bitmap(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, ChromaError::Io { .. }));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = load_bitmap(&path).unwrap_err();
        assert!(matches!(err, ChromaError::Decode { .. }));
    }

    #[test]
    fn test_export_file_name() {
        let at = NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_opt(13, 5, 9)
            .unwrap();
        assert_eq!(export_file_name(at), "20250901130509-chromavive.png");
    }

    #[test]
    fn test_default_export_name_shape() {
        let name = default_export_name();
        assert_eq!(name.len(), "YYYYMMDDHHMMSS-chromavive.png".len());
        assert!(name.ends_with("-chromavive.png"));
        assert!(name[..14].chars().all(|c| c.is_ascii_digit()));
    }
}
