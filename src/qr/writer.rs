//! Encode a validated URL and persist it as an image file
//!
//! The image is written to a temporary file next to the destination and only
//! renamed into place once fully written, so the destination either holds a
//! complete image or does not exist.

use crate::error::Result;
use crate::qr::{QrColors, QrEncoder};
use crate::validation::ValidatedUrl;
use image::ImageFormat;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Description of a QR image that was written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedQr {
    /// Destination path
    pub path: PathBuf,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Size of the written file
    pub bytes: u64,
}

/// Encode `url` with the default encoder settings and the given colors, then save it to `path`.
///
/// `None` for `colors` means black on white.
pub fn generate_qr_code(
    url: &ValidatedUrl,
    path: &Path,
    colors: Option<QrColors>,
) -> Result<SavedQr> {
    let encoder = QrEncoder::new().with_colors(colors.unwrap_or_default());
    save_qr_code(&encoder, url, path)
}

/// Encode `url` with `encoder` and save it to `path`.
///
/// Success and failure are both logged; failures are also returned.
pub fn save_qr_code(encoder: &QrEncoder, url: &ValidatedUrl, path: &Path) -> Result<SavedQr> {
    match write_image(encoder, url.as_str(), path) {
        Ok(saved) => {
            tracing::info!("QR code successfully saved to {}", saved.path.display());
            Ok(saved)
        }
        Err(err) => {
            tracing::error!("An error occurred while generating or saving the QR code: {err}");
            Err(err)
        }
    }
}

fn write_image(encoder: &QrEncoder, data: &str, path: &Path) -> Result<SavedQr> {
    let image = encoder.encode_str(data)?;
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        image.write_to(&mut writer, format)?;
        writer.flush()?;
    }
    staged.as_file().sync_all()?;

    let file = staged.persist(path).map_err(|e| e.error)?;
    let bytes = file.metadata()?.len();

    Ok(SavedQr {
        path: path.to_path_buf(),
        width: image.width(),
        height: image.height(),
        bytes,
    })
}
