//! The single-shot run sequence behind the `qrstamp` binary
//!
//! compute output path → ensure directory → validate URL → encode and write →
//! optionally read the image back.
//!
//! Only a directory that cannot be created (or a broken naming config) is
//! returned as an error. A rejected URL or a failed write is a normal
//! [`RunOutcome`].

use crate::config::{OutputOptions, QrStampConfig};
use crate::error::{Error, Result};
use crate::qr::{QrDecoder, SavedQr, save_qr_code};
use crate::validation;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs of one run that do not come from configuration
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Text to validate and encode
    pub url: String,
    /// Moment used for the file name timestamp
    pub now: NaiveDateTime,
    /// Decode the written image and compare it with `url`
    pub verify: bool,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The image was written
    Saved {
        /// URL that was encoded
        url: String,
        /// Details of the written file
        file: SavedQr,
        /// Result of the read-back check, when requested
        verified: Option<bool>,
    },
    /// The URL was rejected and nothing was written
    InvalidUrl {
        /// The rejected input
        url: String,
    },
    /// Encoding or writing failed; nothing was left at `path`
    Failed {
        /// URL that was being encoded
        url: String,
        /// Intended destination
        path: PathBuf,
        /// Error description
        reason: String,
    },
}

impl RunOutcome {
    /// Whether an image now exists on disk
    pub fn is_saved(&self) -> bool {
        matches!(self, RunOutcome::Saved { .. })
    }
}

/// Create `path` and any missing parents. Existing directories are fine.
///
/// Failures are logged and returned as [`Error::Directory`]; the binary treats
/// them as fatal.
pub fn create_directory(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => {
            tracing::debug!("Output directory ready: {}", path.display());
            Ok(())
        }
        Err(source) => {
            let err = Error::Directory {
                path: path.to_path_buf(),
                source,
            };
            tracing::error!("{err}");
            Err(err)
        }
    }
}

/// File name for an image taken at `now`, e.g. `QRCode_20231225120000.png`.
pub fn timestamped_file_name(output: &OutputOptions, now: NaiveDateTime) -> Result<String> {
    let mut name = String::with_capacity(output.file_prefix.len() + 24);
    write!(
        name,
        "{}_{}.{}",
        output.file_prefix,
        now.format(&output.timestamp_format),
        output.extension
    )
    .map_err(|_| {
        Error::Config(format!(
            "Invalid timestamp format '{}'",
            output.timestamp_format
        ))
    })?;

    if name.contains(['/', '\\']) {
        return Err(Error::Config(format!(
            "Timestamp format '{}' produces a path separator in '{name}'",
            output.timestamp_format
        )));
    }
    Ok(name)
}

/// Full destination path inside the configured output directory.
pub fn output_path(output: &OutputOptions, now: NaiveDateTime) -> Result<PathBuf> {
    Ok(output
        .directory
        .join(timestamped_file_name(output, now)?))
}

/// Execute one run.
pub fn run(config: &QrStampConfig, request: &RunRequest) -> Result<RunOutcome> {
    let path = output_path(&config.output, request.now)?;
    create_directory(&config.output.directory)?;

    let Some(url) = validation::validate(&request.url) else {
        return Ok(RunOutcome::InvalidUrl {
            url: request.url.clone(),
        });
    };

    tracing::info!(
        url = %url,
        host = url.host(),
        path = %path.display(),
        "Generating QR code"
    );

    let encoder = config.render.to_encoder();
    let file = match save_qr_code(&encoder, &url, &path) {
        Ok(file) => file,
        Err(err) => {
            return Ok(RunOutcome::Failed {
                url: request.url.clone(),
                path,
                reason: err.to_string(),
            });
        }
    };

    let verified = request.verify.then(|| verify(&file.path, url.as_str()));

    Ok(RunOutcome::Saved {
        url: request.url.clone(),
        file,
        verified,
    })
}

fn verify(path: &Path, expected: &str) -> bool {
    match QrDecoder::new().decode_file(path) {
        Ok(decoded) if decoded == expected => {
            tracing::info!("QR code verified: {} decodes to the requested URL", path.display());
            true
        }
        Ok(decoded) => {
            tracing::warn!(
                "QR code at {} decodes to '{decoded}', expected '{expected}'",
                path.display()
            );
            false
        }
        Err(err) => {
            tracing::warn!("Could not read back QR code at {}: {err}", path.display());
            false
        }
    }
}
