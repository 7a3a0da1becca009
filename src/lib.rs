//! qrstamp - save a URL as a timestamped QR code image
//!
//! The library validates a URL, encodes it as a QR code and writes the image
//! into an output directory under a timestamped file name.
//!
//! # Example
//!
//! ```no_run
//! use qrstamp::{ValidatedUrl, generate_qr_code};
//! use std::path::Path;
//!
//! fn main() -> qrstamp::Result<()> {
//!     let url = ValidatedUrl::parse("https://example.com")?;
//!     let saved = generate_qr_code(&url, Path::new("example.png"), None)?;
//!     println!("wrote {} bytes", saved.bytes);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod qr;
pub mod validation;

// Re-exports for convenience
pub use error::{Error, Result};

pub use app::{RunOutcome, RunRequest, create_directory, run};
pub use config::{LogRotation, LoggingOptions, OutputOptions, QrStampConfig, RenderOptions};
pub use qr::{
    QrColor, QrColors, QrDecoder, QrEncoder, SavedQr, generate_qr_code, save_qr_code,
};
pub use validation::{ValidatedUrl, is_valid_url};
