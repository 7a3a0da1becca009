//! QR code encoder

use crate::error::{Error, Result};
use crate::qr::QrColors;
use image::{DynamicImage, Rgb};
use qrcode::{EcLevel, QrCode};

/// Largest accepted edge length of one module, in pixels
pub const MAX_MODULE_SIZE: u32 = 100;

/// Largest accepted edge length of a rendered image, in pixels
pub const MAX_IMAGE_SIDE: u32 = 16_384;

/// Modules of quiet zone on each side of the symbol
const QUIET_ZONE_MODULES: u32 = 4;

/// QR code encoder
#[derive(Debug, Clone)]
pub struct QrEncoder {
    /// Error correction level
    ecc_level: EcLevel,
    colors: QrColors,
    /// Edge length of one module in pixels
    module_size: u32,
    quiet_zone: bool,
}

impl QrEncoder {
    /// Create a new QR encoder with default settings (Medium ECC, black on white, 10px modules)
    pub fn new() -> Self {
        Self {
            ecc_level: EcLevel::M,
            colors: QrColors::default(),
            module_size: 10,
            quiet_zone: true,
        }
    }

    /// Use a specific error correction level
    pub fn with_ecc_level(mut self, ecc_level: EcLevel) -> Self {
        self.ecc_level = ecc_level;
        self
    }

    /// Use the given fill and background colors
    pub fn with_colors(mut self, colors: QrColors) -> Self {
        self.colors = colors;
        self
    }

    /// Set the module size in pixels (clamped to `1..=MAX_MODULE_SIZE`)
    pub fn with_module_size(mut self, module_size: u32) -> Self {
        self.module_size = module_size.clamp(1, MAX_MODULE_SIZE);
        self
    }

    /// Toggle the quiet zone border around the symbol
    pub fn with_quiet_zone(mut self, quiet_zone: bool) -> Self {
        self.quiet_zone = quiet_zone;
        self
    }

    /// Encode text into a QR code image.
    ///
    /// No validation is applied to `data`; anything that fits the symbol
    /// capacity is encoded.
    pub fn encode_str(&self, data: &str) -> Result<DynamicImage> {
        self.encode_bytes(data.as_bytes())
    }

    /// Encode bytes into a QR code image
    pub fn encode_bytes(&self, data: &[u8]) -> Result<DynamicImage> {
        if self.colors.fill == self.colors.back {
            return Err(Error::QrEncode(format!(
                "fill and background colors are both {}",
                self.colors.fill
            )));
        }

        let code = QrCode::with_error_correction_level(data, self.ecc_level)?;

        let border = if self.quiet_zone {
            2 * QUIET_ZONE_MODULES
        } else {
            0
        };
        let side = u32::try_from(code.width())
            .ok()
            .and_then(|modules| modules.checked_add(border))
            .and_then(|modules| modules.checked_mul(self.module_size))
            .filter(|side| *side <= MAX_IMAGE_SIDE)
            .ok_or_else(|| {
                Error::QrEncode(format!(
                    "{} modules at {}px exceed the {MAX_IMAGE_SIDE}px image limit",
                    code.width(),
                    self.module_size
                ))
            })?;

        let image = code
            .render::<Rgb<u8>>()
            .dark_color(self.colors.fill.to_pixel())
            .light_color(self.colors.back.to_pixel())
            .quiet_zone(self.quiet_zone)
            .module_dimensions(self.module_size, self.module_size)
            .build();

        tracing::debug!(
            modules = code.width(),
            width = side,
            bytes = data.len(),
            "Encoded QR code"
        );

        Ok(DynamicImage::ImageRgb8(image))
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}
