//! QR code encoding, writing and read-back
//!
//! Encoding is delegated to the `qrcode` crate and rendered through `image`.
//! Decoding with `rqrr` is only used to verify images after they are written.

mod color;
mod decoder;
mod encoder;
mod writer;

pub use color::{QrColor, QrColors};
pub use decoder::QrDecoder;
pub use encoder::{MAX_IMAGE_SIDE, MAX_MODULE_SIZE, QrEncoder};
pub use writer::{SavedQr, generate_qr_code, save_qr_code};
