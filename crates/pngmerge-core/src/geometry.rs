//! Pixel geometry derived from an IHDR, and the gate deciding whether two decoded
//! images can be merged.

use thiserror::Error;

use crate::error::PngMergeError;
use crate::png::DecodedImage;

/// Number of samples (channels) per pixel for a color type, 0 for undefined color types.
///
/// | color type | meaning          | samples |
/// |------------|------------------|---------|
/// | 0          | grayscale        | 1       |
/// | 2          | RGB              | 3       |
/// | 3          | palette index    | 1       |
/// | 4          | grayscale, alpha | 2       |
/// | 6          | RGBA             | 4       |
pub fn samples_per_pixel(color_type: u8) -> u8 {
    match color_type {
        0 => 1,
        2 => 3,
        3 => 1,
        4 => 2,
        6 => 4,
        _ => 0,
    }
}

pub fn bits_per_pixel(color_type: u8, bit_depth: u8) -> u32 {
    samples_per_pixel(color_type) as u32 * bit_depth as u32
}

/// `ceil(bits_per_pixel * width / 8)`, the pixel bytes of one scanline without its filter byte
pub fn row_width_in_bytes(bits_per_pixel: u32, width: u32) -> usize {
    ((bits_per_pixel as u64 * width as u64 + 7) / 8) as usize
}

/// Size of the inflated stream: every scanline carries one filter byte in front.
pub fn expected_stream_len(bits_per_pixel: u32, width: u32, height: u32) -> usize {
    (height as usize).saturating_mul(1 + row_width_in_bytes(bits_per_pixel, width))
}

/// The first property in which a cover and a secret image differ.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Incompatibility {
    #[error("Width mismatch: cover={cover}, secret={secret}")]
    Width { cover: u32, secret: u32 },

    #[error("Height mismatch: cover={cover}, secret={secret}")]
    Height { cover: u32, secret: u32 },

    #[error("Unsupported color type: cover={cover}, secret={secret}")]
    UnsupportedColorType { cover: u8, secret: u8 },

    #[error("Bits per pixel mismatch: cover={cover}, secret={secret}")]
    BitsPerPixel { cover: u32, secret: u32 },

    #[error("Data size mismatch: expected={expected} bytes, got cover={cover}, secret={secret}")]
    StreamSize {
        expected: usize,
        cover: usize,
        secret: usize,
    },
}

/// Checks, in this order and stopping at the first failure: width, height,
/// color type support together with bits per pixel, and the inflated stream sizes.
pub fn check_compatibility(
    cover: &DecodedImage,
    secret: &DecodedImage,
) -> Result<(), Incompatibility> {
    let (c, s) = (cover.header(), secret.header());

    if c.width() != s.width() {
        return Err(Incompatibility::Width {
            cover: c.width(),
            secret: s.width(),
        });
    }

    if c.height() != s.height() {
        return Err(Incompatibility::Height {
            cover: c.height(),
            secret: s.height(),
        });
    }

    if c.samples_per_pixel() == 0 || s.samples_per_pixel() == 0 {
        return Err(Incompatibility::UnsupportedColorType {
            cover: c.color_type(),
            secret: s.color_type(),
        });
    }

    if c.bits_per_pixel() != s.bits_per_pixel() {
        return Err(Incompatibility::BitsPerPixel {
            cover: c.bits_per_pixel(),
            secret: s.bits_per_pixel(),
        });
    }

    let expected = c.expected_stream_len();
    if cover.data().len() != expected || secret.data().len() != expected {
        return Err(Incompatibility::StreamSize {
            expected,
            cover: cover.data().len(),
            secret: secret.data().len(),
        });
    }

    Ok(())
}

/// A cover and a secret image that passed [`check_compatibility`].
/// Holding one is the precondition for embedding.
#[derive(Debug, Clone, Copy)]
pub struct CompatiblePair<'a> {
    cover: &'a DecodedImage,
    secret: &'a DecodedImage,
}

impl<'a> CompatiblePair<'a> {
    pub fn new(cover: &'a DecodedImage, secret: &'a DecodedImage) -> Result<Self, Incompatibility> {
        check_compatibility(cover, secret)?;
        Ok(Self { cover, secret })
    }

    pub fn cover(&self) -> &'a DecodedImage {
        self.cover
    }

    pub fn secret(&self) -> &'a DecodedImage {
        self.secret
    }
}

/// Checks a single image: its color type must be defined and its stream must have
/// exactly the size the header implies.
pub fn check_geometry(image: &DecodedImage) -> Result<(), PngMergeError> {
    let header = image.header();
    if header.samples_per_pixel() == 0 {
        return Err(PngMergeError::UnsupportedColorType {
            color_type: header.color_type(),
            bit_depth: header.bit_depth(),
        });
    }

    let expected = header.expected_stream_len();
    if image.data().len() != expected {
        return Err(PngMergeError::UnexpectedStreamSize {
            expected,
            actual: image.data().len(),
        });
    }
    Ok(())
}

/// `(true, "")` when the images can be merged, otherwise `false` and the reason.
pub fn compatible(cover: &DecodedImage, secret: &DecodedImage) -> (bool, String) {
    match check_compatibility(cover, secret) {
        Ok(()) => (true, String::new()),
        Err(reason) => (false, reason.to_string()),
    }
}
