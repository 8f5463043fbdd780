//! Nibble embedding: the carrier keeps the 4 most significant bits of the cover and
//! stores the 4 most significant bits of the secret in its 4 least significant bits.
//!
//! ```text
//! cover   1011 0101
//! secret  0101 1111
//! carrier 1011 0101
//!         ^^^^ ^^^^
//!         cover secret
//! ```
//! The low nibble of the secret is lost, unveiling gives the secret back with 4 bit
//! precision per sample byte.

use log::debug;

use crate::geometry::{check_geometry, CompatiblePair};
use crate::png::DecodedImage;
use crate::result::Result;

const HIGH_NIBBLE: u8 = 0xF0;
const LOW_NIBBLE: u8 = 0x0F;

#[inline(always)]
pub fn merge_byte(cover: u8, secret: u8) -> u8 {
    (cover & HIGH_NIBBLE) | ((secret & HIGH_NIBBLE) >> 4)
}

#[inline(always)]
pub fn unveil_byte(carrier: u8) -> u8 {
    (carrier & LOW_NIBBLE) << 4
}

/// Merges the pixel bytes of both images row by row. Filter bytes come from the cover,
/// the header of the result is the cover's.
pub fn embed(pair: &CompatiblePair<'_>) -> DecodedImage {
    let (cover, secret) = (pair.cover(), pair.secret());
    let header = cover.header();
    let mut merged = Vec::with_capacity(cover.data().len());

    for ((filter, cover_row), (_, secret_row)) in cover.scanlines().zip(secret.scanlines()) {
        merged.push(filter);
        merged.extend(
            cover_row
                .iter()
                .zip(secret_row)
                .map(|(c, s)| merge_byte(*c, *s)),
        );
    }
    debug!(
        "Embedded {} rows of {} bytes",
        header.height(),
        header.row_width_in_bytes()
    );

    DecodedImage::new(header.clone(), merged)
}

/// Recovers the embedded image from a carrier: every pixel byte becomes its low nibble
/// moved to the top, filter bytes are copied.
pub fn unveil(carrier: &DecodedImage) -> Result<DecodedImage> {
    check_geometry(carrier)?;

    let mut recovered = Vec::with_capacity(carrier.data().len());
    for (filter, row) in carrier.scanlines() {
        recovered.push(filter);
        recovered.extend(row.iter().map(|b| unveil_byte(*b)));
    }

    Ok(DecodedImage::new(carrier.header().clone(), recovered))
}
