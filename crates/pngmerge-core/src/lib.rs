//! # PNG Merge Core API
//!
//! Hides a secret PNG image inside a cover PNG image of the same geometry. Every byte of
//! the result keeps the 4 most significant bits of the cover and carries the 4 most
//! significant bits of the secret in its low nibble.
//!
//! The crate brings its own small PNG codec (see [`png`]) which works on the raw
//! scanlines, so the merge happens on exactly the bytes that are stored in the file.
//!
//! # Usage Examples
//!
//! ## Merge a secret image into a cover image
//!
//! ```rust,no_run
//! pngmerge_core::api::merge::prepare()
//!     .with_cover("good_gopher.png")
//!     .with_secret("evil_gopher.png")
//!     .with_output("stego_image.png")
//!     .execute()
//!     .expect("Failed to merge images");
//! ```
//!
//! ## Unveil the secret image again
//!
//! ```rust,no_run
//! pngmerge_core::api::unveil::prepare()
//!     .from_carrier("stego_image.png")
//!     .with_output("evil_gopher_4bit.png")
//!     .execute()
//!     .expect("Failed to unveil image");
//! ```
//!
//! ## In memory
//!
//! ```rust
//! use pngmerge_core::png::{DecodedImage, ImageHeader};
//! use pngmerge_core::merge_images;
//!
//! let header = ImageHeader::new(1, 1, 8, 0);
//! let cover = DecodedImage::new(header.clone(), vec![0, 0b1011_0101]);
//! let secret = DecodedImage::new(header, vec![0, 0b0101_1111]);
//!
//! let merged = merge_images(&cover, &secret).expect("images are compatible");
//! assert_eq!(merged.data(), &[0, 0xB5]);
//! ```

pub mod api;
pub mod commands;
pub mod error;
pub mod geometry;
pub mod lsb;
pub mod options;
pub mod png;
pub mod result;

use log::info;

pub use crate::error::{ErrorKind, PngMergeError};
pub use crate::geometry::{check_compatibility, compatible, CompatiblePair, Incompatibility};
pub use crate::options::{CodecOptions, CrcPolicy};
pub use crate::png::{DecodedImage, ImageHeader};
pub use crate::result::Result;

/// Checks both images for compatibility and embeds the secret into the cover.
pub fn merge_images(cover: &DecodedImage, secret: &DecodedImage) -> Result<DecodedImage> {
    let pair = CompatiblePair::new(cover, secret)?;
    info!("Images are compatible");
    Ok(lsb::embed(&pair))
}
