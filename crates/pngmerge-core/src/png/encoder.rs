use std::fs::File;
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use log::{debug, error, info};

use super::chunk::{write_chunk, ChunkType};
use super::header::ImageHeader;
use super::signature::write_signature;
use super::DecodedImage;
use crate::error::PngMergeError;
use crate::options::CodecOptions;
use crate::result::Result;

/// Serializes a complete container: signature, IHDR from `header`, one IDAT holding the
/// zlib compressed `scanlines`, and an empty IEND. Every CRC is computed here.
pub fn encode(header: &ImageHeader, scanlines: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let compressed = compress(scanlines, options)?;
    debug!(
        "Compressed {} bytes of scanlines into {} bytes",
        scanlines.len(),
        compressed.len()
    );

    let mut out = Vec::with_capacity(compressed.len() + 8 + 3 * 12 + 13);
    write_signature(&mut out)?;
    header.write(&mut out)?;
    write_chunk(&mut out, ChunkType::IDAT, &compressed)?;
    write_chunk(&mut out, ChunkType::IEND, &[])?;

    Ok(out)
}

pub fn encode_image(image: &DecodedImage, options: &CodecOptions) -> Result<Vec<u8>> {
    encode(image.header(), image.data(), options)
}

/// Encodes `image` completely in memory first, so the target file is only
/// created once there is something valid to put into it.
pub fn save_as(image: &DecodedImage, target: &Path, options: &CodecOptions) -> Result<()> {
    let bytes = encode_image(image, options)?;

    let mut f = File::create(target).map_err(|e| {
        error!("Error creating file {target:?}: {e}");
        PngMergeError::WriteError { source: e }
    })?;
    f.write_all(&bytes)
        .and_then(|_| f.flush())
        .map_err(|source| PngMergeError::WriteError { source })?;

    info!("Wrote {} bytes to {}", bytes.len(), target.display());
    Ok(())
}

fn compress(scanlines: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), options.compression());
    encoder
        .write_all(scanlines)
        .map_err(|source| PngMergeError::CompressionError { source })?;
    encoder
        .finish()
        .map_err(|source| PngMergeError::CompressionError { source })
}
