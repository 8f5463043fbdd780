//! Minimal PNG container codec: signature, chunk envelope, IHDR, and the IDAT pixel stream.
//! Only non interlaced images with compression, filter and interlace method 0 are handled,
//! ancillary chunks are skipped.

pub mod chunk;
pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod header;
pub mod signature;

pub use chunk::{write_chunk, Chunk, ChunkReader, ChunkType};
pub use decoder::{decode, decode_file, CompressedPixelBuffer, DecodedImage};
pub use encoder::{encode, encode_image, save_as};
pub use header::ImageHeader;
pub use signature::{validate_signature, SIGNATURE};
