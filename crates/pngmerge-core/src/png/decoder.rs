use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::{Decompress, FlushDecompress, Status};
use log::{debug, error, info, warn};

use super::chunk::{ChunkReader, ChunkType};
use super::header::ImageHeader;
use super::signature::validate_signature;
use crate::error::PngMergeError;
use crate::options::CodecOptions;
use crate::result::Result;

const MIN_GROWTH: usize = 4096;
/// upper bound for trusting the header's size when preallocating
const MAX_PREALLOC: usize = 64 << 20;

/// Concatenated IDAT payloads of one image, inflated in a single pass once complete.
#[derive(Debug, Default)]
pub struct CompressedPixelBuffer {
    data: Vec<u8>,
    total_len: u64,
}

impl CompressedPixelBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, payload: &[u8]) {
        self.data.extend_from_slice(payload);
        self.total_len += payload.len() as u64;
    }

    pub fn total_len(&self) -> u64 {
        self.total_len
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Inflates the whole zlib stream. A malformed stream, or one that ends before
    /// its end marker, is an error.
    pub fn inflate(self, size_hint: usize) -> Result<Vec<u8>> {
        let mut inflater = Decompress::new(true);
        let mut raw = Vec::with_capacity(size_hint.clamp(MIN_GROWTH, MAX_PREALLOC));

        loop {
            if raw.len() == raw.capacity() {
                raw.reserve(raw.capacity().max(MIN_GROWTH));
            }
            let (consumed, produced) = (inflater.total_in(), inflater.total_out());
            let input = &self.data[consumed as usize..];

            let status = inflater
                .decompress_vec(input, &mut raw, FlushDecompress::None)
                .map_err(|e| PngMergeError::DecompressionError {
                    source: io::Error::new(io::ErrorKind::InvalidData, e),
                })?;

            if status == Status::StreamEnd {
                break;
            }
            if inflater.total_in() == consumed && inflater.total_out() == produced {
                return Err(PngMergeError::DecompressionError {
                    source: io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "image data ended before the end of the zlib stream",
                    ),
                });
            }
        }

        Ok(raw)
    }
}

/// Header plus the inflated scanlines, each one filter byte followed by the pixel bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    header: ImageHeader,
    data: Vec<u8>,
}

impl DecodedImage {
    pub fn new(header: ImageHeader, data: Vec<u8>) -> Self {
        Self { header, data }
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_parts(self) -> (ImageHeader, Vec<u8>) {
        (self.header, self.data)
    }

    /// Iterates the scanlines as `(filter byte, pixel bytes)`.
    /// Trailing bytes that do not form a complete scanline are not yielded.
    pub fn scanlines(&self) -> impl Iterator<Item = (u8, &[u8])> {
        let stride = 1 + self.header.row_width_in_bytes();
        self.data
            .chunks_exact(stride)
            .map(|row| (row[0], &row[1..]))
    }
}

/// Opens and decodes a container from disk. The file is closed on every exit path.
pub fn decode_file(path: impl AsRef<Path>, options: &CodecOptions) -> Result<DecodedImage> {
    let path = path.as_ref();
    let result = File::open(path)
        .map_err(|source| PngMergeError::ReadError { source })
        .and_then(|f| decode(BufReader::new(f), options));

    match result {
        Ok(image) => {
            let header = image.header();
            info!(
                "Decoded {}: {}x{}, bit depth {}, color type {}, {} bytes of scanlines",
                path.display(),
                header.width(),
                header.height(),
                header.bit_depth(),
                header.color_type(),
                image.data().len()
            );
            Ok(image)
        }
        Err(e) => {
            error!("Error decoding {}: {e}", path.display());
            Err(e.in_image(path))
        }
    }
}

/// Decodes a complete container: signature, IHDR, then every chunk up to IEND.
/// IDAT payloads are gathered and inflated together, other chunks are skipped.
pub fn decode<R: Read>(mut input: R, options: &CodecOptions) -> Result<DecodedImage> {
    validate_signature(&mut input)?;

    let mut reader = ChunkReader::new(input, options.crc_policy);
    let header = ImageHeader::read(&mut reader)?;
    debug!("IHDR: {header:?}");

    let mut compressed = CompressedPixelBuffer::new();
    loop {
        let Some(length) = reader.next_length()? else {
            return Err(PngMergeError::MissingTerminator);
        };
        let chunk_type = reader.read_type()?;

        match chunk_type {
            ChunkType::IDAT => {
                let data = reader.read_data(chunk_type, length)?;
                reader.finish_chunk(chunk_type, &data)?;
                compressed.push(&data);
                debug!(
                    "IDAT chunk of length {length}, {} compressed bytes so far",
                    compressed.total_len()
                );
            }
            ChunkType::IEND => {
                let data = reader.read_data(chunk_type, length)?;
                reader.finish_chunk(chunk_type, &data)?;
                debug!("Reached IEND chunk");
                break;
            }
            _ => reader.skip(chunk_type, length)?,
        }
    }

    if compressed.is_empty() {
        return Err(PngMergeError::MissingImageData);
    }

    let data = compressed.inflate(header.expected_stream_len())?;
    let image = DecodedImage::new(header, data);
    report_filtered_scanlines(&image);

    Ok(image)
}

fn report_filtered_scanlines(image: &DecodedImage) {
    if image.header().samples_per_pixel() == 0 {
        return;
    }
    let filtered = image.scanlines().filter(|(filter, _)| *filter != 0).count();
    if filtered > 0 {
        warn!(
            "{filtered} of {} scanlines use a filter other than None, their bytes are merged as stored",
            image.header().height()
        );
    }
}
