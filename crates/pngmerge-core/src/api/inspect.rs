use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::png::{crc, validate_signature, ChunkReader, ChunkType};
use crate::{CodecOptions, CrcPolicy, PngMergeError, Result};

/// What is known about one chunk without interpreting its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub chunk_type: ChunkType,
    pub length: u32,
    pub crc: u32,
    pub crc_valid: bool,
}

impl ChunkInfo {
    pub fn is_critical(&self) -> bool {
        self.chunk_type.is_critical()
    }
}

/// Lists all chunks of the file at `path` up to and including IEND.
pub fn chunks(path: impl AsRef<Path>, options: &CodecOptions) -> Result<Vec<ChunkInfo>> {
    let path = path.as_ref();
    File::open(path)
        .map_err(|source| PngMergeError::ReadError { source })
        .and_then(|f| read_chunks(BufReader::new(f), options))
        .map_err(|e| e.in_image(path))
}

/// Lists all chunks of a container up to and including IEND.
///
/// Mismatching checksums are reported in [`ChunkInfo::crc_valid`]; only
/// [`CrcPolicy::Strict`] turns them into an error.
pub fn read_chunks<R: Read>(mut input: R, options: &CodecOptions) -> Result<Vec<ChunkInfo>> {
    validate_signature(&mut input)?;
    // verification is done here, so the reader does not need to warn as well
    let policy = match options.crc_policy {
        CrcPolicy::Strict => CrcPolicy::Strict,
        _ => CrcPolicy::Ignore,
    };
    let mut reader = ChunkReader::new(input, policy);

    let mut infos = Vec::new();
    loop {
        let Some(length) = reader.next_length()? else {
            return Err(PngMergeError::MissingTerminator);
        };
        let chunk_type = reader.read_type()?;
        let data = reader.read_data(chunk_type, length)?;
        let crc = reader.finish_chunk(chunk_type, &data)?;

        infos.push(ChunkInfo {
            chunk_type,
            length,
            crc,
            crc_valid: crc::checksum(chunk_type.bytes(), &data) == crc,
        });
        if chunk_type == ChunkType::IEND {
            return Ok(infos);
        }
    }
}
