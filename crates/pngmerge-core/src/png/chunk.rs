//! The generic `{length, type, data, crc}` envelope of PNG chunks.
//!
//! Layout on disk:
//! ```text
//! | length (u32 BE) | type (4 bytes) | data (length bytes) | crc (u32 BE) |
//! ```
//! `length` counts the data only, `crc` covers type and data.

use std::fmt;
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use log::{debug, warn};

use super::crc;
use crate::error::PngMergeError;
use crate::options::CrcPolicy;
use crate::result::Result;

/// Largest data length a chunk may declare (2^31 - 1).
pub const MAX_CHUNK_LENGTH: u32 = i32::MAX as u32;

/// 4 byte chunk tag, e.g. `IHDR`. The bytes are not validated.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType([u8; 4]);

impl ChunkType {
    pub const IHDR: ChunkType = ChunkType(*b"IHDR");
    pub const IDAT: ChunkType = ChunkType(*b"IDAT");
    pub const IEND: ChunkType = ChunkType(*b"IEND");

    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Critical chunks have bit 5 of the first byte cleared (upper case letter).
    pub fn is_critical(&self) -> bool {
        self.0[0] & 0x20 == 0
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

/// A fully read chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    length: u32,
    chunk_type: ChunkType,
    data: Vec<u8>,
    crc: u32,
}

impl Chunk {
    /// builds a chunk with a freshly computed CRC
    pub fn new(chunk_type: ChunkType, data: Vec<u8>) -> Result<Self> {
        let length = checked_length(chunk_type, &data)?;
        let crc = crc::checksum(chunk_type.bytes(), &data);
        Ok(Self {
            length,
            chunk_type,
            data,
            crc,
        })
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// the CRC as stored in the stream (or computed, for chunks built with [`Chunk::new`])
    pub fn crc(&self) -> u32 {
        self.crc
    }

    pub fn computed_crc(&self) -> u32 {
        crc::checksum(self.chunk_type.bytes(), &self.data)
    }

    pub fn has_valid_crc(&self) -> bool {
        self.crc == self.computed_crc()
    }

    /// serializes the chunk, recomputing the CRC
    pub fn to_bytes(&self) -> Vec<u8> {
        let end = 8 + self.data.len();
        let mut out = vec![0u8; end + 4];
        BigEndian::write_u32(&mut out[0..4], self.length);
        out[4..8].copy_from_slice(self.chunk_type.bytes());
        out[8..end].copy_from_slice(&self.data);
        BigEndian::write_u32(&mut out[end..], self.computed_crc());
        out
    }
}

/// Writes one chunk: length, type, data and the CRC computed over type and data.
pub fn write_chunk<W: Write>(writer: &mut W, chunk_type: ChunkType, data: &[u8]) -> Result<()> {
    let length = checked_length(chunk_type, data)?;
    let crc = crc::checksum(chunk_type.bytes(), data);

    let write = |writer: &mut W| -> io::Result<()> {
        writer.write_u32::<BigEndian>(length)?;
        writer.write_all(chunk_type.bytes())?;
        writer.write_all(data)?;
        writer.write_u32::<BigEndian>(crc)
    };
    write(writer).map_err(|source| PngMergeError::WriteError { source })
}

fn checked_length(chunk_type: ChunkType, data: &[u8]) -> Result<u32> {
    u32::try_from(data.len())
        .ok()
        .filter(|l| *l <= MAX_CHUNK_LENGTH)
        .ok_or(PngMergeError::ChunkTooLarge {
            chunk: chunk_type,
            length: data.len(),
        })
}

fn check_declared_length(chunk_type: ChunkType, length: u32) -> Result<()> {
    if length > MAX_CHUNK_LENGTH {
        return Err(PngMergeError::ChunkTooLarge {
            chunk: chunk_type,
            length: length as usize,
        });
    }
    Ok(())
}

/// Reads chunks piece by piece from a byte stream positioned right after the signature.
pub struct ChunkReader<R> {
    inner: R,
    crc_policy: CrcPolicy,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R, crc_policy: CrcPolicy) -> Self {
        Self { inner, crc_policy }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads the next length field. `None` if the stream ended cleanly before it.
    pub fn next_length(&mut self) -> Result<Option<u32>> {
        let mut buf = [0u8; 4];
        match self.fill(&mut buf)? {
            0 => Ok(None),
            4 => Ok(Some(BigEndian::read_u32(&buf))),
            _ => Err(PngMergeError::UnexpectedEnd("chunk length")),
        }
    }

    pub fn read_length(&mut self) -> Result<u32> {
        self.next_length()?
            .ok_or(PngMergeError::UnexpectedEnd("chunk length"))
    }

    pub fn read_type(&mut self) -> Result<ChunkType> {
        let mut buf = [0u8; 4];
        if self.fill(&mut buf)? != 4 {
            return Err(PngMergeError::UnexpectedEnd("chunk type"));
        }
        Ok(ChunkType(buf))
    }

    /// Reads exactly `length` data bytes. The buffer grows with what is actually
    /// there, so a bogus huge length does not allocate up front.
    pub fn read_data(&mut self, chunk_type: ChunkType, length: u32) -> Result<Vec<u8>> {
        check_declared_length(chunk_type, length)?;
        let mut data = Vec::new();
        let available = self
            .inner
            .by_ref()
            .take(length as u64)
            .read_to_end(&mut data)
            .map_err(|source| PngMergeError::ReadError { source })?;

        if available as u64 != length as u64 {
            return Err(PngMergeError::TruncatedChunk {
                chunk: chunk_type,
                what: "data",
                expected: length as u64,
                available: available as u64,
            });
        }
        Ok(data)
    }

    /// Reads the stored CRC trailing the data.
    pub fn read_crc(&mut self, chunk_type: ChunkType) -> Result<u32> {
        let mut buf = [0u8; 4];
        let available = self.fill(&mut buf)?;
        if available != 4 {
            return Err(PngMergeError::TruncatedChunk {
                chunk: chunk_type,
                what: "crc",
                expected: 4,
                available: available as u64,
            });
        }
        Ok(BigEndian::read_u32(&buf))
    }

    /// Checks `stored` against the CRC of type and data according to the policy.
    /// Returns whether the checksum matched; under [`CrcPolicy::Ignore`] it is not computed
    /// and `true` is returned.
    pub fn verify_crc(&self, chunk_type: ChunkType, data: &[u8], stored: u32) -> Result<bool> {
        if self.crc_policy == CrcPolicy::Ignore {
            return Ok(true);
        }

        let computed = crc::checksum(chunk_type.bytes(), data);
        if computed == stored {
            return Ok(true);
        }

        match self.crc_policy {
            CrcPolicy::Strict => Err(PngMergeError::ChecksumMismatch {
                chunk: chunk_type,
                stored,
                computed,
            }),
            _ => {
                warn!(
                    "Checksum mismatch in {chunk_type} chunk: stored {stored:#010x}, computed {computed:#010x}"
                );
                Ok(false)
            }
        }
    }

    /// Reads the CRC of a chunk whose data was just read and verifies it.
    pub fn finish_chunk(&mut self, chunk_type: ChunkType, data: &[u8]) -> Result<u32> {
        let stored = self.read_crc(chunk_type)?;
        self.verify_crc(chunk_type, data, stored)?;
        Ok(stored)
    }

    /// Advances past the data and CRC of a chunk without buffering them.
    pub fn skip(&mut self, chunk_type: ChunkType, length: u32) -> Result<()> {
        check_declared_length(chunk_type, length)?;
        let expected = length as u64 + 4;
        let skipped = io::copy(&mut self.inner.by_ref().take(expected), &mut io::sink())
            .map_err(|source| PngMergeError::ReadError { source })?;

        if skipped != expected {
            return Err(PngMergeError::TruncatedChunk {
                chunk: chunk_type,
                what: "data and crc",
                expected,
                available: skipped,
            });
        }
        debug!("Skipped {chunk_type} chunk of length {length}");
        Ok(())
    }

    /// Reads a complete chunk, including CRC verification.
    pub fn read_chunk(&mut self) -> Result<Chunk> {
        let length = self.read_length()?;
        let chunk_type = self.read_type()?;
        let data = self.read_data(chunk_type, length)?;
        let crc = self.finish_chunk(chunk_type, &data)?;

        Ok(Chunk {
            length,
            chunk_type,
            data,
            crc,
        })
    }

    /// like `read_exact`, but reports how many bytes were there instead of failing
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(source) => return Err(PngMergeError::ReadError { source }),
            }
        }
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Cursor;

    fn reader(bytes: Vec<u8>, policy: CrcPolicy) -> ChunkReader<Cursor<Vec<u8>>> {
        ChunkReader::new(Cursor::new(bytes), policy)
    }

    #[test]
    fn should_write_the_envelope_bit_exact() {
        let mut out = Vec::new();
        write_chunk(&mut out, ChunkType::IEND, &[]).unwrap();

        assert_eq!(
            out,
            [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn should_serialize_a_chunk_like_the_writer() {
        let chunk = Chunk::new(ChunkType::new(*b"tEXt"), b"k\0v".to_vec()).unwrap();
        let mut written = Vec::new();
        write_chunk(&mut written, chunk.chunk_type(), chunk.data()).unwrap();

        assert_eq!(chunk.to_bytes(), written);
        assert_eq!(
            Chunk::new(ChunkType::IEND, vec![]).unwrap().to_bytes(),
            [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn should_reject_declared_lengths_above_the_maximum() {
        let mut bytes = (MAX_CHUNK_LENGTH + 1).to_be_bytes().to_vec();
        bytes.extend_from_slice(b"IDAT");
        bytes.extend_from_slice(&[0; 16]);

        let err = reader(bytes.clone(), CrcPolicy::Ignore)
            .read_chunk()
            .unwrap_err();
        assert!(matches!(
            err,
            PngMergeError::ChunkTooLarge {
                chunk: ChunkType::IDAT,
                length: 0x8000_0000
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Format);

        let mut r = reader(bytes, CrcPolicy::Ignore);
        let length = r.read_length().unwrap();
        let chunk_type = r.read_type().unwrap();
        assert!(matches!(
            r.skip(chunk_type, length),
            Err(PngMergeError::ChunkTooLarge { .. })
        ));
    }

    #[test]
    fn should_read_back_what_was_written() {
        let cases: [(ChunkType, &[u8]); 3] = [
            (ChunkType::IDAT, &[0x78, 0x9c, 0x01, 0x02]),
            (ChunkType::new(*b"tEXt"), b"Comment\0hello"),
            (ChunkType::IEND, &[]),
        ];

        for (chunk_type, data) in cases {
            let encoded = Chunk::new(chunk_type, data.to_vec()).unwrap().to_bytes();
            let chunk = reader(encoded.clone(), CrcPolicy::Strict)
                .read_chunk()
                .expect("chunk should decode");

            assert_eq!(chunk.chunk_type(), chunk_type);
            assert_eq!(chunk.data(), data);
            assert_eq!(chunk.length() as usize, data.len());
            assert!(chunk.has_valid_crc());
            assert_eq!(
                chunk.crc(),
                BigEndian::read_u32(&encoded[encoded.len() - 4..])
            );
        }
    }

    #[test]
    fn should_only_warn_on_crc_mismatch_by_default() {
        let mut encoded = Chunk::new(ChunkType::IDAT, vec![1, 2, 3]).unwrap().to_bytes();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;

        let chunk = reader(encoded.clone(), CrcPolicy::Warn)
            .read_chunk()
            .expect("mismatch is recoverable");
        assert!(!chunk.has_valid_crc());

        let err = reader(encoded, CrcPolicy::Strict).read_chunk().unwrap_err();
        assert!(matches!(err, PngMergeError::ChecksumMismatch { .. }));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn should_fail_when_declared_length_exceeds_available_bytes() {
        let mut encoded = Chunk::new(ChunkType::IDAT, vec![7; 10]).unwrap().to_bytes();
        encoded.truncate(8 + 6);

        let err = reader(encoded, CrcPolicy::Warn).read_chunk().unwrap_err();
        match err {
            PngMergeError::TruncatedChunk {
                chunk,
                expected,
                available,
                ..
            } => {
                assert_eq!(chunk, ChunkType::IDAT);
                assert_eq!(expected, 10);
                assert_eq!(available, 6);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn should_skip_data_and_crc_of_unknown_chunks() {
        let mut bytes = Chunk::new(ChunkType::new(*b"gAMA"), vec![0, 0, 0xB1, 0x8F])
            .unwrap()
            .to_bytes();
        bytes.extend(Chunk::new(ChunkType::IEND, vec![]).unwrap().to_bytes());

        let mut r = reader(bytes, CrcPolicy::Strict);
        let length = r.read_length().unwrap();
        let chunk_type = r.read_type().unwrap();
        r.skip(chunk_type, length).unwrap();

        assert_eq!(r.read_chunk().unwrap().chunk_type(), ChunkType::IEND);
        assert_eq!(r.next_length().unwrap(), None);
    }

    #[test]
    fn should_report_truncation_while_skipping() {
        let mut bytes = Chunk::new(ChunkType::new(*b"tIME"), vec![0; 7])
            .unwrap()
            .to_bytes();
        bytes.truncate(bytes.len() - 2);

        let mut r = reader(bytes, CrcPolicy::Warn);
        let length = r.read_length().unwrap();
        let chunk_type = r.read_type().unwrap();

        assert!(matches!(
            r.skip(chunk_type, length),
            Err(PngMergeError::TruncatedChunk { available: 9, .. })
        ));
    }

    #[test]
    fn should_tell_critical_from_ancillary() {
        assert!(ChunkType::IHDR.is_critical());
        assert!(!ChunkType::new(*b"pHYs").is_critical());
        assert_eq!(ChunkType::new([b'a', 0, b'b', 0xFF]).to_string(), "a\\x00b\\xff");
    }
}
