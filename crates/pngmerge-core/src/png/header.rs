use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

use super::chunk::{write_chunk, ChunkReader, ChunkType};
use super::crc;
use crate::error::PngMergeError;
use crate::geometry;
use crate::result::Result;

/// IHDR payload length
pub const HEADER_LENGTH: u32 = 13;

/// Decoded IHDR chunk. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHeader {
    length: u32,
    width: u32,
    height: u32,
    bit_depth: u8,
    color_type: u8,
    compression_method: u8,
    filter_method: u8,
    interlace_method: u8,
    crc: u32,
}

impl ImageHeader {
    /// A header with all methods set to 0 and a CRC matching its encoding.
    pub fn new(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Self {
        let mut header = Self {
            length: HEADER_LENGTH,
            width,
            height,
            bit_depth,
            color_type,
            compression_method: 0,
            filter_method: 0,
            interlace_method: 0,
            crc: 0,
        };
        header.crc = crc::checksum(ChunkType::IHDR.bytes(), &header.to_bytes());
        header
    }

    /// Decodes the 13 byte payload. Method bytes other than 0 are rejected.
    pub fn from_bytes(data: &[u8; 13], crc: u32) -> Result<Self> {
        let mut cursor = Cursor::new(&data[..]);
        // reading from a 13 byte array cannot run short
        let width = cursor.read_u32::<BigEndian>()?;
        let height = cursor.read_u32::<BigEndian>()?;
        let mut bytes = [0u8; 5];
        cursor.read_exact(&mut bytes)?;
        let [bit_depth, color_type, compression_method, filter_method, interlace_method] = bytes;

        for (field, value) in [
            ("compression method", compression_method),
            ("filter method", filter_method),
            ("interlace method", interlace_method),
        ] {
            if value != 0 {
                return Err(PngMergeError::UnsupportedMethod { field, value });
            }
        }

        Ok(Self {
            length: HEADER_LENGTH,
            width,
            height,
            bit_depth,
            color_type,
            compression_method,
            filter_method,
            interlace_method,
            crc,
        })
    }

    /// The 13 byte IHDR payload.
    pub fn to_bytes(&self) -> [u8; 13] {
        let mut buf = [0u8; 13];
        BigEndian::write_u32(&mut buf[0..4], self.width);
        BigEndian::write_u32(&mut buf[4..8], self.height);
        buf[8..].copy_from_slice(&[
            self.bit_depth,
            self.color_type,
            self.compression_method,
            self.filter_method,
            self.interlace_method,
        ]);
        buf
    }

    /// Reads the very first chunk, which must be an IHDR of length 13.
    pub fn read<R: Read>(reader: &mut ChunkReader<R>) -> Result<Self> {
        let length = reader.read_length()?;
        if length != HEADER_LENGTH {
            return Err(PngMergeError::InvalidHeaderLength(length));
        }

        let chunk_type = reader.read_type()?;
        if chunk_type != ChunkType::IHDR {
            return Err(PngMergeError::InvalidHeaderType(chunk_type));
        }

        let data = reader.read_data(chunk_type, length)?;
        let crc = reader.finish_chunk(chunk_type, &data)?;

        let mut payload = [0u8; 13];
        payload.copy_from_slice(&data);
        Self::from_bytes(&payload, crc)
    }

    /// Writes the header as a complete IHDR chunk with a freshly computed CRC.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_chunk(writer, ChunkType::IHDR, &self.to_bytes())
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    pub fn color_type(&self) -> u8 {
        self.color_type
    }

    pub fn compression_method(&self) -> u8 {
        self.compression_method
    }

    pub fn filter_method(&self) -> u8 {
        self.filter_method
    }

    pub fn interlace_method(&self) -> u8 {
        self.interlace_method
    }

    /// the CRC as stored in the file the header was read from
    pub fn crc(&self) -> u32 {
        self.crc
    }

    pub fn samples_per_pixel(&self) -> u8 {
        geometry::samples_per_pixel(self.color_type)
    }

    pub fn bits_per_pixel(&self) -> u32 {
        geometry::bits_per_pixel(self.color_type, self.bit_depth)
    }

    pub fn row_width_in_bytes(&self) -> usize {
        geometry::row_width_in_bytes(self.bits_per_pixel(), self.width)
    }

    pub fn expected_stream_len(&self) -> usize {
        geometry::expected_stream_len(self.bits_per_pixel(), self.width, self.height)
    }
}
