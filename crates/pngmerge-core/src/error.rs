use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::Incompatibility;
use crate::png::ChunkType;

/// Coarse classification of a [`PngMergeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// open, read, write or seek failures of the underlying file
    Io,
    /// the bytes do not form a container this codec understands
    Format,
    /// color type and bit depth do not describe a pixel layout
    UnsupportedGeometry,
    /// cover and secret do not share the same geometry
    Compatibility,
    /// inflating or deflating the pixel stream failed
    Compression,
    /// the api was called without all required inputs
    Usage,
}

#[derive(Error, Debug)]
pub enum PngMergeError {
    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// The first 8 bytes are not the PNG magic, or the file is shorter than that
    #[error("Not a valid PNG container: bad signature")]
    InvalidSignature,

    /// The first chunk declared a length other than 13
    #[error("Invalid IHDR chunk length: expected 13, got {0}")]
    InvalidHeaderLength(u32),

    /// The first chunk was not an IHDR chunk
    #[error("Invalid first chunk: expected IHDR, got {0}")]
    InvalidHeaderType(ChunkType),

    /// A header method byte (compression, filter, interlace) is not 0
    #[error("Unsupported {field} {value} in IHDR, only method 0 is supported")]
    UnsupportedMethod { field: &'static str, value: u8 },

    /// The stream ended before a chunk could be read completely
    #[error("Truncated {chunk} chunk: {what} needs {expected} bytes, only {available} available")]
    TruncatedChunk {
        chunk: ChunkType,
        what: &'static str,
        expected: u64,
        available: u64,
    },

    /// The stream ended in the middle of a chunk length or chunk type
    #[error("Unexpected end of stream while reading the {0}")]
    UnexpectedEnd(&'static str),

    /// Chunk data, written or declared, longer than the 2^31 - 1 bytes a PNG chunk may hold
    #[error("{chunk} chunk data of {length} bytes exceeds the maximum chunk length")]
    ChunkTooLarge { chunk: ChunkType, length: usize },

    /// The stored CRC of a chunk does not match the one computed over type and data
    #[error("Checksum mismatch in {chunk} chunk: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        chunk: ChunkType,
        stored: u32,
        computed: u32,
    },

    /// The container has no IDAT chunk at all
    #[error("No IDAT chunk found before IEND")]
    MissingImageData,

    /// The stream ended before the IEND chunk
    #[error("Stream ended before the IEND chunk")]
    MissingTerminator,

    /// Color type and bit depth give no samples per pixel
    #[error("Unsupported color type {color_type} with bit depth {bit_depth}")]
    UnsupportedColorType { color_type: u8, bit_depth: u8 },

    /// The inflated stream does not have the size the header implies
    #[error("Decoded image data has {actual} bytes, the header implies {expected}")]
    UnexpectedStreamSize { expected: usize, actual: usize },

    /// Represents a cover and secret that cannot be merged. The reason is part of the
    /// message, not a separate source.
    #[error("Images are not compatible: {0}")]
    Incompatible(Incompatibility),

    /// Represents a failure to inflate the concatenated IDAT payloads
    #[error("Failed to decompress image data")]
    DecompressionError { source: std::io::Error },

    /// Represents a failure to deflate the merged pixel stream
    #[error("Failed to compress image data")]
    CompressionError { source: std::io::Error },

    /// Adds the path of the image that failed to decode
    #[error("Failed to decode {}", path.display())]
    Image {
        path: PathBuf,
        source: Box<PngMergeError>,
    },

    #[error("API Error: No cover image set")]
    CoverNotSet,

    #[error("API Error: No secret image set")]
    SecretNotSet,

    #[error("API Error: No carrier image set")]
    CarrierNotSet,

    #[error("API Error: No target file set")]
    TargetNotSet,
}

impl PngMergeError {
    pub fn kind(&self) -> ErrorKind {
        use PngMergeError::*;
        match self {
            ReadError { .. } | WriteError { .. } | IoError(_) => ErrorKind::Io,
            InvalidSignature
            | InvalidHeaderLength(_)
            | InvalidHeaderType(_)
            | UnsupportedMethod { .. }
            | TruncatedChunk { .. }
            | UnexpectedEnd(_)
            | ChunkTooLarge { .. }
            | ChecksumMismatch { .. }
            | MissingImageData
            | MissingTerminator
            | UnexpectedStreamSize { .. } => ErrorKind::Format,
            UnsupportedColorType { .. } => ErrorKind::UnsupportedGeometry,
            Incompatible(Incompatibility::UnsupportedColorType { .. }) => {
                ErrorKind::UnsupportedGeometry
            }
            Incompatible(_) => ErrorKind::Compatibility,
            DecompressionError { .. } | CompressionError { .. } => ErrorKind::Compression,
            Image { source, .. } => source.kind(),
            CoverNotSet | SecretNotSet | CarrierNotSet | TargetNotSet => ErrorKind::Usage,
        }
    }

    /// wraps `self` with the path of the image it belongs to
    pub(crate) fn in_image(self, path: impl Into<PathBuf>) -> Self {
        PngMergeError::Image {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

impl From<Incompatibility> for PngMergeError {
    fn from(reason: Incompatibility) -> Self {
        PngMergeError::Incompatible(reason)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Io => "I/O error",
            ErrorKind::Format => "format error",
            ErrorKind::UnsupportedGeometry => "unsupported geometry",
            ErrorKind::Compatibility => "compatibility error",
            ErrorKind::Compression => "compression error",
            ErrorKind::Usage => "usage error",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_look_through_the_image_wrapper_for_the_kind() {
        let err = PngMergeError::InvalidSignature.in_image("cover.png");

        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.to_string(), "Failed to decode cover.png");
    }

    #[test]
    fn should_state_the_incompatibility_once() {
        use std::error::Error;

        let err: PngMergeError = Incompatibility::Width {
            cover: 4,
            secret: 5,
        }
        .into();

        assert_eq!(
            err.to_string(),
            "Images are not compatible: Width mismatch: cover=4, secret=5"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn should_classify_unsupported_color_type_as_geometry() {
        let err: PngMergeError = Incompatibility::UnsupportedColorType {
            cover: 5,
            secret: 2,
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::UnsupportedGeometry);
    }
}
