use std::str::FromStr;

/// Default zlib level used for the written IDAT chunk
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Codec configuration for decoding and writing containers
#[derive(Debug, Clone)]
pub struct CodecOptions {
    /// What to do when a chunk's stored CRC does not match the computed one.
    pub crc_policy: CrcPolicy,

    /// zlib compression level for the written image data, `0..=9`.
    /// Values above 9 are treated as 9.
    pub compression_level: u32,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            crc_policy: CrcPolicy::Warn,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl CodecOptions {
    pub fn with_crc_policy(mut self, crc_policy: CrcPolicy) -> Self {
        self.crc_policy = crc_policy;
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    pub(crate) fn compression(&self) -> flate2::Compression {
        flate2::Compression::new(self.compression_level.min(9))
    }
}

/// Verification strictness for chunk checksums read from a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrcPolicy {
    /// consume the stored CRC without checking it
    Ignore,
    /// check it, log a warning on mismatch and carry on
    #[default]
    Warn,
    /// a mismatch aborts decoding
    Strict,
}

impl FromStr for CrcPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown crc policy `{other}`, expected one of: ignore, warn, strict"
            )),
        }
    }
}
