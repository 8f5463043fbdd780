//! Table driven CRC-32 as used by PNG chunks (reflected, polynomial `0xEDB88320`,
//! initial and final XOR `0xFFFFFFFF`).

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Lookup table, built once at compile time.
pub static CRC_TABLE: [u32; 256] = build_table();

/// Builds the 256 entry lookup table for the reflected polynomial.
pub const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Incremental CRC over any number of byte slices.
#[derive(Debug, Clone)]
pub struct Crc32 {
    crc: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self { crc: 0xFFFF_FFFF }
    }
}

impl Crc32 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        for b in bytes {
            self.crc = CRC_TABLE[((self.crc ^ *b as u32) & 0xFF) as usize] ^ (self.crc >> 8);
        }
        self
    }

    pub fn finish(&self) -> u32 {
        self.crc ^ 0xFFFF_FFFF
    }
}

/// CRC of a chunk, computed over its type followed by its data.
pub fn checksum(chunk_type: &[u8], data: &[u8]) -> u32 {
    Crc32::new().update(chunk_type).update(data).finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crc::{Crc, CRC_32_ISO_HDLC};

    const REFERENCE: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

    #[test]
    fn should_build_the_well_known_table() {
        assert_eq!(CRC_TABLE[0], 0x0000_0000);
        assert_eq!(CRC_TABLE[1], 0x7707_3096);
        assert_eq!(CRC_TABLE[128], 0xEDB8_8320);
        assert_eq!(CRC_TABLE[255], 0x2D02_EF8D);
        assert_eq!(build_table(), CRC_TABLE);
    }

    #[test]
    fn should_match_the_check_value() {
        assert_eq!(checksum(b"", b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn should_apply_initial_and_final_xor_on_empty_input() {
        // 0xFFFFFFFF ^ 0xFFFFFFFF, no table lookups involved
        assert_eq!(checksum(b"", b""), REFERENCE.checksum(b""));
        assert_eq!(checksum(b"", b""), 0);
    }

    #[test]
    fn should_match_the_reference_implementation() {
        let inputs: [&[u8]; 5] = [
            b"IEND",
            b"IHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x00\x00\x00\x00",
            b"The quick brown fox jumps over the lazy dog",
            &[0xFF; 1024],
            &[0x00, 0x01, 0x80, 0xFE],
        ];
        for input in inputs {
            assert_eq!(
                checksum(&input[..0], input),
                REFERENCE.checksum(input),
                "crc mismatch for {input:?}"
            );
        }
    }

    #[test]
    fn should_be_independent_of_the_split_between_type_and_data() {
        assert_eq!(checksum(b"IEND", b""), 0xAE42_6082);
        assert_eq!(checksum(b"IE", b"ND"), 0xAE42_6082);
    }
}
