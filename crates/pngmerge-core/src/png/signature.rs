use std::io::{ErrorKind, Read, Write};

use crate::error::PngMergeError;
use crate::result::Result;

/// The 8 bytes every PNG file starts with.
pub const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Consumes the first 8 bytes of `reader` and checks them against [`SIGNATURE`].
///
/// A short read counts as a bad signature, not as an I/O error.
pub fn validate_signature<R: Read>(reader: &mut R) -> Result<()> {
    let mut buf = [0u8; 8];
    match reader.read_exact(&mut buf) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(PngMergeError::InvalidSignature)
        }
        Err(source) => return Err(PngMergeError::ReadError { source }),
    }

    if buf != SIGNATURE {
        return Err(PngMergeError::InvalidSignature);
    }

    Ok(())
}

pub fn write_signature<W: Write>(writer: &mut W) -> Result<()> {
    writer
        .write_all(&SIGNATURE)
        .map_err(|source| PngMergeError::WriteError { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Cursor;

    #[test]
    fn should_accept_the_magic_and_stop_right_after_it() {
        let mut input = Cursor::new([&SIGNATURE[..], b"rest"].concat());

        validate_signature(&mut input).expect("signature should be valid");
        assert_eq!(input.position(), 8);
    }

    #[test]
    fn should_reject_a_single_flipped_byte() {
        let mut bytes = SIGNATURE;
        bytes[3] = b'g';

        let err = validate_signature(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, PngMergeError::InvalidSignature));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn should_reject_short_input() {
        let err = validate_signature(&mut Cursor::new(&SIGNATURE[..5])).unwrap_err();
        assert!(matches!(err, PngMergeError::InvalidSignature));
    }
}
