use bitstream_io::{BigEndian, BitWrite, BitWriter};
use thiserror::Error;

/// The error type that describes failures to decode Base64 encoded strings.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A byte outside the URL-safe Base64 alphabet was found in the input.
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input length (padding excluded) cannot come from a Base64 encoder.
    #[error("invalid input length {0}")]
    InvalidLength(usize),
}

/// Custom base64 implementation, 6-bits aligned, using the URL Safe
/// Base64 dictionary. Trailing `=` padding is accepted and ignored.
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    let s = s.trim_end_matches('=');

    // a base64 encoder emits 2, 3 or 4 characters for the final group,
    // never a single one
    if s.len() % 4 == 1 {
        return Err(DecodeError::InvalidLength(s.len()));
    }

    // output buffer should not be larger than input string, so we pre-allocate enough bytes as to avoid realloc
    // which is slow, and could cause allocation of a bigger capacity than needed (x2 or more)
    let mut buffer = Vec::with_capacity(s.len());
    let mut bw = BitWriter::endian(&mut buffer, BigEndian);

    // write 6 bits for every decoded character
    for b in s.bytes() {
        let value = base64_value(b).ok_or(DecodeError::InvalidCharacter(b as char))?;
        bw.write(6, value).expect("write into vec should not fail");
    }

    // write remaining value if we're not 8-bit aligned at this point
    let (n, value) = bw.into_unwritten();
    if n > 0 {
        let n = 8 - n;
        let value = value << n;
        buffer.push(value);
    }

    Ok(buffer)
}

fn base64_value(b: u8) -> Option<u8> {
    match b {
        b'A'..=b'Z' => Some(b - b'A'),
        b'a'..=b'z' => Some(b - b'a' + 26),
        b'0'..=b'9' => Some(b - b'0' + 52),
        b'-' => Some(62),
        b'_' => Some(63),
        _ => None,
    }
}
