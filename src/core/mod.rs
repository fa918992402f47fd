use bitstream_io::{BigEndian, BitRead, BitReader, Numeric};
use std::io;
use std::io::Cursor;
use std::iter::repeat_with;

pub(crate) mod base64;

/// Adds base64url decoding to string slices.
pub trait DecodeExt {
    fn decode_base64_url(&self) -> Result<Vec<u8>, base64::DecodeError>;
}

impl DecodeExt for &str {
    fn decode_base64_url(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::decode(self)
    }
}

/// A cursor over a decoded consent string payload, reading big-endian
/// bit-packed fields from the start of the buffer onwards.
///
/// Reading past the end of the buffer fails with an [`io::Error`] of kind
/// [`io::ErrorKind::UnexpectedEof`]; the cursor is never left beyond the
/// end of the buffer.
pub struct DataReader<'a> {
    bit_reader: BitReader<Cursor<&'a [u8]>, BigEndian>,
    total_bits: u64,
}

impl<'a> DataReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bit_reader: BitReader::endian(Cursor::new(bytes), BigEndian),
            total_bits: bytes.len() as u64 * 8,
        }
    }

    pub fn read_bool(&mut self) -> io::Result<bool> {
        self.bit_reader.read_bit()
    }

    pub fn read_fixed_integer<N: Numeric>(&mut self, bits: u32) -> io::Result<N> {
        self.bit_reader.read(bits)
    }

    /// Reads `chars` characters of 6 bits each, mapped onto `'A'..='Z'`.
    pub fn read_string(&mut self, chars: usize) -> io::Result<String> {
        repeat_with(|| self.read_fixed_integer::<u8>(6))
            .take(chars)
            .map(|r| r.map(|n| (n + 65) as char))
            .collect::<Result<String, _>>()
    }

    /// Reads a 36-bit timestamp in deciseconds since the Unix epoch and
    /// returns it as seconds, truncating the fractional decisecond.
    pub fn read_datetime_as_unix_timestamp(&mut self) -> io::Result<u64> {
        Ok(self.read_fixed_integer::<u64>(36)? / 10) // seconds
    }

    /// Reads `bits` consecutive flags; index 0 of the result is the first
    /// bit read.
    pub fn read_fixed_bitfield(&mut self, bits: usize) -> io::Result<Vec<bool>> {
        repeat_with(|| self.read_bool()).take(bits).collect()
    }

    /// Number of bits left between the cursor and the end of the buffer.
    pub fn remaining_bits(&mut self) -> io::Result<u64> {
        let pos = self.bit_reader.position_in_bits()?;
        Ok(self.total_bits.saturating_sub(pos))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::ErrorKind;
    use test_case::test_case;

    /// Transform a string of literal binary digits into a vector of bytes.
    /// Zeroes will be appended to fill missing bits.
    pub(crate) fn b(s: &str) -> Vec<u8> {
        let chars = s
            .chars()
            .filter(|&c| c == '1' || c == '0')
            .collect::<Vec<_>>();
        chars
            .chunks(8)
            .map(|c| (8 - c.len(), String::from_iter(c)))
            .map(|(l, s)| u8::from_str_radix(&s, 2).map(|n| n << l))
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or(vec![])
    }

    #[test_case("00000001 00000010 00000011" => vec![1, 2, 3])]
    #[test_case("000000 010000 001000 000011" => vec![1, 2, 3])]
    #[test_case("000000 010000 001000 000011 1000" => vec![1, 2, 3, 128])]
    #[test_case("000000 010000 001000 000011 100" => vec![1, 2, 3, 128])]
    fn bytes(s: &str) -> Vec<u8> {
        b(s)
    }

    #[test_case("000101", 6 => 5)]
    #[test_case("101010", 6 => 42)]
    #[test_case("0000 101010", 10 => 42)]
    fn read_int(s: &str, bits: u32) -> u32 {
        DataReader::new(&b(s)).read_fixed_integer(bits).unwrap()
    }

    #[test_case("101010", 1 => "k")]
    #[test_case("000100 001101", 2 => "EN")]
    fn read_string(s: &str, chars: usize) -> String {
        DataReader::new(&b(s)).read_string(chars).unwrap()
    }

    #[test_case("001111101100100110001110010001011101" => 1685434479)]
    #[test_case("000000000000000000000000000000000000" => 0)]
    fn read_datetime_as_unix_timestamp(s: &str) -> u64 {
        DataReader::new(&b(s))
            .read_datetime_as_unix_timestamp()
            .unwrap()
    }

    #[test_case("10101", 5 => vec![true, false, true, false, true])]
    #[test_case("10101", 0 => Vec::<bool>::new() ; "zero bits")]
    fn read_fixed_bitfield(s: &str, bits: usize) -> Vec<bool> {
        DataReader::new(&b(s)).read_fixed_bitfield(bits).unwrap()
    }

    #[test]
    fn read_past_end() {
        let buf = b("10101010");
        let mut r = DataReader::new(&buf);

        assert_eq!(r.read_fixed_integer::<u8>(6).unwrap(), 42);
        let err = r.read_fixed_integer::<u8>(6).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn remaining_bits() {
        let buf = b("10101010 1111");
        let mut r = DataReader::new(&buf);

        assert_eq!(r.remaining_bits().unwrap(), 16);
        r.read_fixed_integer::<u8>(6).unwrap();
        assert_eq!(r.remaining_bits().unwrap(), 10);
    }
}
