//! Self-delimiting numeric value encoding and decoding.
//!
//! An SDNV carries an unsigned integer as a big-endian base-128 sequence:
//! seven payload bits per byte, most-significant group first, with the
//! high bit of every byte except the last set as a continuation flag. The
//! format is consumed by external peers, so the bit-level contract here
//! must hold exactly.

use std::io::{self, Cursor, Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use dtnport_core::error::{ErrorKind, Result};

/// Longest legal SDNV in bytes; ten 7-bit groups bound the decodable
/// magnitude to 70 bits and cap the cost of a corrupt encoding.
pub const MAX_SDNV_LEN: usize = 10;

/// An encoded self-delimiting numeric value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sdnv {
    text: [u8; MAX_SDNV_LEN],
    length: usize,
}

impl Sdnv {
    /// Returns the encoded bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.text[..self.length]
    }

    /// Returns the number of bytes in the encoding (1..=10).
    pub fn len(&self) -> usize {
        self.length
    }

    /// An SDNV always has at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl AsRef<[u8]> for Sdnv {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Serializes unsigned integers into SDNV form.
pub struct SdnvEncoder;

impl SdnvEncoder {
    /// Encodes a value into a self-contained SDNV.
    ///
    /// The length is one byte per 7 significant bits, minimum one, so zero
    /// encodes as the single byte `0x00`. Bytes are filled from the last
    /// position backward; every byte but the final one carries the
    /// continuation flag.
    pub fn encode(value: u64) -> Sdnv {
        let mut length = 0;
        let mut remnant = value;
        loop {
            remnant >>= 7;
            length += 1;
            if remnant == 0 {
                break;
            }
        }

        let mut text = [0u8; MAX_SDNV_LEN];
        let mut remnant = value;
        let mut flag = 0u8;
        for slot in text[..length].iter_mut().rev() {
            *slot = (remnant & 0x7f) as u8 | flag;
            remnant >>= 7;
            flag = 0x80;
        }

        Sdnv { text, length }
    }

    /// Encodes a value, appending the bytes to the provided buffer.
    pub fn encode_into(buffer: &mut Vec<u8>, value: u64) -> io::Result<()> {
        let sdnv = Self::encode(value);
        buffer.write_all(sdnv.as_slice())?;
        Ok(())
    }

    /// Encodes a value into any byte writer.
    pub fn encode_to<W: Write>(writer: &mut W, value: u64) -> io::Result<usize> {
        let sdnv = Self::encode(value);
        for &byte in sdnv.as_slice() {
            writer.write_u8(byte)?;
        }

        Ok(sdnv.len())
    }
}

/// Deserializes SDNV-encoded integers.
pub struct SdnvDecoder;

impl SdnvDecoder {
    /// Decodes one SDNV from the front of `bytes`.
    ///
    /// Returns the value and the number of bytes consumed. Fails with
    /// [`ErrorKind::MalformedSdnv`] when ten bytes pass without a
    /// terminating byte (high bit clear), and with an I/O error when the
    /// input ends first.
    pub fn decode(bytes: &[u8]) -> Result<(u64, usize)> {
        let mut cursor = Cursor::new(bytes);
        let value = Self::decode_from(&mut cursor)?;
        Ok((value, cursor.position() as usize))
    }

    /// Decodes one SDNV from a cursor, for values embedded in a larger
    /// stream. The cursor advances past the consumed bytes only.
    pub fn decode_from<R: Read>(reader: &mut R) -> Result<u64> {
        let mut value: u64 = 0;
        let mut consumed = 0;
        loop {
            consumed += 1;
            if consumed > MAX_SDNV_LEN {
                return Err(ErrorKind::MalformedSdnv);
            }

            let byte = reader.read_u8().map_err(ErrorKind::from)?;

            // Shift the accumulator seven bits left and fold in the payload
            // bits of this byte.
            value = (value << 7) | u64::from(byte & 0x7f);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_zero_is_one_zero_byte() {
        let sdnv = SdnvEncoder::encode(0);
        assert_eq!(sdnv.len(), 1);
        assert_eq!(sdnv.as_slice(), &[0x00]);
    }

    #[test]
    fn test_single_byte_range_has_no_leading_byte() {
        for value in 0..=127u64 {
            let sdnv = SdnvEncoder::encode(value);
            assert_eq!(sdnv.len(), 1, "value {} should encode in one byte", value);
            assert_eq!(sdnv.as_slice()[0], value as u8);
        }
    }

    #[test]
    fn test_encode_128_is_two_bytes() {
        let sdnv = SdnvEncoder::encode(128);
        assert_eq!(sdnv.as_slice(), &[0x81, 0x00]);

        let (value, consumed) = SdnvDecoder::decode(&[0x81, 0x00]).unwrap();
        assert_eq!((value, consumed), (128, 2));
    }

    #[test]
    fn test_known_encodings() {
        let cases: &[(u64, &[u8])] = &[
            (1, &[0x01]),
            (127, &[0x7f]),
            (300, &[0x82, 0x2c]),
            (0x4234, &[0x81, 0x84, 0x34]),
            (0xffff, &[0x83, 0xff, 0x7f]),
        ];
        for &(value, expected) in cases {
            assert_eq!(SdnvEncoder::encode(value).as_slice(), expected);
        }
    }

    #[test]
    fn test_round_trip_across_width_boundaries() {
        let mut values = vec![0u64, 1, 127, 128, 16383, 16384, 2097151, 2097152];
        for bits in 1..64 {
            let v = 1u64 << bits;
            values.push(v - 1);
            values.push(v);
            values.push(v + 1);
        }
        values.push(u64::MAX);

        for value in values {
            let sdnv = SdnvEncoder::encode(value);
            let (decoded, consumed) = SdnvDecoder::decode(sdnv.as_slice()).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, sdnv.len());
        }
    }

    #[test]
    fn test_decode_rejects_unterminated_run() {
        // Eleven bytes, every one with the continuation flag set.
        let bytes = [0xffu8; 11];
        match SdnvDecoder::decode(&bytes) {
            Err(ErrorKind::MalformedSdnv) => {}
            other => panic!("expected MalformedSdnv, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        // Continuation flag promises more bytes than are present.
        assert!(SdnvDecoder::decode(&[0x81]).is_err());
        assert!(SdnvDecoder::decode(&[]).is_err());
    }

    #[test]
    fn test_decode_consumes_only_one_value() {
        let mut buffer = Vec::new();
        SdnvEncoder::encode_into(&mut buffer, 300).unwrap();
        SdnvEncoder::encode_into(&mut buffer, 7).unwrap();

        let mut cursor = Cursor::new(buffer.as_slice());
        assert_eq!(SdnvDecoder::decode_from(&mut cursor).unwrap(), 300);
        assert_eq!(SdnvDecoder::decode_from(&mut cursor).unwrap(), 7);
        assert_eq!(cursor.position() as usize, buffer.len());
    }

    #[test]
    fn test_ten_byte_maximum_value() {
        // u64::MAX needs ten groups; the encoding must terminate exactly at
        // the length bound.
        let sdnv = SdnvEncoder::encode(u64::MAX);
        assert_eq!(sdnv.len(), 10);
        let (value, consumed) = SdnvDecoder::decode(sdnv.as_slice()).unwrap();
        assert_eq!(value, u64::MAX);
        assert_eq!(consumed, 10);
    }

    #[test]
    fn test_encode_to_writer() {
        let mut out = Vec::new();
        let written = SdnvEncoder::encode_to(&mut out, 128).unwrap();
        assert_eq!(written, 2);
        assert_eq!(out, vec![0x81, 0x00]);
    }
}
