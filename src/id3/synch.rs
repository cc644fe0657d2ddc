use byteorder::{BigEndian, ByteOrder};

use crate::common::error::{Id3Error, Result};

pub const SYNCHSAFE_MAX: u32 = (1 << 28) - 1;

/// Decode a 4-byte synchsafe integer (7 significant bits per byte, MSB
/// first, 28 usable bits total).
pub fn decode_synchsafe(data: &[u8]) -> Result<u32> {
    debug_assert_eq!(data.len(), 4);
    if data.iter().any(|&b| b & 0x80 != 0) {
        return Err(Id3Error::MalformedSize);
    }
    let mut result = 0u32;
    for &b in data {
        result = (result << 7) | u32::from(b);
    }
    Ok(result)
}

/// Encode an integer as 4 synchsafe bytes.
pub fn encode_synchsafe(value: u32) -> Result<[u8; 4]> {
    if value > SYNCHSAFE_MAX {
        return Err(Id3Error::ValueTooLarge(value));
    }
    let mut out = [0u8; 4];
    let mut val = value;
    for i in (0..4).rev() {
        out[i] = (val & 0x7F) as u8;
        val >>= 7;
    }
    Ok(out)
}

/// Decode with a caller-chosen number of significant bits per byte.
/// The v2.4 frame-size heuristic needs to try both 7 and 8.
pub(crate) fn decode_lenient(data: &[u8], bits: u8) -> u32 {
    let mask = (1u32 << bits) - 1;
    let mut result = 0u32;
    for &b in data {
        result = (result << bits) | (u32::from(b) & mask);
    }
    result
}

/// Plain big-endian 32-bit read (ID3v2.3 frame sizes).
pub fn decode_plain32(data: &[u8]) -> u32 {
    BigEndian::read_u32(data)
}

/// Plain big-endian 24-bit read (ID3v2.2 frame sizes).
pub fn decode_plain24(data: &[u8]) -> u32 {
    BigEndian::read_u24(data)
}

pub fn encode_plain32(value: u32) -> [u8; 4] {
    let mut out = [0u8; 4];
    BigEndian::write_u32(&mut out, value);
    out
}

/// Remove unsynchronisation stuffing: a 0x00 following 0xFF is dropped.
pub fn decode_unsynch(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        output.push(data[i]);
        if data[i] == 0xFF && i + 1 < data.len() && data[i + 1] == 0x00 {
            i += 2;
        } else {
            i += 1;
        }
    }
    output
}

/// Apply unsynchronisation stuffing: insert 0x00 after every 0xFF.
pub fn encode_unsynch(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len() + data.len() / 10);
    for &b in data {
        output.push(b);
        if b == 0xFF {
            output.push(0x00);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synchsafe_round_trip() {
        for n in [0u32, 1, 127, 128, 0x7F7F, 0x0FFF_FFFF, SYNCHSAFE_MAX] {
            let encoded = encode_synchsafe(n).unwrap();
            assert_eq!(decode_synchsafe(&encoded).unwrap(), n, "n = {}", n);
        }
    }

    #[test]
    fn synchsafe_known_values() {
        assert_eq!(encode_synchsafe(257).unwrap(), [0x00, 0x00, 0x02, 0x01]);
        assert_eq!(decode_synchsafe(&[0x00, 0x00, 0x02, 0x01]).unwrap(), 257);
    }

    #[test]
    fn synchsafe_rejects_high_bit() {
        assert!(matches!(
            decode_synchsafe(&[0x80, 0x00, 0x00, 0x00]),
            Err(Id3Error::MalformedSize)
        ));
    }

    #[test]
    fn synchsafe_rejects_oversized_value() {
        assert!(encode_synchsafe(SYNCHSAFE_MAX).is_ok());
        assert!(matches!(
            encode_synchsafe(SYNCHSAFE_MAX + 1),
            Err(Id3Error::ValueTooLarge(_))
        ));
    }

    #[test]
    fn plain_reads() {
        assert_eq!(decode_plain32(&[0x00, 0x01, 0x00, 0x00]), 65536);
        assert_eq!(decode_plain24(&[0x01, 0x00, 0x00]), 65536);
        assert_eq!(encode_plain32(65536), [0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn unsynch_round_trip() {
        let data = [0x12, 0xFF, 0xE0, 0xFF, 0x00, 0x34];
        let encoded = encode_unsynch(&data);
        assert_eq!(encoded, [0x12, 0xFF, 0x00, 0xE0, 0xFF, 0x00, 0x00, 0x34]);
        assert_eq!(decode_unsynch(&encoded), data);
    }
}
