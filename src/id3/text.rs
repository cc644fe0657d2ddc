use memchr::memchr;

use crate::common::error::{Id3Error, Result};

/// Text encodings selectable by the first payload byte of a v2 text frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Encoding {
    Latin1 = 0,
    Utf16 = 1,
    Utf16Be = 2,
    Utf8 = 3,
}

impl Encoding {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0 => Ok(Encoding::Latin1),
            1 => Ok(Encoding::Utf16),
            2 => Ok(Encoding::Utf16Be),
            3 => Ok(Encoding::Utf8),
            _ => Err(Id3Error::InvalidEncoding(b)),
        }
    }

    /// Preferred encoding for newly created frames in a given tag version.
    pub fn default_for_version(major: u8) -> Self {
        if major >= 4 {
            Encoding::Utf8
        } else {
            Encoding::Utf16
        }
    }

    /// Size of the null terminator in this encoding.
    pub fn terminator_len(self) -> usize {
        match self {
            Encoding::Latin1 | Encoding::Utf8 => 1,
            Encoding::Utf16 | Encoding::Utf16Be => 2,
        }
    }
}

/// Decode frame text. Truncated or invalid multi-byte sequences are
/// substituted with U+FFFD so one corrupt frame cannot take down the whole
/// tag read.
pub fn decode(data: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Latin1 => {
            if data.is_ascii() {
                // Latin-1 and UTF-8 agree on the ASCII range.
                String::from_utf8_lossy(data).into_owned()
            } else {
                data.iter().map(|&b| b as char).collect()
            }
        }
        Encoding::Utf16 => {
            if data.len() < 2 {
                return String::new();
            }
            let (decoder, start) = if data[0] == 0xFF && data[1] == 0xFE {
                (encoding_rs::UTF_16LE, 2)
            } else if data[0] == 0xFE && data[1] == 0xFF {
                (encoding_rs::UTF_16BE, 2)
            } else {
                // No BOM; little-endian is the overwhelmingly common case.
                (encoding_rs::UTF_16LE, 0)
            };
            let (result, _, had_errors) = decoder.decode(&data[start..]);
            if had_errors {
                log::warn!("invalid UTF-16 sequence in text frame, substituted");
            }
            result.into_owned()
        }
        Encoding::Utf16Be => {
            let (result, _, had_errors) = encoding_rs::UTF_16BE.decode(data);
            if had_errors {
                log::warn!("invalid UTF-16BE sequence in text frame, substituted");
            }
            result.into_owned()
        }
        Encoding::Utf8 => match std::str::from_utf8(data) {
            Ok(s) => s.to_string(),
            Err(_) => {
                log::warn!("invalid UTF-8 sequence in text frame, substituted");
                String::from_utf8_lossy(data).into_owned()
            }
        },
    }
}

/// Encode text for a frame payload. The BOM variant always writes a
/// little-endian BOM.
pub fn encode(text: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Latin1 => text
            .chars()
            .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
            .collect(),
        Encoding::Utf16 => {
            let mut result = vec![0xFF, 0xFE];
            for unit in text.encode_utf16() {
                result.extend_from_slice(&unit.to_le_bytes());
            }
            result
        }
        Encoding::Utf16Be => {
            let mut result = Vec::with_capacity(text.len() * 2);
            for unit in text.encode_utf16() {
                result.extend_from_slice(&unit.to_be_bytes());
            }
            result
        }
        Encoding::Utf8 => text.as_bytes().to_vec(),
    }
}

/// Whether `text` survives a Latin-1 round trip unchanged.
pub fn fits_latin1(text: &str) -> bool {
    text.chars().all(|c| (c as u32) <= 0xFF)
}

/// Position of the null terminator, if any.
pub fn find_terminator(data: &[u8], encoding: Encoding) -> Option<usize> {
    match encoding {
        Encoding::Latin1 | Encoding::Utf8 => memchr(0, data),
        Encoding::Utf16 | Encoding::Utf16Be => {
            let mut i = 0;
            while i + 1 < data.len() {
                if data[i] == 0 && data[i + 1] == 0 {
                    return Some(i);
                }
                i += 2;
            }
            None
        }
    }
}

/// Read a null-terminated string, returning the text and the number of
/// bytes consumed including the terminator. Unterminated input consumes
/// everything.
pub fn read_terminated(data: &[u8], encoding: Encoding) -> (String, usize) {
    match find_terminator(data, encoding) {
        Some(pos) => (
            decode(&data[..pos], encoding),
            pos + encoding.terminator_len(),
        ),
        None => (decode(data, encoding), data.len()),
    }
}

/// Decode an ID3v1 fixed-width Latin-1 field, stopping at the first null
/// and trimming trailing spaces.
pub fn decode_fixed(data: &[u8]) -> String {
    let end = memchr(0, data).unwrap_or(data.len());
    let s = decode(&data[..end], Encoding::Latin1);
    s.trim_end().to_string()
}

/// Write text into an ID3v1 fixed-width field: Latin-1, zero-padded,
/// silently truncated to the field width.
pub fn encode_fixed(dest: &mut [u8], text: &str) {
    dest.fill(0);
    let bytes = encode(text, Encoding::Latin1);
    let len = bytes.len().min(dest.len());
    dest[..len].copy_from_slice(&bytes[..len]);
}
