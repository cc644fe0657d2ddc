use std::fmt;

use crate::common::error::{Id3Error, Result};
use crate::id3::registry::{self, FrameKind};
use crate::id3::synch;
use crate::id3::text::{self, Encoding};

/// A 4-character frame identifier.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FrameId(pub(crate) [u8; 4]);

impl FrameId {
    pub fn new(code: &str) -> Result<Self> {
        let bytes = code.as_bytes();
        if bytes.len() != 4
            || !bytes
                .iter()
                .all(|&b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(Id3Error::UnknownFrameCode(code.to_string()));
        }
        Ok(FrameId([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn as_str(&self) -> &str {
        // Construction only admits uppercase ASCII and digits.
        std::str::from_utf8(&self.0).unwrap_or("????")
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Debug for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameId({})", self.as_str())
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame header flags. The raw bits are retained so an unedited frame can
/// re-emit its header verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameFlags {
    pub raw: u16,
    pub compressed: bool,
    pub encrypted: bool,
    pub grouped: bool,
    pub unsynchronised: bool,
    pub data_length: bool,
}

impl FrameFlags {
    /// Bit layout differs between v2.3 and v2.4.
    pub fn parse(raw: u16, major: u8) -> Self {
        if major >= 4 {
            FrameFlags {
                raw,
                grouped: raw & 0x0040 != 0,
                compressed: raw & 0x0008 != 0,
                encrypted: raw & 0x0004 != 0,
                unsynchronised: raw & 0x0002 != 0,
                data_length: raw & 0x0001 != 0,
            }
        } else {
            FrameFlags {
                raw,
                compressed: raw & 0x0080 != 0,
                encrypted: raw & 0x0040 != 0,
                grouped: raw & 0x0020 != 0,
                unsynchronised: false,
                data_length: raw & 0x0080 != 0,
            }
        }
    }
}

/// Decoded view of a frame payload.
#[derive(Debug, Clone)]
pub enum FrameBody {
    /// Text information frame (T***, except TXXX).
    Text { encoding: Encoding, text: String },
    /// Comment frame (COMM): language, description, then the comment body.
    Comment {
        encoding: Encoding,
        lang: [u8; 3],
        desc: String,
        text: String,
    },
    /// Anything the engine does not interpret. Preserved byte-for-byte.
    Binary,
}

/// One ID3v2 frame (or the v2-shaped image of an ID3v1 fixed field).
///
/// `raw` always holds the exact payload that will be written back, so a
/// frame that was never edited round-trips byte-identically, whatever its
/// kind or flags. Edits re-encode `raw` from the body and clear the flags.
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: FrameId,
    pub kind: FrameKind,
    pub flags: FrameFlags,
    pub(crate) raw: Vec<u8>,
    pub body: FrameBody,
}

impl Frame {
    /// Build a frame from an on-disk payload. Never fails: payloads that
    /// cannot be interpreted become opaque `Binary` bodies.
    pub fn parse(id: FrameId, flags: FrameFlags, payload: Vec<u8>) -> Frame {
        let kind = registry::lookup(id.as_str());
        let body = Frame::decode_body(&id, kind, &flags, &payload);
        Frame {
            id,
            kind,
            flags,
            raw: payload,
            body,
        }
    }

    fn decode_body(id: &FrameId, kind: FrameKind, flags: &FrameFlags, payload: &[u8]) -> FrameBody {
        if flags.encrypted {
            return FrameBody::Binary;
        }

        // Undo per-frame transforms on a scratch copy for the decoded
        // view; `raw` keeps the stored form.
        let mut view = payload.to_vec();
        if flags.grouped && !view.is_empty() {
            // One group identifier byte precedes the payload.
            view.drain(..1);
        }
        if flags.data_length && view.len() >= 4 {
            view.drain(..4);
        }
        if flags.unsynchronised {
            view = synch::decode_unsynch(&view);
        }
        if flags.compressed {
            match decompress_zlib(&view) {
                Ok(decompressed) => view = decompressed,
                Err(_) => {
                    log::warn!("bad zlib data in frame {}, keeping opaque", id);
                    return FrameBody::Binary;
                }
            }
        }

        let code = id.as_str();
        if code.starts_with('T') && kind != FrameKind::UserText {
            Frame::decode_text_body(&view)
        } else if kind == FrameKind::Comment {
            Frame::decode_comment_body(&view).unwrap_or(FrameBody::Binary)
        } else {
            FrameBody::Binary
        }
    }

    fn decode_text_body(view: &[u8]) -> FrameBody {
        if view.is_empty() {
            return FrameBody::Text {
                encoding: Encoding::Latin1,
                text: String::new(),
            };
        }
        let encoding = match Encoding::from_byte(view[0]) {
            Ok(e) => e,
            Err(_) => return FrameBody::Binary,
        };
        let mut decoded = text::decode(&view[1..], encoding);
        while decoded.ends_with('\0') {
            decoded.pop();
        }
        FrameBody::Text {
            encoding,
            text: decoded,
        }
    }

    fn decode_comment_body(view: &[u8]) -> Option<FrameBody> {
        if view.len() < 4 {
            return None;
        }
        let encoding = Encoding::from_byte(view[0]).ok()?;
        let lang = [view[1], view[2], view[3]];
        let rest = &view[4..];
        let (desc, consumed) = text::read_terminated(rest, encoding);
        let mut body = text::decode(&rest[consumed..], encoding);
        while body.ends_with('\0') {
            body.pop();
        }
        Some(FrameBody::Comment {
            encoding,
            lang,
            desc,
            text: body,
        })
    }

    /// Create a fresh text frame.
    pub fn new_text(id: FrameId, encoding: Encoding, value: &str) -> Frame {
        let kind = registry::lookup(id.as_str());
        let mut raw = vec![encoding as u8];
        raw.extend_from_slice(&text::encode(value, encoding));
        Frame {
            id,
            kind,
            flags: FrameFlags::default(),
            raw,
            body: FrameBody::Text {
                encoding,
                text: value.to_string(),
            },
        }
    }

    /// Create a fresh comment frame with an empty description.
    pub fn new_comment(encoding: Encoding, value: &str) -> Frame {
        let id = FrameId(*b"COMM");
        let lang = *b"XXX";
        let mut frame = Frame {
            id,
            kind: FrameKind::Comment,
            flags: FrameFlags::default(),
            raw: Vec::new(),
            body: FrameBody::Comment {
                encoding,
                lang,
                desc: String::new(),
                text: value.to_string(),
            },
        };
        frame.reencode();
        frame
    }

    /// The decoded text, if this frame has any.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            FrameBody::Text { text, .. } => Some(text),
            FrameBody::Comment { text, .. } => Some(text),
            FrameBody::Binary => None,
        }
    }

    /// Replace the frame text. A frame whose stored payload cannot be
    /// safely rewritten (compressed, encrypted, unsynchronised) is
    /// replaced by a plain frame with cleared flags.
    pub fn set_text(&mut self, value: &str, tag_major: u8) {
        let encoding = self.pick_encoding(value, tag_major);
        self.body = match std::mem::replace(&mut self.body, FrameBody::Binary) {
            FrameBody::Comment { lang, desc, .. } => FrameBody::Comment {
                encoding,
                lang,
                desc,
                text: value.to_string(),
            },
            _ if self.kind == FrameKind::Comment => FrameBody::Comment {
                encoding,
                lang: *b"XXX",
                desc: String::new(),
                text: value.to_string(),
            },
            _ => FrameBody::Text {
                encoding,
                text: value.to_string(),
            },
        };
        self.flags = FrameFlags::default();
        self.reencode();
    }

    fn pick_encoding(&self, value: &str, tag_major: u8) -> Encoding {
        match &self.body {
            FrameBody::Text { encoding, .. } | FrameBody::Comment { encoding, .. } => {
                if *encoding == Encoding::Latin1 && !text::fits_latin1(value) {
                    Encoding::default_for_version(tag_major)
                } else {
                    *encoding
                }
            }
            FrameBody::Binary => {
                if text::fits_latin1(value) {
                    Encoding::Latin1
                } else {
                    Encoding::default_for_version(tag_major)
                }
            }
        }
    }

    /// Rebuild `raw` from the decoded body.
    fn reencode(&mut self) {
        match &self.body {
            FrameBody::Text { encoding, text: t } => {
                let mut raw = vec![*encoding as u8];
                raw.extend_from_slice(&text::encode(t, *encoding));
                self.raw = raw;
            }
            FrameBody::Comment {
                encoding,
                lang,
                desc,
                text: t,
            } => {
                let mut raw = vec![*encoding as u8];
                raw.extend_from_slice(lang);
                raw.extend_from_slice(&text::encode(desc, *encoding));
                raw.extend_from_slice(&vec![0u8; encoding.terminator_len()]);
                raw.extend_from_slice(&text::encode(t, *encoding));
                self.raw = raw;
            }
            FrameBody::Binary => {}
        }
    }

    /// The exact payload bytes to write after the frame header.
    pub fn payload(&self) -> &[u8] {
        &self.raw
    }

    /// Value shown by the dump-all operation.
    pub fn display_value(&self) -> String {
        match self.text() {
            Some(t) => t.replace('\0', "/"),
            None => format!("[{} bytes]", self.raw.len()),
        }
    }
}

fn decompress_zlib(data: &[u8]) -> Result<Vec<u8>> {
    use std::io::Read;

    use flate2::read::ZlibDecoder;

    let mut decoder = ZlibDecoder::new(data);
    let mut result = Vec::new();
    decoder
        .read_to_end(&mut result)
        .map_err(|_| Id3Error::BadCompressedData)?;
    Ok(result)
}
