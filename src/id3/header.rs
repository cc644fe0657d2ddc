use crate::common::error::Result;
use crate::id3::synch;

/// ID3v2 header flags (byte 5 of the 10-byte header).
#[derive(Debug, Clone, Copy, Default)]
pub struct TagFlags {
    pub unsynchronisation: bool,
    pub extended: bool,
    pub experimental: bool,
    pub footer: bool,
}

/// Parsed ID3v2 10-byte header.
#[derive(Debug, Clone)]
pub struct TagHeader {
    /// (major, revision), e.g. (3, 0) for ID3v2.3.0.
    pub version: (u8, u8),
    pub flags: TagFlags,
    /// Tag size excluding the header itself, always synchsafe on disk.
    pub size: u32,
}

impl TagHeader {
    /// Parse the leading 10 bytes. A structurally invalid header (bad
    /// magic, 0xFF version bytes, unsupported major version, malformed
    /// size) yields `None`; the caller degrades the v2 sub-tag to absent.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 10 || &data[0..3] != b"ID3" {
            return None;
        }

        let major = data[3];
        let revision = data[4];
        if major == 0xFF || revision == 0xFF {
            return None;
        }
        if !(2..=4).contains(&major) {
            log::warn!("unsupported tag version ID3v2.{}.{}", major, revision);
            return None;
        }

        let flag_byte = data[5];
        let flags = TagFlags {
            unsynchronisation: flag_byte & 0x80 != 0,
            extended: flag_byte & 0x40 != 0,
            experimental: flag_byte & 0x20 != 0,
            footer: major == 4 && (flag_byte & 0x10 != 0),
        };

        let size = match synch::decode_synchsafe(&data[6..10]) {
            Ok(size) => size,
            Err(_) => {
                log::warn!("malformed synchsafe size in tag header");
                return None;
            }
        };

        Some(TagHeader {
            version: (major, revision),
            flags,
            size,
        })
    }

    /// Full byte span of the tag on disk, header (and footer) included.
    pub fn full_size(&self) -> u32 {
        let mut s = self.size + 10;
        if self.flags.footer {
            s += 10;
        }
        s
    }

    /// Serialize a fresh header for the given content size. Flags are not
    /// carried over; the writer emits a flagless tag.
    pub fn render(version: (u8, u8), content_size: u32) -> Result<[u8; 10]> {
        let mut out = [0u8; 10];
        out[0..3].copy_from_slice(b"ID3");
        out[3] = version.0;
        out[4] = version.1;
        out[5] = 0;
        out[6..10].copy_from_slice(&synch::encode_synchsafe(content_size)?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_v23_header() {
        let data = [b'I', b'D', b'3', 3, 0, 0, 0x00, 0x00, 0x02, 0x01, 0xAA];
        let header = TagHeader::parse(&data).unwrap();
        assert_eq!(header.version, (3, 0));
        assert_eq!(header.size, 257);
        assert_eq!(header.full_size(), 267);
        assert!(!header.flags.unsynchronisation);
    }

    #[test]
    fn rejects_bad_magic() {
        assert!(TagHeader::parse(b"TAG3\x00\x00\x00\x00\x00\x00").is_none());
    }

    #[test]
    fn rejects_ff_version() {
        let data = [b'I', b'D', b'3', 0xFF, 0, 0, 0, 0, 0, 0];
        assert!(TagHeader::parse(&data).is_none());
    }

    #[test]
    fn rejects_malformed_size() {
        let data = [b'I', b'D', b'3', 3, 0, 0, 0x80, 0, 0, 0];
        assert!(TagHeader::parse(&data).is_none());
    }

    #[test]
    fn render_round_trip() {
        let bytes = TagHeader::render((4, 0), 4096).unwrap();
        let header = TagHeader::parse(&bytes).unwrap();
        assert_eq!(header.version, (4, 0));
        assert_eq!(header.size, 4096);
    }
}
