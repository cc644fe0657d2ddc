use crate::common::error::{Id3Error, Result};
use crate::id3::frame::{Frame, FrameId};
use crate::id3::header::TagHeader;
use crate::id3::registry::{self, FrameKind};
use crate::id3::text::{self, Encoding};

/// In-memory metadata for one audio file: the union of its ID3v2 frames
/// and ID3v1 fixed fields, in on-disk order.
#[derive(Debug, Clone)]
pub struct Tag {
    pub has_v1: bool,
    pub has_v2: bool,
    /// Only meaningful when `has_v2`.
    pub header: Option<TagHeader>,
    /// Insertion order is preserved and write-significant.
    pub frames: Vec<Frame>,
    /// Byte span the v2 block (header + frames + padding) occupied on
    /// disk. Drives the padding-preservation policy on write.
    pub(crate) v2_span: usize,
}

impl Tag {
    /// An empty tag targeting ID3v2.3.
    pub fn new() -> Self {
        Tag {
            has_v1: false,
            has_v2: false,
            header: None,
            frames: Vec::new(),
            v2_span: 0,
        }
    }

    /// Tag major version; 3 for fresh tags.
    pub fn major_version(&self) -> u8 {
        self.header.as_ref().map(|h| h.version.0).unwrap_or(3)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// First frame of the given kind, in on-disk order.
    pub fn find(&self, kind: FrameKind) -> Option<&Frame> {
        self.frames.iter().find(|f| f.kind == kind)
    }

    /// Decoded text for a well-known field, trying each candidate kind in
    /// preference order.
    pub fn get_text(&self, kinds: &[FrameKind]) -> Option<&str> {
        kinds
            .iter()
            .find_map(|&kind| self.find(kind).and_then(|f| f.text()))
    }

    /// Find-or-create: replace the text of the first frame of `kind`, or
    /// append a new frame. The facade keeps at most one editable frame
    /// per singular kind this way.
    pub fn set_text(&mut self, kind: FrameKind, value: &str) -> Result<()> {
        let major = self.major_version();
        if let Some(frame) = self.frames.iter_mut().find(|f| f.kind == kind) {
            frame.set_text(value, major);
            return Ok(());
        }

        let frame = if kind == FrameKind::Comment {
            Frame::new_comment(default_encoding(value, major), value)
        } else {
            let code = registry::code_for(kind)
                .ok_or_else(|| Id3Error::UnknownFrameCode(format!("{:?}", kind)))?;
            Frame::new_text(FrameId::new(code)?, default_encoding(value, major), value)
        };
        self.frames.push(frame);
        self.has_v2 = true;
        Ok(())
    }

    /// Set a frame by raw 4-character code. The code must be in the
    /// registry; arbitrary unknown codes are not editable.
    pub fn set_raw(&mut self, code: &str, value: &str) -> Result<()> {
        let kind = registry::lookup(code);
        if kind == FrameKind::Unknown {
            return Err(Id3Error::UnknownFrameCode(code.to_string()));
        }
        self.set_text(kind, value)
    }

    /// All frames as `(name, display value)` pairs, in on-disk order.
    /// Restartable: each call yields a fresh iterator.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            frames: self.frames.iter(),
        }
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag::new()
    }
}

fn default_encoding(value: &str, major: u8) -> Encoding {
    if text::fits_latin1(value) {
        Encoding::Latin1
    } else {
        Encoding::default_for_version(major)
    }
}

/// Iterator over `(frame name, display value)` pairs.
pub struct Entries<'a> {
    frames: std::slice::Iter<'a, Frame>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.frames.next()?;
        let name = if frame.kind == FrameKind::Unknown {
            frame.id.as_str().to_string()
        } else {
            registry::name_for(frame.kind).to_string()
        };
        Some((name, frame.display_value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut tag = Tag::new();
        tag.set_text(FrameKind::Title, "Foo").unwrap();
        assert_eq!(tag.get_text(&[FrameKind::Title]), Some("Foo"));
    }

    #[test]
    fn set_is_find_or_create() {
        let mut tag = Tag::new();
        tag.set_text(FrameKind::Title, "One").unwrap();
        tag.set_text(FrameKind::Title, "Two").unwrap();
        assert_eq!(tag.frames.len(), 1);
        assert_eq!(tag.get_text(&[FrameKind::Title]), Some("Two"));
    }

    #[test]
    fn set_raw_rejects_unknown_codes() {
        let mut tag = Tag::new();
        assert!(matches!(
            tag.set_raw("ZZZZ", "x"),
            Err(Id3Error::UnknownFrameCode(_))
        ));
        tag.set_raw("TPUB", "Label").unwrap();
        assert_eq!(tag.get_text(&[FrameKind::Publisher]), Some("Label"));
    }

    #[test]
    fn entries_restartable_in_order() {
        let mut tag = Tag::new();
        tag.set_text(FrameKind::Title, "T").unwrap();
        tag.set_text(FrameKind::LeadArtist, "A").unwrap();

        let first: Vec<_> = tag.entries().collect();
        let second: Vec<_> = tag.entries().collect();
        assert_eq!(first, second);
        assert_eq!(first[0].0, "Title/songname/content description");
        assert_eq!(first[0].1, "T");
        assert_eq!(first[1].1, "A");
    }

    #[test]
    fn comment_created_as_comment_frame() {
        let mut tag = Tag::new();
        tag.set_text(FrameKind::Comment, "hello").unwrap();
        let frame = tag.find(FrameKind::Comment).unwrap();
        assert_eq!(frame.id.as_str(), "COMM");
        assert_eq!(frame.text(), Some("hello"));
    }
}
