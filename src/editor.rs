use std::path::{Path, PathBuf};

use crate::common::error::{Id3Error, Result};
use crate::common::io;
use crate::id3::parser;
use crate::id3::tag::{Entries, Tag};
use crate::id3::writer;

/// Single-slot tag editor: one open file at a time, field-level get/set,
/// explicit commit. Mirrors the open/get/set/update verbs of classic tag
/// editors as ordinary method calls.
///
/// The editor performs no locking; callers sharing one editor across
/// threads must serialize access themselves.
#[derive(Debug, Default)]
pub struct Editor {
    slot: Option<OpenFile>,
}

#[derive(Debug)]
struct OpenFile {
    path: PathBuf,
    tag: Tag,
}

impl Editor {
    pub fn new() -> Self {
        Editor { slot: None }
    }

    /// Open a file and parse its tags, replacing any previously open
    /// file. Fails with `NoTag` if the file carries neither an ID3v1 nor
    /// an ID3v2 tag.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<&Tag> {
        let path = path.as_ref();
        let data = io::read_file(path)?;
        let tag = parser::parse(&data);
        if !tag.has_v1 && !tag.has_v2 {
            return Err(Id3Error::NoTag {
                path: path.to_path_buf(),
            });
        }
        log::debug!(
            "opened '{}': v1={} v2={} ({} frames)",
            path.display(),
            tag.has_v1,
            tag.has_v2,
            tag.frames.len()
        );
        let open = self.slot.insert(OpenFile {
            path: path.to_path_buf(),
            tag,
        });
        Ok(&open.tag)
    }

    /// Close the slot without writing.
    pub fn close(&mut self) {
        self.slot = None;
    }

    /// The currently open tag, if any.
    pub fn tag(&self) -> Option<&Tag> {
        self.slot.as_ref().map(|open| &open.tag)
    }

    fn open_file(&self) -> Result<&OpenFile> {
        self.slot.as_ref().ok_or(Id3Error::NoTagOpen)
    }

    fn open_file_mut(&mut self) -> Result<&mut OpenFile> {
        self.slot.as_mut().ok_or(Id3Error::NoTagOpen)
    }

    /// Read a well-known field ("title", "artist", "album", "comment",
    /// ...) from the open tag.
    pub fn get_field(&self, name: &str) -> Result<String> {
        let open = self.open_file()?;
        let kinds = crate::id3::registry::well_known_alias(name)?;
        open.tag
            .get_text(kinds)
            .map(str::to_owned)
            .ok_or_else(|| Id3Error::NoSuchFrame(name.to_string()))
    }

    /// Set a well-known field, creating the frame if the tag does not
    /// have it yet.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let kinds = crate::id3::registry::well_known_alias(name)?;
        let open = self.open_file_mut()?;
        open.tag.set_text(kinds[0], value)
    }

    /// Set a frame by its raw 4-character code, e.g. "TPUB".
    pub fn set_raw_field(&mut self, code: &str, value: &str) -> Result<()> {
        let open = self.open_file_mut()?;
        open.tag.set_raw(code, value)
    }

    /// Write the tag back to the file it was opened from. The write is
    /// staged and atomically swapped in; on failure the original file is
    /// untouched.
    pub fn commit(&self) -> Result<()> {
        let open = self.open_file()?;
        writer::commit(&open.path, &open.tag)
    }

    /// All frames as `(name, text)` pairs in on-disk order. Finite and
    /// restartable; call again for a fresh pass.
    pub fn list_all(&self) -> Result<Entries<'_>> {
        Ok(self.open_file()?.tag.entries())
    }
}
