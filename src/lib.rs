//! ID3v1.1 / ID3v2.2-2.4 tag reading and writing.
//!
//! The engine parses raw file bytes into an in-memory [`Tag`], lets
//! callers read and edit fields by well-known name or raw frame code,
//! and serializes the result back with a staged, atomic file rewrite.
//! Frames the engine does not understand round-trip byte-for-byte.
//!
//! ```no_run
//! use id3edit::Editor;
//!
//! # fn main() -> id3edit::Result<()> {
//! let mut editor = Editor::new();
//! editor.open("song.mp3")?;
//! editor.set_field("title", "New Title")?;
//! for (name, value) in editor.list_all()? {
//!     println!("{}: {}", name, value);
//! }
//! editor.commit()?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod editor;
pub mod id3;

pub use common::error::{Id3Error, Result};
pub use editor::Editor;
pub use id3::frame::{Frame, FrameBody, FrameFlags, FrameId};
pub use id3::header::TagHeader;
pub use id3::registry::FrameKind;
pub use id3::tag::Tag;
pub use id3::text::Encoding;
