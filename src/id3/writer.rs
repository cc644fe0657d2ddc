use std::path::Path;

use crate::common::error::Result;
use crate::common::io;
use crate::id3::frame::Frame;
use crate::id3::header::TagHeader;
use crate::id3::synch;
use crate::id3::tag::Tag;
use crate::id3::v1;

/// Padding appended when the rewritten frames no longer fit in the space
/// the old tag occupied.
const PADDING_GROWTH: usize = 1024;

/// Version the v2 block is written as. v2.2 is read-only and upgrades to
/// v2.3; v2.3 and v2.4 round-trip as themselves.
fn effective_version(tag: &Tag) -> (u8, u8) {
    let (major, revision) = tag
        .header
        .as_ref()
        .map(|h| h.version)
        .unwrap_or((3, 0));
    if major < 3 {
        (3, 0)
    } else {
        (major, revision)
    }
}

fn render_frame(frame: &Frame, major: u8, out: &mut Vec<u8>) -> Result<()> {
    let payload = frame.payload();
    out.extend_from_slice(frame.id.as_bytes());
    if major >= 4 {
        out.extend_from_slice(&synch::encode_synchsafe(payload.len() as u32)?);
    } else {
        out.extend_from_slice(&synch::encode_plain32(payload.len() as u32));
    }
    out.extend_from_slice(&frame.flags.raw.to_be_bytes());
    out.extend_from_slice(payload);
    Ok(())
}

/// Serialize the v2 block: header, frames in tag order, padding.
///
/// Padding policy: if the new frames fit in the byte span the old tag
/// occupied, that span is preserved exactly (padding absorbs the
/// difference and the audio payload does not move). Otherwise the block
/// grows to the new frame size plus a fixed increment.
pub fn render_v2(tag: &Tag) -> Result<Vec<u8>> {
    let version = effective_version(tag);

    let mut frame_data = Vec::with_capacity(4096);
    for frame in &tag.frames {
        render_frame(frame, version.0, &mut frame_data)?;
    }

    let old_content_space = tag.v2_span.saturating_sub(10);
    let padding = if frame_data.len() <= old_content_space {
        old_content_space - frame_data.len()
    } else {
        log::debug!(
            "tag grew from {} to {} content bytes, repadding",
            old_content_space,
            frame_data.len()
        );
        PADDING_GROWTH
    };

    let content_size = frame_data.len() + padding;
    let mut block = Vec::with_capacity(10 + content_size);
    block.extend_from_slice(&TagHeader::render(version, content_size as u32)?);
    block.extend_from_slice(&frame_data);
    block.resize(10 + content_size, 0);
    Ok(block)
}

/// Build the complete new file image: new v2 block, untouched audio
/// payload, new v1 block. The audio bytes between the old tag boundaries
/// are carried over verbatim.
pub fn rebuild_file(original: &[u8], tag: &Tag) -> Result<Vec<u8>> {
    let audio_start = tag.v2_span.min(original.len());
    let audio_end = v1::find(original).unwrap_or(original.len());
    let audio = &original[audio_start..audio_end.max(audio_start)];

    let mut out = Vec::with_capacity(original.len() + PADDING_GROWTH);
    if tag.has_v2 {
        out.extend_from_slice(&render_v2(tag)?);
    }
    out.extend_from_slice(audio);
    if tag.has_v1 {
        out.extend_from_slice(&v1::render(&tag.frames));
    }
    Ok(out)
}

/// Stage-then-replace commit: read the current file, splice in the new
/// tag blocks, write everything to a temporary file and atomically move
/// it over the original. A failure at any step leaves the original file
/// intact.
pub fn commit(path: &Path, tag: &Tag) -> Result<()> {
    let original = io::read_file(path)?;
    let rebuilt = rebuild_file(&original, tag)?;
    io::replace_file(path, &rebuilt)
}
