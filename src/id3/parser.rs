use crate::id3::frame::{Frame, FrameFlags, FrameId};
use crate::id3::header::TagHeader;
use crate::id3::registry;
use crate::id3::synch;
use crate::id3::tag::Tag;
use crate::id3::text::Encoding;
use crate::id3::v1;

/// Parse a whole file buffer into a [`Tag`]. The v1 and v2 sub-tags are
/// detected and parsed independently; a structural failure in one never
/// affects the other, and never fails the call.
pub fn parse(data: &[u8]) -> Tag {
    let mut tag = Tag::new();

    if let Some(header) = TagHeader::parse(data) {
        read_v2(&mut tag, data, header);
    }

    if let Some(offset) = v1::find(data) {
        tag.has_v1 = true;
        // v1 fields only fill in kinds the v2 tag does not already carry.
        for frame in v1::parse(&data[offset..offset + 128]) {
            if tag.find(frame.kind).is_none() {
                tag.frames.push(frame);
            }
        }
    }

    tag
}

fn read_v2(tag: &mut Tag, data: &[u8], header: TagHeader) {
    let major = header.version.0;
    let tag_end = (10 + header.size as usize).min(data.len());
    let mut frames_data = data[10.min(data.len())..tag_end].to_vec();

    // Whole-tag unsynchronisation applies up to v2.3; v2.4 moved it to
    // the frame level.
    if header.flags.unsynchronisation && major < 4 {
        frames_data = synch::decode_unsynch(&frames_data);
    }

    let mut offset = 0usize;
    if header.flags.extended && major >= 3 {
        offset = match extended_header_len(&frames_data, major) {
            Some(len) => len,
            None => {
                log::warn!("truncated extended header, dropping v2 tag");
                return;
            }
        };
    }

    tag.has_v2 = true;
    tag.v2_span = (header.full_size() as usize).min(data.len());
    tag.header = Some(header);

    if major == 2 {
        read_v22_frames(tag, &frames_data, offset);
    } else {
        let bits = if major == 4 {
            frame_size_bits(&frames_data[offset.min(frames_data.len())..])
        } else {
            8
        };
        read_v23_v24_frames(tag, &frames_data, offset, major, bits);
    }
}

fn extended_header_len(data: &[u8], major: u8) -> Option<usize> {
    if data.len() < 4 {
        return None;
    }
    if major == 4 {
        // v2.4: the size field includes itself.
        synch::decode_synchsafe(&data[0..4]).ok().map(|s| s as usize)
    } else {
        // v2.3: plain size, excluding the 4 size bytes.
        Some(synch::decode_plain32(&data[0..4]) as usize + 4)
    }
}

fn valid_frame_id(id: &[u8]) -> bool {
    id.iter().all(|&b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// v2.3/v2.4 frames: 10-byte headers `{id[4], size[4], flags[2]}`.
fn read_v23_v24_frames(tag: &mut Tag, data: &[u8], mut offset: usize, major: u8, bits: u8) {
    while offset + 10 <= data.len() {
        if data[offset] == 0 {
            // Zero byte where an ID should be: start of padding.
            break;
        }

        let id_bytes = &data[offset..offset + 4];
        if !valid_frame_id(id_bytes) {
            log::warn!("invalid frame ID at offset {}, stopping frame walk", offset);
            break;
        }

        let size = synch::decode_lenient(&data[offset + 4..offset + 8], bits) as usize;
        let flags_raw = u16::from_be_bytes([data[offset + 8], data[offset + 9]]);
        offset += 10;

        if size == 0 || offset + size > data.len() {
            log::warn!(
                "frame {} has inconsistent size {}, stopping frame walk",
                String::from_utf8_lossy(id_bytes),
                size
            );
            break;
        }

        let id = FrameId([id_bytes[0], id_bytes[1], id_bytes[2], id_bytes[3]]);
        let flags = FrameFlags::parse(flags_raw, major);
        let payload = data[offset..offset + size].to_vec();
        offset += size;

        tag.frames.push(Frame::parse(id, flags, payload));
    }
}

/// v2.2 frames: 6-byte headers `{id[3], size[3]}`, upgraded to their
/// v2.3+ identifiers. Frames with no v2.3 equivalent cannot be carried
/// into the rewritten tag and are dropped with a warning.
fn read_v22_frames(tag: &mut Tag, data: &[u8], mut offset: usize) {
    while offset + 6 <= data.len() {
        if data[offset] == 0 {
            break;
        }

        let id_bytes = &data[offset..offset + 3];
        if !valid_frame_id(id_bytes) {
            break;
        }
        let size = synch::decode_plain24(&data[offset + 3..offset + 6]) as usize;
        offset += 6;

        if size == 0 || offset + size > data.len() {
            break;
        }
        let payload = &data[offset..offset + size];
        offset += size;

        let id_str = std::str::from_utf8(id_bytes).unwrap_or("???");
        let Some(new_code) = registry::upgrade_v22(id_str) else {
            log::warn!("dropping v2.2 frame {} with no v2.3 equivalent", id_str);
            continue;
        };

        let payload = if id_str == "PIC" {
            match convert_v22_picture(payload) {
                Some(converted) => converted,
                None => {
                    log::warn!("malformed v2.2 PIC frame, dropping");
                    continue;
                }
            }
        } else {
            payload.to_vec()
        };

        let Ok(id) = FrameId::new(new_code) else {
            continue;
        };
        tag.frames.push(Frame::parse(id, FrameFlags::default(), payload));
    }
}

/// Rewrite a v2.2 PIC payload (3-character image format) into APIC form
/// (null-terminated MIME type). The rest of the layout is unchanged.
fn convert_v22_picture(payload: &[u8]) -> Option<Vec<u8>> {
    if payload.len() < 5 {
        return None;
    }
    Encoding::from_byte(payload[0]).ok()?;
    let format = std::str::from_utf8(&payload[1..4]).unwrap_or("JPG");
    let mime = match format.to_ascii_uppercase().as_str() {
        "JPG" => "image/jpeg".to_string(),
        "PNG" => "image/png".to_string(),
        other => format!("image/{}", other.to_ascii_lowercase()),
    };

    let mut out = vec![payload[0]];
    out.extend_from_slice(mime.as_bytes());
    out.push(0);
    out.extend_from_slice(&payload[4..]);
    Some(out)
}

/// Some v2.4 writers (notably old iTunes) store plain big-endian frame
/// sizes where the spec says synchsafe. Walk the frame chain under both
/// interpretations and keep the one that parses further.
fn frame_size_bits(data: &[u8]) -> u8 {
    let frames_end = data.len();
    let mut valid = [0u32; 2];

    for (slot, bits) in [(0usize, 7u8), (1, 8)] {
        let mut pos = 0usize;
        while pos + 10 <= frames_end {
            if data[pos] == 0 || !valid_frame_id(&data[pos..pos + 4]) {
                break;
            }
            let size = synch::decode_lenient(&data[pos + 4..pos + 8], bits) as usize;
            if size == 0 || pos + 10 + size > frames_end {
                break;
            }
            valid[slot] += 1;
            pos += 10 + size;
        }
    }

    if valid[0] >= valid[1] {
        7
    } else {
        8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::registry::FrameKind;

    fn v23_tag(frames: &[(&str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (id, payload) in frames {
            body.extend_from_slice(id.as_bytes());
            body.extend_from_slice(&synch::encode_plain32(payload.len() as u32));
            body.extend_from_slice(&[0, 0]);
            body.extend_from_slice(payload);
        }
        let mut data = b"ID3\x03\x00\x00".to_vec();
        data.extend_from_slice(&synch::encode_synchsafe(body.len() as u32).unwrap());
        data.extend_from_slice(&body);
        data
    }

    #[test]
    fn parses_minimal_v23_tag() {
        let mut data = b"ID3\x03\x00\x00\x00\x00\x00\x13".to_vec();
        data.extend_from_slice(b"TIT2");
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
        data.extend_from_slice(&[0x00, 0x00]);
        data.extend_from_slice(b"\x00Hello");

        let tag = parse(&data);
        assert!(tag.has_v2);
        assert!(!tag.has_v1);
        assert_eq!(tag.frames.len(), 1);
        let frame = &tag.frames[0];
        assert_eq!(frame.id.as_str(), "TIT2");
        assert_eq!(frame.kind, FrameKind::Title);
        assert_eq!(frame.text(), Some("Hello"));
    }

    #[test]
    fn v1_only_file() {
        let mut data = vec![0xAB; 1000];
        let mut block = [0u8; 128];
        block[0..3].copy_from_slice(b"TAG");
        block[3..6].copy_from_slice(b"Hi!");
        data.extend_from_slice(&block);

        let tag = parse(&data);
        assert!(!tag.has_v2);
        assert!(tag.has_v1);
        assert_eq!(tag.get_text(&[FrameKind::Title]), Some("Hi!"));
    }

    #[test]
    fn v2_wins_over_v1_for_same_kind() {
        let mut data = v23_tag(&[("TIT2", b"\x00FromV2")]);
        data.extend_from_slice(&[0xAB; 600]);
        let mut block = [0u8; 128];
        block[0..3].copy_from_slice(b"TAG");
        block[3..9].copy_from_slice(b"FromV1");
        block[33..39].copy_from_slice(b"Artist");
        data.extend_from_slice(&block);

        let tag = parse(&data);
        assert!(tag.has_v1 && tag.has_v2);
        assert_eq!(tag.get_text(&[FrameKind::Title]), Some("FromV2"));
        // Artist only exists in v1 and is merged in.
        assert_eq!(tag.get_text(&[FrameKind::LeadArtist]), Some("Artist"));
    }

    #[test]
    fn bad_v2_header_degrades_without_losing_v1() {
        let mut data = b"ID3\xFF\x00\x00\x00\x00\x00\x13".to_vec();
        data.extend_from_slice(&[0xAB; 500]);
        let mut block = [0u8; 128];
        block[0..3].copy_from_slice(b"TAG");
        block[3..4].copy_from_slice(b"T");
        data.extend_from_slice(&block);

        let tag = parse(&data);
        assert!(!tag.has_v2);
        assert!(tag.has_v1);
    }

    #[test]
    fn unknown_frame_preserved_opaquely() {
        let tag_data = v23_tag(&[("XYZW", &[9, 8, 7]), ("TIT2", b"\x00T")]);
        let tag = parse(&tag_data);
        assert_eq!(tag.frames.len(), 2);
        assert_eq!(tag.frames[0].kind, FrameKind::Unknown);
        assert_eq!(tag.frames[0].payload(), &[9, 8, 7]);
        assert_eq!(tag.frames[1].text(), Some("T"));
    }

    #[test]
    fn padding_stops_frame_walk() {
        let mut body = Vec::new();
        body.extend_from_slice(b"TIT2");
        body.extend_from_slice(&[0, 0, 0, 3]);
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(b"\x00Hi");
        body.extend_from_slice(&[0u8; 64]); // padding
        let mut data = b"ID3\x03\x00\x00".to_vec();
        data.extend_from_slice(&synch::encode_synchsafe(body.len() as u32).unwrap());
        data.extend_from_slice(&body);

        let tag = parse(&data);
        assert_eq!(tag.frames.len(), 1);
        assert_eq!(tag.v2_span, data.len());
    }

    #[test]
    fn v22_frames_upgrade() {
        let mut body = Vec::new();
        body.extend_from_slice(b"TT2");
        body.extend_from_slice(&[0, 0, 6]);
        body.extend_from_slice(b"\x00Hello");
        let mut data = b"ID3\x02\x00\x00".to_vec();
        data.extend_from_slice(&synch::encode_synchsafe(body.len() as u32).unwrap());
        data.extend_from_slice(&body);

        let tag = parse(&data);
        assert_eq!(tag.frames.len(), 1);
        assert_eq!(tag.frames[0].id.as_str(), "TIT2");
        assert_eq!(tag.frames[0].text(), Some("Hello"));
    }

    #[test]
    fn v24_plain_size_heuristic() {
        // A frame with a plain (not synchsafe) size of 0x81 followed by a
        // second frame: the synchsafe misread (size 1) lands mid-payload
        // and breaks the chain, the plain read lines up with both frames.
        let payload = vec![0xAA; 0x81];
        let mut body = Vec::new();
        body.extend_from_slice(b"APIC");
        body.extend_from_slice(&[0x00, 0x00, 0x00, 0x81]);
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(&payload);
        body.extend_from_slice(b"TIT2");
        body.extend_from_slice(&[0x00, 0x00, 0x00, 0x03]);
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(b"\x00Hi");
        assert_eq!(frame_size_bits(&body), 8);

        // The same chain with synchsafe sizes resolves to 7 bits.
        let mut body = Vec::new();
        body.extend_from_slice(b"APIC");
        body.extend_from_slice(&synch::encode_synchsafe(0x81).unwrap());
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(&payload);
        body.extend_from_slice(b"TIT2");
        body.extend_from_slice(&synch::encode_synchsafe(3).unwrap());
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(b"\x00Hi");
        assert_eq!(frame_size_bits(&body), 7);
    }

    #[test]
    fn truncated_frame_isolated() {
        // Second frame claims more bytes than remain; the first survives.
        let mut body = Vec::new();
        body.extend_from_slice(b"TIT2");
        body.extend_from_slice(&[0, 0, 0, 3]);
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(b"\x00Hi");
        body.extend_from_slice(b"TALB");
        body.extend_from_slice(&[0, 0, 0xFF, 0xFF]);
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(b"\x00x");
        let mut data = b"ID3\x03\x00\x00".to_vec();
        data.extend_from_slice(&synch::encode_synchsafe(body.len() as u32).unwrap());
        data.extend_from_slice(&body);

        let tag = parse(&data);
        assert!(tag.has_v2);
        assert_eq!(tag.frames.len(), 1);
        assert_eq!(tag.frames[0].text(), Some("Hi"));
    }
}
