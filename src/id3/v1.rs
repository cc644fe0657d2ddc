use crate::id3::frame::{Frame, FrameBody, FrameId};
use crate::id3::registry::{self, FrameKind};
use crate::id3::text::{self, Encoding};

/// The standard ID3v1 genre list, extended with the Winamp additions.
pub const GENRES: &[&str] = &[
    "Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge",
    "Hip-Hop", "Jazz", "Metal", "New Age", "Oldies", "Other", "Pop", "R&B",
    "Rap", "Reggae", "Rock", "Techno", "Industrial", "Alternative", "Ska",
    "Death Metal", "Pranks", "Soundtrack", "Euro-Techno", "Ambient",
    "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion", "Trance", "Classical",
    "Instrumental", "Acid", "House", "Game", "Sound Clip", "Gospel", "Noise",
    "AlternRock", "Bass", "Soul", "Punk", "Space", "Meditative",
    "Instrumental Pop", "Instrumental Rock", "Ethnic", "Gothic", "Darkwave",
    "Techno-Industrial", "Electronic", "Pop-Folk", "Eurodance", "Dream",
    "Southern Rock", "Comedy", "Cult", "Gangsta", "Top 40", "Christian Rap",
    "Pop/Funk", "Jungle", "Native American", "Cabaret", "New Wave",
    "Psychedelic", "Rave", "Showtunes", "Trailer", "Lo-Fi", "Tribal",
    "Acid Punk", "Acid Jazz", "Polka", "Retro", "Musical", "Rock & Roll",
    "Hard Rock", "Folk", "Folk-Rock", "National Folk", "Swing", "Fast Fusion",
    "Bebop", "Latin", "Revival", "Celtic", "Bluegrass", "Avantgarde",
    "Gothic Rock", "Progressive Rock", "Psychedelic Rock", "Symphonic Rock",
    "Slow Rock", "Big Band", "Chorus", "Easy Listening", "Acoustic", "Humour",
    "Speech", "Chanson", "Opera", "Chamber Music", "Sonata", "Symphony",
    "Booty Bass", "Primus", "Porn Groove", "Satire", "Slow Jam", "Club",
    "Tango", "Samba", "Folklore", "Ballad", "Power Ballad", "Rhythmic Soul",
    "Freestyle", "Duet", "Punk Rock", "Drum Solo", "A capella", "Euro-House",
    "Dance Hall",
];

/// Offset of the trailing "TAG" block, if present.
pub fn find(data: &[u8]) -> Option<usize> {
    if data.len() < 128 {
        return None;
    }
    let tag_offset = data.len() - 128;
    if &data[tag_offset..tag_offset + 3] == b"TAG" {
        Some(tag_offset)
    } else {
        None
    }
}

fn fixed_text_frame(code: &[u8; 4], value: String) -> Frame {
    Frame {
        id: FrameId(*code),
        kind: registry::lookup(std::str::from_utf8(code).unwrap_or("")),
        flags: Default::default(),
        raw: {
            let mut raw = vec![Encoding::Latin1 as u8];
            raw.extend_from_slice(&text::encode(&value, Encoding::Latin1));
            raw
        },
        body: FrameBody::Text {
            encoding: Encoding::Latin1,
            text: value,
        },
    }
}

/// Parse a 128-byte "TAG" block into v2-shaped frames at fixed offsets.
/// Empty fields produce no frame.
pub fn parse(block: &[u8]) -> Vec<Frame> {
    debug_assert!(block.len() == 128 && &block[0..3] == b"TAG");

    let mut frames = Vec::new();

    let title = text::decode_fixed(&block[3..33]);
    if !title.is_empty() {
        frames.push(fixed_text_frame(b"TIT2", title));
    }

    let artist = text::decode_fixed(&block[33..63]);
    if !artist.is_empty() {
        frames.push(fixed_text_frame(b"TPE1", artist));
    }

    let album = text::decode_fixed(&block[63..93]);
    if !album.is_empty() {
        frames.push(fixed_text_frame(b"TALB", album));
    }

    let year = text::decode_fixed(&block[93..97]);
    if !year.is_empty() {
        frames.push(fixed_text_frame(b"TYER", year));
    }

    // ID3v1.1: a zero at byte 125 with a nonzero byte 126 shortens the
    // comment to 28 bytes and stores the track number.
    if block[125] == 0 && block[126] != 0 {
        let comment = text::decode_fixed(&block[97..125]);
        if !comment.is_empty() {
            frames.push(comment_frame(comment));
        }
        frames.push(fixed_text_frame(b"TRCK", block[126].to_string()));
    } else {
        let comment = text::decode_fixed(&block[97..127]);
        if !comment.is_empty() {
            frames.push(comment_frame(comment));
        }
    }

    let genre = block[127] as usize;
    if genre < GENRES.len() {
        frames.push(fixed_text_frame(b"TCON", GENRES[genre].to_string()));
    }

    frames
}

fn comment_frame(value: String) -> Frame {
    Frame::new_comment(Encoding::Latin1, &value)
}

/// Render a 128-byte "TAG" block from the tag's frames. Fields without a
/// corresponding frame stay zeroed; overlong text truncates silently.
pub fn render(frames: &[Frame]) -> [u8; 128] {
    let mut block = [0u8; 128];
    block[0..3].copy_from_slice(b"TAG");
    block[127] = 255; // no genre

    for frame in frames {
        let Some(value) = frame.text() else { continue };
        match frame.kind {
            FrameKind::Title => text::encode_fixed(&mut block[3..33], value),
            FrameKind::LeadArtist => text::encode_fixed(&mut block[33..63], value),
            FrameKind::Album => text::encode_fixed(&mut block[63..93], value),
            FrameKind::Year | FrameKind::RecordingTime => {
                // TDRC may carry a full timestamp; v1 only has room for
                // the year.
                let year: String = value.chars().take(4).collect();
                text::encode_fixed(&mut block[93..97], &year)
            }
            FrameKind::Comment => text::encode_fixed(&mut block[97..125], value),
            FrameKind::Track => {
                if let Ok(n) = value.split('/').next().unwrap_or("").parse::<u8>() {
                    block[125] = 0;
                    block[126] = n;
                }
            }
            FrameKind::ContentType => {
                block[127] = genre_index(value);
            }
            _ => {}
        }
    }

    block
}

/// Resolve a TCON value ("Rock", "(17)", "17") to a v1 genre byte;
/// 255 when unknown.
fn genre_index(value: &str) -> u8 {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed);

    if let Ok(n) = inner.parse::<usize>() {
        if n < GENRES.len() {
            return n as u8;
        }
        return 255;
    }
    GENRES
        .iter()
        .position(|&g| g.eq_ignore_ascii_case(inner))
        .map(|i| i as u8)
        .unwrap_or(255)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> [u8; 128] {
        let mut block = [0u8; 128];
        block[0..3].copy_from_slice(b"TAG");
        block[3..8].copy_from_slice(b"Title");
        block[33..39].copy_from_slice(b"Artist");
        block[63..68].copy_from_slice(b"Album");
        block[93..97].copy_from_slice(b"1999");
        block[97..101].copy_from_slice(b"Nice");
        block[126] = 7; // v1.1 track
        block[127] = 17; // Rock
        block
    }

    #[test]
    fn parses_v11_fields() {
        let frames = parse(&sample_block());
        let texts: Vec<(FrameKind, &str)> = frames
            .iter()
            .map(|f| (f.kind, f.text().unwrap()))
            .collect();
        assert!(texts.contains(&(FrameKind::Title, "Title")));
        assert!(texts.contains(&(FrameKind::LeadArtist, "Artist")));
        assert!(texts.contains(&(FrameKind::Album, "Album")));
        assert!(texts.contains(&(FrameKind::Year, "1999")));
        assert!(texts.contains(&(FrameKind::Comment, "Nice")));
        assert!(texts.contains(&(FrameKind::Track, "7")));
        assert!(texts.contains(&(FrameKind::ContentType, "Rock")));
    }

    #[test]
    fn round_trips_through_render() {
        let frames = parse(&sample_block());
        let rendered = render(&frames);
        let reparsed = parse(&rendered);
        let title = reparsed
            .iter()
            .find(|f| f.kind == FrameKind::Title)
            .unwrap();
        assert_eq!(title.text(), Some("Title"));
        assert_eq!(rendered[126], 7);
        assert_eq!(rendered[127], 17);
    }

    #[test]
    fn finds_trailing_tag() {
        let mut data = vec![0xAB; 500];
        assert!(find(&data).is_none());
        let block = sample_block();
        data.extend_from_slice(&block);
        assert_eq!(find(&data), Some(500));
    }

    #[test]
    fn overlong_fields_truncate() {
        let long = "x".repeat(64);
        let frame = super::fixed_text_frame(b"TIT2", long);
        let rendered = render(&[frame]);
        assert_eq!(&rendered[3..33], "x".repeat(30).as_bytes());
        // Byte 33 is the artist field, untouched.
        assert_eq!(rendered[33], 0);
    }

    #[test]
    fn genre_lookup() {
        assert_eq!(genre_index("Rock"), 17);
        assert_eq!(genre_index("(17)"), 17);
        assert_eq!(genre_index("17"), 17);
        assert_eq!(genre_index("Unheard-of Genre"), 255);
    }
}
