use crate::common::error::{Id3Error, Result};

/// Semantic kind of a frame, covering the identifiers defined by
/// ID3v2.3/2.4 (plus the handful that only ever appeared in one of them).
/// Codes with no entry in the table map to `Unknown` and round-trip
/// opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    AudioEncryption,
    Picture,
    AudioSeekPoint,
    Comment,
    Commercial,
    EncryptionRegistration,
    Equalization2,
    Equalization,
    EventTiming,
    GeneralObject,
    GroupingRegistration,
    InvolvedPeople,
    LinkedInfo,
    CdId,
    MpegLookup,
    Ownership,
    Private,
    PlayCounter,
    Popularimeter,
    PositionSync,
    BufferSize,
    VolumeAdjust2,
    VolumeAdjust,
    Reverb,
    SeekFrame,
    Signature,
    SyncedLyrics,
    SyncedTempo,
    Album,
    Bpm,
    Composer,
    ContentType,
    Copyright,
    Date,
    EncodingTime,
    PlaylistDelay,
    OrigReleaseTime,
    RecordingTime,
    ReleaseTime,
    TaggingTime,
    InvolvedPeople2,
    EncodedBy,
    Lyricist,
    FileType,
    Time,
    ContentGroup,
    Title,
    Subtitle,
    InitialKey,
    Language,
    SongLength,
    MusicianCredits,
    MediaType,
    Mood,
    OrigAlbum,
    OrigFilename,
    OrigLyricist,
    OrigArtist,
    OrigYear,
    FileOwner,
    LeadArtist,
    Band,
    Conductor,
    MixArtist,
    PartInSet,
    ProducedNotice,
    Publisher,
    Track,
    RecordingDates,
    NetRadioStation,
    NetRadioOwner,
    Size,
    AlbumSortOrder,
    PerformerSortOrder,
    TitleSortOrder,
    Isrc,
    EncoderSettings,
    SetSubtitle,
    UserText,
    Year,
    UniqueFileId,
    TermsOfUse,
    UnsyncedLyrics,
    WwwCommercialInfo,
    WwwCopyright,
    WwwAudioFile,
    WwwArtist,
    WwwAudioSource,
    WwwRadioPage,
    WwwPayment,
    WwwPublisher,
    WwwUser,
    Unknown,
}

/// `(code, kind, human-readable name)` for every identifier the engine
/// understands. v2.2 3-character codes are handled by [`upgrade_v22`]
/// before this table is consulted.
static TABLE: &[(&str, FrameKind, &str)] = &[
    ("AENC", FrameKind::AudioEncryption, "Audio encryption"),
    ("APIC", FrameKind::Picture, "Attached picture"),
    ("ASPI", FrameKind::AudioSeekPoint, "Audio seek point index"),
    ("COMM", FrameKind::Comment, "Comments"),
    ("COMR", FrameKind::Commercial, "Commercial frame"),
    ("ENCR", FrameKind::EncryptionRegistration, "Encryption method registration"),
    ("EQU2", FrameKind::Equalization2, "Equalisation (2)"),
    ("EQUA", FrameKind::Equalization, "Equalization"),
    ("ETCO", FrameKind::EventTiming, "Event timing codes"),
    ("GEOB", FrameKind::GeneralObject, "General encapsulated object"),
    ("GRID", FrameKind::GroupingRegistration, "Group identification registration"),
    ("IPLS", FrameKind::InvolvedPeople, "Involved people list"),
    ("LINK", FrameKind::LinkedInfo, "Linked information"),
    ("MCDI", FrameKind::CdId, "Music CD identifier"),
    ("MLLT", FrameKind::MpegLookup, "MPEG location lookup table"),
    ("OWNE", FrameKind::Ownership, "Ownership frame"),
    ("PRIV", FrameKind::Private, "Private frame"),
    ("PCNT", FrameKind::PlayCounter, "Play counter"),
    ("POPM", FrameKind::Popularimeter, "Popularimeter"),
    ("POSS", FrameKind::PositionSync, "Position synchronisation frame"),
    ("RBUF", FrameKind::BufferSize, "Recommended buffer size"),
    ("RVA2", FrameKind::VolumeAdjust2, "Relative volume adjustment (2)"),
    ("RVAD", FrameKind::VolumeAdjust, "Relative volume adjustment"),
    ("RVRB", FrameKind::Reverb, "Reverb"),
    ("SEEK", FrameKind::SeekFrame, "Seek frame"),
    ("SIGN", FrameKind::Signature, "Signature frame"),
    ("SYLT", FrameKind::SyncedLyrics, "Synchronized lyric/text"),
    ("SYTC", FrameKind::SyncedTempo, "Synchronized tempo codes"),
    ("TALB", FrameKind::Album, "Album/Movie/Show title"),
    ("TBPM", FrameKind::Bpm, "BPM (beats per minute)"),
    ("TCOM", FrameKind::Composer, "Composer"),
    ("TCON", FrameKind::ContentType, "Content type"),
    ("TCOP", FrameKind::Copyright, "Copyright message"),
    ("TDAT", FrameKind::Date, "Date"),
    ("TDEN", FrameKind::EncodingTime, "Encoding time"),
    ("TDLY", FrameKind::PlaylistDelay, "Playlist delay"),
    ("TDOR", FrameKind::OrigReleaseTime, "Original release time"),
    ("TDRC", FrameKind::RecordingTime, "Recording time"),
    ("TDRL", FrameKind::ReleaseTime, "Release time"),
    ("TDTG", FrameKind::TaggingTime, "Tagging time"),
    ("TIPL", FrameKind::InvolvedPeople2, "Involved people list"),
    ("TENC", FrameKind::EncodedBy, "Encoded by"),
    ("TEXT", FrameKind::Lyricist, "Lyricist/Text writer"),
    ("TFLT", FrameKind::FileType, "File type"),
    ("TIME", FrameKind::Time, "Time"),
    ("TIT1", FrameKind::ContentGroup, "Content group description"),
    ("TIT2", FrameKind::Title, "Title/songname/content description"),
    ("TIT3", FrameKind::Subtitle, "Subtitle/Description refinement"),
    ("TKEY", FrameKind::InitialKey, "Initial key"),
    ("TLAN", FrameKind::Language, "Language(s)"),
    ("TLEN", FrameKind::SongLength, "Length"),
    ("TMCL", FrameKind::MusicianCredits, "Musician credits list"),
    ("TMED", FrameKind::MediaType, "Media type"),
    ("TMOO", FrameKind::Mood, "Mood"),
    ("TOAL", FrameKind::OrigAlbum, "Original album/movie/show title"),
    ("TOFN", FrameKind::OrigFilename, "Original filename"),
    ("TOLY", FrameKind::OrigLyricist, "Original lyricist(s)/text writer(s)"),
    ("TOPE", FrameKind::OrigArtist, "Original artist(s)/performer(s)"),
    ("TORY", FrameKind::OrigYear, "Original release year"),
    ("TOWN", FrameKind::FileOwner, "File owner/licensee"),
    ("TPE1", FrameKind::LeadArtist, "Lead performer(s)/Soloist(s)"),
    ("TPE2", FrameKind::Band, "Band/orchestra/accompaniment"),
    ("TPE3", FrameKind::Conductor, "Conductor/performer refinement"),
    ("TPE4", FrameKind::MixArtist, "Interpreted, remixed, or otherwise modified by"),
    ("TPOS", FrameKind::PartInSet, "Part of a set"),
    ("TPRO", FrameKind::ProducedNotice, "Produced notice"),
    ("TPUB", FrameKind::Publisher, "Publisher"),
    ("TRCK", FrameKind::Track, "Track number/Position in set"),
    ("TRDA", FrameKind::RecordingDates, "Recording dates"),
    ("TRSN", FrameKind::NetRadioStation, "Internet radio station name"),
    ("TRSO", FrameKind::NetRadioOwner, "Internet radio station owner"),
    ("TSIZ", FrameKind::Size, "Size"),
    ("TSOA", FrameKind::AlbumSortOrder, "Album sort order"),
    ("TSOP", FrameKind::PerformerSortOrder, "Performer sort order"),
    ("TSOT", FrameKind::TitleSortOrder, "Title sort order"),
    ("TSRC", FrameKind::Isrc, "ISRC (international standard recording code)"),
    ("TSSE", FrameKind::EncoderSettings, "Software/Hardware and settings used for encoding"),
    ("TSST", FrameKind::SetSubtitle, "Set subtitle"),
    ("TXXX", FrameKind::UserText, "User defined text information"),
    ("TYER", FrameKind::Year, "Year"),
    ("UFID", FrameKind::UniqueFileId, "Unique file identifier"),
    ("USER", FrameKind::TermsOfUse, "Terms of use"),
    ("USLT", FrameKind::UnsyncedLyrics, "Unsynchronized lyric/text transcription"),
    ("WCOM", FrameKind::WwwCommercialInfo, "Commercial information"),
    ("WCOP", FrameKind::WwwCopyright, "Copyright/Legal information"),
    ("WOAF", FrameKind::WwwAudioFile, "Official audio file webpage"),
    ("WOAR", FrameKind::WwwArtist, "Official artist/performer webpage"),
    ("WOAS", FrameKind::WwwAudioSource, "Official audio source webpage"),
    ("WORS", FrameKind::WwwRadioPage, "Official internet radio station homepage"),
    ("WPAY", FrameKind::WwwPayment, "Payment"),
    ("WPUB", FrameKind::WwwPublisher, "Official publisher webpage"),
    ("WXXX", FrameKind::WwwUser, "User defined URL link"),
];

/// Resolve a 4-character frame code. Unmatched codes are `Unknown`.
pub fn lookup(code: &str) -> FrameKind {
    TABLE
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, kind, _)| *kind)
        .unwrap_or(FrameKind::Unknown)
}

/// The 4-character code a kind is written with. `Unknown` has none.
pub fn code_for(kind: FrameKind) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|(_, k, _)| *k == kind)
        .map(|(code, _, _)| *code)
}

/// Human-readable name for a kind.
pub fn name_for(kind: FrameKind) -> &'static str {
    TABLE
        .iter()
        .find(|(_, k, _)| *k == kind)
        .map(|(_, _, name)| *name)
        .unwrap_or("Unknown frame")
}

/// Resolve a well-known field name to the frame kinds it may be stored
/// under, in lookup-preference order. The first kind is the one created
/// by set-by-name.
pub fn well_known_alias(name: &str) -> Result<&'static [FrameKind]> {
    match name {
        "title" => Ok(&[FrameKind::Title]),
        "artist" => Ok(&[FrameKind::LeadArtist]),
        "album" => Ok(&[FrameKind::Album]),
        "comment" => Ok(&[FrameKind::Comment]),
        "track" => Ok(&[FrameKind::Track]),
        "year" => Ok(&[FrameKind::Year, FrameKind::RecordingTime]),
        "genre" => Ok(&[FrameKind::ContentType]),
        "composer" => Ok(&[FrameKind::Composer]),
        _ => Err(Id3Error::UnknownFieldName(name.to_string())),
    }
}

/// Map a v2.2 3-character frame ID to its v2.3+ 4-character equivalent.
pub fn upgrade_v22(id: &str) -> Option<&'static str> {
    match id {
        "BUF" => Some("RBUF"),
        "CNT" => Some("PCNT"),
        "COM" => Some("COMM"),
        "CRA" => Some("AENC"),
        "ETC" => Some("ETCO"),
        "GEO" => Some("GEOB"),
        "IPL" => Some("IPLS"),
        "LNK" => Some("LINK"),
        "MCI" => Some("MCDI"),
        "MLL" => Some("MLLT"),
        "PIC" => Some("APIC"),
        "POP" => Some("POPM"),
        "REV" => Some("RVRB"),
        "SLT" => Some("SYLT"),
        "STC" => Some("SYTC"),
        "TAL" => Some("TALB"),
        "TBP" => Some("TBPM"),
        "TCM" => Some("TCOM"),
        "TCO" => Some("TCON"),
        "TCR" => Some("TCOP"),
        "TDA" => Some("TDAT"),
        "TDY" => Some("TDLY"),
        "TEN" => Some("TENC"),
        "TFT" => Some("TFLT"),
        "TIM" => Some("TIME"),
        "TKE" => Some("TKEY"),
        "TLA" => Some("TLAN"),
        "TLE" => Some("TLEN"),
        "TMT" => Some("TMED"),
        "TOA" => Some("TOPE"),
        "TOF" => Some("TOFN"),
        "TOL" => Some("TOLY"),
        "TOR" => Some("TORY"),
        "TOT" => Some("TOAL"),
        "TP1" => Some("TPE1"),
        "TP2" => Some("TPE2"),
        "TP3" => Some("TPE3"),
        "TP4" => Some("TPE4"),
        "TPA" => Some("TPOS"),
        "TPB" => Some("TPUB"),
        "TRC" => Some("TSRC"),
        "TRD" => Some("TRDA"),
        "TRK" => Some("TRCK"),
        "TSI" => Some("TSIZ"),
        "TSS" => Some("TSSE"),
        "TT1" => Some("TIT1"),
        "TT2" => Some("TIT2"),
        "TT3" => Some("TIT3"),
        "TXT" => Some("TEXT"),
        "TXX" => Some("TXXX"),
        "TYE" => Some("TYER"),
        "UFI" => Some("UFID"),
        "ULT" => Some("USLT"),
        "WAF" => Some("WOAF"),
        "WAR" => Some("WOAR"),
        "WAS" => Some("WOAS"),
        "WCM" => Some("WCOM"),
        "WCP" => Some("WCOP"),
        "WPB" => Some("WPUB"),
        "WXX" => Some("WXXX"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(lookup("TIT2"), FrameKind::Title);
        assert_eq!(lookup("TPE1"), FrameKind::LeadArtist);
        assert_eq!(lookup("TALB"), FrameKind::Album);
        assert_eq!(lookup("COMM"), FrameKind::Comment);
    }

    #[test]
    fn unknown_codes_stay_unknown() {
        assert_eq!(lookup("ZZZZ"), FrameKind::Unknown);
        assert_eq!(code_for(FrameKind::Unknown), None);
    }

    #[test]
    fn table_is_bidirectional() {
        for (code, kind, _) in TABLE {
            let chosen = code_for(*kind).unwrap();
            assert_eq!(lookup(chosen), *kind, "code {}", code);
        }
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(well_known_alias("title").unwrap()[0], FrameKind::Title);
        assert_eq!(well_known_alias("artist").unwrap()[0], FrameKind::LeadArtist);
        assert!(matches!(
            well_known_alias("subtitle_of_the_week"),
            Err(Id3Error::UnknownFieldName(_))
        ));
    }

    #[test]
    fn v22_ids_upgrade() {
        assert_eq!(upgrade_v22("TT2"), Some("TIT2"));
        assert_eq!(upgrade_v22("COM"), Some("COMM"));
        assert_eq!(upgrade_v22("XYZ"), None);
    }
}
