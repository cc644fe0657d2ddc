use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Id3Error {
    #[error("cannot open '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no ID3 tag found in '{path}'")]
    NoTag { path: PathBuf },

    #[error("no file with a supported ID3 tag is open")]
    NoTagOpen,

    #[error("malformed synchsafe size (byte has bit 7 set)")]
    MalformedSize,

    #[error("value {0} does not fit in a 28-bit synchsafe integer")]
    ValueTooLarge(u32),

    #[error("invalid text encoding byte: {0}")]
    InvalidEncoding(u8),

    #[error("bad compressed frame data")]
    BadCompressedData,

    #[error("unknown field name: '{0}'")]
    UnknownFieldName(String),

    #[error("unknown frame code: '{0}'")]
    UnknownFrameCode(String),

    #[error("no '{0}' frame in tag")]
    NoSuchFrame(String),

    #[error("cannot write tag to '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Id3Error>;
