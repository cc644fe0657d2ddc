use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::common::error::{Id3Error, Result};

/// Read a whole file into memory. Tags are at most a few megabytes and the
/// rewrite path needs the full byte range anyway.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|source| Id3Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).map_err(|source| Id3Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(data)
}

/// Replace the file at `path` with `data`, staging through a temporary file
/// in the same directory. The original file is untouched unless the full
/// new content was written and the rename succeeded.
pub fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let write_err = |source: std::io::Error| Id3Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;
    staged.write_all(data).map_err(write_err)?;
    staged.flush().map_err(write_err)?;
    staged.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
