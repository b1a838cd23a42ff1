use crate::libquiz::error::{Error, Result};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `contents` to `dest` through a temporary file in the same directory.
/// Either the whole file lands or `dest` is left as it was.
pub fn write_atomically(dest: &Path, contents: &[u8]) -> Result<()> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(dest).map_err(|e| Error::io(dest, e.error))?;
    debug!("[Files] Wrote {} bytes to {:?}", contents.len(), dest);
    Ok(())
}

/// Reads a file that is allowed to be absent. An empty path or a missing
/// file gives `None`; any other failure is an error.
pub fn read_optional(path: &str) -> Result<Option<Vec<u8>>> {
    if path.is_empty() {
        return Ok(None);
    }
    let path = Path::new(path);
    if !path.exists() {
        debug!("[Files] {:?} does not exist, skipping", path);
        return Ok(None);
    }
    fs::read(path).map(Some).map_err(|e| Error::io(path, e))
}
