use crate::error::CacheError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Prefix of in-flight entry files. Never a valid hex key, so listings skip them.
pub(crate) const PENDING_PREFIX: &str = ".pending-";

/// Stage `bytes` in a temp file inside `dir`, fsync it, then rename it to
/// `path`. Readers see either no entry or the complete one.
pub(crate) fn atomic_write(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let mut pending = tempfile::Builder::new()
        .prefix(PENDING_PREFIX)
        .tempfile_in(dir)
        .map_err(|err| CacheError::io(dir, err))?;

    pending
        .write_all(bytes)
        .and_then(|()| pending.as_file().sync_all())
        .map_err(|err| CacheError::io(pending.path(), err))?;

    // On failure the temp file is removed when the returned handle drops.
    pending
        .persist(path)
        .map_err(|err| CacheError::io(path, err.error))?;
    Ok(())
}

/// Read a whole entry as raw bytes; decoding is the caller's job.
pub(crate) fn read_entry(path: &Path) -> Result<Vec<u8>, CacheError> {
    fs::read(path).map_err(|err| CacheError::io(path, err))
}
