//! Writing rendered files to disk.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes `bytes` to `dir/file_name` atomically.
///
/// The data goes to a temporary file in `dir` first and is renamed over the
/// destination only after it has been fully written and synced. On failure
/// the destination is left untouched and the temporary file is removed.
pub fn write_atomic(dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let dest = dir.join(file_name);

    let mut file = tempfile::Builder::new()
        .prefix(".bgmgen_")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.as_file().sync_all()?;
    file.persist(&dest).map_err(|e| e.error)?;

    tracing::debug!(path = %dest.display(), bytes = bytes.len(), "wrote file");
    Ok(dest)
}
