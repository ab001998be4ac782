//! File operations for sync.
//!
//! - Whole-file reads for input documents, with a distinct not-found error
//! - Atomic writes: write to temp file, sync to disk, then rename

use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::sync::types::{SyncError, SyncResult};

/// Read a document into memory.
///
/// # Errors
///
/// Returns [`SyncError::FileNotFound`] if the path does not exist, or
/// [`SyncError::Io`] if it cannot be read.
pub fn read_document(path: &Path) -> SyncResult<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SyncError::FileNotFound(path.display().to_string()),
        _ => SyncError::Io(e),
    })
}

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file next to the target
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, an existing file at `path` remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> SyncResult<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let result = write_synced(&temp_path, content).and_then(|()| fs::rename(&temp_path, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}
