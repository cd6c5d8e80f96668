//! Single-file move with a cross-device fallback

use super::copy::{copy_file_atomic, copy_symlink};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

/// Move `src` to `dest`, replacing any existing file at `dest`
///
/// Uses `rename` when both paths share a filesystem. Across devices the file
/// is copied atomically and the source removed afterwards; if the copy fails
/// the source is left in place. A symlink is moved as a link, never through
/// to its target.
///
/// # Returns
/// Size of the moved file in bytes (0 for a symlink).
pub fn move_file(src: &Path, dest: &Path) -> io::Result<u64> {
    let metadata = fs::symlink_metadata(src)?;
    let is_symlink = metadata.file_type().is_symlink();
    let size = if is_symlink { 0 } else { metadata.len() };

    match fs::rename(src, dest) {
        Ok(()) => Ok(size),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            let bytes = if is_symlink {
                copy_symlink(src, dest)?
            } else {
                copy_file_atomic(src, dest)?
            };
            fs::remove_file(src)?;
            Ok(bytes)
        }
        Err(e) => Err(e),
    }
}
