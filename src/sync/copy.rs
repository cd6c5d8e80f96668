//! Atomic file writes
//!
//! Content is written to a `<name>.part` sibling, flushed to disk and renamed
//! over the destination, so a reader never sees a half-written file.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

const BUFFER_SIZE: usize = 128 * 1024;

/// Temporary sibling used while `dest` is being written
///
/// The suffix is appended to the whole file name so `a.txt` and `a.md`
/// never share a temporary file.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("unnamed"));
    name.push(".part");
    dest.with_file_name(name)
}

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Stream `src` into `<dest>.part`
/// 2. Flush and sync to disk
/// 3. Copy permissions and mtime from `src`
/// 4. Rename over `dest`, replacing any existing file
///
/// Parent directories of `dest` are created when missing. On failure the
/// `.part` file is removed and `dest` is left untouched.
///
/// # Returns
/// Number of bytes copied.
///
/// # Example
/// ```no_run
/// use bc_deploy::sync::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("dist/app.js"), Path::new("out/app.js"))?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> io::Result<u64> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let part = part_path(dest);
    let result = stream_to_part(src, &part).and_then(|bytes| {
        fs::rename(&part, dest)?;
        Ok(bytes)
    });

    if result.is_err() {
        let _ = fs::remove_file(&part);
    }
    result
}

/// Recreate the symlink `src` at `dest` without following it
///
/// The link is created as `<dest>.part` and renamed over `dest`, so an
/// existing file or link at `dest` is replaced in one step.
///
/// # Returns
/// Always 0; no file content is copied.
pub fn copy_symlink(src: &Path, dest: &Path) -> io::Result<u64> {
    let link_target = fs::read_link(src)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let part = part_path(dest);
    let _ = fs::remove_file(&part);
    let result = create_symlink(&link_target, &part).and_then(|()| fs::rename(&part, dest));

    if result.is_err() {
        let _ = fs::remove_file(&part);
    }
    result.map(|()| 0)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link_path: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link_path)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link_path: &Path) -> io::Result<()> {
    use std::os::windows::fs::{symlink_dir, symlink_file};
    match symlink_file(target, link_path) {
        Ok(()) => Ok(()),
        Err(file_err) => symlink_dir(target, link_path).map_err(|_| file_err),
    }
}

/// Replace `dest` with `contents` atomically
pub fn write_file_atomic(dest: &Path, contents: &[u8]) -> io::Result<()> {
    let part = part_path(dest);
    let result = (|| -> io::Result<()> {
        let mut file = File::create(&part)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);

        // Keep the mode of the file being replaced.
        if let Ok(existing) = fs::metadata(dest) {
            fs::set_permissions(&part, existing.permissions())?;
        }
        fs::rename(&part, dest)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&part);
    }
    result
}

fn stream_to_part(src: &Path, part: &Path) -> io::Result<u64> {
    let mut src_file = File::open(src)?;
    let src_metadata = src_file.metadata()?;
    if src_metadata.is_dir() {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            "source is a directory",
        ));
    }

    let mut part_file = File::create(part)?;
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match src_file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        part_file.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all()?;

    // Drop the handle before rename (required on Windows)
    drop(part_file);

    fs::set_permissions(part, src_metadata.permissions())?;
    let mtime = filetime::FileTime::from_last_modification_time(&src_metadata);
    filetime::set_file_mtime(part, mtime)?;

    Ok(total_bytes)
}
