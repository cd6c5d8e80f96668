//! Tests for recursive directory copy and move

use bc_deploy::sync::{copy_directory, move_files, SyncEvent};
use bc_deploy::DeployError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Helper: Create a file (and its parents) with content
fn create_test_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    fs::write(&path, content).expect("Failed to create test file");
    path
}

/// Helper: Sorted relative paths of every file and directory under `root`
fn snapshot(root: &Path) -> Vec<(String, Option<Vec<u8>>)> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, Option<Vec<u8>>)>) {
        for entry in fs::read_dir(dir).expect("read dir") {
            let path = entry.expect("dir entry").path();
            let relative = path
                .strip_prefix(root)
                .expect("strip prefix")
                .to_string_lossy()
                .replace('\\', "/");
            if path.is_dir() {
                out.push((relative, None));
                walk(root, &path, out);
            } else {
                out.push((relative, Some(fs::read(&path).expect("read file"))));
            }
        }
    }

    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

fn sample_tree(root: &Path) {
    create_test_file(root, "index.html", b"<html></html>");
    create_test_file(root, "assets/app.js", b"console.log(1)");
    create_test_file(root, "assets/img/logo.png", &[0x89, 0x50, 0x4e, 0x47, 0x00, 0xff]);
    create_test_file(root, "assets/img/deep/er/still.txt", b"deep");
    create_test_file(root, "empty.txt", b"");
    fs::create_dir_all(root.join("empty-dir")).expect("create empty dir");
}

// ═══════════════════════════════════════════════════════════
// Copy
// ═══════════════════════════════════════════════════════════

#[test]
fn test_copy_produces_identical_tree() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    sample_tree(src.path());
    let before = snapshot(src.path());

    let target = dst.path().join("out");
    let report = copy_directory(src.path(), &target, None).expect("copy should succeed");

    assert!(report.is_complete(), "unexpected failures: {:?}", report.failures);
    assert_eq!(report.files, 5);
    assert_eq!(report.directories, 5);
    assert_eq!(snapshot(&target), before);
    assert_eq!(snapshot(src.path()), before, "source must be unchanged");
}

#[test]
fn test_copy_empty_source_creates_empty_target() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    let target = dst.path().join("a/b/c");

    let report = copy_directory(src.path(), &target, None).expect("copy should succeed");
    assert_eq!(report.files, 0);
    assert!(target.is_dir());
}

#[test]
fn test_copy_overwrites_existing_and_keeps_unrelated() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    create_test_file(src.path(), "config.json", b"{\"new\":true}");
    create_test_file(dst.path(), "config.json", b"{\"old\":true}");
    create_test_file(dst.path(), "keep.txt", b"untouched");

    copy_directory(src.path(), dst.path(), None).expect("copy should succeed");

    assert_eq!(
        fs::read(dst.path().join("config.json")).expect("read config"),
        b"{\"new\":true}"
    );
    assert_eq!(
        fs::read(dst.path().join("keep.txt")).expect("read keep"),
        b"untouched"
    );
}

#[test]
fn test_copy_missing_source_fails_without_creating_target() {
    let root = TempDir::new().expect("create tempdir");
    let target = root.path().join("dst");

    let err = copy_directory(&root.path().join("missing"), &target, None).unwrap_err();

    assert!(matches!(err, DeployError::NotFound { .. }));
    assert!(!target.exists(), "target must not be created on failure");
}

#[test]
#[cfg(unix)]
fn test_copy_continues_past_unreadable_file() {
    use std::os::unix::fs::PermissionsExt;

    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    let secret = create_test_file(src.path(), "a-secret.txt", b"hidden");
    create_test_file(src.path(), "b-public.txt", b"visible");

    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).expect("chmod 000");
    if fs::read(&secret).is_ok() {
        // Running as root; permission bits are not enforced.
        return;
    }

    let report = copy_directory(src.path(), dst.path(), None).expect("copy should not abort");
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).expect("restore mode");

    assert_eq!(report.files, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, secret);
    assert!(dst.path().join("b-public.txt").exists());
    assert!(!dst.path().join("a-secret.txt").exists());
    assert!(!dst.path().join("a-secret.txt.part").exists());
}

// ═══════════════════════════════════════════════════════════
// Move
// ═══════════════════════════════════════════════════════════

#[test]
fn test_move_flat_directory_empties_source() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    for i in 0..4 {
        create_test_file(src.path(), &format!("file{}.txt", i), format!("{}", i).as_bytes());
    }

    let report = move_files(src.path(), dst.path(), None).expect("move should succeed");

    assert!(report.is_complete());
    assert_eq!(report.files, 4);
    assert_eq!(fs::read_dir(src.path()).expect("read src").count(), 0);
    for i in 0..4 {
        assert_eq!(
            fs::read_to_string(dst.path().join(format!("file{}.txt", i))).expect("read moved"),
            format!("{}", i)
        );
    }
}

#[test]
fn test_move_nested_tree_removes_source_subdirectories() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    sample_tree(src.path());
    let before = snapshot(src.path());

    let target = dst.path().join("release");
    let report = move_files(src.path(), &target, None).expect("move should succeed");

    assert!(report.is_complete(), "unexpected failures: {:?}", report.failures);
    assert_eq!(snapshot(&target), before);
    assert!(src.path().exists(), "source root is kept");
    assert_eq!(fs::read_dir(src.path()).expect("read src").count(), 0);
}

#[test]
fn test_move_replaces_existing_target_file() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    create_test_file(src.path(), "bundle.js", b"v2");
    create_test_file(dst.path(), "bundle.js", b"v1");

    move_files(src.path(), dst.path(), None).expect("move should succeed");

    assert_eq!(fs::read(dst.path().join("bundle.js")).expect("read bundle"), b"v2");
    assert!(!src.path().join("bundle.js").exists());
}

#[test]
fn test_move_missing_source_is_filesystem_error() {
    let root = TempDir::new().expect("create tempdir");
    let err = move_files(&root.path().join("missing"), &root.path().join("dst"), None).unwrap_err();
    assert!(err.is_filesystem_error());
}

// ═══════════════════════════════════════════════════════════
// Links
// ═══════════════════════════════════════════════════════════

#[cfg(unix)]
fn link(target: &Path, at: &Path) {
    std::os::unix::fs::symlink(target, at).expect("create symlink");
}

#[cfg(unix)]
fn assert_link_to(path: &Path, target: &Path) {
    let metadata = fs::symlink_metadata(path).expect("link metadata");
    assert!(metadata.file_type().is_symlink(), "{} is not a symlink", path.display());
    assert_eq!(fs::read_link(path).expect("read link"), target);
}

#[test]
#[cfg(unix)]
fn test_move_keeps_data_behind_directory_symlink() {
    let root = TempDir::new().expect("create tempdir");
    let src = root.path().join("src");
    let dst = root.path().join("dst");
    let outside = root.path().join("outside");
    create_test_file(&outside, "precious.txt", b"keep me");
    create_test_file(&src, "app.js", b"app");
    link(&outside, &src.join("link"));

    let report = move_files(&src, &dst, None).expect("move should succeed");

    assert!(report.is_complete(), "unexpected failures: {:?}", report.failures);
    assert_eq!(report.files, 2);
    assert_eq!(report.directories, 0);
    assert_eq!(
        fs::read(outside.join("precious.txt")).expect("outside file untouched"),
        b"keep me"
    );
    assert!(fs::symlink_metadata(src.join("link")).is_err(), "link moved out of source");
    assert_link_to(&dst.join("link"), &outside);
}

#[test]
#[cfg(unix)]
fn test_copy_recreates_directory_symlink() {
    let root = TempDir::new().expect("create tempdir");
    let src = root.path().join("src");
    let dst = root.path().join("dst");
    let outside = root.path().join("outside");
    create_test_file(&outside, "precious.txt", b"keep me");
    create_test_file(&src, "index.html", b"<html></html>");
    link(&outside, &src.join("shared"));

    let report = copy_directory(&src, &dst, None).expect("copy should succeed");

    assert!(report.is_complete(), "unexpected failures: {:?}", report.failures);
    assert_eq!(report.directories, 0);
    assert_link_to(&dst.join("shared"), &outside);
    assert_link_to(&src.join("shared"), &outside);
    assert_eq!(snapshot(&outside).len(), 1);
}

#[test]
#[cfg(unix)]
fn test_move_dangling_symlink() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    link(Path::new("gone.txt"), &src.path().join("dangling"));

    let report = move_files(src.path(), dst.path(), None).expect("move should succeed");

    assert!(report.is_complete(), "unexpected failures: {:?}", report.failures);
    assert_eq!(report.files, 1);
    assert_link_to(&dst.path().join("dangling"), Path::new("gone.txt"));
}

#[test]
#[cfg(unix)]
fn test_walk_visits_each_entry_once_with_links() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    let original = create_test_file(src.path(), "a/data.bin", b"payload");
    fs::hard_link(&original, src.path().join("a/hard.bin")).expect("create hard link");
    link(src.path(), &src.path().join("a/loop"));
    link(Path::new("data.bin"), &src.path().join("a/soft.bin"));

    let visited: Arc<Mutex<Vec<PathBuf>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&visited);
    let callback = move |event: &SyncEvent<'_>| {
        if let SyncEvent::EntryDone { path, .. } = event {
            sink.lock().expect("lock").push(path.to_path_buf());
        }
    };

    let report =
        copy_directory(src.path(), dst.path(), Some(&callback)).expect("copy should succeed");

    assert!(report.is_complete(), "unexpected failures: {:?}", report.failures);
    let mut visited = visited.lock().expect("lock").clone();
    visited.sort();
    let expected: Vec<PathBuf> = ["a/data.bin", "a/hard.bin", "a/loop", "a/soft.bin"]
        .iter()
        .map(|p| src.path().join(p))
        .collect();
    assert_eq!(visited, expected);
    assert_eq!(report.files, 4);
    assert_eq!(report.directories, 1);
    assert_eq!(fs::read(dst.path().join("a/hard.bin")).expect("read hard link copy"), b"payload");
    assert_link_to(&dst.path().join("a/loop"), src.path());
}
