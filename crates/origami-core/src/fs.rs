//! Filesystem utilities for atomic file replacement and creation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Build a unique temp path next to `path`, in the same directory so the
/// final rename stays on one filesystem.
pub fn temp_sibling(path: &Path) -> io::Result<PathBuf> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid filename"))?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::other(format!("System time error: {}", e)))?
        .as_nanos();

    let temp_name = format!(".{}.{}.tmp", filename, nanos);
    Ok(match path.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    })
}

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// In that case the destination is removed and the rename retried.
///
/// If the rename ultimately fails, the temp file is cleaned up.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Move a finished temp file to `destination`, which must not exist yet.
///
/// Never replaces an existing file: a taken destination fails with
/// `AlreadyExists` and is left untouched. The temp file is removed either way.
pub fn publish_new(temp_path: &Path, destination: &Path) -> io::Result<()> {
    let result = match fs::hard_link(temp_path, destination) {
        Err(e) if e.kind() != io::ErrorKind::AlreadyExists => copy_new(temp_path, destination),
        other => other,
    };
    let _ = fs::remove_file(temp_path);
    result
}

/// Copy into a freshly created file, for filesystems without hard links.
fn copy_new(from: &Path, to: &Path) -> io::Result<()> {
    let mut source = File::open(from)?;
    let mut target = OpenOptions::new().write(true).create_new(true).open(to)?;

    let copied = io::copy(&mut source, &mut target).and_then(|_| target.sync_all());
    if copied.is_err() {
        let _ = fs::remove_file(to);
    }
    copied
}

/// Replace `path` with `data` via a synced temp file and rename.
///
/// Readers see either the old contents or the new, never a partial write.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let temp_path = temp_sibling(path)?;

    let result = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        });
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    rename_with_fallback(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_temp_sibling_is_hidden_and_local() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("journal.db");

        let temp = temp_sibling(&dest).unwrap();

        assert_eq!(temp.parent(), Some(dir.path()));
        let name = temp.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".journal.db."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_rename_overwrites_existing() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");

        fs::write(&dest, b"old").unwrap();
        fs::write(&temp, b"new").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_publish_new_moves_temp_into_place() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.db");
        let dest = dir.path().join("backup.db");
        fs::write(&temp, b"snapshot").unwrap();

        publish_new(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"snapshot");
    }

    #[test]
    fn test_publish_new_never_replaces_existing() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.db");
        let dest = dir.path().join("backup.db");
        fs::write(&dest, b"keep me").unwrap();
        fs::write(&temp, b"snapshot").unwrap();

        let err = publish_new(&temp, &dest).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&dest).unwrap(), b"keep me");
        assert!(!temp.exists());
    }

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("config.toml");

        write_atomic(&dest, b"first").unwrap();
        write_atomic(&dest, b"second").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "second");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_atomic_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("config.toml");

        assert!(write_atomic(&dest, b"data").is_err());
        assert!(!dest.exists());
    }
}
