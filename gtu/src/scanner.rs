//! Executable locator - lists candidate binaries in a directory

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors listing the tools directory
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Return the absolute paths of executable files directly inside `dir`, sorted by name
///
/// Directories are skipped. On Windows a file is executable when it has an
/// `.exe` extension, elsewhere when any execute permission bit is set.
/// Entries whose metadata can't be read are skipped.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    debug!(?dir, "scan_directory: called");
    let read_dir_error = |source| ScanError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let dir = fs::canonicalize(dir).map_err(read_dir_error)?;
    let entries = fs::read_dir(&dir).map_err(read_dir_error)?;

    let mut executables = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(%e, "scan_directory: skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(?path, %e, "scan_directory: skipping entry without metadata");
                continue;
            }
        };

        if metadata.is_dir() {
            debug!(?path, "scan_directory: skipping directory");
            continue;
        }

        if is_executable(&path, &metadata) {
            executables.push(path);
        }
    }

    executables.sort();
    debug!(count = executables.len(), "scan_directory: found executables");
    Ok(executables)
}

#[cfg(windows)]
fn is_executable(path: &Path, _metadata: &fs::Metadata) -> bool {
    path.extension().is_some_and(|ext| ext == "exe")
}

#[cfg(unix)]
fn is_executable(_path: &Path, metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_directory_is_error() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");

        let err = scan_directory(&missing).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_paths_are_absolute() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        let exec = temp.path().join("dlv.exe");
        fs::write(&exec, b"").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&exec, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let found = scan_directory(&temp.path().join("sub").join("..")).unwrap();

        assert_eq!(found, vec![fs::canonicalize(&exec).unwrap()]);
        assert!(found[0].is_absolute());
    }

    #[test]
    fn test_empty_directory() {
        let temp = tempdir().unwrap();
        assert!(scan_directory(temp.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let exec = temp.path().join("dlv");
        let plain = temp.path().join("README");
        let group_exec = temp.path().join("gopls");
        fs::write(&exec, b"").unwrap();
        fs::write(&plain, b"").unwrap();
        fs::write(&group_exec, b"").unwrap();
        fs::set_permissions(&exec, fs::Permissions::from_mode(0o755)).unwrap();
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();
        fs::set_permissions(&group_exec, fs::Permissions::from_mode(0o640 | 0o010)).unwrap();
        fs::create_dir(temp.path().join("subdir")).unwrap();

        let found = scan_directory(temp.path()).unwrap();
        assert_eq!(
            found,
            vec![fs::canonicalize(exec).unwrap(), fs::canonicalize(group_exec).unwrap()]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let dir = temp.path().join("pkg");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(scan_directory(temp.path()).unwrap().is_empty());
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_extension() {
        let temp = tempdir().unwrap();
        let exec = temp.path().join("dlv.exe");
        fs::write(&exec, b"").unwrap();
        fs::write(temp.path().join("notes.txt"), b"").unwrap();

        assert_eq!(scan_directory(temp.path()).unwrap(), vec![fs::canonicalize(exec).unwrap()]);
    }
}
