//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use modforge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ModforgeError, ModforgeResult},
};
use tempfile::NamedTempFile;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ModforgeResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ModforgeResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn write_atomic(&self, path: &Path, content: &str) -> ModforgeResult<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // The temporary file must share a filesystem with the target for the
        // rename to be atomic.
        let mut temp =
            NamedTempFile::new_in(dir).map_err(|e| map_io_error(path, e, "create temporary file"))?;
        temp.write_all(content.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| map_io_error(path, e, "write temporary file"))?;
        temp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> ModforgeResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn canonicalize(&self, path: &Path) -> ModforgeResult<PathBuf> {
        std::fs::canonicalize(path).map_err(|e| map_io_error(path, e, "resolve path"))
    }

    fn remove_dir_all(&self, path: &Path) -> ModforgeResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ModforgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_replaces_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("config.toml");
        let fs = LocalFilesystem::new();

        fs.write_atomic(&target, "author = \"Ada\"\n").unwrap();
        fs.write_atomic(&target, "author = \"Grace\"\n").unwrap();

        assert_eq!(fs.read_to_string(&target).unwrap(), "author = \"Grace\"\n");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary files must not survive");
    }

    #[test]
    fn failed_atomic_write_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("Modules.modworkspace");

        assert!(LocalFilesystem::new().write_atomic(&target, "broken").is_err());
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn refused_replace_keeps_previous_content() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        let target = locked.join("Modules.modworkspace");
        let fs = LocalFilesystem::new();
        fs.write_atomic(&target, "name = \"Modules\"\n").unwrap();

        let set_mode = |mode| {
            std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(mode)).unwrap()
        };
        set_mode(0o555);
        // Superusers bypass directory permissions, so the replace cannot be refused.
        let enforced = std::fs::write(locked.join("canary"), "").is_err();
        let result = fs.write_atomic(&target, "name = \"Broken\"\n");
        set_mode(0o755);

        if enforced {
            assert!(result.is_err());
        }
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            if enforced { "name = \"Modules\"\n" } else { "name = \"Broken\"\n" }
        );
        let entries = std::fs::read_dir(&locked).unwrap().count();
        assert_eq!(entries, if enforced { 1 } else { 2 });
    }

    #[test]
    fn canonicalize_resolves_dot_segments() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("Feature")).unwrap();
        let fs = LocalFilesystem::new();

        let canonical = fs
            .canonicalize(&dir.path().join("Feature").join("..").join("Feature"))
            .unwrap();
        assert_eq!(canonical, fs.canonicalize(&dir.path().join("Feature")).unwrap());
    }

    #[test]
    fn missing_paths_name_the_path() {
        let fs = LocalFilesystem::new();
        let err = fs.read_to_string(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here"));
    }
}
