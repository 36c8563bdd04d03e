//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use modforge_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::normalize,
    error::{ModforgeError, ModforgeResult},
};

/// In-memory filesystem for testing.
///
/// Paths are normalized lexically on every access, so `/w/./A` and `/w/A`
/// name the same entry. Clones share state.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    read_only: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        let mut inner = MemoryFilesystemInner::default();
        inner.directories.insert(PathBuf::from("/"));
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        let path = normalize(path.as_ref());
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                insert_ancestors(&mut inner.directories, parent);
            }
            inner.files.insert(path, content.into());
        }
        self
    }

    /// Seed a directory (testing helper).
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            insert_ancestors(&mut inner.directories, &normalize(path.as_ref()));
        }
        self
    }

    /// Make writes under `path` fail (testing helper).
    pub fn deny_writes(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.read_only.insert(normalize(path.as_ref()));
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(&normalize(path)).cloned()
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> ModforgeResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| lock_poisoned())
    }

    fn write(&self) -> ModforgeResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| lock_poisoned())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFilesystemInner {
    fn check_writable(&self, path: &Path) -> ModforgeResult<()> {
        if self.read_only.iter().any(|ro| path.starts_with(ro)) {
            return Err(fs_error(path, "Permission denied"));
        }
        Ok(())
    }

    fn check_parent(&self, path: &Path) -> ModforgeResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(fs_error(path, "Parent directory does not exist"))
            }
            _ => Ok(()),
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> ModforgeResult<()> {
        let path = normalize(path);
        let mut inner = self.write()?;
        inner.check_writable(&path)?;
        insert_ancestors(&mut inner.directories, &path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ModforgeResult<()> {
        let path = normalize(path);
        let mut inner = self.write()?;
        inner.check_writable(&path)?;
        inner.check_parent(&path)?;
        inner.files.insert(path, content.to_string());
        Ok(())
    }

    fn write_atomic(&self, path: &Path, content: &str) -> ModforgeResult<()> {
        // A single map insert under the lock is already all-or-nothing.
        self.write_file(path, content)
    }

    fn read_to_string(&self, path: &Path) -> ModforgeResult<String> {
        let path = normalize(path);
        self.read()?
            .files
            .get(&path)
            .cloned()
            .ok_or_else(|| fs_error(&path, "No such file"))
    }

    fn exists(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(&path) || inner.directories.contains(&path))
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(&path))
            .unwrap_or(false)
    }

    fn canonicalize(&self, path: &Path) -> ModforgeResult<PathBuf> {
        let absolute = if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&Path::new("/").join(path))
        };
        if self.exists(&absolute) {
            Ok(absolute)
        } else {
            Err(fs_error(path, "No such file or directory"))
        }
    }

    fn remove_dir_all(&self, path: &Path) -> ModforgeResult<()> {
        let path = normalize(path);
        let mut inner = self.write()?;
        inner.check_writable(&path)?;

        inner.directories.retain(|p| !p.starts_with(&path));
        inner.files.retain(|p, _| !p.starts_with(&path));

        Ok(())
    }
}

fn insert_ancestors(directories: &mut HashSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

fn fs_error(path: &Path, reason: &str) -> ModforgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

fn lock_poisoned() -> ModforgeError {
    ModforgeError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}
