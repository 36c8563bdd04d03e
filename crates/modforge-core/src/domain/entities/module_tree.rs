use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// Rendered module ready to be written under `root`.
///
/// Pure data: the generation service renders templates into a tree, the
/// filesystem port materializes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleTree {
    root: PathBuf,
    files: Vec<FileToWrite>,
}

impl ModuleTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: String) {
        self.files.push(FileToWrite {
            path: path.into(),
            content,
        });
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.add_file(path, content.into());
        self
    }

    /// Parent directories of every file, in first-seen order.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        self.files
            .iter()
            .filter_map(|f| f.path.parent().filter(|p| !p.as_os_str().is_empty()))
            .filter(|dir| seen.insert(dir.to_path_buf()))
            .map(Path::to_path_buf)
            .collect()
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.files.iter()
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&FileToWrite> {
        let path = path.as_ref();
        self.files().find(|f| f.path == path)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn validate(&self, module: &str) -> Result<(), DomainError> {
        if self.file_count() == 0 {
            return Err(DomainError::EmptyModuleTree {
                module: module.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for file in self.files() {
            if file.path.is_absolute() {
                return Err(DomainError::AbsolutePathNotAllowed {
                    path: file.path.display().to_string(),
                });
            }
            if !seen.insert(&file.path) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.display().to_string(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
}
