//! Filesystem-based template override loader.
//!
//! Every `*.tmpl` file found under the templates directory (at any depth)
//! becomes one template, named after the file with the `.tmpl` suffix
//! removed:
//!
//! ```text
//! templates/
//! ├── Package.swift.tmpl   → "Package.swift"
//! ├── gitignore.tmpl       → "gitignore"
//! └── sources/
//!     └── Module.swift.tmpl → "Module.swift"
//! ```
//!
//! Loaded templates are layered over the built-in set with
//! [`SimpleRenderer::with_templates`](crate::renderer::SimpleRenderer::with_templates).

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use modforge_core::{application::ApplicationError, error::ModforgeResult};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

const TEMPLATE_SUFFIX: &str = ".tmpl";

/// Loads template sources from a directory tree.
#[derive(Debug, Clone)]
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Load every template below the directory, keyed by template name.
    ///
    /// A missing directory is an error. Unreadable files are skipped with a
    /// warning. When two files map to the same name, the one sorted first by
    /// path wins.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> ModforgeResult<BTreeMap<String, String>> {
        if !self.templates_dir.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: self.templates_dir.clone(),
                reason: "templates directory does not exist".into(),
            }
            .into());
        }

        let mut templates = BTreeMap::new();

        for entry in WalkDir::new(&self.templates_dir)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = template_name(entry.path()) else {
                continue;
            };

            if templates.contains_key(&name) {
                warn!(template = %name, path = %entry.path().display(), "duplicate template ignored");
                continue;
            }

            match fs::read_to_string(entry.path()) {
                Ok(source) => {
                    debug!(template = %name, path = %entry.path().display(), "loaded template");
                    templates.insert(name, source);
                }
                Err(e) => warn!(path = %entry.path().display(), error = %e, "skipping template"),
            }
        }

        Ok(templates)
    }
}

fn template_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = file_name.strip_suffix(TEMPLATE_SUFFIX)?;
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_is_an_error() {
        let loader = FilesystemTemplateLoader::new("/absolutely/does/not/exist");
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn loads_tmpl_files_at_any_depth() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Package.swift.tmpl"), "// manifest").unwrap();
        fs::create_dir(temp.path().join("sources")).unwrap();
        fs::write(temp.path().join("sources/Module.swift.tmpl"), "// module").unwrap();
        fs::write(temp.path().join("README.md"), "not a template").unwrap();

        let templates = FilesystemTemplateLoader::new(temp.path()).load_all().unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(templates["Package.swift"], "// manifest");
        assert_eq!(templates["Module.swift"], "// module");
    }

    #[test]
    fn first_duplicate_wins() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("a")).unwrap();
        fs::create_dir(temp.path().join("b")).unwrap();
        fs::write(temp.path().join("a/gitignore.tmpl"), "first").unwrap();
        fs::write(temp.path().join("b/gitignore.tmpl"), "second").unwrap();

        let templates = FilesystemTemplateLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(templates["gitignore"], "first");
    }

    #[test]
    fn bare_suffix_is_not_a_template() {
        assert_eq!(template_name(Path::new("/t/.tmpl")), None);
        assert_eq!(
            template_name(Path::new("/t/Tests.swift.tmpl")).as_deref(),
            Some("Tests.swift")
        );
    }
}
