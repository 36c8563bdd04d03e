//! Configuration store - layered load, edit and atomic save.
//!
//! Layers are read in increasing precedence (defaults, user, project). A
//! missing source is skipped; a source that exists but does not decode is an
//! error naming the file. Edits replace exactly one layer and re-fold the
//! merged view; nothing reaches disk until [`ConfigurationStore::save`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{DocumentCodec, Filesystem},
    },
    domain::{ConfigurationLayer, LayerKind, MergedConfiguration, Value},
    error::{ModforgeError, ModforgeResult},
};

/// Where user-wide and project-local configuration live.
///
/// Computed by the caller; the core never looks up the home or working
/// directory itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSearchPaths {
    pub user: Option<PathBuf>,
    pub project: Option<PathBuf>,
}

impl ConfigSearchPaths {
    pub fn new(user: Option<PathBuf>, project: Option<PathBuf>) -> Self {
        Self { user, project }
    }

    /// File backing a writable layer.
    pub fn path_for(&self, kind: LayerKind) -> Option<&Path> {
        match kind {
            LayerKind::Default => None,
            LayerKind::User => self.user.as_deref(),
            LayerKind::Project => self.project.as_deref(),
        }
    }

    /// Sources in increasing precedence.
    pub fn sources(&self) -> Vec<(LayerKind, PathBuf)> {
        [LayerKind::User, LayerKind::Project]
            .into_iter()
            .filter_map(|kind| self.path_for(kind).map(|p| (kind, p.to_path_buf())))
            .collect()
    }
}

pub struct ConfigurationStore {
    filesystem: Arc<dyn Filesystem>,
    codec: Arc<dyn DocumentCodec>,
    merged: MergedConfiguration,
}

impl ConfigurationStore {
    /// A store holding only the built-in defaults.
    pub fn new(filesystem: Arc<dyn Filesystem>, codec: Arc<dyn DocumentCodec>) -> Self {
        Self {
            filesystem,
            codec,
            merged: MergedConfiguration::defaults(),
        }
    }

    /// Load every source named by `paths` on top of the defaults.
    pub fn load(&mut self, paths: &ConfigSearchPaths) -> ModforgeResult<&MergedConfiguration> {
        self.load_sources(&paths.sources())
    }

    /// Load explicit `(kind, path)` sources on top of the defaults.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub fn load_sources(
        &mut self,
        sources: &[(LayerKind, PathBuf)],
    ) -> ModforgeResult<&MergedConfiguration> {
        let mut layers = vec![ConfigurationLayer::defaults()];
        for (kind, path) in sources {
            match self.read_layer(*kind, path)? {
                Some(layer) => layers.push(layer),
                None => layers.push(ConfigurationLayer::empty(*kind).with_source(path)),
            }
        }

        self.merged = MergedConfiguration::fold(layers);
        Ok(&self.merged)
    }

    /// Read one source. `Ok(None)` when the file does not exist.
    pub fn read_layer(
        &self,
        kind: LayerKind,
        path: &Path,
    ) -> ModforgeResult<Option<ConfigurationLayer>> {
        if !self.filesystem.exists(path) {
            debug!(layer = %kind, path = %path.display(), "Configuration source absent, skipped");
            return Ok(None);
        }

        let text = self.filesystem.read_to_string(path)?;
        let settings = self
            .codec
            .decode(&text)
            .map_err(|reason| ApplicationError::ConfigParse {
                source_path: path.to_path_buf(),
                reason,
            })?;

        debug!(layer = %kind, path = %path.display(), keys = settings.len(), "Configuration layer loaded");
        Ok(Some(ConfigurationLayer::new(kind, settings).with_source(path)))
    }

    pub fn merged(&self) -> &MergedConfiguration {
        &self.merged
    }

    pub fn into_merged(self) -> MergedConfiguration {
        self.merged
    }

    /// Effective value at a dotted path. Never fails.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.merged.get(path)
    }

    /// Replace `path` in one layer with an already-typed value.
    pub fn set(&mut self, path: &str, value: Value, kind: LayerKind) -> ModforgeResult<()> {
        let layer = self.writable_layer(kind)?;
        let next = layer.with_value(path, value)?;
        self.merged = self.merged.with_layer(next);
        Ok(())
    }

    /// Replace `path` in one layer with a raw command-line string.
    ///
    /// The string is coerced against the key's type in the defaults layer,
    /// or against the current value in the target layer when defaults do not
    /// know the key. Returns the value actually stored.
    pub fn set_raw(&mut self, path: &str, raw: &str, kind: LayerKind) -> ModforgeResult<Value> {
        let schema = self
            .merged
            .layer(LayerKind::Default)
            .and_then(|d| d.get(path))
            .or_else(|| self.merged.layer(kind).and_then(|l| l.get(path)));

        let value = Value::coerce_scalar(raw, schema);
        self.set(path, value.clone(), kind)?;
        Ok(value)
    }

    /// Remove `path` from one layer. Returns whether anything was removed.
    pub fn unset(&mut self, path: &str, kind: LayerKind) -> ModforgeResult<bool> {
        let layer = self.writable_layer(kind)?;
        let (next, removed) = layer.without_value(path);
        if removed {
            self.merged = self.merged.with_layer(next);
        }
        Ok(removed)
    }

    /// Persist exactly one layer to `destination`.
    ///
    /// The write goes through a temporary file and a rename, so a failed save
    /// leaves the previous file untouched.
    #[instrument(skip_all, fields(layer = %kind, destination = %destination.display()))]
    pub fn save(&self, kind: LayerKind, destination: &Path) -> ModforgeResult<()> {
        let layer = self.writable_layer(kind)?;
        let text = self
            .codec
            .encode(layer.settings())
            .map_err(|reason| ModforgeError::Internal {
                message: format!("cannot encode {kind} configuration: {reason}"),
            })?;

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_atomic(destination, &text)?;

        info!("Configuration saved");
        Ok(())
    }

    /// Flattened `dotted.path -> text` view of the merged configuration.
    pub fn all_settings(&self) -> BTreeMap<String, String> {
        self.merged.all_settings()
    }

    /// The current layer of `kind`, or an empty one. Defaults are read-only.
    fn writable_layer(&self, kind: LayerKind) -> ModforgeResult<ConfigurationLayer> {
        if kind == LayerKind::Default {
            return Err(ModforgeError::Configuration {
                message: "built-in defaults cannot be modified".into(),
            });
        }
        Ok(self
            .merged
            .layer(kind)
            .cloned()
            .unwrap_or_else(|| ConfigurationLayer::empty(kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockDocumentCodec, MockFilesystem};
    use crate::domain::ValueMap;
    use crate::error::ErrorKind;

    fn store(fs: MockFilesystem, codec: MockDocumentCodec) -> ConfigurationStore {
        ConfigurationStore::new(Arc::new(fs), Arc::new(codec))
    }

    fn absent_fs() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs
    }

    #[test]
    fn missing_sources_are_skipped() {
        let mut store = store(absent_fs(), MockDocumentCodec::new());
        let paths = ConfigSearchPaths::new(Some("/home/u/config.toml".into()), None);

        let merged = store.load(&paths).unwrap();
        assert_eq!(merged.get_str("swiftToolsVersion").unwrap(), Some("5.9"));
    }

    #[test]
    fn undecodable_source_names_the_file() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_read_to_string()
            .returning(|_| Ok("author = ".to_string()));
        let mut codec = MockDocumentCodec::new();
        codec
            .expect_decode()
            .returning(|_| Err("expected a value".to_string()));

        let mut store = store(fs, codec);
        let err = store
            .load_sources(&[(LayerKind::Project, PathBuf::from("/p/.modforge.toml"))])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigParse);
        assert!(err.to_string().contains("/p/.modforge.toml"));
    }

    #[test]
    fn higher_layer_overrides_only_its_keys() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_read_to_string()
            .returning(|p| Ok(p.display().to_string()));

        let mut codec = MockDocumentCodec::new();
        codec.expect_decode().returning(|text| {
            let mut map = ValueMap::new();
            if text.contains("user") {
                map.insert("author".into(), Value::from("User"));
                map.insert("skipDependencyResolver".into(), Value::Bool(false));
            } else {
                map.insert("skipDependencyResolver".into(), Value::Bool(true));
            }
            Ok(map)
        });

        let mut store = store(fs, codec);
        let merged = store
            .load(&ConfigSearchPaths::new(
                Some("/home/user.toml".into()),
                Some("/proj/.modforge.toml".into()),
            ))
            .unwrap();

        assert_eq!(merged.get_bool("skipDependencyResolver").unwrap(), Some(true));
        assert_eq!(merged.get_str("author").unwrap(), Some("User"));
    }

    #[test]
    fn list_keys_split_on_commas() {
        let mut store = store(absent_fs(), MockDocumentCodec::new());
        let stored = store
            .set_raw("dependencyExclusions", "PackageA, PackageB", LayerKind::Project)
            .unwrap();

        assert_eq!(stored, Value::string_list(["PackageA", "PackageB"]));
        assert_eq!(
            store.merged().get_string_list("dependencyExclusions").unwrap(),
            Some(vec!["PackageA".to_string(), "PackageB".to_string()])
        );
    }

    #[test]
    fn bool_keys_parse_and_unknown_keys_stay_strings() {
        let mut store = store(absent_fs(), MockDocumentCodec::new());
        store
            .set_raw("skipDependencyResolver", "true", LayerKind::User)
            .unwrap();
        store.set_raw("customVariables.team", "true", LayerKind::User).unwrap();

        assert_eq!(store.get("skipDependencyResolver"), Some(&Value::Bool(true)));
        assert_eq!(store.get("customVariables.team"), Some(&Value::from("true")));
    }

    #[test]
    fn defaults_are_read_only() {
        let mut store = store(absent_fs(), MockDocumentCodec::new());
        let err = store
            .set("author", "x".into(), LayerKind::Default)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn unset_reports_whether_anything_changed() {
        let mut store = store(absent_fs(), MockDocumentCodec::new());
        store.set("author", "Ada".into(), LayerKind::User).unwrap();

        assert!(store.unset("author", LayerKind::User).unwrap());
        assert!(!store.unset("author", LayerKind::User).unwrap());
        assert_eq!(store.merged().get_str("author").unwrap(), Some(""));
    }

    #[test]
    fn save_writes_only_the_requested_layer_atomically() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_atomic()
            .withf(|path, text| {
                path == Path::new("/p/.modforge.toml") && text == "author = \"Ada\"\n"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_write_file().never();

        let mut codec = MockDocumentCodec::new();
        codec.expect_encode().returning(|doc| {
            assert_eq!(doc.len(), 1, "defaults must not leak into the saved layer");
            Ok("author = \"Ada\"\n".to_string())
        });

        let mut store = store(fs, codec);
        store.set("author", "Ada".into(), LayerKind::Project).unwrap();
        store
            .save(LayerKind::Project, Path::new("/p/.modforge.toml"))
            .unwrap();
    }

    #[test]
    fn failed_save_surfaces_the_filesystem_error() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_atomic().returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "disk full".into(),
            }
            .into())
        });
        let mut codec = MockDocumentCodec::new();
        codec.expect_encode().returning(|_| Ok(String::new()));

        let store = store(fs, codec);
        let err = store
            .save(LayerKind::User, Path::new("/home/u/config.toml"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
    }

    #[test]
    fn all_settings_flattens_lists() {
        let store = store(absent_fs(), MockDocumentCodec::new());
        let settings = store.all_settings();
        assert_eq!(settings["platforms"], "ios@15");
        assert_eq!(settings["skipDependencyResolver"], "false");
    }
}
