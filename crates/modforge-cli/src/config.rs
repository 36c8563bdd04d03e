//! Where the CLI finds its configuration.
//!
//! [`AppConfig`] is resolved once at startup from the global flags, the
//! environment (after `.env` is loaded) and the working directory. The core
//! never discovers paths on its own; it receives them as
//! [`ConfigSearchPaths`].

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use modforge_core::{application::ConfigSearchPaths, domain::LayerKind};

use crate::cli::global::GlobalArgs;

/// Project-local configuration file name.
pub const PROJECT_FILE: &str = ".modforge.toml";

/// Resolved locations and tool-level switches.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory relative inputs are resolved against.
    pub working_dir: PathBuf,
    /// `config.toml` in the platform config directory, when one exists.
    pub user_config: Option<PathBuf>,
    /// `--config`, or `.modforge.toml` in the working directory.
    pub project_config: PathBuf,
    /// Template overrides (`--templates-dir` / `MODFORGE_TEMPLATES_DIR`).
    pub templates_dir: Option<PathBuf>,
    pub no_color: bool,
}

impl AppConfig {
    /// Resolve every location from the parsed flags.
    pub fn load(args: &GlobalArgs) -> anyhow::Result<Self> {
        let working_dir =
            std::env::current_dir().context("cannot determine the current directory")?;
        Ok(Self::resolve(args, working_dir, Self::user_config_path()))
    }

    fn resolve(args: &GlobalArgs, working_dir: PathBuf, user_config: Option<PathBuf>) -> Self {
        let project_config = match &args.config {
            Some(path) => absolutize(&working_dir, path),
            None => working_dir.join(PROJECT_FILE),
        };
        let templates_dir = args
            .templates_dir
            .as_ref()
            .map(|dir| absolutize(&working_dir, dir));

        Self {
            user_config,
            project_config,
            templates_dir,
            no_color: args.no_color,
            working_dir,
        }
    }

    /// User-wide configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness.
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "modforge", "modforge")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Search paths in increasing precedence.
    pub fn search_paths(&self) -> ConfigSearchPaths {
        ConfigSearchPaths::new(self.user_config.clone(), Some(self.project_config.clone()))
    }

    /// File that persists the `kind` layer.
    pub fn path_for(&self, kind: LayerKind) -> Option<&Path> {
        match kind {
            LayerKind::Default => None,
            LayerKind::User => self.user_config.as_deref(),
            LayerKind::Project => Some(&self.project_config),
        }
    }

    /// Make `path` absolute against the working directory.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        absolutize(&self.working_dir, path)
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    modforge_core::domain::normalize(&base.join(path))
}
