//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use modforge_core::domain::{LayerKind, ModuleKind};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "modforge",
    bin_name = "modforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Module scaffolding for Swift package workspaces",
    long_about = "modforge generates Swift package modules from layered \
                  configuration and keeps a workspace's member list in sync.",
    after_help = "EXAMPLES:\n\
        \x20 modforge new Login --kind feature --local ../Core:CoreKit\n\
        \x20 modforge workspace create Modules\n\
        \x20 modforge workspace add Modules.modworkspace ./Login\n\
        \x20 modforge config set dependencyExclusions \"PackageA, PackageB\"",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new module.
    #[command(
        visible_alias = "n",
        about = "Create a new module",
        after_help = "EXAMPLES:\n\
            \x20 modforge new Login\n\
            \x20 modforge new Cart --kind microapp --platform ios@16 --platform macos@13\n\
            \x20 modforge new Login --local ../Core:CoreKit,CoreUI \\\n\
            \x20     --remote 'Rainbow=https://github.com/acme/rainbow.git@1.2.0'\n\
            \x20 modforge new Login --workspace Modules.modworkspace --dry-run"
    )]
    New(NewArgs),

    /// Manage a workspace container.
    #[command(
        visible_alias = "ws",
        about = "Workspace management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 modforge workspace create Modules\n\
            \x20 modforge workspace add Modules.modworkspace ./Feature\n\
            \x20 modforge workspace list Modules.modworkspace --sorted\n\
            \x20 modforge workspace validate Modules.modworkspace"
    )]
    Workspace(WorkspaceCommands),

    /// Manage the layered configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 modforge config get platforms\n\
            \x20 modforge config set author \"Ada Lovelace\" --user\n\
            \x20 modforge config set skipDependencyResolver true\n\
            \x20 modforge config list"
    )]
    Config(ConfigCommands),

    /// Write a starter configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 modforge init          # ./.modforge.toml\n\
            \x20 modforge init --user   # user-wide config"
    )]
    Init(InitArgs),

    /// List the templates a module is rendered from.
    #[command(visible_alias = "ls", about = "List available templates")]
    Templates(TemplatesArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 modforge completions bash > ~/.local/share/bash-completion/completions/modforge\n\
            \x20 modforge completions zsh  > ~/.zfunc/_modforge\n\
            \x20 modforge completions fish > ~/.config/fish/completions/modforge.fish"
    )]
    Completions(CompletionsArgs),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `modforge new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Module name. Must be a Swift identifier.
    #[arg(value_name = "NAME", help = "Module name")]
    pub name: String,

    /// Module kind.
    #[arg(
        short = 'k',
        long = "kind",
        value_enum,
        default_value = "feature",
        help = "Module kind"
    )]
    pub kind: KindArg,

    /// Directory the module directory is created in.
    #[arg(
        short = 'p',
        long = "path",
        value_name = "DIR",
        help = "Parent directory (default: current directory)"
    )]
    pub path: Option<PathBuf>,

    /// Local package dependency: `PATH` or `PATH:Product,Product`.
    #[arg(
        short = 'l',
        long = "local",
        value_name = "PATH[:PRODUCTS]",
        help = "Local package dependency (repeatable)"
    )]
    pub local: Vec<String>,

    /// Remote package dependency: `NAME=URL@VERSION`.
    ///
    /// A bare version becomes `from: "VERSION"`; anything containing a colon
    /// (e.g. `exact: "1.0.0"`, `branch: "main"`) is used verbatim.
    #[arg(
        short = 'r',
        long = "remote",
        value_name = "NAME=URL@VERSION",
        help = "Remote package dependency (repeatable)"
    )]
    pub remote: Vec<String>,

    /// Supported platform, e.g. `ios@15`. Overrides the configured list.
    #[arg(long = "platform", value_name = "OS@VERSION", help = "Platform (repeatable)")]
    pub platform: Vec<String>,

    #[arg(long = "author", value_name = "NAME", help = "Author name")]
    pub author: Option<String>,

    #[arg(long = "organization", value_name = "NAME", help = "Organization name")]
    pub organization: Option<String>,

    #[arg(long = "bundle-id", value_name = "ID", help = "Bundle identifier prefix")]
    pub bundle_id: Option<String>,

    /// Custom template variable `KEY=VALUE`.
    #[arg(long = "var", value_name = "KEY=VALUE", help = "Template variable (repeatable)")]
    pub vars: Vec<String>,

    /// Register the new package in this workspace container.
    #[arg(
        short = 'w',
        long = "workspace",
        value_name = "FILE",
        help = "Workspace container to register the module in"
    )]
    pub workspace: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Overwrite an existing directory (destructive).
    #[arg(long = "force", help = "Overwrite existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

/// Module kinds as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum KindArg {
    Core,
    Feature,
    Shared,
    #[value(alias = "micro-app")]
    MicroApp,
}

impl From<KindArg> for ModuleKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Core => ModuleKind::Core,
            KindArg::Feature => ModuleKind::Feature,
            KindArg::Shared => ModuleKind::Shared,
            KindArg::MicroApp => ModuleKind::MicroApp,
        }
    }
}

// ── workspace ─────────────────────────────────────────────────────────────────

/// Subcommands for `modforge workspace`.
#[derive(Debug, Subcommand)]
pub enum WorkspaceCommands {
    /// Create an empty `<NAME>.modworkspace` container.
    Create {
        /// Workspace name.
        name: String,
        /// Directory to create the container in.
        #[arg(short = 'p', long = "path", value_name = "DIR")]
        path: Option<PathBuf>,
    },
    /// Register a package directory.
    Add {
        /// Workspace container file.
        workspace: PathBuf,
        /// Package directory.
        package: PathBuf,
    },
    /// Unregister a package directory.
    Remove {
        /// Workspace container file.
        workspace: PathBuf,
        /// Package directory.
        package: PathBuf,
    },
    /// List member packages.
    List {
        /// Workspace container file.
        workspace: PathBuf,
        /// Sort by name instead of registration order.
        #[arg(long = "sorted")]
        sorted: bool,
    },
    /// Check the container's structure.
    Validate {
        /// Workspace container file.
        workspace: PathBuf,
    },
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Which writable layer a config change targets.
#[derive(Debug, Clone, Copy, Args)]
pub struct LayerArgs {
    /// Write the user-wide configuration instead of the project file.
    #[arg(long = "user", help = "Target the user-wide configuration")]
    pub user: bool,
}

impl LayerArgs {
    pub fn kind(self) -> LayerKind {
        if self.user {
            LayerKind::User
        } else {
            LayerKind::Project
        }
    }
}

/// Subcommands for `modforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective value of a key.
    Get {
        /// Dotted key path, e.g. `customVariables.team`.
        key: String,
    },
    /// Set a key in one layer and save that layer.
    Set {
        /// Dotted key path.
        key: String,
        /// New value. List keys accept `a, b, c`.
        value: String,
        #[command(flatten)]
        layer: LayerArgs,
    },
    /// Remove a key from one layer and save that layer.
    Unset {
        /// Dotted key path.
        key: String,
        #[command(flatten)]
        layer: LayerArgs,
    },
    /// Print every effective setting.
    List,
    /// Print the configuration file locations.
    Path,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `modforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    #[command(flatten)]
    pub layer: LayerArgs,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── templates ─────────────────────────────────────────────────────────────────

/// Arguments for `modforge templates`.
#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Print the source of one template instead of the list.
    #[arg(long = "show", value_name = "NAME", help = "Print one template's source")]
    pub show: Option<String>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `modforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to emit a completion script for.
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

// ── tests ─────────────────────────────────────────────────────────────────────
