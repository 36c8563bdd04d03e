//! Package toolchain adapters.

use std::{
    path::Path,
    process::{Command, Stdio},
};

use modforge_core::{
    application::{ApplicationError, ports::PackageToolchain},
    error::ModforgeResult,
};
use tracing::{debug, info, instrument};

/// Runs `swift package resolve` inside the generated package.
#[derive(Debug, Clone)]
pub struct SwiftToolchain {
    program: String,
}

impl SwiftToolchain {
    pub fn new() -> Self {
        Self::with_program("swift")
    }

    /// Use a different executable, e.g. an absolute path to `swift`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SwiftToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageToolchain for SwiftToolchain {
    #[instrument(skip(self), fields(program = %self.program, package = %package_path.display()))]
    fn resolve(&self, package_path: &Path) -> ModforgeResult<()> {
        let failed = |reason: String| ApplicationError::ToolchainFailed {
            path: package_path.to_path_buf(),
            reason,
        };

        debug!("running package resolve");
        let output = Command::new(&self.program)
            .args(["package", "resolve"])
            .current_dir(package_path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| failed(format!("could not run '{}': {e}", self.program)))?;

        if output.status.success() {
            info!("package dependencies resolved");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match stderr.trim() {
            "" => format!("'{} package resolve' exited with {}", self.program, output.status),
            message => message.to_string(),
        };
        Err(failed(reason).into())
    }
}

/// Toolchain that does nothing. Used when resolution is disabled or in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopToolchain;

impl PackageToolchain for NoopToolchain {
    fn resolve(&self, package_path: &Path) -> ModforgeResult<()> {
        debug!(package = %package_path.display(), "skipping package resolve");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_program_is_a_toolchain_failure() {
        let dir = TempDir::new().unwrap();
        let toolchain = SwiftToolchain::with_program("modforge-no-such-swift-binary");

        let err = toolchain.resolve(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Package resolution failed"));
        assert!(err.to_string().contains("modforge-no-such-swift-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_toolchain_failure() {
        let dir = TempDir::new().unwrap();
        // `false` ignores its arguments and exits 1.
        let err = SwiftToolchain::with_program("false")
            .resolve(dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let dir = TempDir::new().unwrap();
        SwiftToolchain::with_program("true").resolve(dir.path()).unwrap();
    }

    #[test]
    fn noop_always_succeeds() {
        NoopToolchain.resolve(Path::new("/nowhere")).unwrap();
    }
}
