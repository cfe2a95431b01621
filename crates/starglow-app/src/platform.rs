//! Platform directory resolution.
//!
//! Resolves the OS-appropriate configuration and log directories (XDG on
//! Linux, Known Folders on Windows, Library on macOS).

use std::path::{Path, PathBuf};

/// Errors that can occur during platform directory operations.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    /// An I/O error occurred (e.g., directory creation failed).
    #[error("platform I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const APP_NAME: &str = "starglow";

/// OS-specific directory paths for the backdrop application.
pub struct PlatformDirs {
    /// User configuration: `config.ron`.
    pub config_dir: PathBuf,
    /// Log files (debug builds).
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve platform-specific directories without creating them on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        let app_dir = config_base.join(APP_NAME);

        Ok(Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        })
    }

    /// Resolve directories and create them on disk.
    pub fn resolve_and_create() -> Result<Self, PlatformError> {
        let dirs = Self::resolve()?;
        dirs.create_dirs()?;
        Ok(dirs)
    }

    /// Resolve directories rooted under a custom base path.
    ///
    /// Useful for testing and for the `--config` CLI override.
    pub fn resolve_with_root(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
            log_dir: root.join("logs"),
        }
    }

    /// Create the resolved directories on disk.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_dirs_resolve() {
        let Ok(dirs) = PlatformDirs::resolve() else {
            // Headless CI may lack an OS config dir; nothing to assert.
            return;
        };
        assert!(dirs.config_dir.is_absolute());
        assert!(dirs.log_dir.is_absolute());
        assert!(dirs.config_dir.ends_with("starglow/config"));
    }

    #[test]
    fn test_directory_creation_under_root() {
        let tmp = std::env::temp_dir().join("starglow-test-platform-dirs");
        let _ = std::fs::remove_dir_all(&tmp);

        let dirs = PlatformDirs::resolve_with_root(&tmp);
        dirs.create_dirs().expect("create_dirs failed for temp root");

        assert!(dirs.config_dir.exists());
        assert!(dirs.log_dir.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
