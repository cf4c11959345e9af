//! Path management for sie4i
//!
//! Provides XDG-compliant path resolution for the settings file.
//!
//! ## Path Resolution Order
//!
//! 1. `SIE4I_CONFIG_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/sie4i` or `~/.config/sie4i`
//! 3. Windows: `%APPDATA%\sie4i`

use std::path::{Path, PathBuf};

use crate::error::{Sie4iError, Sie4iResult};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "SIE4I_CONFIG_DIR";

const APP_DIR: &str = "sie4i";

/// Manages the paths used by sie4i
#[derive(Debug, Clone)]
pub struct Sie4iPaths {
    base_dir: PathBuf,
}

impl Sie4iPaths {
    /// Resolve the configuration directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application data directory can be determined.
    pub fn new() -> Sie4iResult<Self> {
        let base_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create Sie4iPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the configuration directory exists
    pub fn ensure_directories(&self) -> Sie4iResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Sie4iResult<PathBuf> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                Sie4iError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR))
}

#[cfg(windows)]
fn resolve_default_path() -> Sie4iResult<PathBuf> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| Sie4iError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Sie4iPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(CONFIG_DIR_ENV, custom_path);
        let paths = Sie4iPaths::new().unwrap();
        env::remove_var(CONFIG_DIR_ENV);

        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Sie4iPaths::with_base_dir(temp_dir.path().join("nested").join("sie4i"));

        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().exists());
    }
}
