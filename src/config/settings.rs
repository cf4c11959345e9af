//! User settings for sie4i
//!
//! Defaults applied when writing record streams: checksum mode, line
//! terminator and the program identification stamped on models built from
//! JSON input.

use serde::{Deserialize, Serialize};

use super::paths::Sie4iPaths;
use crate::error::{Sie4iError, Sie4iResult};

/// Line terminator used when joining written lines into bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n`, the customary terminator for the format
    #[default]
    Crlf,
    /// `\n`
    Lf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf => "\n",
        }
    }
}

/// User settings for sie4i
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Write a `#KSUMMA` checksum unless told otherwise
    #[serde(default)]
    pub write_checksum: bool,

    #[serde(default)]
    pub line_ending: LineEnding,

    /// Program name used when input lacks one
    #[serde(default = "default_program_name")]
    pub program_name: String,

    /// Program version used when input lacks one
    #[serde(default = "default_program_version")]
    pub program_version: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_program_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_program_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            write_checksum: false,
            line_ending: LineEnding::default(),
            program_name: default_program_name(),
            program_version: default_program_version(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &Sie4iPaths) -> Sie4iResult<Self> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)?;
            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                Sie4iError::Config(format!("Failed to parse settings file: {}", e))
            })?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &Sie4iPaths) -> Sie4iResult<()> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Sie4iError::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(paths.settings_file(), contents)?;

        Ok(())
    }
}
