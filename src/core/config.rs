//! Copy subsystem configuration.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Settings for saved copies, stored as JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    /// Root directory holding one sub-directory per player.
    pub save_root: PathBuf,
    /// Maximum number of saved copies per player.
    pub max_saved_copies: usize,
    /// Maximum length of a saved copy name.
    pub max_name_length: usize,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            save_root: PathBuf::from("extra/savecopy"),
            max_saved_copies: 15,
            max_name_length: 64,
        }
    }
}

impl CopyConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load_sync(path: &Path) -> Result<Self, io::Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save to a JSON file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<(), io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)
    }
}
