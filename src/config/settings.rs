//! PacFinder Settings and Configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::paths;

/// Where the package database and pacman configuration live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Filesystem root the packages are installed into
    pub root_dir: PathBuf,

    /// Pacman database directory (contains `local/` and `sync/`)
    pub db_path: PathBuf,

    /// Pacman configuration file listing the sync repositories
    pub pacman_conf: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_dir: paths::pacman_root(),
            db_path: paths::pacman_db_dir(),
            pacman_conf: paths::pacman_conf_path(),
        }
    }
}

impl Settings {
    /// Load settings from config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file; missing keys take their defaults
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Get the config file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        paths::config_dir().join("config.toml")
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(
        mut self,
        root_dir: Option<PathBuf>,
        db_path: Option<PathBuf>,
        pacman_conf: Option<PathBuf>,
    ) -> Self {
        if let Some(root_dir) = root_dir {
            self.root_dir = root_dir;
        }
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        if let Some(pacman_conf) = pacman_conf {
            self.pacman_conf = pacman_conf;
        }
        self
    }
}
