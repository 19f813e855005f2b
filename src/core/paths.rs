//! Shared filesystem paths with test-friendly overrides.

use std::path::PathBuf;

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var).map(PathBuf::from)
}

fn fallback_home_dir() -> PathBuf {
    home::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Config directory (default: XDG config dir or ~/.config/pacfinder).
#[must_use]
pub fn config_dir() -> PathBuf {
    env_path("PACFINDER_CONFIG_DIR").unwrap_or_else(|| {
        dirs::config_dir()
            .map(|d| d.join("pacfinder"))
            .unwrap_or_else(|| fallback_home_dir().join(".config/pacfinder"))
    })
}

/// Pacman root directory (default: /).
#[must_use]
pub fn pacman_root() -> PathBuf {
    env_path("PACFINDER_ROOT").unwrap_or_else(|| PathBuf::from("/"))
}

/// Pacman database directory (default: /var/lib/pacman).
#[must_use]
pub fn pacman_db_dir() -> PathBuf {
    env_path("PACFINDER_DB_PATH").unwrap_or_else(|| pacman_root().join("var/lib/pacman"))
}

/// Pacman configuration file (default: /etc/pacman.conf).
#[must_use]
pub fn pacman_conf_path() -> PathBuf {
    env_path("PACFINDER_PACMAN_CONF").unwrap_or_else(|| PathBuf::from("/etc/pacman.conf"))
}
