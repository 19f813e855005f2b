//! Error types for the package database layer

use std::path::PathBuf;

use thiserror::Error;

/// Convenience Result type for database operations
pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Failures while reading pacman.conf and its includes.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read pacman config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register repository '{repo}' declared in {path}: {reason}")]
    Register {
        repo: String,
        path: PathBuf,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to initialize package database at {path}: {reason}")]
    Init { path: PathBuf, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Repository '{name}' rejected: {reason}")]
    Register { name: String, reason: String },

    #[error("Failed to load repository '{repo}': {source}")]
    Load {
        repo: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to release package database: {0}")]
    Release(String),

    #[error("Package database is not initialized")]
    NotInitialized,
}

impl DatabaseError {
    /// Get a helpful suggestion for how to fix this error
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Init { .. } => Some(
                "Check that the database path exists, or pass --dbpath / set PACFINDER_DB_PATH",
            ),
            Self::Config(ConfigError::Read { .. }) => {
                Some("Check the pacman config path, or pass --config / set PACFINDER_PACMAN_CONF")
            }
            Self::Config(ConfigError::Register { .. }) | Self::Register { .. } => {
                Some("Repository sections must be unique and must not be named 'local'")
            }
            Self::Load { .. } => Some("Try: sudo pacman -Sy to refresh the sync databases"),
            Self::Release(_) | Self::NotInitialized => None,
        }
    }
}

/// Format an error with its suggestion for display
pub fn format_error_with_suggestion(err: &DatabaseError) -> String {
    let mut msg = format!("Error: {err}");
    if let Some(suggestion) = err.suggestion() {
        msg.push_str("\n\n");
        msg.push_str(suggestion);
    }
    msg
}
