//! Core module - catalog, classification, dependency resolution and shared types

pub mod browser;
pub mod catalog;
pub mod classify;
pub mod depend;
pub mod error;
pub mod filter;
pub mod pacman_conf;
pub mod paths;
pub mod satisfy;
pub mod util;

pub use browser::{Browser, PackageRow};
pub use catalog::Catalog;
pub use classify::InstallReason;
pub use depend::{DepMod, Depend, vercmp};
pub use error::{ConfigError, DatabaseError, Result, format_error_with_suggestion};
