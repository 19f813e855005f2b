//! Install-reason classification

use std::fmt;

use serde::Serialize;

use crate::db::{Package, PackageReason, Repository};

/// Why a package is (or is not) on the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallReason {
    NotInstalled,
    Explicit,
    /// Installed as a dependency and still required
    Dependency,
    /// Installed as a dependency, only optionally wanted by installed packages
    Optional,
    /// Installed as a dependency, wanted by nothing
    Orphan,
}

impl InstallReason {
    #[must_use]
    pub const fn is_installed(self) -> bool {
        !matches!(self, Self::NotInstalled)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotInstalled => "not installed",
            Self::Explicit => "explicit",
            Self::Dependency => "dependency",
            Self::Optional => "optional",
            Self::Orphan => "orphan",
        }
    }
}

impl fmt::Display for InstallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify `pkg` against the current local repository.
///
/// Computed from scratch on every call.
#[must_use]
pub fn classify(pkg: &Package, local: &Repository) -> InstallReason {
    let Some(installed) = local.get(&pkg.name) else {
        return InstallReason::NotInstalled;
    };

    match installed.reason {
        Some(PackageReason::Depend) => {}
        Some(PackageReason::Explicit) | None => return InstallReason::Explicit,
    }

    if !local.required_by(installed).is_empty() {
        InstallReason::Dependency
    } else if !local.optional_for(installed).is_empty() {
        InstallReason::Optional
    } else {
        InstallReason::Orphan
    }
}
