//! Package records as read from a repository

use jiff::Timestamp;
use serde::Serialize;

use crate::core::depend::Depend;

/// Name of the local (installed) repository
pub const LOCAL_REPO: &str = "local";

/// Install reason recorded in the local database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageReason {
    Explicit,
    Depend,
}

/// A package from one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub description: String,
    pub url: Option<String>,
    pub arch: String,
    pub packager: Option<String>,
    /// Owning repository name (`local` for installed packages)
    pub repo: String,
    pub download_size: u64,
    pub installed_size: u64,
    pub build_date: Option<Timestamp>,
    pub install_date: Option<Timestamp>,
    pub licenses: Vec<String>,
    pub groups: Vec<String>,
    pub depends: Vec<Depend>,
    pub optdepends: Vec<Depend>,
    pub provides: Vec<Depend>,
    pub conflicts: Vec<Depend>,
    pub replaces: Vec<Depend>,
    /// Only set for packages from the local repository
    pub reason: Option<PackageReason>,
}

impl Package {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        self.repo == LOCAL_REPO
    }

    #[must_use]
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = repo.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: PackageReason) -> Self {
        self.reason = Some(reason);
        self
    }

    #[must_use]
    pub fn with_groups(mut self, groups: &[&str]) -> Self {
        self.groups = groups.iter().map(|g| (*g).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_depends(mut self, specs: &[&str]) -> Self {
        self.depends = specs.iter().map(|s| Depend::parse(s)).collect();
        self
    }

    #[must_use]
    pub fn with_optdepends(mut self, specs: &[&str]) -> Self {
        self.optdepends = specs.iter().map(|s| Depend::parse(s)).collect();
        self
    }

    #[must_use]
    pub fn with_provides(mut self, specs: &[&str]) -> Self {
        self.provides = specs.iter().map(|s| Depend::parse(s)).collect();
        self
    }
}
