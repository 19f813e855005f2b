//! The browsing context handed to front ends
//!
//! [`Browser`] owns the repository set and the merged catalog. Everything a
//! front end asks about packages goes through it.

use std::sync::{Arc, OnceLock};

use tracing::{debug, instrument};

use crate::config::Settings;
use crate::core::catalog::Catalog;
use crate::core::classify::{self, InstallReason};
use crate::core::depend::Depend;
use crate::core::error::Result;
use crate::core::filter::{self, FilterNode, PackageFilter};
use crate::core::satisfy;
use crate::db::{Package, RepositorySet};

/// One visible line of the package list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRow {
    pub package: Arc<Package>,
    pub reason: InstallReason,
    pub foreign: bool,
}

#[derive(Debug)]
pub struct Browser {
    repos: RepositorySet,
    catalog: OnceLock<Catalog>,
}

impl Browser {
    /// Open the package database described by `settings`
    #[instrument(skip_all)]
    pub fn initialize(settings: &Settings) -> Result<Self> {
        Ok(Self::from_repositories(RepositorySet::initialize(settings)?))
    }

    #[must_use]
    pub fn from_repositories(repos: RepositorySet) -> Self {
        Self {
            repos,
            catalog: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn repositories(&self) -> &RepositorySet {
        &self.repos
    }

    /// The merged catalog, built on first access
    pub fn catalog(&self) -> Result<&Catalog> {
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog);
        }

        let sync = self.repos.sync_repositories()?;
        let local = self.repos.local()?;
        Ok(self.catalog.get_or_init(|| Catalog::build(sync, local)))
    }

    /// Every known package once, sorted by name
    pub fn all(&self) -> Result<&[Arc<Package>]> {
        Ok(self.catalog()?.all())
    }

    pub fn find(&self, name: &str) -> Result<Option<&Arc<Package>>> {
        Ok(self.catalog()?.find(name))
    }

    pub fn is_foreign(&self, pkg: &Package) -> Result<bool> {
        Ok(self.catalog()?.is_foreign(pkg))
    }

    pub fn classify(&self, pkg: &Package) -> Result<InstallReason> {
        Ok(classify::classify(pkg, self.repos.local()?))
    }

    /// Resolve a dependency specification such as `libfoo.so>=2`
    pub fn satisfy(&self, spec: &str) -> Result<Option<Arc<Package>>> {
        let catalog = self.catalog()?;
        Ok(satisfy::satisfy(spec, self.repos.local()?, catalog))
    }

    #[must_use]
    pub fn find_optdep_descriptor<'a>(&self, target: &Package, source: &'a Package) -> Option<&'a Depend> {
        satisfy::find_optdep_descriptor(target, source)
    }

    /// Installed packages that depend on `pkg`
    pub fn required_by(&self, pkg: &Package) -> Result<Vec<String>> {
        Ok(self.repos.local()?.required_by(pkg))
    }

    /// Installed packages that list `pkg` as an optional dependency
    pub fn optional_for(&self, pkg: &Package) -> Result<Vec<String>> {
        Ok(self.repos.local()?.optional_for(pkg))
    }

    pub fn filter_tree(&self) -> Result<Vec<FilterNode>> {
        Ok(filter::filter_tree(self.repos.sync_repositories()?))
    }

    /// Catalog rows visible under `filter`, in catalog order
    pub fn filtered(&self, filter: &PackageFilter) -> Result<Vec<PackageRow>> {
        let catalog = self.catalog()?;
        let local = self.repos.local()?;

        let rows: Vec<PackageRow> = catalog
            .all()
            .iter()
            .filter_map(|pkg| {
                let reason = classify::classify(pkg, local);
                let foreign = catalog.is_foreign(pkg);
                filter.matches(pkg, reason, foreign).then(|| PackageRow {
                    package: Arc::clone(pkg),
                    reason,
                    foreign,
                })
            })
            .collect();
        debug!(rows = rows.len(), "filtered package list");
        Ok(rows)
    }

    /// Drop the catalog, then release the repositories. Calling it again is a no-op.
    pub fn release(&mut self) -> Result<()> {
        self.catalog.take();
        self.repos.release()
    }
}
