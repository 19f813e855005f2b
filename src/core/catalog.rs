//! The merged package catalog across all repositories

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::db::{Package, Repository};

/// Every known package once, sorted by name.
///
/// Sync repository entries take precedence; installed packages found in no sync
/// repository are included from the local repository and marked foreign.
#[derive(Debug, Default)]
pub struct Catalog {
    packages: Vec<Arc<Package>>,
    foreign: HashSet<String>,
}

impl Catalog {
    /// Merge `sync` (in registration order) with the local repository
    #[instrument(skip_all)]
    pub fn build(sync: &[Repository], local: &Repository) -> Self {
        let mut packages: Vec<Arc<Package>> = sync
            .iter()
            .flat_map(|repo| repo.packages().iter().cloned())
            .collect();

        let sync_names: HashSet<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        let foreign_pkgs: Vec<Arc<Package>> = local
            .packages()
            .iter()
            .filter(|pkg| !sync_names.contains(pkg.name.as_str()))
            .cloned()
            .collect();
        drop(sync_names);

        let foreign: HashSet<String> = foreign_pkgs.iter().map(|p| p.name.clone()).collect();
        packages.extend(foreign_pkgs);

        // stable: the earliest registered repository keeps a duplicated name
        packages.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        packages.dedup_by(|later, earlier| later.name == earlier.name);

        debug!(
            packages = packages.len(),
            foreign = foreign.len(),
            "catalog built"
        );
        Self { packages, foreign }
    }

    /// All packages, sorted by name
    #[must_use]
    pub fn all(&self) -> &[Arc<Package>] {
        &self.packages
    }

    /// Look up the catalog entry for `name`
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Arc<Package>> {
        self.packages
            .binary_search_by(|pkg| pkg.name.as_bytes().cmp(name.as_bytes()))
            .ok()
            .map(|idx| &self.packages[idx])
    }

    /// Installed but present in no sync repository
    #[must_use]
    pub fn is_foreign(&self, pkg: &Package) -> bool {
        self.foreign.contains(&pkg.name)
    }

    /// Names of all foreign packages
    #[must_use]
    pub fn foreign(&self) -> &HashSet<String> {
        &self.foreign
    }
}
