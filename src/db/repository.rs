//! A named package repository and its caches

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::warn;

use crate::core::depend::Depend;
use crate::db::package::{LOCAL_REPO, Package};

/// Packages of one repository, in load order, with unique names
#[derive(Debug, Default)]
pub struct Repository {
    name: String,
    packages: Vec<Arc<Package>>,
    index: HashMap<String, usize>,
}

impl Repository {
    /// Build a repository from loaded packages. Later duplicates of a name are dropped.
    pub fn new(name: impl Into<String>, packages: impl IntoIterator<Item = Package>) -> Self {
        let name = name.into();
        let mut repo = Self {
            name,
            packages: Vec::new(),
            index: HashMap::new(),
        };

        for mut pkg in packages {
            if repo.index.contains_key(&pkg.name) {
                warn!(repo = %repo.name, package = %pkg.name, "duplicate package entry ignored");
                continue;
            }
            pkg.repo.clone_from(&repo.name);
            repo.index.insert(pkg.name.clone(), repo.packages.len());
            repo.packages.push(Arc::new(pkg));
        }

        repo
    }

    /// An empty repository, used when a database could not be read
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, std::iter::empty())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        self.name == LOCAL_REPO
    }

    /// The package cache, in load order
    #[must_use]
    pub fn packages(&self) -> &[Arc<Package>] {
        &self.packages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Package>> {
        self.index.get(name).map(|&idx| &self.packages[idx])
    }

    /// Group cache: group name to member packages, groups sorted by name
    #[must_use]
    pub fn groups(&self) -> BTreeMap<&str, Vec<&Arc<Package>>> {
        let mut groups: BTreeMap<&str, Vec<&Arc<Package>>> = BTreeMap::new();
        for pkg in &self.packages {
            for group in &pkg.groups {
                groups.entry(group.as_str()).or_default().push(pkg);
            }
        }
        groups
    }

    /// First package satisfying `dep`: literal name matches win over provides.
    #[must_use]
    pub fn find_satisfier(&self, dep: &Depend) -> Option<&Arc<Package>> {
        find_satisfier(&self.packages, dep)
    }

    /// Names of packages in this repository that depend on `target`
    #[must_use]
    pub fn required_by(&self, target: &Package) -> Vec<String> {
        self.reverse_scan(target, |pkg| pkg.depends.as_slice())
    }

    /// Names of packages in this repository that list `target` as an optional dependency
    #[must_use]
    pub fn optional_for(&self, target: &Package) -> Vec<String> {
        self.reverse_scan(target, |pkg| pkg.optdepends.as_slice())
    }

    fn reverse_scan<F>(&self, target: &Package, relation: F) -> Vec<String>
    where
        F: Fn(&Package) -> &[Depend],
    {
        let mut names: Vec<String> = self
            .packages
            .iter()
            .filter(|pkg| relation(pkg.as_ref()).iter().any(|dep| dep.satisfied_by(target)))
            .map(|pkg| pkg.name.clone())
            .collect();
        names.sort();
        names
    }
}

/// Two-pass satisfier search over a package list: names first, then provides.
pub(crate) fn find_satisfier<'a>(
    packages: &'a [Arc<Package>],
    dep: &Depend,
) -> Option<&'a Arc<Package>> {
    packages
        .iter()
        .find(|pkg| dep.satisfied_by_name(pkg))
        .or_else(|| packages.iter().find(|pkg| dep.satisfied_by_provides(pkg)))
}
