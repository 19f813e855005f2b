//! Resolving dependency specifications to packages

use std::sync::Arc;

use tracing::trace;

use crate::core::catalog::Catalog;
use crate::core::depend::Depend;
use crate::db::repository::find_satisfier;
use crate::db::{Package, Repository};

/// Find the package that satisfies `spec`, preferring installed packages.
///
/// An installed satisfier is returned as its catalog entry so that callers see
/// the full repository metadata.
#[must_use]
pub fn satisfy(spec: &str, local: &Repository, catalog: &Catalog) -> Option<Arc<Package>> {
    let dep = Depend::parse(spec);

    if let Some(installed) = local.find_satisfier(&dep) {
        trace!(spec, package = %installed.name, "satisfied by installed package");
        return Some(
            catalog
                .find(&installed.name)
                .cloned()
                .unwrap_or_else(|| Arc::clone(installed)),
        );
    }

    find_satisfier(catalog.all(), &dep).cloned()
}

/// The entry of `source`'s optional dependencies that refers to `target`,
/// directly or through one of `target`'s provides.
#[must_use]
pub fn find_optdep_descriptor<'a>(target: &Package, source: &'a Package) -> Option<&'a Depend> {
    source.optdepends.iter().find(|optdep| {
        optdep.name == target.name || target.provides.iter().any(|p| p.name == optdep.name)
    })
}
