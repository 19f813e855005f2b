//! Package source trait: where repository contents come from

use anyhow::Result;

use crate::db::package::Package;

/// Backend that produces repository package lists.
///
/// A source is opened once, read through `local_packages` / `sync_packages`,
/// and closed exactly once.
pub trait PackageSource {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Packages of the local (installed) database
    fn local_packages(&self) -> Result<Vec<Package>>;

    /// Packages of the sync database `repo`
    fn sync_packages(&self, repo: &str) -> Result<Vec<Package>>;

    /// Release backend resources
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
