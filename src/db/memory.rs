//! In-memory package source for tests and fixtures

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};

use crate::db::package::{LOCAL_REPO, Package, PackageReason};
use crate::db::source::PackageSource;

/// Package source backed by plain vectors
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    local: Vec<Package>,
    sync: HashMap<String, Vec<Package>>,
    closes: Arc<AtomicUsize>,
    fail_close: bool,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an installed package
    #[must_use]
    pub fn with_local(mut self, pkg: Package) -> Self {
        self.add_local(pkg);
        self
    }

    /// Add a package to sync repository `repo`
    #[must_use]
    pub fn with_sync(mut self, repo: &str, pkg: Package) -> Self {
        self.add_sync(repo, pkg);
        self
    }

    /// Make `close` report a failure
    #[must_use]
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn add_local(&mut self, mut pkg: Package) {
        pkg.repo = LOCAL_REPO.to_string();
        if pkg.reason.is_none() {
            pkg.reason = Some(PackageReason::Explicit);
        }
        self.local.push(pkg);
    }

    pub fn add_sync(&mut self, repo: &str, mut pkg: Package) {
        pkg.repo = repo.to_string();
        self.sync.entry(repo.to_string()).or_default().push(pkg);
    }

    /// Shared count of `close` calls, readable after the source is boxed
    #[must_use]
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl PackageSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn local_packages(&self) -> Result<Vec<Package>> {
        Ok(self.local.clone())
    }

    fn sync_packages(&self, repo: &str) -> Result<Vec<Package>> {
        match self.sync.get(repo) {
            Some(pkgs) => Ok(pkgs.clone()),
            None => bail!("no database file for repository '{repo}'"),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            bail!("handle still in use");
        }
        Ok(())
    }
}
