//! The opened package database: local repository plus registered sync repositories

use std::sync::OnceLock;

use tracing::{debug, info, instrument, warn};

use crate::config::Settings;
use crate::core::error::{DatabaseError, Result};
use crate::core::pacman_conf::{self, RepoDescriptor, RepoRegistry};
use crate::db::package::LOCAL_REPO;
use crate::db::pacman_db::PacmanDb;
use crate::db::repository::Repository;
use crate::db::source::PackageSource;

/// Sync repository registrations and lazily loaded repository caches
pub struct RepositorySet {
    source: Option<Box<dyn PackageSource>>,
    registered: Vec<RepoDescriptor>,
    local: OnceLock<Repository>,
    sync: OnceLock<Vec<Repository>>,
}

impl std::fmt::Debug for RepositorySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositorySet")
            .field("source", &self.source.as_ref().map(|s| s.name()))
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}

impl RepositorySet {
    /// Open the on-disk database and register the repositories from pacman.conf
    #[instrument(skip_all)]
    pub fn initialize(settings: &Settings) -> Result<Self> {
        let db = PacmanDb::open(&settings.root_dir, &settings.db_path)?;
        let mut set = Self::with_source(Box::new(db));
        pacman_conf::load(&settings.pacman_conf, &mut set)?;
        info!(repos = set.registered.len(), "package database initialized");
        Ok(set)
    }

    /// A set over an already opened source with no repositories registered
    #[must_use]
    pub fn with_source(source: Box<dyn PackageSource>) -> Self {
        Self {
            source: Some(source),
            registered: Vec::new(),
            local: OnceLock::new(),
            sync: OnceLock::new(),
        }
    }

    /// Register a sync repository by name
    pub fn register_sync(&mut self, name: &str) -> Result<()> {
        self.register(RepoDescriptor {
            name: name.to_string(),
            sig_level: pacman_conf::SigLevel::UseDefault,
            usage: pacman_conf::DbUsage::All,
            declared_in: std::path::PathBuf::new(),
        })
        .map_err(|reason| DatabaseError::Register {
            name: name.to_string(),
            reason,
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Registered repositories in registration order
    #[must_use]
    pub fn registered(&self) -> &[RepoDescriptor] {
        &self.registered
    }

    fn source(&self) -> Result<&dyn PackageSource> {
        self.source.as_deref().ok_or(DatabaseError::NotInitialized)
    }

    /// The local repository, loaded on first access
    pub fn local(&self) -> Result<&Repository> {
        if let Some(local) = self.local.get() {
            return Ok(local);
        }

        let source = self.source()?;
        let packages = source
            .local_packages()
            .map_err(|source| DatabaseError::Load {
                repo: LOCAL_REPO.to_string(),
                source,
            })?;
        debug!(count = packages.len(), "loaded local repository");
        Ok(self.local.get_or_init(|| Repository::new(LOCAL_REPO, packages)))
    }

    /// Registered sync repositories in registration order, loaded on first access.
    ///
    /// A repository whose database cannot be read is empty.
    pub fn sync_repositories(&self) -> Result<&[Repository]> {
        if let Some(sync) = self.sync.get() {
            return Ok(sync);
        }

        let source = self.source()?;
        let repos: Vec<Repository> = self
            .registered
            .iter()
            .map(|desc| match source.sync_packages(&desc.name) {
                Ok(packages) => Repository::new(desc.name.clone(), packages),
                Err(e) => {
                    warn!(repo = %desc.name, "could not load sync database: {e:#}");
                    Repository::empty(desc.name.clone())
                }
            })
            .collect();
        Ok(self.sync.get_or_init(|| repos))
    }

    /// Drop the caches and close the source. Calling it again is a no-op.
    pub fn release(&mut self) -> Result<()> {
        self.sync.take();
        self.local.take();

        let Some(mut source) = self.source.take() else {
            return Ok(());
        };
        source
            .close()
            .map_err(|e| DatabaseError::Release(format!("{e:#}")))?;
        debug!(backend = source.name(), "package database released");
        Ok(())
    }
}

impl RepoRegistry for RepositorySet {
    fn register(&mut self, repo: RepoDescriptor) -> std::result::Result<(), String> {
        if self.source.is_none() {
            return Err("database is not open".to_string());
        }
        if repo.name.is_empty() {
            return Err("empty repository name".to_string());
        }
        if repo.name == LOCAL_REPO {
            return Err("'local' is reserved for the installed package database".to_string());
        }
        if repo.name.contains('/') {
            return Err("repository names may not contain '/'".to_string());
        }
        if self.registered.iter().any(|r| r.name == repo.name) {
            return Err("already registered".to_string());
        }
        if self.sync.get().is_some() {
            return Err("sync repositories already loaded".to_string());
        }

        self.registered.push(repo);
        Ok(())
    }
}
