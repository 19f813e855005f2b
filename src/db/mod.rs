//! Package database access: sources, repositories and the registered repository set

mod memory;
mod package;
mod pacman_db;
mod repo_set;
pub(crate) mod repository;
mod source;

pub use memory::MemorySource;
pub use package::{LOCAL_REPO, Package, PackageReason};
pub use pacman_db::{PacmanDb, parse_local_db, parse_sync_db};
pub use repo_set::RepositorySet;
pub use repository::Repository;
pub use source::PackageSource;
