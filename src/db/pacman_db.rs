//! Pure Rust reader for the pacman database
//!
//! Reads `<dbpath>/sync/<repo>.db` (tar archive, gzip or zstd compressed, or
//! uncompressed) and the `<dbpath>/local/<pkg>-<ver>/desc` tree without libalpm.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use jiff::Timestamp;
use tracing::{debug, instrument};

use crate::core::depend::Depend;
use crate::core::error::DatabaseError;
use crate::db::package::{LOCAL_REPO, Package, PackageReason};
use crate::db::source::PackageSource;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// On-disk pacman database opened at a root and database path
#[derive(Debug, Clone)]
pub struct PacmanDb {
    db_path: PathBuf,
}

impl PacmanDb {
    /// Open the database. Fails when the database directory does not exist.
    pub fn open(root: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let root = root.into();
        let db_path = db_path.into();

        if !root.is_dir() {
            return Err(DatabaseError::Init {
                path: root,
                reason: "root directory does not exist".to_string(),
            });
        }
        if !db_path.is_dir() {
            return Err(DatabaseError::Init {
                path: db_path,
                reason: "database directory does not exist".to_string(),
            });
        }

        debug!(root = %root.display(), db_path = %db_path.display(), "opened pacman database");
        Ok(Self { db_path })
    }

    #[must_use]
    pub fn local_dir(&self) -> PathBuf {
        self.db_path.join(LOCAL_REPO)
    }

    #[must_use]
    pub fn sync_db_file(&self, repo: &str) -> PathBuf {
        self.db_path.join("sync").join(format!("{repo}.db"))
    }
}

impl PackageSource for PacmanDb {
    fn name(&self) -> &'static str {
        "pacman-db"
    }

    fn local_packages(&self) -> Result<Vec<Package>> {
        parse_local_db(&self.local_dir())
    }

    fn sync_packages(&self, repo: &str) -> Result<Vec<Package>> {
        parse_sync_db(&self.sync_db_file(repo), repo)
    }
}

/// Parse a sync database archive into packages, in archive order
#[instrument(skip_all, fields(repo = repo_name))]
pub fn parse_sync_db(path: &Path, repo_name: &str) -> Result<Vec<Package>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    {
        let head = reader.fill_buf()?;
        let n = head.len().min(magic.len());
        magic[..n].copy_from_slice(&head[..n]);
    }

    let decoded: Box<dyn Read> = if magic[..2] == GZIP_MAGIC {
        Box::new(GzDecoder::new(reader))
    } else if magic == ZSTD_MAGIC {
        Box::new(
            ruzstd::decoding::StreamingDecoder::new(reader)
                .map_err(|e| anyhow::anyhow!("zstd: {e}"))?,
        )
    } else {
        Box::new(reader)
    };

    let mut archive = tar::Archive::new(decoded);
    let mut packages: Vec<Package> = Vec::new();
    let mut by_dir: HashMap<String, usize> = HashMap::new();

    for entry in archive
        .entries()
        .with_context(|| format!("Failed to read {}", path.display()))?
    {
        let mut entry = entry?;
        let entry_path = entry.path()?.to_string_lossy().into_owned();

        // desc and the legacy split-out depends file carry metadata
        let Some((dir, file_name)) = entry_path.trim_end_matches('/').split_once('/') else {
            continue;
        };
        if file_name != "desc" && file_name != "depends" {
            continue;
        }

        let mut content = String::new();
        entry.read_to_string(&mut content)?;

        let idx = *by_dir.entry(dir.to_string()).or_insert_with(|| {
            packages.push(Package::default());
            packages.len() - 1
        });
        apply_desc(&mut packages[idx], &content);
    }

    let packages: Vec<Package> = packages
        .into_iter()
        .filter(|pkg| !pkg.name.is_empty())
        .map(|pkg| pkg.with_repo(repo_name))
        .collect();

    debug!(count = packages.len(), "parsed sync database");
    Ok(packages)
}

/// Parse the local package database directory.
///
/// A missing directory is an empty database. Entries are returned sorted by
/// directory name.
#[instrument(skip_all)]
pub fn parse_local_db(path: &Path) -> Result<Vec<Package>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut dirs: Vec<PathBuf> = fs::read_dir(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    let mut packages = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let desc_path = dir.join("desc");
        if !desc_path.exists() {
            continue;
        }

        let mut pkg = Package::default();
        let content = fs::read_to_string(&desc_path)
            .with_context(|| format!("Failed to read {}", desc_path.display()))?;
        apply_desc(&mut pkg, &content);

        let depends_path = dir.join("depends");
        if depends_path.exists() {
            let content = fs::read_to_string(&depends_path)
                .with_context(|| format!("Failed to read {}", depends_path.display()))?;
            apply_desc(&mut pkg, &content);
        }

        if pkg.name.is_empty() {
            continue;
        }
        pkg.repo = LOCAL_REPO.to_string();
        pkg.reason.get_or_insert(PackageReason::Explicit);
        packages.push(pkg);
    }

    debug!(count = packages.len(), "parsed local database");
    Ok(packages)
}

/// Apply the `%FIELD%` blocks of a desc/depends file to `pkg`
fn apply_desc(pkg: &mut Package, content: &str) {
    let mut current_field: Option<&str> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.len() > 1 && line.starts_with('%') && line.ends_with('%') {
            current_field = Some(&line[1..line.len() - 1]);
            continue;
        }

        if line.is_empty() {
            current_field = None;
            continue;
        }

        match current_field {
            Some("NAME") => pkg.name = line.to_string(),
            Some("VERSION") => pkg.version = line.to_string(),
            Some("DESC") => pkg.description = line.to_string(),
            Some("URL") => pkg.url = Some(line.to_string()),
            Some("ARCH") => pkg.arch = line.to_string(),
            Some("PACKAGER") => pkg.packager = Some(line.to_string()),
            Some("CSIZE") => pkg.download_size = line.parse().unwrap_or(0),
            // local databases record the installed size as SIZE
            Some("ISIZE" | "SIZE") => pkg.installed_size = line.parse().unwrap_or(0),
            Some("BUILDDATE") => pkg.build_date = parse_timestamp(line),
            Some("INSTALLDATE") => pkg.install_date = parse_timestamp(line),
            Some("REASON") => {
                pkg.reason = Some(if line == "1" {
                    PackageReason::Depend
                } else {
                    PackageReason::Explicit
                });
            }
            Some("LICENSE") => pkg.licenses.push(line.to_string()),
            Some("GROUPS") => pkg.groups.push(line.to_string()),
            Some("DEPENDS") => pkg.depends.push(Depend::parse(line)),
            Some("OPTDEPENDS") => pkg.optdepends.push(Depend::parse(line)),
            Some("PROVIDES") => pkg.provides.push(Depend::parse(line)),
            Some("CONFLICTS") => pkg.conflicts.push(Depend::parse(line)),
            Some("REPLACES") => pkg.replaces.push(Depend::parse(line)),
            _ => {}
        }
    }
}

fn parse_timestamp(value: &str) -> Option<Timestamp> {
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| Timestamp::from_second(secs).ok())
}
