//! Loader for /etc/pacman.conf: registers every repository section, following
//! `Include` directives.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::core::error::ConfigError;

/// Deepest include nesting that is still followed (the top-level file is depth 0)
pub const MAX_INCLUDE_DEPTH: usize = 5;

/// Signature verification level requested when registering a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigLevel {
    #[default]
    UseDefault,
}

/// Operations a registered repository may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DbUsage {
    #[default]
    All,
}

/// A repository section found while loading the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDescriptor {
    pub name: String,
    pub sig_level: SigLevel,
    pub usage: DbUsage,
    /// The file that declared the section
    pub declared_in: PathBuf,
}

/// Receiver of repository registrations.
///
/// Returning an error rejects the repository and aborts loading of the declaring file.
pub trait RepoRegistry {
    fn register(&mut self, repo: RepoDescriptor) -> Result<(), String>;
}

impl RepoRegistry for Vec<RepoDescriptor> {
    fn register(&mut self, repo: RepoDescriptor) -> Result<(), String> {
        if self.iter().any(|r| r.name == repo.name) {
            return Err("already registered".to_string());
        }
        self.push(repo);
        Ok(())
    }
}

/// Load `path` and every file it includes, registering repositories in declaration order.
///
/// Returns the names of the registered repositories.
#[instrument(skip(registry))]
pub fn load(path: &Path, registry: &mut dyn RepoRegistry) -> Result<Vec<String>, ConfigError> {
    let mut registered = Vec::new();
    load_file(path, 0, HashSet::new(), registry, &mut registered)?;
    Ok(registered)
}

/// Load one file at `depth`, returning the visited set extended with this file and its includes.
fn load_file(
    path: &Path,
    depth: usize,
    mut visited: HashSet<PathBuf>,
    registry: &mut dyn RepoRegistry,
    registered: &mut Vec<String>,
) -> Result<HashSet<PathBuf>, ConfigError> {
    let key = absolute(path);
    if visited.contains(&key) {
        debug!(path = %path.display(), "config file already loaded, skipping");
        return Ok(visited);
    }
    visited.insert(key);

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    for line in content.lines() {
        let line = line.split_once('#').map_or(line, |(head, _)| head).trim();
        if line.is_empty() {
            continue;
        }

        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            let section = line[1..line.len() - 1].trim();
            if section == "options" {
                continue;
            }

            let repo = RepoDescriptor {
                name: section.to_string(),
                sig_level: SigLevel::UseDefault,
                usage: DbUsage::All,
                declared_in: path.to_path_buf(),
            };
            registry
                .register(repo)
                .map_err(|reason| ConfigError::Register {
                    repo: section.to_string(),
                    path: path.to_path_buf(),
                    reason,
                })?;
            debug!(repo = section, "registered repository");
            registered.push(section.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() != "Include" {
            continue;
        }

        visited = load_include(value.trim(), path, depth, visited, registry, registered)?;
    }

    Ok(visited)
}

fn load_include(
    pattern: &str,
    parent: &Path,
    depth: usize,
    mut visited: HashSet<PathBuf>,
    registry: &mut dyn RepoRegistry,
    registered: &mut Vec<String>,
) -> Result<HashSet<PathBuf>, ConfigError> {
    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(e) => {
            warn!(pattern, parent = %parent.display(), "invalid Include pattern: {e}");
            return Ok(visited);
        }
    };

    let mut matched = false;
    for entry in paths {
        let included = match entry {
            Ok(included) => included,
            Err(e) => {
                warn!(pattern, "unreadable Include match: {e}");
                continue;
            }
        };
        matched = true;

        if depth + 1 > MAX_INCLUDE_DEPTH {
            warn!(
                path = %included.display(),
                max_depth = MAX_INCLUDE_DEPTH,
                "config include nesting too deep, skipping"
            );
            continue;
        }

        match load_file(&included, depth + 1, visited.clone(), registry, registered) {
            Ok(updated) => visited = updated,
            Err(ConfigError::Read { path, source }) => {
                warn!(path = %path.display(), "failed to read included config file: {source}");
                visited.insert(absolute(&path));
            }
            Err(e) => return Err(e),
        }
    }

    if !matched {
        debug!(pattern, "Include pattern matched no files");
    }

    Ok(visited)
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(repos: &[RepoDescriptor]) -> Vec<&str> {
        repos.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_sections_register_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let conf = dir.path().join("pacman.conf");
        fs::write(
            &conf,
            "[options]\nRootDir = /\nArchitecture = auto\n\n# [disabled]\n[core]\nSigLevel = Required\n\n  [extra]  \n\n[multilib]\n",
        )
        .unwrap();

        let mut repos = Vec::new();
        let loaded = load(&conf, &mut repos).unwrap();
        assert_eq!(loaded, vec!["core", "extra", "multilib"]);
        assert_eq!(names(&repos), vec!["core", "extra", "multilib"]);
        assert_eq!(repos[0].sig_level, SigLevel::UseDefault);
        assert_eq!(repos[0].declared_in, conf);
    }

    #[test]
    fn test_include_without_sections_registers_nothing_extra() {
        let dir = tempfile::tempdir().unwrap();
        let mirrorlist = dir.path().join("mirrorlist-extra");
        fs::write(&mirrorlist, "Server = https://mirror.example.org/$repo/os/$arch\n").unwrap();
        let conf = dir.path().join("pacman.conf");
        fs::write(
            &conf,
            format!("[core]\n[extra]\nInclude = {}\n", mirrorlist.display()),
        )
        .unwrap();

        let mut repos = Vec::new();
        load(&conf, &mut repos).unwrap();
        assert_eq!(names(&repos), vec!["core", "extra"]);
    }

    #[test]
    fn test_trailing_comments_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let extra = dir.path().join("extra.conf");
        fs::write(&extra, "[extra] # second\n").unwrap();
        let conf = dir.path().join("pacman.conf");
        fs::write(
            &conf,
            format!(
                "[options] # global\n[core] # main\nInclude = {} # more repos\n#[testing]\n",
                extra.display()
            ),
        )
        .unwrap();

        let mut repos = Vec::new();
        let loaded = load(&conf, &mut repos).unwrap();
        assert_eq!(loaded, vec!["core", "extra"]);
        assert_eq!(repos[1].declared_in, extra);
    }

    #[test]
    fn test_include_glob_registers_sections_from_included_files() {
        let dir = tempfile::tempdir().unwrap();
        let confd = dir.path().join("conf.d");
        fs::create_dir(&confd).unwrap();
        fs::write(confd.join("10-chaotic.conf"), "[chaotic-aur]\n").unwrap();
        fs::write(confd.join("20-custom.conf"), "[custom]\n").unwrap();
        let conf = dir.path().join("pacman.conf");
        fs::write(
            &conf,
            format!("[core]\n[options]\nInclude = {}/*.conf\n", confd.display()),
        )
        .unwrap();

        let mut repos = Vec::new();
        load(&conf, &mut repos).unwrap();
        assert_eq!(names(&repos), vec!["core", "chaotic-aur", "custom"]);
    }

    #[test]
    fn test_include_cycle_is_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.conf");
        let b = dir.path().join("b.conf");
        fs::write(&a, format!("[from-a]\nInclude = {}\n", b.display())).unwrap();
        fs::write(
            &b,
            format!("[from-b]\nInclude = {}\nInclude = {}\n", a.display(), b.display()),
        )
        .unwrap();

        let mut repos = Vec::new();
        load(&a, &mut repos).unwrap();
        assert_eq!(names(&repos), vec!["from-a", "from-b"]);
    }

    #[test]
    fn test_include_depth_is_limited() {
        let dir = tempfile::tempdir().unwrap();
        // level0 includes level1 ... level7
        for level in 0..8 {
            let next = dir.path().join(format!("level{}.conf", level + 1));
            fs::write(
                dir.path().join(format!("level{level}.conf")),
                format!("[repo{level}]\nInclude = {}\n", next.display()),
            )
            .unwrap();
        }

        let mut repos = Vec::new();
        let loaded = load(&dir.path().join("level0.conf"), &mut repos).unwrap();
        assert_eq!(
            loaded,
            vec!["repo0", "repo1", "repo2", "repo3", "repo4", "repo5"]
        );
    }

    #[test]
    fn test_missing_top_level_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut repos = Vec::new();
        let err = load(&dir.path().join("nope.conf"), &mut repos).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_rejected_registration_aborts_file() {
        let dir = tempfile::tempdir().unwrap();
        let conf = dir.path().join("pacman.conf");
        fs::write(&conf, "[core]\n[core]\n[extra]\n").unwrap();

        let mut repos = Vec::new();
        let err = load(&conf, &mut repos).unwrap_err();
        assert!(matches!(err, ConfigError::Register { ref repo, .. } if repo == "core"));
        assert_eq!(names(&repos), vec!["core"]);
    }

    #[test]
    fn test_rejection_in_include_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let inc = dir.path().join("inc.conf");
        fs::write(&inc, "[core]\n").unwrap();
        let conf = dir.path().join("pacman.conf");
        fs::write(&conf, format!("[core]\nInclude = {}\n[extra]\n", inc.display())).unwrap();

        let mut repos = Vec::new();
        let err = load(&conf, &mut repos).unwrap_err();
        assert!(matches!(err, ConfigError::Register { ref path, .. } if path == &inc));
        assert_eq!(names(&repos), vec!["core"]);
    }

    #[test]
    fn test_unmatched_include_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let conf = dir.path().join("pacman.conf");
        fs::write(
            &conf,
            format!(
                "[core]\nInclude = {}/missing-*.conf\nInclude = [\n[extra]\n",
                dir.path().display()
            ),
        )
        .unwrap();

        let mut repos = Vec::new();
        load(&conf, &mut repos).unwrap();
        assert_eq!(names(&repos), vec!["core", "extra"]);
    }
}
