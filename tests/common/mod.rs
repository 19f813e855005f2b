//! PacFinder test infrastructure
//!
//! Builds throwaway pacman installations on disk: a root with a
//! `var/lib/pacman` database (gzip'd sync archives and a local tree) and an
//! `etc/pacman.conf`.

#![allow(dead_code)] // Test utilities may not all be used in every test file

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use pacfinder_lib::config::Settings;

/// Package description in the `%FIELD%` format of pacman's `desc` files
#[derive(Debug, Clone, Default)]
pub struct Desc {
    pub name: String,
    pub version: String,
    fields: Vec<(&'static str, Vec<String>)>,
}

impl Desc {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, key: &'static str, values: &[&str]) -> Self {
        self.fields
            .push((key, values.iter().map(ToString::to_string).collect()));
        self
    }

    pub fn desc(self, text: &str) -> Self {
        self.field("DESC", &[text])
    }

    pub fn depends(self, deps: &[&str]) -> Self {
        self.field("DEPENDS", deps)
    }

    pub fn optdepends(self, deps: &[&str]) -> Self {
        self.field("OPTDEPENDS", deps)
    }

    pub fn provides(self, provides: &[&str]) -> Self {
        self.field("PROVIDES", provides)
    }

    pub fn groups(self, groups: &[&str]) -> Self {
        self.field("GROUPS", groups)
    }

    /// Mark a local package as installed as a dependency
    pub fn as_dependency(self) -> Self {
        self.field("REASON", &["1"])
    }

    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    pub fn render(&self) -> String {
        let mut out = format!("%NAME%\n{}\n\n%VERSION%\n{}\n\n", self.name, self.version);
        for (key, values) in &self.fields {
            out.push_str(&format!("%{key}%\n"));
            for value in values {
                out.push_str(value);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

/// A pacman installation under a temporary directory
pub struct TestSystem {
    dir: TempDir,
}

impl TestSystem {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("var/lib/pacman/local")).unwrap();
        fs::create_dir_all(dir.path().join("var/lib/pacman/sync")).unwrap();
        fs::create_dir_all(dir.path().join("etc/pacman.d")).unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.root().join("var/lib/pacman")
    }

    pub fn conf_path(&self) -> PathBuf {
        self.root().join("etc/pacman.conf")
    }

    /// Directory used as `PACFINDER_CONFIG_DIR` so user settings never leak in
    pub fn config_dir(&self) -> PathBuf {
        self.root().join("config")
    }

    /// Write a file relative to the root
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn pacman_conf(&self, content: &str) -> &Self {
        fs::write(self.conf_path(), content).unwrap();
        self
    }

    /// Write `sync/<repo>.db` as a gzip'd tar archive
    pub fn sync_db(&self, repo: &str, packages: &[Desc]) -> &Self {
        let path = self.db_path().join("sync").join(format!("{repo}.db"));
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for pkg in packages {
            let content = pkg.render();
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(
                    &mut header,
                    format!("{}/desc", pkg.dir_name()),
                    content.as_bytes(),
                )
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
        self
    }

    /// Record `pkg` as installed in the local database
    pub fn install(&self, pkg: &Desc) -> &Self {
        let dir = self.db_path().join("local").join(pkg.dir_name());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("desc"), pkg.render()).unwrap();
        self
    }

    pub fn settings(&self) -> Settings {
        Settings {
            root_dir: self.root().to_path_buf(),
            db_path: self.db_path(),
            pacman_conf: self.conf_path(),
        }
    }

    /// The CLI binary pointed at this installation
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("pacfinder").unwrap();
        cmd.env("NO_COLOR", "1")
            .env("PACFINDER_UNICODE", "0")
            .env("PACFINDER_CONFIG_DIR", self.config_dir())
            .env_remove("RUST_LOG")
            .arg("--root")
            .arg(self.root())
            .arg("--dbpath")
            .arg(self.db_path())
            .arg("--config")
            .arg(self.conf_path());
        cmd
    }
}

/// A small Arch-like system: core and extra, a few installed packages
pub fn sample_system() -> TestSystem {
    let system = TestSystem::new();
    let mirrorlist = system.write(
        "etc/pacman.d/mirrorlist",
        "Server = https://geo.mirror.pkgbuild.com/$repo/os/$arch\n",
    );
    system
        .pacman_conf(&format!(
            "[options]\nHoldPkg = pacman glibc\n\n[core]\nInclude = {m}\n\n[extra]\nInclude = {m}\n",
            m = mirrorlist.display()
        ))
        .sync_db(
            "core",
            &[
                Desc::new("glibc", "2.40-1").desc("GNU C Library"),
                Desc::new("bash", "5.2.037-1")
                    .desc("The GNU Bourne Again shell")
                    .depends(&["glibc", "readline"])
                    .provides(&["sh"])
                    .groups(&["base"]),
                Desc::new("readline", "8.2.013-1")
                    .desc("GNU readline library")
                    .depends(&["glibc"]),
            ],
        )
        .sync_db(
            "extra",
            &[
                Desc::new("mpv", "0.39.0-1")
                    .desc("a free, open source, and cross-platform media player")
                    .depends(&["glibc"])
                    .optdepends(&["yt-dlp: for video-sharing websites playback"]),
                Desc::new("yt-dlp", "2024.10.22-1").desc("A youtube-dl fork"),
                Desc::new("libfoo", "2.1-1")
                    .desc("foo library")
                    .provides(&["libfoo.so=2.1"]),
            ],
        )
        .install(&Desc::new("glibc", "2.40-1").desc("GNU C Library").as_dependency())
        .install(
            &Desc::new("readline", "8.2.013-1")
                .depends(&["glibc"])
                .as_dependency(),
        )
        .install(
            &Desc::new("bash", "5.2.037-1")
                .depends(&["glibc", "readline"])
                .provides(&["sh"]),
        )
        .install(
            &Desc::new("mpv", "0.39.0-1")
                .depends(&["glibc"])
                .optdepends(&["yt-dlp: for video-sharing websites playback"]),
        )
        .install(&Desc::new("yt-dlp", "2024.10.22-1").as_dependency())
        .install(&Desc::new("leftover", "1.0-1").as_dependency())
        .install(&Desc::new("paru", "2.0.4-1").desc("Feature packed AUR helper"));
    system
}
