//! Integration tests for the pacfinder binary

mod common;

use predicates::prelude::*;

use common::{TestSystem, sample_system};

#[test]
fn test_help_lists_subcommands() {
    let system = TestSystem::new();
    system
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("satisfy"))
        .stdout(predicate::str::contains("why-optional"));
}

#[test]
fn test_list_foreign() {
    let system = sample_system();
    system
        .cmd()
        .args(["list", "--status", "foreign"])
        .assert()
        .success()
        .stdout(predicate::str::contains("paru"))
        .stdout(predicate::str::contains("leftover"))
        .stdout(predicate::str::contains("bash").not())
        .stdout(predicate::str::contains("2 packages"));
}

#[test]
fn test_list_json() {
    let system = sample_system();
    let output = system
        .cmd()
        .args(["list", "--json", "--repo", "extra"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["libfoo", "mpv", "yt-dlp"]);

    let ytdlp = &rows[2];
    assert_eq!(ytdlp["status"], "optional");
    assert_eq!(ytdlp["foreign"], false);
}

#[test]
fn test_list_search_no_match() {
    let system = sample_system();
    system
        .cmd()
        .args(["list", "definitely-not-a-package"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages match"));
}

#[test]
fn test_info_shows_relations() {
    let system = sample_system();
    system
        .cmd()
        .args(["info", "yt-dlp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("extra"))
        .stdout(predicate::str::contains("Optional For"))
        .stdout(predicate::str::contains("mpv"))
        .stdout(predicate::str::contains("optional"));
}

#[test]
fn test_info_json() {
    let system = sample_system();
    let output = system.cmd().args(["info", "bash", "--json"]).output().unwrap();
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["name"], "bash");
    assert_eq!(info["repo"], "core");
    assert_eq!(info["status"], "explicit");
    assert_eq!(info["depends"][1], "readline");
    assert_eq!(info["provides"][0], "sh");
}

#[test]
fn test_info_unknown_package_fails() {
    let system = sample_system();
    system
        .cmd()
        .args(["info", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'nope' was not found"));
}

#[test]
fn test_status() {
    let system = sample_system();
    system
        .cmd()
        .args(["status", "glibc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dependency"))
        .stdout(predicate::str::contains("required by readline"));

    system
        .cmd()
        .args(["status", "leftover"])
        .assert()
        .success()
        .stdout(predicate::str::contains("orphan"));
}

#[test]
fn test_satisfy() {
    let system = sample_system();
    system
        .cmd()
        .args(["satisfy", "libfoo.so>=2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("extra/libfoo 2.1-1"));

    system
        .cmd()
        .args(["satisfy", "sh: shell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("core/bash"));

    system
        .cmd()
        .args(["satisfy", "libfoo.so>=3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no package satisfies"));
}

#[test]
fn test_why_optional() {
    let system = sample_system();
    system
        .cmd()
        .args(["why-optional", "yt-dlp", "mpv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("for video-sharing websites playback"));

    system
        .cmd()
        .args(["why-optional", "mpv", "yt-dlp"])
        .assert()
        .failure();
}

#[test]
fn test_repos() {
    let system = sample_system();
    let output = system.cmd().args(["repos", "--json"]).output().unwrap();
    assert!(output.status.success());

    let repos: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(repos[0]["name"], "core");
    assert_eq!(repos[0]["packages"], 3);
    assert_eq!(repos[0]["groups"], 1);
    assert_eq!(repos[1]["name"], "extra");
}

#[test]
fn test_filters() {
    let system = sample_system();
    system
        .cmd()
        .arg("filters")
        .assert()
        .success()
        .stdout(predicate::str::contains("All Packages (8)"))
        .stdout(predicate::str::contains("Orphan (1)"))
        .stdout(predicate::str::contains("base (1)"))
        .stdout(predicate::str::contains("Foreign (2)"));
}

#[test]
fn test_missing_database_reports_suggestion() {
    let system = TestSystem::new();
    system.pacman_conf("[core]\n");
    std::fs::remove_dir_all(system.db_path()).unwrap();
    system
        .cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to initialize package database"))
        .stderr(predicate::str::contains("--dbpath"));
}
