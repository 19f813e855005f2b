//! JSON output formatting for CLI commands

use serde::Serialize;

use crate::core::classify::InstallReason;
use crate::db::Package;

#[derive(Serialize)]
pub struct ListEntry<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub repo: &'a str,
    pub description: &'a str,
    pub status: InstallReason,
    pub foreign: bool,
}

#[derive(Serialize)]
pub struct PackageInfo<'a> {
    #[serde(flatten)]
    pub package: &'a Package,
    pub status: InstallReason,
    pub foreign: bool,
    pub required_by: Vec<String>,
    pub optional_for: Vec<String>,
}

#[derive(Serialize)]
pub struct RepoInfo<'a> {
    pub name: &'a str,
    pub packages: usize,
    pub groups: usize,
    pub declared_in: String,
}

pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
