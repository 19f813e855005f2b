//! Subcommand implementations

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use jiff::Timestamp;

use crate::cli::json_output::{self, ListEntry, PackageInfo, RepoInfo};
use crate::cli::{style, tables};
use crate::core::{Browser, PackageRow};
use crate::core::classify::InstallReason;
use crate::core::filter::{FilterNode, PackageFilter};
use crate::core::util::{deplist_to_string, human_readable_size, list_to_string, strtrunc_dep_desc};
use crate::db::Package;

fn lookup(browser: &Browser, name: &str) -> Result<Arc<Package>> {
    browser
        .find(name)?
        .cloned()
        .with_context(|| format!("package '{name}' was not found"))
}

fn or_none(text: String) -> String {
    if text.is_empty() { "None".to_string() } else { text }
}

fn format_date(ts: Option<Timestamp>) -> String {
    ts.map_or_else(
        || "None".to_string(),
        |ts| ts.strftime("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

/// `pacfinder list`
pub fn list(browser: &Browser, filter: &PackageFilter, json: bool) -> Result<()> {
    let rows = browser.filtered(filter)?;

    if json {
        let entries: Vec<ListEntry<'_>> = rows
            .iter()
            .map(|row| ListEntry {
                name: &row.package.name,
                version: &row.package.version,
                repo: &row.package.repo,
                description: &row.package.description,
                status: row.reason,
                foreign: row.foreign,
            })
            .collect();
        return json_output::print_json(&entries);
    }

    if rows.is_empty() {
        println!("{}", style::dim("No packages match"));
        return Ok(());
    }

    let mut table = tables::table_with_columns(&["Name", "Version", "Repository", "Status", "Description"]);
    for row in &rows {
        let pkg = &row.package;
        tables::add_colored_row(
            &mut table,
            &[
                (pkg.name.as_str(), None),
                (pkg.version.as_str(), Some(comfy_table::Color::Green)),
                (pkg.repo.as_str(), Some(comfy_table::Color::Magenta)),
                (row.reason.label(), tables::reason_color(row.reason)),
                (pkg.description.as_str(), None),
            ],
        );
    }
    println!("{table}");
    println!("{}", style::dim(&format!("{} packages", rows.len())));
    Ok(())
}

/// `pacfinder info`
pub fn info(browser: &Browser, name: &str, json: bool) -> Result<()> {
    let pkg = lookup(browser, name)?;
    let local = browser.repositories().local()?;
    let installed = local.get(&pkg.name);
    let reason = browser.classify(&pkg)?;
    let required_by = browser.required_by(&pkg)?;
    let optional_for = browser.optional_for(&pkg)?;

    if json {
        return json_output::print_json(&PackageInfo {
            package: &pkg,
            status: reason,
            foreign: browser.is_foreign(&pkg)?,
            required_by,
            optional_for,
        });
    }

    let field = |label: &str, value: &str| {
        println!("{} {value}", style::dim(&format!("{label:<16}:")));
    };

    field("Repository", &style::repo(&pkg.repo));
    field("Name", &style::package(&pkg.name));
    field("Version", &style::version(&pkg.version));
    field("Description", &pkg.description);
    field("Architecture", &pkg.arch);
    field("URL", pkg.url.as_deref().unwrap_or("None"));
    field("Licenses", &or_none(list_to_string(&pkg.licenses)));
    field("Groups", &or_none(list_to_string(&pkg.groups)));
    field("Provides", &or_none(deplist_to_string(&pkg.provides)));
    field("Depends On", &or_none(deplist_to_string(&pkg.depends)));

    if pkg.optdepends.is_empty() {
        field("Optional Deps", "None");
    } else {
        for (idx, optdep) in pkg.optdepends.iter().enumerate() {
            let marker = if local.find_satisfier(optdep).is_some() {
                " [installed]"
            } else {
                ""
            };
            if idx == 0 {
                field("Optional Deps", &format!("{optdep}{marker}"));
            } else {
                println!("{:17} {optdep}{marker}", "");
            }
        }
    }

    field("Required By", &or_none(list_to_string(&required_by)));
    field("Optional For", &or_none(list_to_string(&optional_for)));
    field("Conflicts With", &or_none(deplist_to_string(&pkg.conflicts)));
    field("Replaces", &or_none(deplist_to_string(&pkg.replaces)));
    if !pkg.is_local() {
        field("Download Size", &human_readable_size(pkg.download_size));
    }
    field("Installed Size", &human_readable_size(pkg.installed_size));
    field("Packager", pkg.packager.as_deref().unwrap_or("Unknown Packager"));
    field("Build Date", &format_date(pkg.build_date));
    field("Install Date", &format_date(installed.and_then(|p| p.install_date)));
    field("Install Reason", &style::reason(reason));
    Ok(())
}

/// `pacfinder status`
pub fn status(browser: &Browser, name: &str) -> Result<()> {
    let pkg = lookup(browser, name)?;
    let reason = browser.classify(&pkg)?;

    println!(
        "{} {}: {}",
        style::package(&pkg.name),
        style::version(&pkg.version),
        style::reason(reason)
    );

    match reason {
        InstallReason::Dependency => {
            for name in browser.required_by(&pkg)? {
                println!("  {}", style::arrow(&format!("required by {name}")));
            }
        }
        InstallReason::Optional => {
            for name in browser.optional_for(&pkg)? {
                println!("  {}", style::arrow(&format!("optional for {name}")));
            }
        }
        InstallReason::NotInstalled | InstallReason::Explicit | InstallReason::Orphan => {}
    }
    Ok(())
}

/// `pacfinder satisfy`
pub fn satisfy(browser: &Browser, spec: &str) -> Result<()> {
    let spec = strtrunc_dep_desc(spec.trim());
    let Some(pkg) = browser.satisfy(spec)? else {
        bail!("no package satisfies '{spec}'");
    };

    println!(
        "{}/{} {}",
        style::repo(&pkg.repo),
        style::package(&pkg.name),
        style::version(&pkg.version)
    );
    Ok(())
}

/// `pacfinder why-optional`
pub fn why_optional(browser: &Browser, target: &str, source: &str) -> Result<()> {
    let target_pkg = lookup(browser, target)?;
    let source_pkg = lookup(browser, source)?;

    let Some(optdep) = browser.find_optdep_descriptor(&target_pkg, &source_pkg) else {
        bail!("{source} does not list {target} as an optional dependency");
    };

    println!(
        "{} {}",
        style::package(&source_pkg.name),
        style::dim("optionally depends on")
    );
    println!("  {}", style::arrow(&optdep.to_string()));
    Ok(())
}

/// `pacfinder repos`
pub fn repos(browser: &Browser, json: bool) -> Result<()> {
    let repos = browser.repositories();
    let sync = repos.sync_repositories()?;

    let infos: Vec<RepoInfo<'_>> = repos
        .registered()
        .iter()
        .zip(sync)
        .map(|(desc, repo)| RepoInfo {
            name: repo.name(),
            packages: repo.len(),
            groups: repo.groups().len(),
            declared_in: desc.declared_in.display().to_string(),
        })
        .collect();

    if json {
        return json_output::print_json(&infos);
    }

    let mut table = tables::table_with_columns(&["Repository", "Packages", "Groups", "Declared In"]);
    for info in &infos {
        tables::add_colored_row(
            &mut table,
            &[
                (info.name, Some(comfy_table::Color::Magenta)),
                (info.packages.to_string().as_str(), None),
                (info.groups.to_string().as_str(), None),
                (info.declared_in.as_str(), None),
            ],
        );
    }
    println!("{table}");
    Ok(())
}

/// `pacfinder filters`
pub fn filters(browser: &Browser) -> Result<()> {
    fn print_node(rows: &[PackageRow], node: &FilterNode, depth: usize) {
        let count = node.filter.count(rows);
        let title = if depth == 0 {
            style::header(&node.title)
        } else {
            style::arrow(&node.title)
        };
        println!(
            "{:indent$}{title} {}",
            "",
            style::dim(&format!("({count})")),
            indent = depth * 2
        );
        for child in &node.children {
            print_node(rows, child, depth + 1);
        }
    }

    let rows = browser.filtered(&PackageFilter::default())?;
    for node in &browser.filter_tree()? {
        print_node(&rows, node, 0);
    }
    Ok(())
}
