//! CLI module for PacFinder
//!
//! Handles command-line argument parsing and dispatch to the subcommands.

use anyhow::Result;

mod args;
pub mod commands;
pub mod json_output;
pub mod style;
pub mod tables;

pub use args::{Cli, Commands, StatusArg};

use crate::core::Browser;
use crate::core::filter::PackageFilter;

/// Execute `command`, then release the browser.
///
/// A failed command keeps its own error; a release failure behind it is
/// only logged.
pub fn run(command: &Commands, browser: &mut Browser) -> Result<()> {
    let outcome = command.execute(browser);
    let released = browser.release();

    match (outcome, released) {
        (Err(err), Err(release_err)) => {
            tracing::warn!(error = %release_err, "failed to release package database");
            Err(err)
        }
        (outcome, released) => {
            released?;
            outcome
        }
    }
}

impl Commands {
    /// Run the subcommand against an initialized browser
    pub fn execute(&self, browser: &Browser) -> Result<()> {
        match self {
            Self::List {
                search,
                status,
                repo,
                group,
                json,
            } => {
                let mut filter = PackageFilter {
                    status: (*status).into(),
                    repo: repo.clone(),
                    group: group.clone(),
                    search: None,
                };
                if let Some(text) = search {
                    filter = filter.with_search(text.as_str());
                }
                commands::list(browser, &filter, *json)
            }
            Self::Info { package, json } => commands::info(browser, package, *json),
            Self::Status { package } => commands::status(browser, package),
            Self::Satisfy { spec } => commands::satisfy(browser, spec),
            Self::WhyOptional { target, source } => commands::why_optional(browser, target, source),
            Self::Repos { json } => commands::repos(browser, *json),
            Self::Filters => commands::filters(browser),
        }
    }
}
