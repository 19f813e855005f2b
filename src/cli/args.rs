//! Command-line argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::filter::StatusFilter;

/// PacFinder - explore the packages known to pacman
///
/// Lists every package from the sync repositories and the local database,
/// explains why installed packages are on the system and resolves dependencies.
#[derive(Parser, Debug)]
#[command(name = "pacfinder")]
#[command(version)]
#[command(about = "Explore the packages known to pacman", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Installation root
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Pacman database directory
    #[arg(long, global = true, value_name = "DIR")]
    pub dbpath: Option<PathBuf>,

    /// Pacman configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List packages, optionally filtered
    #[command(visible_alias = "ls")]
    List {
        /// Only show packages whose name or description contains this text
        search: Option<String>,
        /// Restrict by install status
        #[arg(short, long, value_enum, default_value_t = StatusArg::Any)]
        status: StatusArg,
        /// Only show packages from this repository
        #[arg(short, long)]
        repo: Option<String>,
        /// Only show packages in this group
        #[arg(short, long)]
        group: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show package details
    Info {
        /// Package name
        package: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show why a package is installed
    Status {
        /// Package name
        package: String,
    },

    /// Find the package satisfying a dependency (e.g. 'libfoo.so>=2')
    Satisfy {
        /// Dependency specification
        spec: String,
    },

    /// Show how one package optionally depends on another
    WhyOptional {
        /// The optional dependency
        target: String,
        /// The package listing it
        source: String,
    },

    /// List the registered sync repositories
    Repos {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the package filter tree
    Filters,
}

/// Install status filter accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    Any,
    Installed,
    NotInstalled,
    Explicit,
    Dependency,
    Optional,
    Orphan,
    Foreign,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Any => Self::Any,
            StatusArg::Installed => Self::Installed,
            StatusArg::NotInstalled => Self::NotInstalled,
            StatusArg::Explicit => Self::Explicit,
            StatusArg::Dependency => Self::Dependency,
            StatusArg::Optional => Self::Optional,
            StatusArg::Orphan => Self::Orphan,
            StatusArg::Foreign => Self::Foreign,
        }
    }
}
