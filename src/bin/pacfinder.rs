//! PacFinder CLI Binary
//!
//! Explore the packages known to pacman from the command line.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use pacfinder_lib::cli::{self, Cli, style};
use pacfinder_lib::config::Settings;
use pacfinder_lib::core::{Browser, DatabaseError, format_error_with_suggestion};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?.with_overrides(cli.root, cli.dbpath, cli.config);
    tracing::debug!(?settings, "resolved settings");

    let mut browser = Browser::initialize(&settings)?;
    cli::run(&cli.command, &mut browser)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<DatabaseError>() {
                Some(db_err) => eprintln!("{}", format_error_with_suggestion(db_err)),
                None => eprintln!("{}", style::error(&format!("{err:#}"))),
            }
            ExitCode::FAILURE
        }
    }
}
