//! bdtag CLI
//!
//! Command-line interface for tagging comic archives with metadata scraped
//! from bedetheque.com.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;

use bdtag_lib::Settings;

use cli_types::{Cli, Commands};
use commands::config::run_config;
use commands::links::run_links;
use commands::parse::run_parse;
use commands::search::run_search;
use commands::tag::{TagOptions, run_tag};
use error::CliError;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Config commands must keep working when the settings file is broken.
    let command = match cli.command {
        Commands::Config { action } => return run_config(action),
        command => command,
    };

    let settings = Settings::load()?;
    let root = settings.resolve_root(cli.root);
    let quiet = cli.quiet;

    match command {
        Commands::Tag {
            dry_run,
            non_interactive,
            max_searches,
            no_report,
            scan,
        } => run_tag(
            &settings,
            &root,
            TagOptions {
                dry_run,
                non_interactive,
                max_searches,
                no_report,
                scan,
                quiet,
            },
        ),
        Commands::Parse { scan } => run_parse(&settings, &root, scan),
        Commands::Search {
            title,
            numbers,
            details,
        } => run_search(&settings, &title, numbers, details, quiet),
        Commands::Links { state_dir, accept_zip } => run_links(&settings, &root, state_dir, accept_zip, quiet),
        Commands::Config { .. } => Ok(()),
    }
}
