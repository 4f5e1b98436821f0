//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bdtag")]
#[command(about = "Tag comic archives with ComicInfo metadata from bedetheque.com", long_about = None)]
pub(crate) struct Cli {
    /// Library root containing the comic archives (defaults to the configured
    /// root, then the current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which archives a command picks up.
#[derive(Args, Clone, Copy)]
pub(crate) struct ScanArgs {
    /// Also treat .zip files as comic archives
    #[arg(long)]
    pub accept_zip: bool,

    /// Include archives that already contain a ComicInfo.xml
    #[arg(long)]
    pub include_tagged: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scrape metadata for every untagged archive and embed ComicInfo.xml
    Tag {
        /// Print the documents instead of writing them
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Never prompt; titles that need a choice are skipped
        #[arg(long)]
        non_interactive: bool,

        /// Searches allowed per title before giving up
        #[arg(long)]
        max_searches: Option<usize>,

        /// Disable the report file
        #[arg(long)]
        no_report: bool,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Show the titles and issue numbers read from file names (no network)
    Parse {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Resolve one title and list its albums
    Search {
        /// Series title as it would appear in a file name
        title: String,

        /// Only list these issue numbers
        #[arg(short, long, value_delimiter = ',')]
        numbers: Option<Vec<String>>,

        /// Also fetch and print the ComicInfo of each album
        #[arg(long)]
        details: bool,
    },

    /// Collect related series for every tagged archive
    Links {
        /// Directory holding linked_series.json and treated_folders.json
        #[arg(long)]
        state_dir: Option<PathBuf>,

        /// Also treat .zip files as comic archives
        #[arg(long)]
        accept_zip: bool,
    },

    /// Manage bdtag settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings and where they come from
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with the default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
