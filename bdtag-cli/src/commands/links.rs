use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bdtag_lib::settings::default_state_dir;
use bdtag_lib::{ScanOptions, Settings, scan_comics};
use bdtag_scraper::{BedethequeClient, BedethequeMarkup, LinkState, Pacer, SeriesLinker};

use crate::error::CliError;
use crate::spinner::spinner;

/// Run the links command: record related series for every tagged archive.
pub(crate) fn run_links(
    settings: &Settings,
    root: &Path,
    state_dir: Option<PathBuf>,
    accept_zip: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let state_dir = state_dir.unwrap_or_else(default_state_dir);
    log::info!(
        "Linking series in: {}",
        root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "State directory: {}",
        state_dir.display().if_supports_color(Stdout, |t| t.dimmed()),
    );

    let options = ScanOptions {
        accept_zip: accept_zip || settings.scrape.accept_zip,
        include_tagged: true,
    };
    let archives = scan_comics(root, &options)?;
    if archives.is_empty() {
        log::info!("No archive found.");
        return Ok(());
    }

    let mut state = LinkState::load(&state_dir)?;
    let client = BedethequeClient::new(&settings.catalog)?;
    let markup = BedethequeMarkup;
    let linker = SeriesLinker::new(&client, &markup, &state_dir)
        .with_pacer(Pacer::from_millis(settings.scrape.link_delay_ms, settings.scrape.link_jitter_ms));

    let pb = spinner(quiet, format!("Visiting {} archive(s)...", archives.len()));
    let result = linker.run(&archives, &mut state);
    pb.finish_and_clear();
    let summary = result?;

    log::info!(
        "  {} {} archive(s) linked",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.linked,
    );
    log::info!("  {} visited, {} in treated folders", summary.visited, summary.skipped);
    if summary.not_linked > 0 {
        log::info!("  {} without related series", summary.not_linked);
    }
    if summary.errors > 0 {
        log::warn!(
            "  {} {} errors",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.errors,
        );
    }
    log::info!("  {} series known", state.series.len());
    Ok(())
}
