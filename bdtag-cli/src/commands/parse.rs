use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bdtag_lib::{ScanOptions, Settings, scan_comics};
use bdtag_scraper::{group_by_title, parse_files};

use crate::cli_types::ScanArgs;
use crate::error::CliError;

/// Run the parse command: show how file names are grouped, without touching
/// the network.
pub(crate) fn run_parse(settings: &Settings, root: &Path, scan: ScanArgs) -> Result<(), CliError> {
    let options = ScanOptions {
        accept_zip: scan.accept_zip || settings.scrape.accept_zip,
        include_tagged: scan.include_tagged,
    };
    let files = scan_comics(root, &options)?;
    if files.is_empty() {
        log::info!("No archive found in {}", root.display());
        return Ok(());
    }

    let (buckets, untitled) = group_by_title(parse_files(files));

    for bucket in &buckets {
        log::info!(
            "{} ({} file(s))",
            bucket.title.if_supports_color(Stdout, |t| t.bold()),
            bucket.files.len(),
        );
        for (file, parsed) in &bucket.files {
            let number = parsed.number.as_deref().unwrap_or("-");
            log::info!(
                "  {:>6}  {}",
                number.if_supports_color(Stdout, |t| t.cyan()),
                file.display_name(),
            );
            for issue in parsed.issues() {
                log::info!(
                    "          {}",
                    issue.if_supports_color(Stdout, |t| t.yellow()),
                );
            }
        }
    }

    if !untitled.is_empty() {
        log::info!("");
        log::warn!("{} file(s) without a title:", untitled.len());
        for file in &untitled {
            log::warn!("  {}", file.display_name());
        }
    }

    log::info!("");
    log::info!("{} title(s) to search", buckets.len());
    Ok(())
}
