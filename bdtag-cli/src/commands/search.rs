use std::collections::HashSet;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bdtag_lib::Settings;
use bdtag_scraper::{AlbumExtractor, BedethequeClient, BedethequeMarkup, CatalogResolver, Pacer, filter_wanted};

use crate::error::CliError;
use crate::spinner::{SpinnerOperator, spinner};

/// Run the search command: resolve one title and list its albums.
pub(crate) fn run_search(
    settings: &Settings,
    title: &str,
    numbers: Option<Vec<String>>,
    details: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let client = BedethequeClient::new(&settings.catalog)?;
    let markup = BedethequeMarkup;

    let pb = spinner(quiet, format!("Searching \"{title}\"..."));
    let mut operator = SpinnerOperator::new(pb.clone());
    let series = {
        let mut resolver = CatalogResolver::new(&client, &mut operator, settings.scrape.max_searches);
        resolver.resolve(title)
    };
    let series = match series {
        Ok(Some(series)) => series,
        Ok(None) => {
            pb.finish_and_clear();
            log::warn!("No series found for \"{title}\"");
            return Ok(());
        }
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    let extractor = AlbumExtractor::new(&client, &markup)
        .with_pacer(Pacer::from_millis(settings.scrape.detail_delay_ms, settings.scrape.detail_jitter_ms))
        .with_language(settings.scrape.language_iso.clone());

    pb.set_message(format!("Listing albums of {}...", series.title));
    let list = match extractor.fetch_albums(&series) {
        Ok(list) => list,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };
    let wanted: HashSet<String> = numbers.unwrap_or_default().into_iter().collect();
    let stubs = filter_wanted(list, &wanted);
    pb.finish_and_clear();

    log::info!(
        "{} {}",
        series.title.if_supports_color(Stdout, |t| t.bold()),
        series.url.if_supports_color(Stdout, |t| t.dimmed()),
    );
    if stubs.is_empty() {
        log::warn!("No album matches the requested numbers");
        return Ok(());
    }
    for stub in &stubs {
        let number = if stub.number.is_empty() { "-" } else { stub.number.as_str() };
        log::info!(
            "  {:>4}  {}",
            number.if_supports_color(Stdout, |t| t.cyan()),
            stub.title,
        );
    }

    if !details {
        return Ok(());
    }

    for stub in &stubs {
        log::info!("");
        let pb = spinner(quiet, format!("Fetching {}...", stub.title));
        let detail = extractor.fetch_detail(stub);
        pb.finish_and_clear();

        let record = match detail {
            Ok(record) => record,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                log::warn!("{}: {e}", stub.title);
                continue;
            }
        };
        match bdtag_comicinfo::to_xml(&record) {
            Ok(xml) => log::info!("{xml}"),
            Err(e) => log::warn!("{record}: {e}"),
        }
    }
    Ok(())
}
