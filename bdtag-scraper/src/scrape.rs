//! One title, end to end: resolve the series, list its albums, keep the
//! wanted ones and fetch their details.

use std::collections::HashSet;

use bdtag_core::{AlbumRecord, AlbumStub, SeriesCandidate};

use crate::error::ScrapeError;
use crate::extract::{AlbumExtractor, filter_wanted};
use crate::resolve::CatalogResolver;

/// Outcome of scraping one title.
#[derive(Debug)]
pub struct TitleScrape {
    pub series: SeriesCandidate,
    pub records: Vec<AlbumRecord>,
    /// The series page held a single album rather than a numbered list.
    pub single_album: bool,
    /// Albums whose detail page could not be read.
    pub failures: Vec<(AlbumStub, ScrapeError)>,
}

/// Scrape the albums of `title` whose numbers are in `wanted` (all of them
/// when `wanted` is empty).
///
/// Fails with [`ScrapeError::NoSeriesFound`] when the title cannot be
/// resolved. A failed detail page is recorded in
/// [`TitleScrape::failures`] and the remaining albums are still fetched,
/// except when the failure is fatal for the session.
pub fn scrape_title(
    resolver: &mut CatalogResolver<'_>,
    extractor: &AlbumExtractor<'_>,
    title: &str,
    wanted: &HashSet<String>,
) -> Result<TitleScrape, ScrapeError> {
    let Some(series) = resolver.resolve(title)? else {
        log::error!("No series found for {title}");
        return Err(ScrapeError::NoSeriesFound(title.to_string()));
    };

    let list = extractor.fetch_albums(&series)?;
    let single_album = list.single_album;
    let stubs = filter_wanted(list, wanted);
    log::info!("{}: {} album(s) to fetch", series.title, stubs.len());

    let mut records = Vec::with_capacity(stubs.len());
    let mut failures = Vec::new();
    for stub in stubs {
        match extractor.fetch_detail(&stub) {
            Ok(record) => {
                log::debug!("Fetched {record}");
                records.push(record);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                log::warn!("No info found for {} ({}): {e}", stub.title, stub.url);
                failures.push((stub, e));
            }
        }
    }

    Ok(TitleScrape {
        series,
        records,
        single_album,
        failures,
    })
}
