use std::cell::Cell;
use std::collections::HashSet;

use bdtag_core::{AlbumRecord, AlbumStub, SeriesCandidate};

use crate::client::{CatalogTransport, Pacer};
use crate::error::ScrapeError;
use crate::markup::{AlbumList, SiteMarkup};

/// Fetches a series' album list and the detail page of each album.
pub struct AlbumExtractor<'a> {
    transport: &'a dyn CatalogTransport,
    markup: &'a dyn SiteMarkup,
    pacer: Pacer,
    language_iso: String,
    detail_fetches: Cell<usize>,
}

impl<'a> AlbumExtractor<'a> {
    pub fn new(transport: &'a dyn CatalogTransport, markup: &'a dyn SiteMarkup) -> Self {
        Self {
            transport,
            markup,
            pacer: Pacer::none(),
            language_iso: "FR".to_string(),
            detail_fetches: Cell::new(0),
        }
    }

    /// Wait between consecutive detail fetches.
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Language code stamped on every record.
    pub fn with_language(mut self, language_iso: impl Into<String>) -> Self {
        self.language_iso = language_iso.into();
        self
    }

    /// Album stubs of `series`, from its series page.
    pub fn fetch_albums(&self, series: &SeriesCandidate) -> Result<AlbumList, ScrapeError> {
        let html = self.transport.fetch_page(&series.url)?;
        let list = self.markup.album_list(&html, series)?;
        log::debug!("{} lists {} album(s)", series.title, list.stubs.len());
        Ok(list)
    }

    /// Enrich `stub` from its detail page.
    pub fn fetch_detail(&self, stub: &AlbumStub) -> Result<AlbumRecord, ScrapeError> {
        if self.detail_fetches.get() > 0 {
            self.pacer.pause();
        }
        self.detail_fetches.set(self.detail_fetches.get() + 1);

        let html = self.transport.fetch_page(&stub.url)?;
        let mut record = self.markup.album_detail(&html, stub)?;
        record.language_iso = self.language_iso.clone();
        Ok(record)
    }
}

/// Keep the stubs whose number is wanted, compared case-insensitively.
///
/// An empty `wanted` set keeps everything. The numberless stub of a
/// single-album page is always kept; numberless entries of a numbered list
/// are not.
pub fn filter_wanted(list: AlbumList, wanted: &HashSet<String>) -> Vec<AlbumStub> {
    if wanted.is_empty() {
        return list.stubs;
    }
    let wanted: HashSet<String> = wanted.iter().map(|n| n.to_lowercase()).collect();
    let single_album = list.single_album;
    list.stubs
        .into_iter()
        .filter(|stub| {
            if stub.number.is_empty() {
                single_album
            } else {
                wanted.contains(&stub.number.to_lowercase())
            }
        })
        .collect()
}
