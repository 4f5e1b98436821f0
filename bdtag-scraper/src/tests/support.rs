//! In-memory catalog used by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::client::CatalogTransport;
use crate::error::ScrapeError;
use crate::types::SearchHit;

pub const SERIES_PAGE_BLACKSAD: &str = include_str!("../../tests/fixtures/serie_blacksad.html");
pub const SERIES_PAGE_SINGLE: &str = include_str!("../../tests/fixtures/serie_single_album.html");
pub const ALBUM_PAGE_AMARILLO: &str = include_str!("../../tests/fixtures/album_amarillo.html");
pub const ALBUM_PAGE_ENFER: &str = include_str!("../../tests/fixtures/album_enfer_silence.html");
pub const ALBUM_PAGE_ARCTIC: &str = include_str!("../../tests/fixtures/album_arctic_nation.html");
pub const ALBUM_PAGE_MANGA: &str = include_str!("../../tests/fixtures/album_manga.html");
pub const BLOCKED_PAGE: &str = include_str!("../../tests/fixtures/blocked.html");

pub const SERIES_PREFIX: &str = "https://www.bedetheque.com/serie/index/s/";

#[derive(Default)]
pub struct FixtureTransport {
    searches: HashMap<String, Vec<SearchHit>>,
    pages: HashMap<String, String>,
    pub search_log: RefCell<Vec<String>>,
    pub fetch_log: RefCell<Vec<String>>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: &str, hits: &[(&str, &str)]) -> Self {
        let hits = hits
            .iter()
            .map(|(id, label)| SearchHit {
                id: id.to_string(),
                label: label.to_string(),
                value: label.to_string(),
                desc: String::new(),
            })
            .collect();
        self.searches.insert(term.to_string(), hits);
        self
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn series_page(self, id: &str, html: &str) -> Self {
        let url = format!("{SERIES_PREFIX}{id}");
        self.with_page(&url, html)
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetch_log.borrow().clone()
    }
}

impl CatalogTransport for FixtureTransport {
    fn search(&self, term: &str) -> Result<Vec<SearchHit>, ScrapeError> {
        self.search_log.borrow_mut().push(term.to_string());
        Ok(self.searches.get(term).cloned().unwrap_or_default())
    }

    fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        self.fetch_log.borrow_mut().push(url.to_string());
        let page = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::transport(format!("no fixture for {url}")))?;
        crate::client::guard_blocked(url, &page)?;
        Ok(page)
    }

    fn series_url(&self, id: &str) -> String {
        format!("{SERIES_PREFIX}{id}")
    }
}
