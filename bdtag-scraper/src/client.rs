use std::time::Duration;

use bdtag_lib::settings::CatalogSettings;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};

use crate::error::ScrapeError;
use crate::types::{SearchHit, parse_search_response};

/// Text the catalog site serves instead of the requested page once it has
/// blocked the client's address.
pub const IP_BLOCK_MARKER: &str = "Votre IP a ete bloquee";

/// Everything the pipeline needs from the remote catalog.
///
/// Implemented over HTTP by [`BedethequeClient`]; tests serve canned pages.
pub trait CatalogTransport {
    /// Fuzzy series search.
    fn search(&self, term: &str) -> Result<Vec<SearchHit>, ScrapeError>;

    /// Fetch an HTML page.
    fn fetch_page(&self, url: &str) -> Result<String, ScrapeError>;

    /// Series page URL for a search hit id.
    fn series_url(&self, id: &str) -> String;
}

/// Blocking HTTP session against bedetheque.com and its search endpoint.
///
/// One session is opened per run; dropping it releases the connection pool.
pub struct BedethequeClient {
    http: Client,
    search_url: String,
    series_url: String,
}

impl BedethequeClient {
    pub fn new(settings: &CatalogSettings) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("fr-FR,fr;q=0.8,en-US;q=0.5,en;q=0.3"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.bedetheque.com/"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            search_url: settings.search_url.clone(),
            series_url: settings.series_url.clone(),
        })
    }

    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ScrapeError> {
        log::debug!("GET {url} {query:?}");
        let resp = self.http.get(url).query(query).send()?;

        let status = resp.status();
        let text = resp.text()?;

        guard_blocked(url, &text)?;
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(text)
    }
}

impl CatalogTransport for BedethequeClient {
    fn search(&self, term: &str) -> Result<Vec<SearchHit>, ScrapeError> {
        let body = self.get_text(&self.search_url, &[("term", term)])?;
        let hits = parse_search_response(&body)?;
        log::debug!("Search for {term:?} returned {} hit(s)", hits.len());
        Ok(hits)
    }

    fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        self.get_text(url, &[])
    }

    fn series_url(&self, id: &str) -> String {
        format!("{}{}", self.series_url, id)
    }
}

/// Fail with [`ScrapeError::AccessBlocked`] when `body` is the site's
/// address-blocked notice.
pub fn guard_blocked(url: &str, body: &str) -> Result<(), ScrapeError> {
    if body.contains(IP_BLOCK_MARKER) {
        log::error!("Catalog site blocked this address while fetching {url}");
        return Err(ScrapeError::AccessBlocked { url: url.to_string() });
    }
    Ok(())
}

/// Fixed delay plus random jitter between page fetches.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pacer {
    pub base: Duration,
    pub jitter: Duration,
}

impl Pacer {
    pub fn from_millis(base_ms: u64, jitter_ms: u64) -> Self {
        Self {
            base: Duration::from_millis(base_ms),
            jitter: Duration::from_millis(jitter_ms),
        }
    }

    /// A pacer that never waits.
    pub fn none() -> Self {
        Self::default()
    }

    /// Next delay: `base` plus a uniform draw in `0..=jitter`.
    pub fn next_delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base;
        }
        self.base + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }

    pub fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            log::trace!("Waiting {} ms", delay.as_millis());
            std::thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_blocked() {
        assert!(guard_blocked("u", "<html>ok</html>").is_ok());
        let err = guard_blocked("u", "<p>Votre IP a ete bloquee</p>").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_pacer_delay_bounds() {
        let pacer = Pacer::from_millis(50, 10);
        for _ in 0..20 {
            let delay = pacer.next_delay();
            assert!(delay >= Duration::from_millis(50));
            assert!(delay <= Duration::from_millis(60));
        }
        assert_eq!(Pacer::none().next_delay(), Duration::ZERO);
    }

    #[test]
    fn test_series_url() {
        let client = BedethequeClient::new(&CatalogSettings::default()).unwrap();
        assert_eq!(client.series_url("401"), "https://www.bedetheque.com/serie/index/s/401");
    }
}
