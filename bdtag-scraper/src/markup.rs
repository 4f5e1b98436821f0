//! Catalog page markup.
//!
//! Everything that depends on the site's class names, label texts and
//! tag layout lives behind [`SiteMarkup`]. A layout change on the site
//! surfaces as [`ScrapeError::NoAlbumMarkup`], [`ScrapeError::NoAlbumTitle`]
//! or [`ScrapeError::NoAlbumInfo`], never as an empty result.

use std::sync::LazyLock;

use bdtag_core::{AlbumRecord, AlbumStub, Contributor, ContributorRole, Manga, SeriesCandidate};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

/// Series link read from an album page's title block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesLink {
    pub url: String,
    pub name: String,
}

/// Albums listed on a series page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumList {
    pub stubs: Vec<AlbumStub>,
    /// The page shows a single album block instead of a numbered list.
    /// Its stub carries no number.
    pub single_album: bool,
}

/// Extraction interface over one catalog site's HTML.
pub trait SiteMarkup {
    /// Album stubs listed on a series page. Never empty.
    fn album_list(&self, html: &str, series: &SeriesCandidate) -> Result<AlbumList, ScrapeError>;

    /// Full record from an album detail page, seeded from `stub`.
    fn album_detail(&self, html: &str, stub: &AlbumStub) -> Result<AlbumRecord, ScrapeError>;

    /// Series link from an album page.
    fn series_link(&self, html: &str) -> Option<SeriesLink>;

    /// Ids of the series listed as related on a series page. `None` when the
    /// page has no related-series block.
    fn linked_series_ids(&self, html: &str) -> Option<Vec<String>>;
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static SERIE_INFO_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("ul.serie-info li"));
static ALBUM_LIST: LazyLock<Selector> = LazyLock::new(|| selector("div.tab_content_liste_albums"));
static ALBUM_MAIN: LazyLock<Selector> = LazyLock::new(|| selector("div.album-main"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.titre"));
static LI: LazyLock<Selector> = LazyLock::new(|| selector("li"));
static LABEL: LazyLock<Selector> = LazyLock::new(|| selector("label"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static RATING: LazyLock<Selector> = LazyLock::new(|| selector(r#"div.etoiles span[itemprop="ratingValue"]"#));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| selector(r#"span[itemprop="description"]"#));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static RELATED_SERIES: LazyLock<Selector> = LazyLock::new(|| selector("div.serie-liee li a"));
static RELATED_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector("div.serie-liee"));

static RELEASE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(Parution le (\d+)/(\d+)/(\d+)\)").expect("static regex"));
static LEGAL_DEPOSIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Dépot légal : (\d\d)/(\d\d\d\d)").expect("static regex"));
static SERIES_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://www\.bedetheque\.com/serie-(\d+)-(.+)\.html").expect("static regex")
});

const GENRE_LABEL: &str = "Genre :";
const MANGA_FORMAT: &str = "Format Manga";

/// Whether `url` points into the catalog site.
pub fn is_catalog_url(url: &str) -> bool {
    url.starts_with("https://www.bedetheque.com/") || url.starts_with("http://www.bedetheque.com/")
}

/// Numeric series id of a canonical series page URL.
pub fn series_id_from_url(url: &str) -> Option<String> {
    SERIES_URL.captures(url).map(|caps| caps[1].to_string())
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn label_of(item: ElementRef<'_>) -> Option<String> {
    item.select(&LABEL).next().map(|label| text_of(label).trim().to_string())
}

/// Item text with its label prefix removed.
fn value_after(item: ElementRef<'_>, label: &str) -> String {
    let text = text_of(item);
    let text = text.trim();
    text.strip_prefix(label).unwrap_or(text).trim().to_string()
}

fn href_of(element: ElementRef<'_>) -> String {
    element.value().attr("href").unwrap_or_default().to_string()
}

/// bedetheque.com page layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct BedethequeMarkup;

impl BedethequeMarkup {
    fn genre(document: &Html) -> String {
        document
            .select(&SERIE_INFO_ITEM)
            .find(|item| label_of(*item).as_deref() == Some(GENRE_LABEL))
            .and_then(|item| item.select(&SPAN).next())
            .map(|span| text_of(span).trim().to_string())
            .unwrap_or_default()
    }

    fn contributor(role: ContributorRole, item: ElementRef<'_>, label: &str) -> Option<Contributor> {
        let listed = value_after(item, label);
        let url = item.select(&LINK).next().map(href_of).unwrap_or_default();
        let contributor = Contributor::from_listing(role, &listed, url);
        if contributor.is_none() {
            log::trace!("Skipping {role} placeholder {listed:?}");
        }
        contributor
    }

    fn release_date(record: &mut AlbumRecord, item: ElementRef<'_>) {
        if let Some(span) = item.select(&SPAN).next() {
            let text = text_of(span);
            if let Some(caps) = RELEASE_DATE.captures(text.trim()) {
                record.day = caps[1].parse().unwrap_or(record.day);
                record.month = caps[2].parse().unwrap_or(record.month);
                record.year = caps[3].parse().unwrap_or(record.year);
                return;
            }
        }

        let text = text_of(item);
        if let Some(caps) = LEGAL_DEPOSIT.captures(text.trim()) {
            record.month = caps[1].parse().unwrap_or(record.month);
            record.year = caps[2].parse().unwrap_or(record.year);
        }
    }

    fn rating(document: &Html) -> Option<f64> {
        let span = document.select(&RATING).next()?;
        let text = text_of(span);
        match text.trim().replace(',', ".").parse::<f64>() {
            Ok(rating) => Some(rating),
            Err(_) => {
                log::debug!("Ignoring unreadable rating {text:?}");
                None
            }
        }
    }
}

impl SiteMarkup for BedethequeMarkup {
    fn album_list(&self, html: &str, series: &SeriesCandidate) -> Result<AlbumList, ScrapeError> {
        let document = Html::parse_document(html);
        let genre = Self::genre(&document);

        if let Some(list) = document.select(&ALBUM_LIST).next() {
            let stubs: Vec<AlbumStub> = list
                .select(&LI)
                .filter_map(|item| {
                    let link = item.select(&LINK).next()?;
                    let number = item
                        .select(&LABEL)
                        .next()
                        .map(|label| text_of(label).trim().trim_end_matches('.').to_string())
                        .unwrap_or_default();
                    Some(AlbumStub {
                        title: text_of(link).trim().to_string(),
                        url: href_of(link),
                        series: series.title.clone(),
                        number,
                        genre: genre.clone(),
                    })
                })
                .collect();
            if stubs.is_empty() {
                return Err(ScrapeError::NoAlbumMarkup { url: series.url.clone() });
            }
            return Ok(AlbumList {
                stubs,
                single_album: false,
            });
        }

        let block = document
            .select(&ALBUM_MAIN)
            .next()
            .ok_or_else(|| ScrapeError::NoAlbumMarkup { url: series.url.clone() })?;
        let link = block
            .select(&TITLE_LINK)
            .next()
            .ok_or_else(|| ScrapeError::NoAlbumTitle { url: series.url.clone() })?;

        let title = match link.value().attr("title") {
            Some(title) => title.trim().to_string(),
            None => text_of(link).trim().to_string(),
        };

        Ok(AlbumList {
            stubs: vec![AlbumStub {
                title,
                url: href_of(link),
                series: series.title.clone(),
                number: String::new(),
                genre,
            }],
            single_album: true,
        })
    }

    fn album_detail(&self, html: &str, stub: &AlbumStub) -> Result<AlbumRecord, ScrapeError> {
        let document = Html::parse_document(html);
        let content = document
            .select(&ALBUM_LIST)
            .next()
            .ok_or_else(|| ScrapeError::NoAlbumInfo { url: stub.url.clone() })?;

        let mut record = AlbumRecord::from_stub(stub);
        // Role of the last author block, continued by blank-label items.
        let mut open_role: Option<ContributorRole> = None;

        for item in content.select(&LI) {
            let Some(label) = label_of(item) else {
                open_role = None;
                continue;
            };

            if label.is_empty() {
                if let Some(role) = open_role {
                    if let Some(contributor) = Self::contributor(role, item, "") {
                        record.contributors_mut(role).push(contributor);
                    }
                }
                continue;
            }
            open_role = None;

            let role = match label.as_str() {
                "Scénario :" => Some(ContributorRole::Writer),
                "Dessin :" => Some(ContributorRole::Penciller),
                "Couleurs :" => Some(ContributorRole::Colorist),
                _ => None,
            };
            if let Some(role) = role {
                if let Some(contributor) = Self::contributor(role, item, &label) {
                    record.contributors_mut(role).push(contributor);
                }
                open_role = Some(role);
                continue;
            }

            match label.as_str() {
                "Titre :" => record.title = value_after(item, &label),
                "Tome :" => record.number = value_after(item, &label),
                "Editeur :" => record.publisher = value_after(item, &label),
                "Format :" => record.format = value_after(item, &label),
                "Dépot légal :" => Self::release_date(&mut record, item),
                "EAN/ISBN :" => record.isbn = value_after(item, &label),
                "Collection :" => record.collection = value_after(item, &label),
                _ => {}
            }
        }

        if let Some(rating) = Self::rating(&document) {
            record.community_rating = rating;
        }
        if let Some(description) = document.select(&DESCRIPTION).next() {
            record.summary = text_of(description).trim().to_string();
        }
        if record.format == MANGA_FORMAT {
            record.manga = Manga::Yes;
        }

        Ok(record)
    }

    fn series_link(&self, html: &str) -> Option<SeriesLink> {
        let document = Html::parse_document(html);
        let title = document.select(&H1).next()?;
        let link = title.select(&LINK).next()?;
        let url = link.value().attr("href")?.to_string();

        Some(SeriesLink {
            url,
            name: text_of(title).trim().to_string(),
        })
    }

    fn linked_series_ids(&self, html: &str) -> Option<Vec<String>> {
        let document = Html::parse_document(html);
        document.select(&RELATED_BLOCK).next()?;

        let ids = document
            .select(&RELATED_SERIES)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(series_id_from_url)
            .collect();
        Some(ids)
    }
}

#[cfg(test)]
#[path = "tests/markup_tests.rs"]
mod tests;
