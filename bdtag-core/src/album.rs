use serde::Serialize;

use crate::values::{AgeRating, Manga, Page, YesNo};

/// Sentinel year/month/day value meaning "not set".
pub const UNSET: i32 = -1;

/// A series returned by the catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesCandidate {
    /// Opaque catalog identifier.
    pub id: String,
    /// Display title as listed by the catalog.
    pub title: String,
    /// Canonical series page URL.
    pub url: String,
}

/// An album entry read from a series page, pending its detail fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumStub {
    pub title: String,
    /// Album detail page URL.
    pub url: String,
    pub series: String,
    /// Issue label with any trailing period removed. Empty when the series
    /// page did not list one (single-album layout).
    pub number: String,
    /// Series-level genre, shared by every album of the series.
    pub genre: String,
}

/// Contributor roles, in ComicInfo order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ContributorRole {
    Writer,
    Penciller,
    Inker,
    Colorist,
    Letterer,
    CoverArtist,
    Editor,
}

impl ContributorRole {
    pub const ALL: [ContributorRole; 7] = [
        Self::Writer,
        Self::Penciller,
        Self::Inker,
        Self::Colorist,
        Self::Letterer,
        Self::CoverArtist,
        Self::Editor,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Writer => "writer",
            Self::Penciller => "penciller",
            Self::Inker => "inker",
            Self::Colorist => "colorist",
            Self::Letterer => "letterer",
            Self::CoverArtist => "cover artist",
            Self::Editor => "editor",
        }
    }

    /// Catalog placeholders listed in place of a real person for this role.
    pub fn placeholders(&self) -> &'static [&'static str] {
        match self {
            Self::Colorist => &["<N&B>", "<Quadrichromie>", "<Indéterminé>"],
            _ => &["<Indéterminé>"],
        }
    }

    pub fn is_placeholder(&self, name: &str) -> bool {
        self.placeholders().contains(&name)
    }
}

impl std::fmt::Display for ContributorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A credited person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    /// Display name, "First Last".
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    /// Catalog page of the person.
    pub url: String,
}

impl Contributor {
    /// Build a contributor from a catalog listing such as `"Canales, Juan Diaz"`.
    ///
    /// Returns `None` when the listing is the role's placeholder.
    pub fn from_listing(role: ContributorRole, listed: &str, url: impl Into<String>) -> Option<Self> {
        let listed = listed.trim();
        if listed.is_empty() || role.is_placeholder(listed) {
            return None;
        }

        let (name, first_name, last_name) = match listed.split_once(", ") {
            Some((last, first)) => (
                format!("{first} {last}"),
                first.to_string(),
                last.to_string(),
            ),
            None => (listed.to_string(), String::new(), String::new()),
        };

        Some(Self {
            name,
            first_name,
            last_name,
            url: url.into(),
        })
    }
}

/// Fully resolved metadata for one album.
///
/// Field order follows the ComicInfo element order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumRecord {
    /// Album page the record was scraped from.
    pub url: String,

    pub title: String,
    pub series: String,
    pub number: String,
    pub count: i32,
    pub volume: i32,
    pub alternate_series: String,
    pub alternate_number: String,
    pub alternate_count: i32,
    pub summary: String,
    pub notes: String,
    pub year: i32,
    pub month: i32,
    pub day: i32,

    pub writers: Vec<Contributor>,
    pub pencillers: Vec<Contributor>,
    pub inkers: Vec<Contributor>,
    pub colorists: Vec<Contributor>,
    pub letterers: Vec<Contributor>,
    pub cover_artists: Vec<Contributor>,
    pub editors: Vec<Contributor>,

    pub publisher: String,
    pub imprint: String,
    pub genre: String,
    pub web: String,
    pub page_count: i32,
    pub language_iso: String,
    pub format: String,
    pub black_and_white: YesNo,
    pub manga: Manga,
    pub characters: String,
    pub teams: String,
    pub locations: String,
    pub scan_information: String,
    pub story_arc: String,
    pub series_group: String,
    pub age_rating: AgeRating,
    pub pages: Vec<Page>,
    pub community_rating: f64,
    pub main_character_or_team: String,
    pub review: String,

    /// Publisher collection; kept on the record, not part of ComicInfo.
    pub collection: String,
    pub isbn: String,
    pub barcode: String,
}

impl AlbumRecord {
    /// An empty record for `url`; `web` mirrors the source URL.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            web: url.clone(),
            url,
            title: String::new(),
            series: String::new(),
            number: String::new(),
            count: UNSET,
            volume: UNSET,
            alternate_series: String::new(),
            alternate_number: String::new(),
            alternate_count: UNSET,
            summary: String::new(),
            notes: String::new(),
            year: UNSET,
            month: UNSET,
            day: UNSET,
            writers: Vec::new(),
            pencillers: Vec::new(),
            inkers: Vec::new(),
            colorists: Vec::new(),
            letterers: Vec::new(),
            cover_artists: Vec::new(),
            editors: Vec::new(),
            publisher: String::new(),
            imprint: String::new(),
            genre: String::new(),
            page_count: 0,
            language_iso: "FR".to_string(),
            format: String::new(),
            black_and_white: YesNo::Unknown,
            manga: Manga::Unknown,
            characters: String::new(),
            teams: String::new(),
            locations: String::new(),
            scan_information: String::new(),
            story_arc: String::new(),
            series_group: String::new(),
            age_rating: AgeRating::Unknown,
            pages: Vec::new(),
            community_rating: 0.0,
            main_character_or_team: String::new(),
            review: String::new(),
            collection: String::new(),
            isbn: String::new(),
            barcode: String::new(),
        }
    }

    /// Seed a record with the list-page fields of `stub`.
    pub fn from_stub(stub: &AlbumStub) -> Self {
        let mut record = Self::new(stub.url.clone());
        record.title = stub.title.clone();
        record.series = stub.series.clone();
        record.number = stub.number.clone();
        record.genre = stub.genre.clone();
        record
    }

    pub fn contributors(&self, role: ContributorRole) -> &[Contributor] {
        match role {
            ContributorRole::Writer => &self.writers,
            ContributorRole::Penciller => &self.pencillers,
            ContributorRole::Inker => &self.inkers,
            ContributorRole::Colorist => &self.colorists,
            ContributorRole::Letterer => &self.letterers,
            ContributorRole::CoverArtist => &self.cover_artists,
            ContributorRole::Editor => &self.editors,
        }
    }

    pub fn contributors_mut(&mut self, role: ContributorRole) -> &mut Vec<Contributor> {
        match role {
            ContributorRole::Writer => &mut self.writers,
            ContributorRole::Penciller => &mut self.pencillers,
            ContributorRole::Inker => &mut self.inkers,
            ContributorRole::Colorist => &mut self.colorists,
            ContributorRole::Letterer => &mut self.letterers,
            ContributorRole::CoverArtist => &mut self.cover_artists,
            ContributorRole::Editor => &mut self.editors,
        }
    }

    /// Combined display string for a role, e.g. `"Juan Diaz Canales, Juanjo Guarnido"`.
    pub fn credits(&self, role: ContributorRole) -> String {
        self.contributors(role)
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for AlbumRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{} in {}", self.title, self.number, self.series)
    }
}

#[cfg(test)]
#[path = "tests/album_tests.rs"]
mod tests;
