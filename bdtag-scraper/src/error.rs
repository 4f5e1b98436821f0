use bdtag_comicinfo::ComicInfoError;
use bdtag_lib::ArchiveError;

/// Errors that can occur while resolving and scraping albums.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The site refused the session; nothing else can be fetched.
    #[error("Access blocked by the catalog site while fetching {url}")]
    AccessBlocked { url: String },

    #[error("No series found for \"{0}\"")]
    NoSeriesFound(String),

    #[error("No album list or album block found on {url}")]
    NoAlbumMarkup { url: String },

    #[error("Album block without a title link on {url}")]
    NoAlbumTitle { url: String },

    #[error("No album information found on {url}")]
    NoAlbumInfo { url: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    ComicInfo(#[from] ComicInfoError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Errors after which no further request should be made in this run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AccessBlocked { .. })
    }
}
