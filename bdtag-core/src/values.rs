//! Enumerated values of the ComicInfo document format.
//!
//! Each enum maps to the exact spelling the schema accepts via `as_str()`.

use serde::Serialize;

/// Tri-state flag (`BlackAndWhite`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum YesNo {
    #[default]
    Unknown,
    No,
    Yes,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::No => "No",
            Self::Yes => "Yes",
        }
    }
}

/// Manga flag, with the reading-direction variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Manga {
    #[default]
    Unknown,
    No,
    Yes,
    YesAndRightToLeft,
}

impl Manga {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::No => "No",
            Self::Yes => "Yes",
            Self::YesAndRightToLeft => "YesAndRightToLeft",
        }
    }
}

/// Audience rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AgeRating {
    #[default]
    Unknown,
    AdultsOnly18,
    EarlyChildhood,
    Everyone,
    Everyone10,
    G,
    KidsToAdults,
    M,
    Ma15,
    Mature17,
    Pg,
    R18,
    RatingPending,
    Teen,
    X18,
}

impl AgeRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::AdultsOnly18 => "Adults Only 18+",
            Self::EarlyChildhood => "Early Childhood",
            Self::Everyone => "Everyone",
            Self::Everyone10 => "Everyone 10+",
            Self::G => "G",
            Self::KidsToAdults => "Kids to Adults",
            Self::M => "M",
            Self::Ma15 => "MA15+",
            Self::Mature17 => "Mature 17+",
            Self::Pg => "PG",
            Self::R18 => "R18+",
            Self::RatingPending => "Rating Pending",
            Self::Teen => "Teen",
            Self::X18 => "X18+",
        }
    }
}

/// Role of a single page inside the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PageType {
    FrontCover,
    InnerCover,
    Roundup,
    #[default]
    Story,
    Advertisement,
    Editorial,
    Letters,
    Preview,
    BackCover,
    Other,
    Deleted,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FrontCover => "FrontCover",
            Self::InnerCover => "InnerCover",
            Self::Roundup => "Roundup",
            Self::Story => "Story",
            Self::Advertisement => "Advertisement",
            Self::Editorial => "Editorial",
            Self::Letters => "Letters",
            Self::Preview => "Preview",
            Self::BackCover => "BackCover",
            Self::Other => "Other",
            Self::Deleted => "Deleted",
        }
    }
}

/// Per-page information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub image: i32,
    pub page_type: PageType,
    pub double_page: bool,
    pub image_size: i64,
    pub key: String,
    pub bookmark: String,
    pub image_width: i32,
    pub image_height: i32,
}

impl Page {
    pub fn new(image: i32) -> Self {
        Self {
            image,
            page_type: PageType::default(),
            double_page: false,
            image_size: 0,
            key: String::new(),
            bookmark: String::new(),
            image_width: -1,
            image_height: -1,
        }
    }
}
