//! Shared domain types for bdtag: scanned files, parsed file names,
//! catalog candidates and album records.

pub mod album;
pub mod file;
pub mod values;

pub use album::{AlbumRecord, AlbumStub, Contributor, ContributorRole, SeriesCandidate, UNSET};
pub use file::{FileHandle, FileIssue, ParsedFileName};
pub use values::{AgeRating, Manga, Page, PageType, YesNo};
