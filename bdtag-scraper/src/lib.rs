//! Catalog side of bdtag: resolve titles to bedetheque.com series, scrape
//! album pages into records and drive tagging and linking batches.

pub mod batch;
pub mod client;
pub mod error;
pub mod extract;
pub mod links;
pub mod markup;
pub mod operator;
pub mod report;
pub mod resolve;
pub mod scrape;
pub mod types;

pub use batch::{ArchiveSink, BatchEvent, BatchOptions, BatchRunner, DryRunSink, RecordSink, TitleBucket, group_by_title, parse_files};
pub use client::{BedethequeClient, CatalogTransport, Pacer};
pub use error::ScrapeError;
pub use extract::{AlbumExtractor, filter_wanted};
pub use links::{LinkState, LinkSummary, LinkedSeries, SeriesLinker};
pub use markup::{AlbumList, BedethequeMarkup, SiteMarkup};
pub use operator::{NonInteractiveOperator, Operator, ScriptedOperator, StdioOperator};
pub use report::{BatchReport, REPORT_FILE_NAME, ReportEntry, ReportSummary};
pub use resolve::CatalogResolver;
pub use scrape::{TitleScrape, scrape_title};
pub use types::SearchHit;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
