//! Tagging batch: group scanned files by title, scrape each title once and
//! hand every matched record to a [`RecordSink`].
//!
//! Failures stay local to a file or a title bucket, except
//! [`ScrapeError::AccessBlocked`], which stops the whole batch.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::mpsc;

use bdtag_core::{AlbumRecord, FileHandle, ParsedFileName};
use bdtag_lib::{ArchiveError, archive, parse_file};

use crate::client::{CatalogTransport, Pacer};
use crate::error::ScrapeError;
use crate::extract::AlbumExtractor;
use crate::markup::SiteMarkup;
use crate::operator::Operator;
use crate::report::{BatchReport, ReportEntry};
use crate::resolve::CatalogResolver;
use crate::scrape::{TitleScrape, scrape_title};

/// Prompt used when a title yields no album.
pub const FALLBACK_PROMPT: &str = "Title for files";

/// Files sharing one derived title, searched together.
#[derive(Debug, Clone)]
pub struct TitleBucket {
    pub title: String,
    pub files: Vec<(FileHandle, ParsedFileName)>,
}

impl TitleBucket {
    /// Issue numbers to fetch. Empty when no file carries one, meaning
    /// every album of the series.
    pub fn wanted_numbers(&self) -> HashSet<String> {
        self.files
            .iter()
            .filter_map(|(_, parsed)| parsed.number.clone())
            .collect()
    }
}

/// Parse the name of every file.
pub fn parse_files(files: Vec<FileHandle>) -> Vec<(FileHandle, ParsedFileName)> {
    files
        .into_iter()
        .map(|file| {
            let parsed = parse_file(&file);
            (file, parsed)
        })
        .collect()
}

/// Group parsed files by title, in first-seen order.
///
/// Files without a title are returned separately; they cannot be searched.
pub fn group_by_title(parsed: Vec<(FileHandle, ParsedFileName)>) -> (Vec<TitleBucket>, Vec<FileHandle>) {
    let mut buckets: Vec<TitleBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut untitled = Vec::new();

    for (file, name) in parsed {
        let title = name.title().to_string();
        if title.is_empty() {
            untitled.push(file);
            continue;
        }
        match index.get(&title) {
            Some(&i) => buckets[i].files.push((file, name)),
            None => {
                index.insert(title.clone(), buckets.len());
                buckets.push(TitleBucket {
                    title,
                    files: vec![(file, name)],
                });
            }
        }
    }

    (buckets, untitled)
}

/// Pair each file of `bucket` with the record carrying its issue number.
///
/// When the bucket holds a single file and a single record was fetched, the
/// file also gets the record if it has no number, or if the record is the
/// numberless album of a single-album series. Everything else is returned as
/// unmatched.
pub fn match_records<'b>(
    bucket: &'b TitleBucket,
    records: &[AlbumRecord],
    single_album: bool,
) -> (Vec<(&'b FileHandle, AlbumRecord)>, Vec<(&'b FileHandle, Option<String>)>) {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    let lone = match records {
        [record] if bucket.files.len() == 1 => Some(record),
        _ => None,
    };

    for (file, parsed) in &bucket.files {
        let by_number = parsed.number.as_deref().and_then(|number| {
            records
                .iter()
                .find(|record| record.number.eq_ignore_ascii_case(number))
        });
        let fallback = lone.filter(|record| parsed.number.is_none() || (single_album && record.number.is_empty()));
        match by_number.or(fallback) {
            Some(record) => matched.push((file, record.clone())),
            None => unmatched.push((file, parsed.number.clone())),
        }
    }

    (matched, unmatched)
}

/// Receives every validated document the batch produces.
pub trait RecordSink {
    fn write(&mut self, file: &FileHandle, record: &AlbumRecord, xml: &str) -> Result<(), ScrapeError>;
}

/// Embeds documents into the archives.
#[derive(Debug, Default)]
pub struct ArchiveSink;

impl RecordSink for ArchiveSink {
    fn write(&mut self, file: &FileHandle, record: &AlbumRecord, xml: &str) -> Result<(), ScrapeError> {
        log::info!("Adding {record} to {}", file.display_name());
        archive::embed_comicinfo(&file.path, xml)?;
        Ok(())
    }
}

/// Keeps documents in memory instead of writing them.
#[derive(Debug, Default)]
pub struct DryRunSink {
    pub documents: Vec<(PathBuf, String)>,
}

impl RecordSink for DryRunSink {
    fn write(&mut self, file: &FileHandle, _record: &AlbumRecord, xml: &str) -> Result<(), ScrapeError> {
        self.documents.push((file.path.clone(), xml.to_string()));
        Ok(())
    }
}

/// Progress events emitted during a batch, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// File names parsed and grouped.
    Grouped { files: usize, titles: usize },
    /// A title bucket has started.
    TitleStarted { index: usize, total: usize, title: String },
    FileTagged { file: String, album: String },
    /// The file was left untouched (non-fatal).
    FileFailed { file: String, reason: String },
    /// A session-wide failure. The batch stops.
    FatalError { message: String },
    Done,
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub max_searches: usize,
    pub language_iso: String,
    /// Wait between album detail fetches.
    pub detail_pacer: Pacer,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_searches: 5,
            language_iso: "FR".to_string(),
            detail_pacer: Pacer::none(),
        }
    }
}

/// Runs a tagging batch over one catalog session.
pub struct BatchRunner<'a> {
    transport: &'a dyn CatalogTransport,
    markup: &'a dyn SiteMarkup,
    operator: &'a mut dyn Operator,
    sink: &'a mut dyn RecordSink,
    options: BatchOptions,
    events: Option<mpsc::Sender<BatchEvent>>,
}

enum BucketOutcome {
    Scraped(TitleScrape),
    /// The title did not resolve to a series.
    NoSeries,
    /// The series resolved but no wanted album was fetched.
    NoAlbum(TitleScrape),
}

impl BucketOutcome {
    fn found_nothing(&self) -> bool {
        !matches!(self, Self::Scraped(_))
    }
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        transport: &'a dyn CatalogTransport,
        markup: &'a dyn SiteMarkup,
        operator: &'a mut dyn Operator,
        sink: &'a mut dyn RecordSink,
        options: BatchOptions,
    ) -> Self {
        Self {
            transport,
            markup,
            operator,
            sink,
            options,
            events: None,
        }
    }

    pub fn with_events(mut self, events: mpsc::Sender<BatchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    /// Tag `files`. Every file ends up with exactly one report entry, unless
    /// the batch stopped early; [`BatchReport::fatal`] says why.
    pub fn run(&mut self, files: Vec<FileHandle>) -> BatchReport {
        let mut report = BatchReport::new();
        let (buckets, untitled) = group_by_title(parse_files(files));
        self.emit(BatchEvent::Grouped {
            files: buckets.iter().map(|b| b.files.len()).sum::<usize>() + untitled.len(),
            titles: buckets.len(),
        });

        for file in untitled {
            log::warn!("No title determined for {}", file.display_name());
            self.emit(BatchEvent::FileFailed {
                file: file.display_name(),
                reason: "no title determined".to_string(),
            });
            report.add(ReportEntry::NoTitle {
                file: file.display_name(),
            });
        }

        let total = buckets.len();
        for (index, bucket) in buckets.iter().enumerate() {
            log::info!("Scraping {}", bucket.title);
            self.emit(BatchEvent::TitleStarted {
                index,
                total,
                title: bucket.title.clone(),
            });

            if let Err(e) = self.run_bucket(bucket, &mut report) {
                let message = e.to_string();
                log::error!("Stopping batch: {message}");
                self.emit(BatchEvent::FatalError {
                    message: message.clone(),
                });
                report.fatal = Some(message);
                break;
            }
        }

        self.emit(BatchEvent::Done);
        report
    }

    /// Process one bucket. Only fatal errors are returned.
    fn run_bucket(&mut self, bucket: &TitleBucket, report: &mut BatchReport) -> Result<(), ScrapeError> {
        let wanted = bucket.wanted_numbers();

        let mut searched = bucket.title.clone();
        let mut outcome = self.scrape_bucket(&searched, &wanted);

        if outcome.as_ref().is_ok_and(BucketOutcome::found_nothing) {
            for (file, _) in &bucket.files {
                log::warn!("No album found for {}", file.display_name());
            }
            match self.operator.ask(FALLBACK_PROMPT) {
                Some(title) if !title.trim().is_empty() => {
                    searched = title.trim().to_string();
                    outcome = self.scrape_bucket(&searched, &wanted);
                }
                _ => {}
            }
        }

        match outcome {
            Ok(BucketOutcome::Scraped(scrape)) => {
                self.write_bucket(bucket, &scrape, report);
                Ok(())
            }
            Ok(BucketOutcome::NoAlbum(scrape)) => {
                for (file, _) in &bucket.files {
                    self.emit(BatchEvent::FileFailed {
                        file: file.display_name(),
                        reason: format!("no album fetched from {}", scrape.series.title),
                    });
                    report.add(ReportEntry::NoAlbum {
                        file: file.display_name(),
                        series: scrape.series.title.clone(),
                    });
                }
                Ok(())
            }
            Ok(BucketOutcome::NoSeries) => {
                for (file, _) in &bucket.files {
                    self.emit(BatchEvent::FileFailed {
                        file: file.display_name(),
                        reason: format!("no series found for \"{searched}\""),
                    });
                    report.add(ReportEntry::NoSeries {
                        file: file.display_name(),
                        title: searched.clone(),
                    });
                }
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                log::error!("Scraping {} failed: {e}", bucket.title);
                for (file, _) in &bucket.files {
                    self.fail(report, file, e.to_string());
                }
                Ok(())
            }
        }
    }

    fn scrape_bucket(&mut self, title: &str, wanted: &HashSet<String>) -> Result<BucketOutcome, ScrapeError> {
        let extractor = AlbumExtractor::new(self.transport, self.markup)
            .with_pacer(self.options.detail_pacer)
            .with_language(self.options.language_iso.clone());
        let mut resolver = CatalogResolver::new(self.transport, &mut *self.operator, self.options.max_searches);

        match scrape_title(&mut resolver, &extractor, title, wanted) {
            Ok(scrape) if scrape.records.is_empty() => Ok(BucketOutcome::NoAlbum(scrape)),
            Ok(scrape) => Ok(BucketOutcome::Scraped(scrape)),
            Err(ScrapeError::NoSeriesFound(_)) => Ok(BucketOutcome::NoSeries),
            Err(e) => Err(e),
        }
    }

    fn write_bucket(&mut self, bucket: &TitleBucket, scrape: &TitleScrape, report: &mut BatchReport) {
        let (matched, unmatched) = match_records(bucket, &scrape.records, scrape.single_album);

        for (file, number) in unmatched {
            log::warn!("No fetched album matches {}", file.display_name());
            self.emit(BatchEvent::FileFailed {
                file: file.display_name(),
                reason: format!("no matching album in {}", scrape.series.title),
            });
            report.add(ReportEntry::Unmatched {
                file: file.display_name(),
                series: scrape.series.title.clone(),
                number,
            });
        }

        for (file, record) in matched {
            let xml = match bdtag_comicinfo::to_xml(&record) {
                Ok(xml) => xml,
                Err(e) => {
                    log::error!("Invalid ComicInfo for {record}: {e}");
                    self.fail(report, file, e.to_string());
                    continue;
                }
            };

            match self.sink.write(file, &record, &xml) {
                Ok(()) => {
                    self.emit(BatchEvent::FileTagged {
                        file: file.display_name(),
                        album: record.to_string(),
                    });
                    report.add(ReportEntry::Tagged {
                        file: file.display_name(),
                        album: record.to_string(),
                        url: record.url.clone(),
                    });
                }
                Err(ScrapeError::Archive(ArchiveError::AlreadyTagged(_))) => {
                    log::info!("{} already holds a ComicInfo.xml", file.display_name());
                    report.add(ReportEntry::Skipped {
                        file: file.display_name(),
                        reason: "already tagged".to_string(),
                    });
                }
                Err(e) => {
                    log::error!("Could not write to {}: {e}", file.display_name());
                    self.fail(report, file, e.to_string());
                }
            }
        }
    }

    fn fail(&self, report: &mut BatchReport, file: &FileHandle, message: String) {
        self.emit(BatchEvent::FileFailed {
            file: file.display_name(),
            reason: message.clone(),
        });
        report.add(ReportEntry::Failed {
            file: file.display_name(),
            message,
        });
    }
}

#[cfg(test)]
#[path = "tests/batch_tests.rs"]
mod tests;
