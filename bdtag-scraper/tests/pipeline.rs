//! File name to embedded ComicInfo, against canned catalog pages.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use bdtag_core::FileHandle;
use bdtag_lib::{ScanOptions, archive, parse_file, scan_comics};
use bdtag_scraper::{
    AlbumExtractor, ArchiveSink, BatchOptions, BatchRunner, BedethequeMarkup, CatalogResolver, CatalogTransport,
    ScrapeError, ScriptedOperator, SearchHit, filter_wanted,
};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const SERIES_PAGE: &str = include_str!("fixtures/serie_blacksad.html");
const ENFER_PAGE: &str = include_str!("fixtures/album_enfer_silence.html");
const AMARILLO_PAGE: &str = include_str!("fixtures/album_amarillo.html");
const BLOCKED_PAGE: &str = include_str!("fixtures/blocked.html");

const SERIES_URL: &str = "https://www.bedetheque.com/serie/index/s/3";
const ENFER_URL: &str = "https://www.bedetheque.com/BD-Blacksad-Tome-4-L-Enfer-le-silence-108957.html";
const AMARILLO_URL: &str = "https://www.bedetheque.com/BD-Blacksad-Tome-5-Amarillo-189535.html";

/// Serves a single series, "Blacksad", and records every request.
struct CannedCatalog {
    pages: HashMap<&'static str, &'static str>,
    requests: RefCell<Vec<String>>,
}

impl CannedCatalog {
    fn new() -> Self {
        Self {
            pages: HashMap::from([
                (SERIES_URL, SERIES_PAGE),
                (ENFER_URL, ENFER_PAGE),
                (AMARILLO_URL, AMARILLO_PAGE),
            ]),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn blocking(url: &'static str) -> Self {
        let mut catalog = Self::new();
        catalog.pages.insert(url, BLOCKED_PAGE);
        catalog
    }
}

impl CatalogTransport for CannedCatalog {
    fn search(&self, term: &str) -> Result<Vec<SearchHit>, ScrapeError> {
        self.requests.borrow_mut().push(format!("search:{term}"));
        let hits = match term {
            "Blacksad" => r#"[{"id": "3", "label": "Blacksad", "value": "Blacksad", "desc": "skin/flags/France.png"}]"#,
            _ => "[]",
        };
        Ok(serde_json::from_str(hits)?)
    }

    fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        self.requests.borrow_mut().push(url.to_string());
        let page = self
            .pages
            .get(url)
            .ok_or_else(|| ScrapeError::transport(format!("404 {url}")))?;
        bdtag_scraper::client::guard_blocked(url, page)?;
        Ok(page.to_string())
    }

    fn series_url(&self, id: &str) -> String {
        format!("https://www.bedetheque.com/serie/index/s/{id}")
    }
}

fn make_cbz(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    writer.start_file("001.jpg", SimpleFileOptions::default()).unwrap();
    writer.write_all(b"page").unwrap();
    writer.finish().unwrap();
}

#[test]
fn test_blacksad_end_to_end() {
    let root = Path::new("/library");
    let file = FileHandle::new(root.join("Blacksad - T04 - Amarillo.cbz"), root);
    let parsed = parse_file(&file);
    assert_eq!(parsed.title(), "Blacksad");
    assert_eq!(parsed.number.as_deref(), Some("4"));

    let catalog = CannedCatalog::new();
    let mut operator = ScriptedOperator::default();
    let mut resolver = CatalogResolver::new(&catalog, &mut operator, 5);
    let series = resolver.resolve(parsed.title()).unwrap().unwrap();
    assert_eq!(series.title, "Blacksad");
    assert_eq!(series.url, SERIES_URL);
    assert!(operator.prompts.is_empty());

    let extractor = AlbumExtractor::new(&catalog, &BedethequeMarkup);
    let wanted = ["4".to_string()].into_iter().collect();
    let stubs = filter_wanted(extractor.fetch_albums(&series).unwrap(), &wanted);
    assert_eq!(stubs.len(), 1);
    assert_eq!(stubs[0].number, "4");

    let record = extractor.fetch_detail(&stubs[0]).unwrap();
    let xml = bdtag_comicinfo::to_xml(&record).unwrap();
    assert!(xml.contains("<Series>Blacksad</Series>"));
    assert!(xml.contains("<Number>4</Number>"));
    assert!(xml.contains("<Writer>Juan Diaz Canales</Writer>"));
    assert!(bdtag_comicinfo::validate(&xml).is_ok());
}

#[test]
fn test_batch_embeds_comicinfo() {
    let library = tempfile::tempdir().unwrap();
    make_cbz(&library.path().join("Blacksad/Blacksad - T04.cbz"));
    make_cbz(&library.path().join("Blacksad/Blacksad - T05.cbz"));

    let files = scan_comics(library.path(), &ScanOptions::default()).unwrap();
    assert_eq!(files.len(), 2);

    let catalog = CannedCatalog::new();
    let mut operator = ScriptedOperator::default();
    let mut sink = ArchiveSink;
    let report = BatchRunner::new(&catalog, &BedethequeMarkup, &mut operator, &mut sink, BatchOptions::default())
        .run(files);
    assert_eq!(report.summary().tagged, 2);

    let t04 = library.path().join("Blacksad/Blacksad - T04.cbz");
    assert_eq!(archive::read_web_url(&t04).unwrap().as_deref(), Some(ENFER_URL));

    // Tagged archives are left out of the next scan.
    let rescanned = scan_comics(library.path(), &ScanOptions::default()).unwrap();
    assert!(rescanned.is_empty());
}

#[test]
fn test_blocked_session_stops_batch() {
    let library = tempfile::tempdir().unwrap();
    make_cbz(&library.path().join("Blacksad/Blacksad - T04.cbz"));
    make_cbz(&library.path().join("Blacksad/Blacksad - T05.cbz"));
    let files = scan_comics(library.path(), &ScanOptions::default()).unwrap();

    let catalog = CannedCatalog::blocking(ENFER_URL);
    let mut operator = ScriptedOperator::default();
    let mut sink = ArchiveSink;
    let report = BatchRunner::new(&catalog, &BedethequeMarkup, &mut operator, &mut sink, BatchOptions::default())
        .run(files);

    assert!(report.fatal.is_some());
    assert_eq!(report.summary().tagged, 0);
    assert!(!catalog.requests.borrow().iter().any(|r| r == AMARILLO_URL));
    let t05 = library.path().join("Blacksad/Blacksad - T05.cbz");
    assert!(!archive::has_comicinfo(&t05).unwrap());
}
