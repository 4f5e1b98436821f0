//! Series linking: walk tagged archives, follow their catalog URL to the
//! series page and record which series the catalog lists as related.
//!
//! Progress lives in two JSON files in a state directory, rewritten after
//! every archive so an interrupted run picks up where it stopped:
//!
//! - `linked_series.json`: `{ "<id>": { "id", "name", "linked_series" } }`
//! - `treated_folders.json`: folders whose archives were already visited

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use bdtag_core::FileHandle;
use bdtag_lib::archive;
use serde::{Deserialize, Serialize};

use crate::client::{CatalogTransport, Pacer};
use crate::error::ScrapeError;
use crate::markup::{SiteMarkup, is_catalog_url, series_id_from_url};

pub const LINKED_SERIES_FILE: &str = "linked_series.json";
pub const TREATED_FOLDERS_FILE: &str = "treated_folders.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedSeries {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub linked_series: Vec<String>,
    /// Set by hand to keep a series out of any link graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlinked: Option<bool>,
}

/// Persistent state of a linking run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkState {
    pub series: BTreeMap<String, LinkedSeries>,
    pub treated_folders: BTreeSet<PathBuf>,
}

impl LinkState {
    /// Load the state files from `dir`. Missing files mean an empty state.
    pub fn load(dir: &Path) -> Result<Self, ScrapeError> {
        let series = read_json(&dir.join(LINKED_SERIES_FILE))?.unwrap_or_default();
        let treated_folders = read_json(&dir.join(TREATED_FOLDERS_FILE))?.unwrap_or_default();
        Ok(Self {
            series,
            treated_folders,
        })
    }

    pub fn save(&self, dir: &Path) -> Result<(), ScrapeError> {
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join(LINKED_SERIES_FILE), serde_json::to_string_pretty(&self.series)?)?;
        std::fs::write(
            dir.join(TREATED_FOLDERS_FILE),
            serde_json::to_string_pretty(&self.treated_folders)?,
        )?;
        Ok(())
    }

    /// Record the related series of `id`, extending any earlier entry.
    pub fn merge(&mut self, id: &str, name: &str, linked: Vec<String>) {
        match self.series.get_mut(id) {
            Some(entry) => {
                for other in linked {
                    if !entry.linked_series.contains(&other) {
                        entry.linked_series.push(other);
                    }
                }
            }
            None => {
                self.series.insert(
                    id.to_string(),
                    LinkedSeries {
                        id: id.to_string(),
                        name: name.to_string(),
                        linked_series: linked,
                        unlinked: None,
                    },
                );
            }
        }
    }

    pub fn is_treated(&self, folder: &Path) -> bool {
        self.treated_folders.contains(folder)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, ScrapeError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Counters of a linking run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkSummary {
    pub visited: usize,
    /// Archives skipped because their folder was already treated.
    pub skipped: usize,
    pub linked: usize,
    /// Archives without a catalog URL or whose series lists no relation.
    pub not_linked: usize,
    pub errors: usize,
}

pub struct SeriesLinker<'a> {
    transport: &'a dyn CatalogTransport,
    markup: &'a dyn SiteMarkup,
    pacer: Pacer,
    state_dir: PathBuf,
}

impl<'a> SeriesLinker<'a> {
    pub fn new(transport: &'a dyn CatalogTransport, markup: &'a dyn SiteMarkup, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            markup,
            pacer: Pacer::none(),
            state_dir: state_dir.into(),
        }
    }

    /// Wait after every album page fetch.
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Visit `archives`, updating and saving `state` after each one.
    ///
    /// Only an access block stops the run; the state saved so far is kept.
    pub fn run(&self, archives: &[FileHandle], state: &mut LinkState) -> Result<LinkSummary, ScrapeError> {
        let mut summary = LinkSummary::default();

        for file in archives {
            let folder = file.path.parent().map(Path::to_path_buf).unwrap_or_default();
            if state.is_treated(&folder) {
                summary.skipped += 1;
                continue;
            }
            summary.visited += 1;
            log::info!("{}", file.display_name());

            match self.link_archive(&file.path) {
                Ok(Some((id, name, linked))) => {
                    log::debug!("Series {id} ({name}) links to {linked:?}");
                    state.merge(&id, &name, linked);
                    summary.linked += 1;
                }
                Ok(None) => summary.not_linked += 1,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    log::warn!("Could not link {}: {e}", file.display_name());
                    summary.errors += 1;
                }
            }

            state.treated_folders.insert(folder);
            state.save(&self.state_dir)?;
        }

        Ok(summary)
    }

    /// Series id, name and related ids for one archive, when its `Web`
    /// element points into the catalog.
    fn link_archive(&self, path: &Path) -> Result<Option<(String, String, Vec<String>)>, ScrapeError> {
        let Some(url) = archive::read_web_url(path)? else {
            return Ok(None);
        };
        if !is_catalog_url(&url) {
            log::debug!("Not a catalog URL: {url}");
            return Ok(None);
        }

        let album_page = self.transport.fetch_page(&url)?;
        self.pacer.pause();

        let Some(link) = self.markup.series_link(&album_page) else {
            log::warn!("Could not find title block for {url}");
            return Ok(None);
        };
        if !is_catalog_url(&link.url) {
            return Ok(None);
        }
        let Some(id) = series_id_from_url(&link.url) else {
            log::warn!("Unexpected series URL {}", link.url);
            return Ok(None);
        };

        let series_page = self.transport.fetch_page(&link.url)?;
        let Some(linked) = self.markup.linked_series_ids(&series_page) else {
            log::debug!("{} lists no related series", link.name);
            return Ok(None);
        };

        Ok(Some((id, link.name, linked)))
    }
}

#[cfg(test)]
#[path = "tests/links_tests.rs"]
mod tests;
