//! Application settings stored in `~/.config/bdtag/settings.toml`.
//!
//! Every field has a built-in default, so a missing file or a partial file
//! both load. Command-line flags override whatever is loaded here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

pub const DEFAULT_SEARCH_URL: &str = "https://online.bdgest.com/ajax/series";
pub const DEFAULT_SERIES_URL: &str = "https://www.bedetheque.com/serie/index/s/";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:108.0) Gecko/20100101 Firefox/108.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub catalog: CatalogSettings,
    pub scrape: ScrapeSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Default scan root.
    pub root: Option<PathBuf>,
}

/// Remote catalog endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Fuzzy series search, queried with `?term=<key>`.
    pub search_url: String,
    /// Series page prefix, followed by the series id.
    pub series_url: String,
    pub user_agent: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            series_url: DEFAULT_SERIES_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    /// Pause between album page fetches while tagging.
    pub detail_delay_ms: u64,
    pub detail_jitter_ms: u64,
    /// Pause between album page fetches while linking series.
    pub link_delay_ms: u64,
    pub link_jitter_ms: u64,
    /// Value written to `LanguageISO`.
    pub language_iso: String,
    /// Searches the operator may trigger for one title before it is abandoned.
    pub max_searches: usize,
    pub accept_zip: bool,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            detail_delay_ms: 0,
            detail_jitter_ms: 0,
            link_delay_ms: 5000,
            link_jitter_ms: 1000,
            language_iso: "FR".to_string(),
            max_searches: 5,
            accept_zip: false,
        }
    }
}

/// Canonical path to the settings file: `~/.config/bdtag/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("bdtag").join("settings.toml")
}

/// Default directory for the series-linking state files:
/// `~/.local/share/bdtag` (or the platform equivalent).
pub fn default_state_dir() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("bdtag")
}

impl Settings {
    /// Load from the canonical path; a missing file yields the defaults.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&settings_path())
    }

    /// Write atomically through a temporary sibling file.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = self.to_toml()?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolve the library root:
    ///
    /// 1. CLI override (if `Some`)
    /// 2. `library.root` from the settings file
    /// 3. Current working directory
    pub fn resolve_root(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.library.root.clone())
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.scrape.max_searches, 5);
        assert_eq!(settings.catalog.search_url, DEFAULT_SEARCH_URL);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[library]\nroot = \"/srv/bd\"\n\n[scrape]\nlink_delay_ms = 100\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.library.root, Some(PathBuf::from("/srv/bd")));
        assert_eq!(settings.scrape.link_delay_ms, 100);
        assert_eq!(settings.scrape.link_jitter_ms, 1000);
        assert_eq!(settings.scrape.language_iso, "FR");
        assert_eq!(settings.catalog, CatalogSettings::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[scrape]\nmax_searches = \"many\"\n").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let mut settings = Settings::default();
        settings.library.root = Some(PathBuf::from("/comics"));
        settings.scrape.accept_zip = true;

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_resolve_root_priority() {
        let mut settings = Settings::default();
        settings.library.root = Some(PathBuf::from("/from/file"));

        assert_eq!(
            settings.resolve_root(Some(PathBuf::from("/from/cli"))),
            PathBuf::from("/from/cli")
        );
        assert_eq!(settings.resolve_root(None), PathBuf::from("/from/file"));
    }
}
