use std::path::{Path, PathBuf};

use serde::Serialize;

/// One candidate comic archive found under a scan root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHandle {
    /// Absolute (or root-joined) path to the archive.
    pub path: PathBuf,
    /// Path relative to the scan root.
    pub relative_path: PathBuf,
    /// File name without extension.
    pub stem: String,
    /// Directory names between the root and the file, nearest first.
    pub ancestors: Vec<String>,
    /// Extension without the leading dot (e.g. "cbz").
    pub extension: String,
}

impl FileHandle {
    /// Build a handle for `path`, found while scanning `root`.
    ///
    /// When `path` does not live under `root`, the whole path is treated as
    /// relative so its directory names still feed the title heuristics.
    pub fn new(path: impl Into<PathBuf>, root: &Path) -> Self {
        let path = path.into();
        let relative_path = path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        let ancestors = relative_path
            .parent()
            .map(|parent| {
                parent
                    .ancestors()
                    .filter_map(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .filter(|n| !n.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            path,
            relative_path,
            stem,
            ancestors,
            extension,
        }
    }

    /// Display form used in logs and reports.
    pub fn display_name(&self) -> String {
        self.relative_path.display().to_string()
    }
}

/// A soft problem found while reading a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileIssue {
    /// No issue number could be read; the file can still be tagged when its
    /// bucket resolves to a single album.
    NoNumberFound,
    /// No title could be read; the file is excluded from resolution.
    NoTitleFound,
}

impl std::fmt::Display for FileIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoNumberFound => write!(f, "no issue number found"),
            Self::NoTitleFound => write!(f, "no title determined"),
        }
    }
}

/// What the file-name heuristics extracted from a [`FileHandle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedFileName {
    /// Canonical issue number (leading zeros stripped when numeric).
    pub number: Option<String>,
    /// Exact text the number was matched in, markers included (e.g. " T04").
    pub number_token: Option<String>,
    /// Title guessed by the file-name patterns.
    pub regex_title: String,
    /// Title supplied by another extraction source; wins when non-empty.
    pub suggested_title: Option<String>,
}

impl ParsedFileName {
    /// The title used for grouping and searching.
    pub fn title(&self) -> &str {
        match self.suggested_title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => &self.regex_title,
        }
    }

    /// Override the regex guess with a title from another source.
    pub fn with_suggested_title(mut self, title: impl Into<String>) -> Self {
        self.suggested_title = Some(title.into());
        self
    }

    pub fn issues(&self) -> Vec<FileIssue> {
        let mut issues = Vec::new();
        if self.number.is_none() {
            issues.push(FileIssue::NoNumberFound);
        }
        if self.title().is_empty() {
            issues.push(FileIssue::NoTitleFound);
        }
        issues
    }
}

impl std::fmt::Display for ParsedFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.number {
            Some(number) => write!(f, "{} - {}", self.title(), number),
            None => write!(f, "{}", self.title()),
        }
    }
}

#[cfg(test)]
#[path = "tests/file_tests.rs"]
mod tests;
