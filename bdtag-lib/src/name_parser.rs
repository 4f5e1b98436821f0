//! Heuristics for reading a series title and an issue number out of a comic
//! archive's file name.
//!
//! File names in a typical collection look like:
//! ```text
//! Blacksad - T04 - Amarillo
//! Spirou et Fantasio 12 - Le Nid des Marsupilamis
//! Thorgal Tome 3
//! XIII #1 - Le jour du soleil noir
//! ```
//!
//! The number is read from the file stem only; the title is read from the
//! stem first and then from the enclosing directories, nearest first.

use std::sync::LazyLock;

use bdtag_core::{FileHandle, ParsedFileName};
use regex::Regex;

/// Issue-number patterns in priority order. Group 1 is the number, the whole
/// match is the token stripped from title candidates.
static NUMBER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r" T([0-9]+)",
        r"([0-9]+)",
        r"(?i: tome)\s*([0-9]+)",
        r" Vol(?:ume)?\s?([0-9]+)",
        r" -\s*([0-9]+)\s*-",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static number pattern"))
    .collect()
});

/// `Title #12 ...`: the file was already named in the canonical form.
static ALREADY_FORMATTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*) #[0-9]+").expect("static formatted pattern"));

static LEADING_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/?([a-zA-Z][\w '&.-]+)").expect("static title pattern"));

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("static whitespace pattern"));

/// Trailing separators removed from a title candidate, each at most once and
/// in this order. The fourth entry is a UTF-8 em dash read back as
/// Windows-1252.
const TRAILING_SEPARATORS: &[&str] = &["-", "_", ":", "\u{e2}\u{20ac}\u{201d}", "\u{2013}", "."];

/// Separator between title and subtitle in file names.
const TITLE_SEPARATOR: &str = " - ";

/// Issue number found in a file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueNumber {
    /// Canonical form: leading zeros stripped when purely numeric.
    pub number: String,
    /// Exact matched text, markers included.
    pub token: String,
}

/// Parse a scanned file's name.
pub fn parse_file(handle: &FileHandle) -> ParsedFileName {
    parse_file_name(&handle.stem, handle.ancestors.as_slice())
}

/// Parse a file stem and its ancestor directory names (nearest first).
pub fn parse_file_name<S: AsRef<str>>(stem: &str, ancestors: &[S]) -> ParsedFileName {
    let issue = extract_number(stem);
    let token = issue.as_ref().map(|i| i.token.as_str());
    let regex_title = extract_title(stem, ancestors, token).unwrap_or_default();

    ParsedFileName {
        number: issue.as_ref().map(|i| i.number.clone()),
        number_token: issue.map(|i| i.token),
        regex_title,
        suggested_title: None,
    }
}

/// Find the issue number in a file stem.
///
/// Patterns are tried in order and the first match of each is considered.
/// A four-digit match starting with "19" or "20" is taken for a year, and
/// the next pattern is tried instead; the rejected pattern is not searched
/// again further along the stem.
pub fn extract_number(stem: &str) -> Option<IssueNumber> {
    for pattern in NUMBER_PATTERNS.iter() {
        let Some(caps) = pattern.captures(stem) else {
            continue;
        };
        let (Some(token), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let digits = digits.as_str();

        if looks_like_year(digits) {
            log::trace!("Skipping probable year {digits} in {stem:?}");
            continue;
        }

        return Some(IssueNumber {
            number: canonical_number(digits),
            token: token.as_str().to_string(),
        });
    }
    None
}

fn looks_like_year(digits: &str) -> bool {
    digits.len() == 4 && (digits.starts_with("19") || digits.starts_with("20"))
}

/// Strip leading zeros from a purely numeric label; other labels are kept.
pub fn canonical_number(label: &str) -> String {
    if !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()) {
        let trimmed = label.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        label.to_string()
    }
}

/// Find the title, trying the stem and then each ancestor directory.
///
/// `token` is the matched issue-number text, cut from every candidate.
pub fn extract_title<S: AsRef<str>>(stem: &str, ancestors: &[S], token: Option<&str>) -> Option<String> {
    if let Some(caps) = ALREADY_FORMATTED.captures(stem) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    std::iter::once(stem)
        .chain(ancestors.iter().map(|a| a.as_ref()))
        .find_map(|candidate| title_from_candidate(candidate, token))
}

fn title_from_candidate(candidate: &str, token: Option<&str>) -> Option<String> {
    let mut name = candidate;
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        name = name.split(token).next().unwrap_or_default();
    }
    name = name.trim();
    name = name.split(TITLE_SEPARATOR).next().unwrap_or_default().trim();

    let mut name = MULTI_SPACE.replace_all(name, " ").into_owned();
    for suffix in TRAILING_SEPARATORS {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.to_string();
        }
        name = name.trim().to_string();
    }

    LEADING_WORDS
        .captures(&name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
#[path = "tests/name_parser_tests.rs"]
mod tests;
