//! Series resolution: from a file title to one catalog series.
//!
//! Resolution runs as a small state machine:
//!
//! ```text
//! Searching ──exact match──▶ Resolved
//!     │
//!     └─otherwise──▶ PresentingChoices ──pick──▶ Resolved
//!                        │        └──quit / bad input──▶ Abandoned
//!                        └─other──▶ AwaitingTitle ──title──▶ Searching
//! ```
//!
//! The number of searches per title is bounded, so an operator cannot loop
//! forever on "other".

use bdtag_core::SeriesCandidate;
use bdtag_lib::normalize::search_key;

use crate::client::CatalogTransport;
use crate::error::ScrapeError;
use crate::operator::Operator;

pub const CHOICE_PROMPT: &str = "Choose a number";
pub const TITLE_PROMPT: &str = "Enter a name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveState {
    Searching { title: String },
    PresentingChoices { title: String, candidates: Vec<SeriesCandidate> },
    AwaitingTitle,
    Resolved(SeriesCandidate),
    Abandoned,
}

/// What an operator's menu answer means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Zero-based index into the listed candidates.
    Pick(usize),
    EnterTitle,
    Quit,
}

/// Map a menu answer to an action.
///
/// `1..=n` picks a candidate, `n + 1` asks for another title and `n + 2`
/// quits. Anything else, non-numeric input included, quits.
pub fn interpret_choice(input: &str, candidate_count: usize) -> MenuAction {
    let Ok(choice) = input.trim().parse::<usize>() else {
        return MenuAction::Quit;
    };
    match choice {
        0 => MenuAction::Quit,
        n if n <= candidate_count => MenuAction::Pick(n - 1),
        n if n == candidate_count + 1 => MenuAction::EnterTitle,
        _ => MenuAction::Quit,
    }
}

/// Lines of the disambiguation menu.
pub fn menu_lines(candidates: &[SeriesCandidate]) -> Vec<String> {
    let mut lines = Vec::with_capacity(candidates.len() + 3);
    if candidates.is_empty() {
        lines.push("No series found".to_string());
        lines.push("1: enter a name".to_string());
    } else {
        lines.push("Found those series".to_string());
        for (index, candidate) in candidates.iter().enumerate() {
            lines.push(format!("{}: {}", index + 1, candidate.title));
        }
        lines.push(format!("{}: other", candidates.len() + 1));
    }
    lines.push(format!("{}: quit", candidates.len() + 2));
    lines
}

/// The single candidate whose title equals `title`, ignoring case.
pub fn exact_match(title: &str, candidates: &[SeriesCandidate]) -> Option<SeriesCandidate> {
    let wanted = title.to_lowercase();
    let mut matches = candidates.iter().filter(|c| c.title.to_lowercase() == wanted);
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.clone()),
        _ => None,
    }
}

pub struct CatalogResolver<'a> {
    transport: &'a dyn CatalogTransport,
    operator: &'a mut dyn Operator,
    max_searches: usize,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(transport: &'a dyn CatalogTransport, operator: &'a mut dyn Operator, max_searches: usize) -> Self {
        Self {
            transport,
            operator,
            max_searches: max_searches.max(1),
        }
    }

    /// Search the catalog for `title` and return its candidates.
    pub fn search(&self, title: &str) -> Result<Vec<SeriesCandidate>, ScrapeError> {
        let key = search_key(title);
        log::debug!("Searching catalog for {title:?} with key {key:?}");

        let hits = self.transport.search(&key)?;
        Ok(hits
            .into_iter()
            .map(|hit| SeriesCandidate {
                url: self.transport.series_url(&hit.id),
                title: hit.display_title().to_string(),
                id: hit.id,
            })
            .collect())
    }

    /// Resolve `title` to one series, asking the operator when the search is
    /// not conclusive. `Ok(None)` means the operator gave up.
    pub fn resolve(&mut self, title: &str) -> Result<Option<SeriesCandidate>, ScrapeError> {
        let mut state = ResolveState::Searching {
            title: title.to_string(),
        };
        let mut searches = 0;

        loop {
            state = match state {
                ResolveState::Searching { title } => {
                    if searches >= self.max_searches {
                        log::warn!("Giving up on {title:?} after {searches} searches");
                        ResolveState::Abandoned
                    } else {
                        searches += 1;
                        let candidates = self.search(&title)?;
                        match exact_match(&title, &candidates) {
                            Some(candidate) => ResolveState::Resolved(candidate),
                            None => ResolveState::PresentingChoices { title, candidates },
                        }
                    }
                }
                ResolveState::PresentingChoices { title, candidates } => {
                    log::warn!("No series found for {title}");
                    for line in menu_lines(&candidates) {
                        self.operator.show(&line);
                    }
                    match self.operator.ask(CHOICE_PROMPT) {
                        None => ResolveState::Abandoned,
                        Some(answer) => match interpret_choice(&answer, candidates.len()) {
                            MenuAction::Pick(index) => candidates
                                .into_iter()
                                .nth(index)
                                .map(ResolveState::Resolved)
                                .unwrap_or(ResolveState::Abandoned),
                            MenuAction::EnterTitle => ResolveState::AwaitingTitle,
                            MenuAction::Quit => ResolveState::Abandoned,
                        },
                    }
                }
                ResolveState::AwaitingTitle => match self.operator.ask(TITLE_PROMPT) {
                    Some(answer) if !answer.trim().is_empty() => ResolveState::Searching {
                        title: answer.trim().to_string(),
                    },
                    _ => ResolveState::Abandoned,
                },
                ResolveState::Resolved(candidate) => {
                    log::info!("Resolved {title:?} to {} ({})", candidate.title, candidate.url);
                    return Ok(Some(candidate));
                }
                ResolveState::Abandoned => return Ok(None),
            };
        }
    }
}

#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod tests;
