//! Line-based channel to the person running a batch.
//!
//! Series disambiguation and the "no album found" fallback both go through
//! [`Operator`], so batches can run against a terminal, unattended, or from a
//! script of canned answers.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

pub trait Operator {
    /// Show an informational line.
    fn show(&mut self, line: &str);

    /// Ask a question. `None` means no answer can be had (end of input or
    /// unattended run).
    fn ask(&mut self, prompt: &str) -> Option<String>;
}

/// Prompts on stderr and reads answers from stdin.
#[derive(Debug, Default)]
pub struct StdioOperator;

impl Operator for StdioOperator {
    fn show(&mut self, line: &str) {
        eprintln!("{line}");
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        eprint!("{prompt}: ");
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// Never answers; every question is abandoned.
#[derive(Debug, Default)]
pub struct NonInteractiveOperator;

impl Operator for NonInteractiveOperator {
    fn show(&mut self, line: &str) {
        log::info!("{line}");
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        log::warn!("{prompt}: no operator available, skipping");
        None
    }
}

/// Replays canned answers in order and records what it was shown.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub shown: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Operator for ScriptedOperator {
    fn show(&mut self, line: &str) {
        self.shown.push(line.to_string());
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front()
    }
}
