//! Status spinner for network work, and an operator that keeps prompts
//! readable while the spinner runs.

use std::time::Duration;

use bdtag_scraper::{Operator, StdioOperator};
use indicatif::{ProgressBar, ProgressStyle};

/// Create a ticking spinner, hidden when `quiet`.
pub(crate) fn spinner(quiet: bool, msg: impl Into<String>) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|"),
    );
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Terminal operator that hides the spinner while showing menus and reading
/// answers.
pub(crate) struct SpinnerOperator {
    spinner: ProgressBar,
    inner: StdioOperator,
}

impl SpinnerOperator {
    pub(crate) fn new(spinner: ProgressBar) -> Self {
        Self {
            spinner,
            inner: StdioOperator,
        }
    }
}

impl Operator for SpinnerOperator {
    fn show(&mut self, line: &str) {
        let inner = &mut self.inner;
        self.spinner.suspend(|| inner.show(line));
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        let inner = &mut self.inner;
        self.spinner.suspend(|| inner.ask(prompt))
    }
}
