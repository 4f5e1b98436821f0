use std::path::Path;

/// Default report file name, written under the scan root.
pub const REPORT_FILE_NAME: &str = "bdtag-report.txt";

/// What happened to one file during a tagging batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    Tagged {
        file: String,
        album: String,
        url: String,
    },
    /// The series resolved but no fetched album matched the file's number.
    Unmatched {
        file: String,
        series: String,
        number: Option<String>,
    },
    NoTitle {
        file: String,
    },
    NoSeries {
        file: String,
        title: String,
    },
    /// The series resolved but none of the wanted albums could be fetched.
    NoAlbum {
        file: String,
        series: String,
    },
    Failed {
        file: String,
        message: String,
    },
    Skipped {
        file: String,
        reason: String,
    },
}

/// Collects batch results and writes the report file.
#[derive(Debug, Default)]
pub struct BatchReport {
    entries: Vec<ReportEntry>,
    /// Set when the batch stopped early on a session-wide failure.
    pub fatal: Option<String>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for entry in &self.entries {
            match entry {
                ReportEntry::Tagged { .. } => summary.tagged += 1,
                ReportEntry::Unmatched { .. } => summary.unmatched += 1,
                ReportEntry::NoTitle { .. } => summary.no_title += 1,
                ReportEntry::NoSeries { .. } => summary.no_series += 1,
                ReportEntry::NoAlbum { .. } => summary.no_album += 1,
                ReportEntry::Failed { .. } => summary.failed += 1,
                ReportEntry::Skipped { .. } => summary.skipped += 1,
            }
        }
        summary
    }

    /// Write the report to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        let summary = self.summary();

        writeln!(file, "=== bdtag Report ===")?;
        writeln!(file, "Date: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        if let Some(message) = &self.fatal {
            writeln!(file, "Stopped early: {message}")?;
        }
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "Tagged: {}", summary.tagged)?;
        writeln!(file, "Unmatched: {}", summary.unmatched)?;
        writeln!(file, "No title: {}", summary.no_title)?;
        writeln!(file, "No series: {}", summary.no_series)?;
        writeln!(file, "No album: {}", summary.no_album)?;
        writeln!(file, "Failed: {}", summary.failed)?;
        writeln!(file, "Skipped: {}", summary.skipped)?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                ReportEntry::Tagged { file: f, album, url } => {
                    writeln!(file, "[OK] {f} -> \"{album}\"")?;
                    writeln!(file, "     {url}")?;
                }
                ReportEntry::Unmatched {
                    file: f,
                    series,
                    number,
                } => match number {
                    Some(number) => writeln!(file, "[UNMATCHED] {f}: no album #{number} in {series}")?,
                    None => writeln!(file, "[UNMATCHED] {f}: no issue number to pick an album of {series}")?,
                },
                ReportEntry::NoTitle { file: f } => {
                    writeln!(file, "[NO TITLE] {f}")?;
                }
                ReportEntry::NoSeries { file: f, title } => {
                    writeln!(file, "[NO SERIES] {f} (searched \"{title}\")")?;
                }
                ReportEntry::NoAlbum { file: f, series } => {
                    writeln!(file, "[NO ALBUM] {f}: nothing fetched from {series}")?;
                }
                ReportEntry::Failed { file: f, message } => {
                    writeln!(file, "[ERROR] {f}: {message}")?;
                }
                ReportEntry::Skipped { file: f, reason } => {
                    writeln!(file, "[SKIPPED] {f}: {reason}")?;
                }
            }
        }

        file.flush()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub tagged: usize,
    pub unmatched: usize,
    pub no_title: usize,
    pub no_series: usize,
    pub no_album: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ReportSummary {
    pub fn total(&self) -> usize {
        self.tagged + self.unmatched + self.no_title + self.no_series + self.no_album + self.failed + self.skipped
    }
}
