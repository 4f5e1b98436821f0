use std::path::Path;
use std::sync::mpsc;

use indicatif::ProgressBar;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bdtag_lib::{ScanOptions, Settings, scan_comics};
use bdtag_scraper::{
    ArchiveSink, BatchEvent, BatchOptions, BatchReport, BatchRunner, BedethequeClient, BedethequeMarkup, DryRunSink,
    NonInteractiveOperator, Operator, Pacer, REPORT_FILE_NAME, RecordSink,
};

use crate::cli_types::ScanArgs;
use crate::error::CliError;
use crate::spinner::{SpinnerOperator, spinner};

pub(crate) struct TagOptions {
    pub dry_run: bool,
    pub non_interactive: bool,
    pub max_searches: Option<usize>,
    pub no_report: bool,
    pub scan: ScanArgs,
    pub quiet: bool,
}

/// Run the tag command.
pub(crate) fn run_tag(settings: &Settings, root: &Path, opts: TagOptions) -> Result<(), CliError> {
    log::info!(
        "Tagging comics in: {}",
        root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if opts.dry_run {
        log::info!(
            "{}",
            "Dry run: no archive will be modified".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let scan = ScanOptions {
        accept_zip: opts.scan.accept_zip || settings.scrape.accept_zip,
        include_tagged: opts.scan.include_tagged,
    };
    let files = scan_comics(root, &scan)?;
    if files.is_empty() {
        log::info!("No archive waiting for metadata.");
        return Ok(());
    }
    log::info!("{} archive(s) to process", files.len());
    log::info!("");

    let client = BedethequeClient::new(&settings.catalog)?;
    let markup = BedethequeMarkup;
    let options = BatchOptions {
        max_searches: opts.max_searches.unwrap_or(settings.scrape.max_searches),
        language_iso: settings.scrape.language_iso.clone(),
        detail_pacer: Pacer::from_millis(settings.scrape.detail_delay_ms, settings.scrape.detail_jitter_ms),
    };

    let pb = spinner(opts.quiet, "Starting...");
    let mut operator: Box<dyn Operator> = if opts.non_interactive {
        Box::new(NonInteractiveOperator)
    } else {
        Box::new(SpinnerOperator::new(pb.clone()))
    };
    let mut archive_sink = ArchiveSink;
    let mut dry_run_sink = DryRunSink::default();
    let sink: &mut dyn RecordSink = if opts.dry_run {
        &mut dry_run_sink
    } else {
        &mut archive_sink
    };

    let (event_tx, event_rx) = mpsc::channel::<BatchEvent>();
    let report = std::thread::scope(|s| {
        let progress = pb.clone();
        s.spawn(move || show_events(event_rx, &progress));

        BatchRunner::new(&client, &markup, operator.as_mut(), sink, options)
            .with_events(event_tx)
            .run(files)
    });
    pb.finish_and_clear();

    for (path, xml) in &dry_run_sink.documents {
        log::info!("{}", path.display().if_supports_color(Stdout, |t| t.bold()));
        log::info!("{xml}");
        log::info!("");
    }

    print_summary(&report);

    if !opts.no_report && !opts.dry_run {
        let report_path = root.join(REPORT_FILE_NAME);
        match report.write_to_file(&report_path) {
            Ok(()) => log::info!(
                "Report written to {}",
                report_path.display().if_supports_color(Stdout, |t| t.dimmed()),
            ),
            Err(e) => log::warn!("Could not write report {}: {e}", report_path.display()),
        }
    }

    match report.fatal {
        Some(message) => Err(CliError::other(format!("Batch stopped: {message}"))),
        None => Ok(()),
    }
}

fn show_events(events: mpsc::Receiver<BatchEvent>, pb: &ProgressBar) {
    for event in events {
        match event {
            BatchEvent::Grouped { files, titles } => {
                pb.set_message(format!("{files} file(s) in {titles} title(s)"));
            }
            BatchEvent::TitleStarted { index, total, title } => {
                pb.set_message(format!("[{}/{}] {}", index + 1, total, title));
            }
            BatchEvent::FileTagged { file, album } => {
                pb.println(format!(
                    "  {} {} -> \"{}\"",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    file,
                    album,
                ));
            }
            BatchEvent::FileFailed { file, reason } => {
                pb.println(format!(
                    "  {} {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    file,
                    reason.if_supports_color(Stdout, |t| t.dimmed()),
                ));
            }
            BatchEvent::FatalError { message } => {
                pb.println(format!(
                    "  {} Fatal: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    message,
                ));
            }
            BatchEvent::Done => {}
        }
    }
}

fn print_summary(report: &BatchReport) {
    let summary = report.summary();
    log::info!("");
    if summary.tagged > 0 {
        log::info!(
            "  {} {} archive(s) tagged",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.tagged,
        );
    }
    if summary.skipped > 0 {
        log::info!("  {} already tagged", summary.skipped);
    }
    for (count, label) in [
        (summary.unmatched, "without a matching album"),
        (summary.no_series, "without a series"),
        (summary.no_album, "without a fetched album"),
        (summary.no_title, "without a title"),
    ] {
        if count > 0 {
            log::warn!(
                "  {} {} {}",
                "?".if_supports_color(Stdout, |t| t.yellow()),
                count,
                label,
            );
        }
    }
    if summary.failed > 0 {
        log::warn!(
            "  {} {} errors",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.failed,
        );
    }
}
