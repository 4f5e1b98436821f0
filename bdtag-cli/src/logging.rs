//! Logger setup for the CLI.
//!
//! Info lines are printed bare so commands can use `log::info!` as their
//! normal output channel; warnings and errors get a coloured level tag.
//! `RUST_LOG` still overrides the level chosen from the flags.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::Level;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::error::CliError;

fn default_filter(quiet: bool, verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

/// Install the global logger.
///
/// With `logfile`, output goes to that file with ANSI escapes stripped
/// instead of stderr.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter(quiet, verbose)));

    // Dependencies are noisy at debug level.
    for noisy in ["reqwest", "hyper_util", "rustls", "html5ever", "selectors"] {
        builder.filter_module(noisy, log::LevelFilter::Warn);
    }

    builder.format(move |buf, record| {
        let stamp = if verbose {
            format!("{} ", chrono::Local::now().format("%H:%M:%S%.3f"))
        } else {
            String::new()
        };
        match record.level() {
            Level::Info => writeln!(buf, "{stamp}{}", record.args()),
            Level::Warn => writeln!(
                buf,
                "{stamp}{} {}",
                "warning:".if_supports_color(Stderr, |t| t.yellow()),
                record.args()
            ),
            Level::Error => writeln!(
                buf,
                "{stamp}{} {}",
                "error:".if_supports_color(Stderr, |t| t.red()),
                record.args()
            ),
            level => writeln!(
                buf,
                "{stamp}{} [{}] {}",
                level.as_str().to_lowercase().if_supports_color(Stderr, |t| t.dimmed()),
                record.target(),
                record.args()
            ),
        }
    });

    if let Some(path) = logfile {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        builder.target(Target::Pipe(Box::new(strip_ansi_escapes::Writer::new(file))));
    }

    builder
        .try_init()
        .map_err(|e| CliError::other(format!("Could not install logger: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false, false), "info");
        assert_eq!(default_filter(true, false), "warn");
        assert_eq!(default_filter(true, true), "debug");
    }
}
