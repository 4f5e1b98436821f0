use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bdtag_lib::Settings;
use bdtag_lib::settings::settings_path;

use crate::cli_types::ConfigAction;
use crate::error::CliError;

/// Run a config subcommand.
pub(crate) fn run_config(action: ConfigAction) -> Result<(), CliError> {
    match action {
        ConfigAction::Show => run_config_show(),
        ConfigAction::Path => {
            log::info!("{}", settings_path().display());
            Ok(())
        }
        ConfigAction::Init { force } => run_config_init(force),
    }
}

fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();
    let status = if path.exists() {
        "".to_string()
    } else {
        format!(" {}", "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()))
    };
    log::info!(
        "Settings file: {}{}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        status,
    );
    log::info!("");

    let settings = Settings::load_from(&path)?;
    log::info!("{}", settings.to_toml()?);
    Ok(())
}

fn run_config_init(force: bool) -> Result<(), CliError> {
    let path = settings_path();
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Settings::default().save_to(&path)?;
    log::info!(
        "{} Wrote default settings to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}
