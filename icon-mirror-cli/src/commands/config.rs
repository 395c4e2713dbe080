use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use icon_mirror_scraper::settings_path;

use super::RunOptions;
use crate::error::CliError;

/// Print the effective settings (file plus overrides) as TOML.
pub(crate) fn run_config_show(opts: &RunOptions) -> Result<(), CliError> {
    let settings = opts.settings()?;
    let source = opts.config.clone().unwrap_or_else(settings_path);

    log::info!(
        "{} {}",
        "Settings".if_supports_color(Stderr, |t| t.bold()),
        format!("({})", source.display()).if_supports_color(Stderr, |t| t.dimmed()),
    );
    log::info!("");
    log::info!("{}", settings.to_toml_string()?.trim_end());
    Ok(())
}

pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = settings_path();
    if path.exists() {
        log::info!(
            "{} {}",
            path.display().if_supports_color(Stderr, |t| t.cyan()),
            "(exists)".if_supports_color(Stderr, |t| t.green()),
        );
    } else {
        log::info!(
            "{} {}",
            path.display().if_supports_color(Stderr, |t| t.cyan()),
            "(not created, defaults in use)".if_supports_color(Stderr, |t| t.dimmed()),
        );
    }
    Ok(())
}
