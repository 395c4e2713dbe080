//! icon-mirror CLI
//!
//! Builds a local mirror of Lodestone item icons from an item sheet export.

mod commands;
mod error;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::Level;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use icon_mirror_catalog::ItemFilter;

#[derive(Parser)]
#[command(name = "icon-mirror")]
#[command(about = "Mirror Lodestone item icons into a local directory", long_about = None)]
struct Cli {
    /// Settings file (defaults to ~/.config/icon-mirror/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of pages or items processed at once
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Hide progress bars
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show every listing row and retry attempt
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by the full-pipeline commands.
#[derive(Args, Clone)]
struct MirrorArgs {
    /// CSV export of the item sheet
    #[arg(short, long)]
    data: PathBuf,

    /// Directory for icons and dbMapping.json (created if missing)
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the icon of every named item
    All {
        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Export icons of items that can be sold on the market board
    Marketable {
        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Download icons for an existing dbMapping.json without re-resolving
    Download {
        /// Directory containing dbMapping.json
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Inspect scraper settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings as TOML
    Show,

    /// Print the default settings file path
    Path,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let opts = commands::RunOptions {
        config: cli.config,
        workers: cli.workers,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::All { mirror } => {
            commands::mirror::run_mirror(&opts, ItemFilter::All, &mirror.data, &mirror.output)
        }
        Commands::Marketable { mirror } => commands::mirror::run_mirror(
            &opts,
            ItemFilter::Marketable,
            &mirror.data,
            &mirror.output,
        ),
        Commands::Download { output } => commands::mirror::run_download(&opts, &output),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&opts),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{} {}", "\u{2718}".if_supports_color(Stderr, |t| t.red()), e);
            ExitCode::FAILURE
        }
    }
}

/// Plain messages for info, level-prefixed lines for everything else.
/// `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let default_filter = format!(
        "warn,icon_mirror={level},icon_mirror_scraper={level},icon_mirror_catalog={level}"
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "icon-mirror",
            "marketable",
            "-d",
            "Item.csv",
            "-o",
            "out",
            "--workers",
            "4",
            "-q",
        ])
        .unwrap();

        assert_eq!(cli.workers, Some(4));
        assert!(cli.quiet);
        match cli.command {
            Commands::Marketable { mirror } => {
                assert_eq!(mirror.data, PathBuf::from("Item.csv"));
                assert_eq!(mirror.output, PathBuf::from("out"));
            }
            _ => panic!("expected marketable"),
        }
    }

    #[test]
    fn test_mirror_requires_data_and_output() {
        assert!(Cli::try_parse_from(["icon-mirror", "all", "-o", "out"]).is_err());
        assert!(Cli::try_parse_from(["icon-mirror", "all", "-d", "Item.csv"]).is_err());
    }
}
