pub(crate) mod config;
pub(crate) mod mirror;

use std::path::PathBuf;

use icon_mirror_scraper::{Settings, load_settings};

use crate::error::CliError;

/// Global flags shared by every subcommand.
pub(crate) struct RunOptions {
    pub config: Option<PathBuf>,
    pub workers: Option<usize>,
    pub quiet: bool,
}

impl RunOptions {
    /// Settings file contents with command-line overrides applied.
    pub(crate) fn settings(&self) -> Result<Settings, CliError> {
        let mut settings = load_settings(self.config.as_deref())?;
        if let Some(workers) = self.workers {
            settings.workers = workers.max(1);
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workers_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "workers = 3\n").unwrap();

        let opts = RunOptions {
            config: Some(path.clone()),
            workers: None,
            quiet: true,
        };
        assert_eq!(opts.settings().unwrap().workers, 3);

        let opts = RunOptions {
            config: Some(path),
            workers: Some(0),
            quiet: true,
        };
        assert_eq!(opts.settings().unwrap().workers, 1);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let opts = RunOptions {
            config: Some(PathBuf::from("/nonexistent/icon-mirror/settings.toml")),
            workers: None,
            quiet: true,
        };
        assert!(opts.settings().is_err());
    }
}
