//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// MEGA share link downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "megadl",
    version,
    about = "Download files and folders shared through MEGA links",
    long_about = "Download exported files and folders from MEGA share links.\n\n\
                  Transient network failures are retried with exponential backoff.\n\
                  Existing local files are never overwritten."
)]
pub struct Args {
    /// Share links to download.
    #[arg(value_name = "LINK")]
    pub links: Vec<String>,

    /// Local directory or file name to save data to. Use `-` to stream a
    /// single file to standard output.
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Print names of downloaded files.
    #[arg(long)]
    pub print_names: bool,

    /// Path to configuration file.
    #[arg(long, value_name = "PATH", env = "MEGADL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not load any configuration file.
    #[arg(long, conflicts_with = "config")]
    pub ignore_config_file: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Load the configuration selected by `--config` / `--ignore-config-file`.
    pub fn load_config(&self) -> crate::error::Result<Config> {
        if self.ignore_config_file {
            return Ok(Config::default());
        }

        match &self.config {
            Some(path) => Config::load(path),
            None => Config::load_default(),
        }
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(path) = &self.path {
            config.download.path = path.clone();
        }

        // Boolean flags (only override if set to non-default)
        if self.no_progress {
            config.download.show_progress = false;
        }

        if self.print_names {
            config.download.print_names = true;
        }
    }
}
