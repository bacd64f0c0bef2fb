//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::config::modes::Destination;
use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Local directory (folder links) or file path (file links). `-` streams to stdout.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Whether to show the progress bar.
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Whether to print the names of downloaded files.
    #[serde(default)]
    pub print_names: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            show_progress: true,
            print_names: false,
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("megadl/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Per-user config file location, e.g. `~/.config/megadl/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "megadl").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the per-user config file if there is one, defaults otherwise.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Where downloaded data goes.
    pub fn destination(&self) -> Destination {
        Destination::from_path_arg(&self.download.path)
    }

    /// Progress display is off when disabled or when streaming.
    pub fn show_progress(&self) -> bool {
        self.download.show_progress && !self.destination().is_stream()
    }
}
