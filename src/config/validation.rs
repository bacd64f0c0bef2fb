//! Run validation, done before any network activity.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use crate::link::{Link, LinkKind};

/// Validate the configuration and link list for the requested mode.
pub fn validate_run(config: &Config, links: &[String]) -> Result<()> {
    validate_network(config)?;
    validate_links(config, links)
}

/// Validate network settings.
pub fn validate_network(config: &Config) -> Result<()> {
    if config.network.connect_timeout_secs == 0 {
        return Err(Error::ConfigValidation {
            field: "connect_timeout_secs".to_string(),
            message: "Connection timeout must be at least 1 second".to_string(),
        });
    }

    if config.network.user_agent.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: "User agent cannot be empty".to_string(),
        });
    }

    Ok(())
}

/// Validate the link arguments against the output mode.
pub fn validate_links(config: &Config, links: &[String]) -> Result<()> {
    if links.is_empty() {
        return Err(Error::Usage("No links specified for download!".to_string()));
    }

    if config.destination().is_stream() {
        if links.len() != 1 {
            return Err(Error::Usage("Can't stream from multiple files!".to_string()));
        }

        match Link::parse(&links[0]).map(|link| link.kind()) {
            Some(LinkKind::Single) => {}
            Some(LinkKind::FolderExport) => {
                return Err(Error::Usage("Can't stream from a directory!".to_string()));
            }
            None => {
                return Err(Error::Usage(format!(
                    "Can't stream from an invalid link: {}",
                    links[0]
                )));
            }
        }
    }

    Ok(())
}
