//! Output destination.

use std::fmt;
use std::path::{Path, PathBuf};

/// Where transferred bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A local directory or file path.
    Path(PathBuf),
    /// Standard output, raw and unframed.
    Stream,
}

impl Destination {
    /// `-` selects streaming; anything else is a path.
    pub fn from_path_arg(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Destination::Stream
        } else {
            Destination::Path(path.to_path_buf())
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Destination::Stream)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Destination::Path(path) => Some(path),
            Destination::Stream => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Path(path) => write!(f, "{}", path.display()),
            Destination::Stream => write!(f, "stdout"),
        }
    }
}
