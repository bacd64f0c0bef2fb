//! Share link classification.
//!
//! Two legacy link shapes are recognised:
//!
//! - single object: `https://mega.nz/#!<handle:8>!<key:43>`
//! - folder export: `https://mega.nz/#F!<handle:8>!<key:22>`
//!
//! Scheme, host and the `F` marker match case-insensitively; the handle and
//! key are restricted to the URL-safe base64 alphabet and kept verbatim.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Length of the handle in both link shapes.
pub const HANDLE_LEN: usize = 8;

/// Key length of a single-object link.
pub const FILE_KEY_LEN: usize = 43;

/// Key length of a folder export link.
pub const FOLDER_KEY_LEN: usize = 22;

static FILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:https?://mega(?:\.co)?\.nz/#)!([A-Za-z0-9_-]{8})!([A-Za-z0-9_-]{43})$")
        .expect("file link pattern is valid")
});

static FOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:https?://mega(?:\.co)?\.nz/#F)!([A-Za-z0-9_-]{8})!([A-Za-z0-9_-]{22})$")
        .expect("folder link pattern is valid")
});

/// What a share link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Single,
    FolderExport,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Single => write!(f, "file"),
            LinkKind::FolderExport => write!(f, "folder"),
        }
    }
}

/// A parsed share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    kind: LinkKind,
    handle: String,
    key: String,
    raw: String,
}

impl Link {
    /// Classify a raw link string. Returns `None` for anything that matches
    /// neither shape.
    pub fn parse(raw: &str) -> Option<Self> {
        let (kind, captures) = if let Some(c) = FILE_PATTERN.captures(raw) {
            (LinkKind::Single, c)
        } else if let Some(c) = FOLDER_PATTERN.captures(raw) {
            (LinkKind::FolderExport, c)
        } else {
            return None;
        };

        Some(Self {
            kind,
            handle: captures[1].to_string(),
            key: captures[2].to_string(),
            raw: raw.to_string(),
        })
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_folder(&self) -> bool {
        self.kind == LinkKind::FolderExport
    }

    /// The link in the `/file/` or `/folder/` form accepted by the MEGA client.
    pub fn public_url(&self) -> String {
        let segment = match self.kind {
            LinkKind::Single => "file",
            LinkKind::FolderExport => "folder",
        };
        format!("https://mega.nz/{}/{}#{}", segment, self.handle, self.key)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
