//! Remote session boundary.
//!
//! This module provides:
//! - The [`DownloadSession`] contract the download layer is written against
//! - The read-only remote tree shape used for folder traversal
//! - An event-emitting writer for session implementations
//! - A session backed by the `mega` client crate

pub mod mega;
pub mod writer;

#[cfg(test)]
pub mod fake;

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::Destination;
use crate::error::{TransferError, TransferErrorKind};
use crate::link::Link;
use crate::status::StatusEventBus;

pub use self::mega::MegaSession;
pub use writer::EventWriter;

/// Kind of a remote tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// An entry of a folder export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteNode {
    pub handle: String,
    pub name: String,
    pub kind: NodeKind,
    /// Remote path, `/`-separated, starting at the export root.
    pub path: String,
    pub size: u64,
    pub children: Vec<RemoteNode>,
}

impl RemoteNode {
    pub fn file(handle: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        Self {
            handle: handle.into(),
            path: format!("/{}", name),
            name,
            kind: NodeKind::File,
            size,
            children: Vec::new(),
        }
    }

    pub fn directory(
        handle: impl Into<String>,
        name: impl Into<String>,
        children: Vec<RemoteNode>,
    ) -> Self {
        let name = name.into();
        Self {
            handle: handle.into(),
            path: format!("/{}", name),
            name,
            kind: NodeKind::Directory,
            size: 0,
            children,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn children(&self) -> &[RemoteNode] {
        &self.children
    }
}

/// Result of a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedObject {
    /// Remote display name.
    pub name: String,
    /// Local file written, `None` when streamed.
    pub path: Option<PathBuf>,
    pub size: u64,
}

/// Authenticated (or anonymous) connection to the remote service.
///
/// Every fetch reports progress through `bus` while it runs and returns only
/// once the object is fully written, or has failed.
#[async_trait(?Send)]
pub trait DownloadSession {
    /// Fetch the object behind a single-object link.
    async fn fetch_link(
        &self,
        link: &Link,
        destination: &Destination,
        bus: &mut StatusEventBus,
    ) -> Result<FetchedObject, TransferError>;

    /// Open a folder export. Its top-level nodes are then available from [`roots`](Self::roots).
    async fn open_folder(&mut self, link: &Link) -> Result<(), TransferError>;

    /// Top-level nodes of the currently open folder export.
    fn roots(&self) -> &[RemoteNode];

    /// Fetch one file of the currently open folder export into `target`.
    async fn fetch_node(
        &self,
        node: &RemoteNode,
        target: &Path,
        bus: &mut StatusEventBus,
    ) -> Result<FetchedObject, TransferError>;
}

/// Settle one fetch attempt against its destination.
///
/// A failed attempt removes the file it created at `target`, so the next
/// attempt does not collide with it. Streamed bytes can't be taken back: once
/// anything reached the stream, a failure is no longer retryable.
pub fn conclude_attempt(
    outcome: Result<(), TransferError>,
    target: Option<&Path>,
    written: u64,
) -> Result<(), TransferError> {
    let Err(err) = outcome else {
        return Ok(());
    };

    match target {
        Some(path) => {
            if let Err(e) = fs::remove_file(path) {
                tracing::warn!("Could not remove incomplete file {}: {}", path.display(), e);
            }
            Err(err)
        }
        None if written > 0 && err.kind().is_retryable() => Err(TransferError::new(
            TransferErrorKind::Protocol,
            format!("{} (stream interrupted after {} bytes)", err, written),
        )),
        None => Err(err),
    }
}
