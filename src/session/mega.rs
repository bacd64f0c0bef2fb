//! Session backed by the `mega` client crate.

use std::error::Error as StdError;
use std::io;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::io::AsyncWriteExt;

use crate::config::{Destination, NetworkConfig};
use crate::error::{Error, Result, TransferError, TransferErrorKind};
use crate::fs::{
    create_target_file, entry_exists, join_remote_path, resolve_file_target, validate_node_name,
};
use crate::link::Link;
use crate::session::writer::EventWriter;
use crate::session::{conclude_attempt, DownloadSession, FetchedObject, NodeKind, RemoteNode};
use crate::status::{StatusEvent, StatusEventBus};

/// Attempts the client makes per API request.
const API_ATTEMPTS: usize = 1;

/// MEGA session for public file links and folder exports.
pub struct MegaSession {
    client: ::mega::Client,
    export: Option<::mega::Nodes>,
    roots: Vec<RemoteNode>,
}

impl MegaSession {
    /// Build the HTTP client and the MEGA client on top of it.
    ///
    /// The client makes a single attempt per API request; retries are left to
    /// the caller's retry policy.
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        let client = ::mega::Client::builder()
            .max_retries(API_ATTEMPTS)
            .build(http)
            .map_err(|e| Error::Session(format!("Failed to create MEGA client: {}", e)))?;

        Ok(Self {
            client,
            export: None,
            roots: Vec::new(),
        })
    }

    async fn fetch_public(&self, link: &Link) -> std::result::Result<::mega::Nodes, TransferError> {
        tracing::debug!("Fetching public nodes for {} link {}", link.kind(), link.handle());
        self.client
            .fetch_public_nodes(&link.public_url())
            .await
            .map_err(|e| transfer_error(&e))
    }

    /// Download `node` into `target`, or into the event stream when `target` is `None`.
    async fn download(
        &self,
        node: &::mega::Node,
        target: Option<&Path>,
        bus: &mut StatusEventBus,
    ) -> std::result::Result<FetchedObject, TransferError> {
        let name = node.name().to_string();
        bus.emit(StatusEvent::ObjectIdentified(&name))
            .map_err(|e| sink_failure("standard output", e.kind()))?;

        let Some(path) = target else {
            let mut writer = EventWriter::new(io::sink(), bus, node.size());
            let downloaded = self.client.download_node(node, &mut writer).await;
            let outcome = settle(downloaded, &mut writer, "standard output").await;
            let written = writer.written();
            conclude_attempt(outcome, None, written)?;
            return Ok(FetchedObject {
                name,
                path: None,
                size: written,
            });
        };

        let file = create_target_file(path)?;
        let mut writer = EventWriter::new(file, bus, node.size());
        let downloaded = self.client.download_node(node, &mut writer).await;
        let outcome = settle(downloaded, &mut writer, &path.display().to_string()).await;
        let written = writer.written();
        drop(writer);
        conclude_attempt(outcome, Some(path), written)?;

        Ok(FetchedObject {
            name,
            path: Some(path.to_path_buf()),
            size: written,
        })
    }
}

#[async_trait(?Send)]
impl DownloadSession for MegaSession {
    async fn fetch_link(
        &self,
        link: &Link,
        destination: &Destination,
        bus: &mut StatusEventBus,
    ) -> std::result::Result<FetchedObject, TransferError> {
        let nodes = self.fetch_public(link).await?;
        let node = nodes
            .roots()
            .find(|node| matches!(node.kind(), ::mega::NodeKind::File))
            .ok_or_else(|| TransferError::structural(format!("Link {} is not a file", link)))?;

        let target = match destination {
            Destination::Stream => None,
            Destination::Path(path) => {
                let target = resolve_file_target(path, validate_node_name(node.name())?);
                if entry_exists(&target) {
                    return Err(TransferError::collision(&target));
                }
                Some(target)
            }
        };

        self.download(node, target.as_deref(), bus).await
    }

    async fn open_folder(&mut self, link: &Link) -> std::result::Result<(), TransferError> {
        let nodes = self.fetch_public(link).await?;
        self.roots = nodes
            .roots()
            .map(|root| build_tree(&nodes, root, ""))
            .collect();
        tracing::debug!("Folder export {} has {} top-level node(s)", link.handle(), self.roots.len());
        self.export = Some(nodes);
        Ok(())
    }

    fn roots(&self) -> &[RemoteNode] {
        &self.roots
    }

    async fn fetch_node(
        &self,
        node: &RemoteNode,
        target: &Path,
        bus: &mut StatusEventBus,
    ) -> std::result::Result<FetchedObject, TransferError> {
        let nodes = self
            .export
            .as_ref()
            .ok_or_else(|| TransferError::structural("No folder export is open"))?;
        let remote = nodes.get_node_by_handle(&node.handle).ok_or_else(|| {
            TransferError::structural(format!("Node {} is not part of the export", node.path))
        })?;

        self.download(remote, Some(target), bus).await
    }
}

/// Convert a client node and its descendants into the traversal tree.
fn build_tree(nodes: &::mega::Nodes, node: &::mega::Node, parent_path: &str) -> RemoteNode {
    let path = join_remote_path(parent_path, node.name());
    let kind = match node.kind() {
        ::mega::NodeKind::File => NodeKind::File,
        _ => NodeKind::Directory,
    };

    let children = node
        .children()
        .iter()
        .filter_map(|handle| nodes.get_node_by_handle(handle))
        .map(|child| build_tree(nodes, child, &path))
        .collect();

    RemoteNode {
        handle: node.handle().to_string(),
        name: node.name().to_string(),
        kind,
        path,
        size: node.size(),
        children,
    }
}

/// Resolve a finished download: local sink failures win over the client error
/// they caused, then the buffered data is flushed.
async fn settle<W: io::Write + Unpin>(
    downloaded: std::result::Result<(), ::mega::Error>,
    writer: &mut EventWriter<'_, W>,
    target: &str,
) -> std::result::Result<(), TransferError> {
    if let Some(kind) = writer.sink_error() {
        return Err(sink_failure(target, kind));
    }
    downloaded.map_err(|e| transfer_error(&e))?;
    writer
        .flush()
        .await
        .map_err(|e| sink_failure(target, e.kind()))
}

fn sink_failure(target: &str, kind: io::ErrorKind) -> TransferError {
    TransferError::new(
        TransferErrorKind::Filesystem,
        format!("Writing to {} failed: {}", target, io::Error::from(kind)),
    )
}

fn transfer_error(err: &::mega::Error) -> TransferError {
    TransferError::new(classify_error(err), err.to_string())
}

/// API codes that ask the caller to come back later.
fn is_retry_later(code: ::mega::ErrorCode) -> bool {
    matches!(
        code,
        ::mega::ErrorCode::EAGAIN
            | ::mega::ErrorCode::ERATELIMIT
            | ::mega::ErrorCode::ETOOMANY
            | ::mega::ErrorCode::ETEMPUNAVAIL
            | ::mega::ErrorCode::ETOOMANYCONNECTIONS
    )
}

/// Transport failures anywhere in the source chain are transient, as are an
/// API request that got no usable response and the "try again later" API
/// codes. Everything else the client reports is a protocol failure.
pub fn classify_error(err: &(dyn StdError + 'static)) -> TransferErrorKind {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<reqwest::Error>() || e.is::<io::Error>() {
            return TransferErrorKind::Transient;
        }
        if let Some(::mega::Error::MaxRetriesReached) = e.downcast_ref::<::mega::Error>() {
            return TransferErrorKind::Transient;
        }
        if let Some(code) = e.downcast_ref::<::mega::ErrorCode>() {
            if is_retry_later(*code) {
                return TransferErrorKind::Transient;
            }
        }
        current = e.source();
    }
    TransferErrorKind::Protocol
}
