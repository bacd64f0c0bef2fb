//! Scripted in-memory session used by the download tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::Path;

use async_trait::async_trait;
use futures::io::AsyncWriteExt;

use crate::config::Destination;
use crate::error::{TransferError, TransferErrorKind};
use crate::fs::{create_target_file, entry_exists, resolve_file_target};
use crate::link::Link;
use crate::session::{conclude_attempt, DownloadSession, EventWriter, FetchedObject, RemoteNode};
use crate::status::{StatusEvent, StatusEventBus};

/// One scripted fetch outcome.
#[derive(Debug, Clone)]
pub enum Scripted {
    Data(Vec<u8>),
    Fail(TransferErrorKind),
    /// Write the bytes to the destination, then fail.
    PartialThenFail(Vec<u8>, TransferErrorKind),
}

/// Session whose fetch results are scripted per handle.
///
/// Each fetch pops the next outcome for its handle; once the queue is empty,
/// fetches succeed with `b"content"`.
#[derive(Default)]
pub struct FakeSession {
    names: HashMap<String, String>,
    outcomes: RefCell<HashMap<String, VecDeque<Scripted>>>,
    folders: HashMap<String, Vec<RemoteNode>>,
    roots: Vec<RemoteNode>,
    calls: RefCell<Vec<String>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name and outcomes of the object behind a file link handle.
    pub fn with_link_file(mut self, handle: &str, name: &str, outcomes: Vec<Scripted>) -> Self {
        self.names.insert(handle.to_string(), name.to_string());
        self.script(handle, outcomes)
    }

    /// Outcomes for a node handle inside a folder export.
    pub fn script(self, handle: &str, outcomes: Vec<Scripted>) -> Self {
        self.outcomes
            .borrow_mut()
            .insert(handle.to_string(), outcomes.into());
        self
    }

    /// Top-level nodes returned when the folder link `handle` is opened.
    pub fn with_folder(mut self, handle: &str, roots: Vec<RemoteNode>) -> Self {
        self.folders.insert(handle.to_string(), roots);
        self
    }

    /// Handles fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, handle: &str) -> usize {
        self.calls.borrow().iter().filter(|h| *h == handle).count()
    }

    fn next_outcome(&self, handle: &str) -> Scripted {
        self.calls.borrow_mut().push(handle.to_string());
        self.outcomes
            .borrow_mut()
            .get_mut(handle)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Scripted::Data(b"content".to_vec()))
    }
}

/// Write `data` through an [`EventWriter`], then fail with `failure` if given.
async fn play<W: io::Write + Unpin>(
    sink: W,
    bus: &mut StatusEventBus,
    data: &[u8],
    failure: Option<TransferError>,
) -> (u64, Result<(), TransferError>) {
    let mut writer = EventWriter::new(sink, bus, data.len() as u64);
    let written = writer
        .write_all(data)
        .await
        .map_err(|e| TransferError::new(TransferErrorKind::Filesystem, e.to_string()));
    let size = writer.written();
    (size, written.and_then(|()| failure.map_or(Ok(()), Err)))
}

fn scripted_failure(kind: TransferErrorKind, handle: &str) -> TransferError {
    TransferError::new(kind, format!("scripted {:?} failure for {}", kind, handle))
}

/// Bytes to deliver and the failure that follows them, or an immediate failure.
fn unpack(outcome: Scripted, handle: &str) -> Result<(Vec<u8>, Option<TransferError>), TransferError> {
    match outcome {
        Scripted::Data(data) => Ok((data, None)),
        Scripted::PartialThenFail(data, kind) => Ok((data, Some(scripted_failure(kind, handle)))),
        Scripted::Fail(kind) => Err(scripted_failure(kind, handle)),
    }
}

#[async_trait(?Send)]
impl DownloadSession for FakeSession {
    async fn fetch_link(
        &self,
        link: &Link,
        destination: &Destination,
        bus: &mut StatusEventBus,
    ) -> Result<FetchedObject, TransferError> {
        let handle = link.handle();
        let name = self
            .names
            .get(handle)
            .cloned()
            .unwrap_or_else(|| "file.bin".to_string());
        let _ = bus.emit(StatusEvent::ObjectIdentified(&name));

        let (data, failure) = unpack(self.next_outcome(handle), handle)?;

        match destination {
            Destination::Stream => {
                let (size, outcome) = play(io::sink(), bus, &data, failure).await;
                conclude_attempt(outcome, None, size)?;
                Ok(FetchedObject {
                    name,
                    path: None,
                    size,
                })
            }
            Destination::Path(path) => {
                let target = resolve_file_target(path, &name);
                if entry_exists(&target) {
                    return Err(TransferError::collision(&target));
                }
                let file = create_target_file(&target)?;
                let (size, outcome) = play(file, bus, &data, failure).await;
                conclude_attempt(outcome, Some(&target), size)?;
                Ok(FetchedObject {
                    name,
                    path: Some(target),
                    size,
                })
            }
        }
    }

    async fn open_folder(&mut self, link: &Link) -> Result<(), TransferError> {
        self.roots = self
            .folders
            .get(link.handle())
            .cloned()
            .ok_or_else(|| TransferError::protocol(format!("No such folder: {}", link.handle())))?;
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
    ) -> Result<FetchedObject, TransferError> {
        let _ = bus.emit(StatusEvent::ObjectIdentified(&node.name));

        let (data, failure) = unpack(self.next_outcome(&node.handle), &node.handle)?;

        let file = create_target_file(target)?;
        let (size, outcome) = play(file, bus, &data, failure).await;
        conclude_attempt(outcome, Some(target), size)?;
        Ok(FetchedObject {
            name: node.name.clone(),
            path: Some(target.to_path_buf()),
            size,
        })
    }
}
