//! Remote folder to local directory mirroring.
//!
//! Traversal uses an explicit work stack of `(node, local path, remote path)`
//! entries. A failure marks the whole outcome as failed but never stops the
//! remaining entries from being processed. Existing local entries are never
//! overwritten or removed.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::download::retry::{Fetch, RetryingTransfer};
use crate::download::state::RunOptions;
use crate::error::TransferError;
use crate::fs::{entry_exists, join_remote_path, prepare_dir, validate_node_name, DirState};
use crate::output::{print_entry, print_error, print_name};
use crate::session::{DownloadSession, FetchedObject, RemoteNode};
use crate::status::StatusEventBus;

/// Aggregate result of syncing a subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub failed: bool,
    pub files_downloaded: u64,
    pub files_failed: u64,
    pub dirs_created: u64,
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        !self.failed
    }

    fn file_failed(&mut self) {
        self.failed = true;
        self.files_failed += 1;
    }
}

/// Fetch of one file node of an open folder export.
pub struct NodeFetch<'a, S: ?Sized> {
    session: &'a S,
    node: &'a RemoteNode,
    target: &'a Path,
    remote_path: &'a str,
}

#[async_trait(?Send)]
impl<S: DownloadSession + ?Sized> Fetch for NodeFetch<'_, S> {
    type Output = FetchedObject;

    fn describe(&self) -> String {
        self.remote_path.to_string()
    }

    async fn fetch_once(&mut self, bus: &mut StatusEventBus) -> Result<FetchedObject, TransferError> {
        self.session.fetch_node(self.node, self.target, bus).await
    }
}

/// Mirrors a remote directory node onto a local directory.
pub struct DirectorySyncer<'a, S: ?Sized> {
    session: &'a S,
    transfer: &'a RetryingTransfer,
    options: &'a RunOptions,
}

impl<'a, S: DownloadSession + ?Sized> DirectorySyncer<'a, S> {
    pub fn new(session: &'a S, transfer: &'a RetryingTransfer, options: &'a RunOptions) -> Self {
        Self {
            session,
            transfer,
            options,
        }
    }

    /// Sync `node` and everything below it into `local`.
    pub async fn sync(
        &self,
        node: &RemoteNode,
        local: &Path,
        remote_path: &str,
        bus: &mut StatusEventBus,
    ) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        let mut pending: Vec<(&RemoteNode, PathBuf, String)> =
            vec![(node, local.to_path_buf(), remote_path.to_string())];

        while let Some((dir, local_dir, remote_dir)) = pending.pop() {
            if !self.prepare_local_dir(&local_dir, &mut outcome) {
                // Children of a directory that could not be prepared are not attempted.
                continue;
            }

            let mut subdirs = Vec::new();
            for child in dir.children() {
                let name = match validate_node_name(&child.name) {
                    Ok(name) => name,
                    Err(err) => {
                        print_error(&format!(
                            "Skipping {}: {}",
                            join_remote_path(&remote_dir, &child.name),
                            err
                        ));
                        outcome.file_failed();
                        continue;
                    }
                };

                let child_local = local_dir.join(name);
                let child_remote = join_remote_path(&remote_dir, name);

                if child.is_file() {
                    if self.sync_file(child, &child_local, &child_remote, bus).await {
                        outcome.files_downloaded += 1;
                    } else {
                        outcome.file_failed();
                    }
                } else {
                    subdirs.push((child, child_local, child_remote));
                }
            }

            // Reversed so subdirectories are visited in listing order.
            pending.extend(subdirs.into_iter().rev());
        }

        outcome
    }

    fn prepare_local_dir(&self, path: &Path, outcome: &mut SyncOutcome) -> bool {
        if self.options.show_progress && !entry_exists(path) {
            print_entry('D', path);
        }

        match prepare_dir(path) {
            Ok(DirState::Existing) => true,
            Ok(DirState::Created) => {
                outcome.dirs_created += 1;
                true
            }
            Err(err) => {
                print_error(err.message());
                outcome.failed = true;
                false
            }
        }
    }

    async fn sync_file(
        &self,
        node: &RemoteNode,
        local: &Path,
        remote_path: &str,
        bus: &mut StatusEventBus,
    ) -> bool {
        if entry_exists(local) {
            print_error(TransferError::collision(local).message());
            return false;
        }

        if self.options.show_progress {
            print_entry('F', local);
        }

        let mut fetch = NodeFetch {
            session: self.session,
            node,
            target: local,
            remote_path,
        };

        match self.transfer.attempt(&mut fetch, bus).await {
            Ok(fetched) => {
                bus.clear();
                tracing::debug!("Downloaded {} ({} bytes)", remote_path, fetched.size);
                if self.options.print_names {
                    print_name(&local.display().to_string());
                }
                true
            }
            Err(err) => {
                tracing::debug!("Giving up on {}: {:?}", remote_path, err.kind());
                false
            }
        }
    }
}
