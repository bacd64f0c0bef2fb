//! Per-link orchestration.

use std::path::Path;

use crate::config::Config;
use crate::download::retry::RetryingTransfer;
use crate::download::single::download_single;
use crate::download::state::{RunOptions, RunSummary};
use crate::download::sync::DirectorySyncer;
use crate::error::TransferError;
use crate::fs::is_plain_dir;
use crate::link::{Link, LinkKind};
use crate::output::{print_error, print_warning, ProgressReporter};
use crate::session::DownloadSession;
use crate::status::StatusEventBus;

/// Everything one run needs: the session, the event bus and the run options.
pub struct Downloader<S> {
    session: S,
    transfer: RetryingTransfer,
    options: RunOptions,
    bus: StatusEventBus,
}

impl<S: DownloadSession> Downloader<S> {
    /// Downloader reporting progress on the terminal and streaming to stdout.
    pub fn new(session: S, config: &Config) -> Self {
        let options = RunOptions::from_config(config);
        let streaming = options.destination.is_stream();
        let mut bus = StatusEventBus::new(streaming);
        bus.subscribe(Box::new(ProgressReporter::stdout(
            options.show_progress,
            streaming,
        )));
        Self::with_bus(session, options, bus)
    }

    /// Downloader with caller-provided observers.
    pub fn with_bus(session: S, options: RunOptions, bus: StatusEventBus) -> Self {
        let transfer = RetryingTransfer::new(options.show_progress);
        Self {
            session,
            transfer,
            options,
            bus,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn bus(&self) -> &StatusEventBus {
        &self.bus
    }

    /// Process every link in order. Failures are reported and counted; they
    /// never stop the remaining links.
    pub async fn run(&mut self, links: &[String]) -> RunSummary {
        let mut summary = RunSummary::default();

        for raw in links {
            let Some(link) = Link::parse(raw) else {
                print_warning(&format!("Skipping invalid MEGA download link: {}", raw));
                summary.skip_link();
                continue;
            };

            let success = match link.kind() {
                LinkKind::Single => {
                    let success = download_single(
                        &self.session,
                        &self.transfer,
                        &self.options,
                        &link,
                        &mut self.bus,
                    )
                    .await;
                    summary.record_file(success);
                    success
                }
                LinkKind::FolderExport => self.download_folder(&link, &mut summary).await,
            };

            summary.record_link(success);
        }

        summary
    }

    async fn download_folder(&mut self, link: &Link, summary: &mut RunSummary) -> bool {
        let Some(target) = self.options.destination.path().map(Path::to_path_buf) else {
            print_error("Can't stream from a directory!");
            return false;
        };

        if let Err(err) = self.session.open_folder(link).await {
            print_error(&format!("Can't open folder '{}': {}", link, err));
            return false;
        }

        let roots = self.session.roots();
        if roots.len() != 1 {
            let err = TransferError::structural(format!(
                "Folder export has {} top-level nodes, expected exactly one",
                roots.len()
            ));
            print_error(&format!("Can't download folder '{}': {}", link, err));
            return false;
        }

        if !is_plain_dir(&target) {
            print_error(&format!("{} must be a directory", target.display()));
            return false;
        }

        let root = &roots[0];
        let syncer = DirectorySyncer::new(&self.session, &self.transfer, &self.options);
        let outcome = syncer.sync(root, &target, &root.path, &mut self.bus).await;
        summary.add_sync(&outcome);
        outcome.is_success()
    }
}
