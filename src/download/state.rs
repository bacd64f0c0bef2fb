//! Run options and outcome tracking.

use crate::config::{Config, Destination};
use crate::download::sync::SyncOutcome;

/// Options shared by every link of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub destination: Destination,
    pub show_progress: bool,
    pub print_names: bool,
}

impl RunOptions {
    /// Streaming keeps stdout free of anything but object bytes.
    pub fn from_config(config: &Config) -> Self {
        let destination = config.destination();
        let streaming = destination.is_stream();
        Self {
            destination,
            show_progress: config.show_progress(),
            print_names: config.download.print_names && !streaming,
        }
    }
}

/// Statistics across all links of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub links_processed: u64,
    pub links_failed: u64,
    pub links_skipped: u64,
    pub files_downloaded: u64,
    pub files_failed: u64,
    pub dirs_created: u64,
}

impl RunSummary {
    /// Record the outcome of one link.
    pub fn record_link(&mut self, success: bool) {
        self.links_processed += 1;
        if !success {
            self.links_failed += 1;
        }
    }

    /// Record an unrecognised link. Skipped links do not fail the run.
    pub fn skip_link(&mut self) {
        self.links_skipped += 1;
    }

    /// Record a single-object download.
    pub fn record_file(&mut self, success: bool) {
        if success {
            self.files_downloaded += 1;
        } else {
            self.files_failed += 1;
        }
    }

    /// Add statistics from a directory sync.
    pub fn add_sync(&mut self, outcome: &SyncOutcome) {
        self.files_downloaded += outcome.files_downloaded;
        self.files_failed += outcome.files_failed;
        self.dirs_created += outcome.dirs_created;
    }

    /// Every recognised link fully succeeded.
    pub fn is_success(&self) -> bool {
        self.links_failed == 0
    }
}
