//! Download module.
//!
//! This module provides:
//! - The bounded retry driver
//! - Recursive folder mirroring
//! - Single-object link download
//! - Per-link orchestration and run statistics

pub mod driver;
pub mod retry;
pub mod single;
pub mod state;
pub mod sync;

pub use driver::Downloader;
pub use retry::{Fetch, RetryPolicy, RetryingTransfer};
pub use single::download_single;
pub use state::{RunOptions, RunSummary};
pub use sync::{DirectorySyncer, SyncOutcome};
