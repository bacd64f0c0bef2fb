//! megadl - download files and folders shared through MEGA links.
//!
//! # Features
//!
//! - Single-object links saved to a directory, a file path, or stdout
//! - Folder export links mirrored into a local directory
//! - Bounded retry with exponential backoff for transient failures
//! - Existing local files are never overwritten
//!
//! # Example
//!
//! ```no_run
//! use megadl::{Config, Downloader, MegaSession};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let session = MegaSession::new(&config.network)?;
//!     let mut downloader = Downloader::new(session, &config);
//!
//!     let links = vec!["https://mega.nz/#F!AbCd_-12!abcdefghijklmnopqrs-_0".to_string()];
//!     let summary = downloader.run(&links).await;
//!     println!("{} files downloaded", summary.files_downloaded);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod link;
pub mod output;
pub mod session;
pub mod status;

// Re-exports for convenience
pub use config::{Config, Destination};
pub use download::{Downloader, RunSummary};
pub use error::{Error, Result, TransferError, TransferErrorKind};
pub use link::{Link, LinkKind};
pub use session::{DownloadSession, MegaSession};
pub use status::{StatusEvent, StatusEventBus, StatusObserver};
