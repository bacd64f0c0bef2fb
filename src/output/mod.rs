//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - The progress/streaming status observer
//! - Run summary reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_entry, print_error, print_name, print_retry_notice, print_success, print_warning,
};
pub use progress::{create_download_bar, ProgressReporter};
pub use stats::print_summary;
