//! Console output utilities.
//!
//! Warnings and errors always go to stderr. Everything written to stdout is
//! suppressed by callers in streaming mode.

use std::path::Path;

use console::style;

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("WARNING").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print a local entry about to be created: `F` for files, `D` for directories.
pub fn print_entry(marker: char, path: &Path) {
    println!("{} {}", style(marker).bold(), path.display());
}

/// Announce the delay before the next attempt.
pub fn print_retry_notice(failed_attempt: u32, delay_secs: u64) {
    println!(
        "{} Attempt #{} failed, trying again in {} seconds...",
        style("RETRY").yellow(),
        failed_attempt,
        delay_secs
    );
}

/// Print a bare name, as used by `--print-names`.
pub fn print_name(name: &str) {
    println!("{}", name);
}
