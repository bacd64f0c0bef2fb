//! Statistics reporting.

use console::style;

use crate::download::RunSummary;

/// Print the end-of-run summary.
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", style("Summary:").bold());
    println!("  Links processed: {}", summary.links_processed);
    if summary.links_skipped > 0 {
        println!(
            "  Links skipped:   {} (invalid)",
            style(summary.links_skipped).yellow()
        );
    }
    if summary.links_failed > 0 {
        println!("  Links failed:    {}", style(summary.links_failed).red());
    }
    println!("  Files:           {} downloaded", style(summary.files_downloaded).green());
    if summary.files_failed > 0 {
        println!("  Files failed:    {}", style(summary.files_failed).red());
    }
    if summary.dirs_created > 0 {
        println!("  Directories:     {} created", summary.dirs_created);
    }
}
