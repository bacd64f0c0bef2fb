//! Progress reporting observer.

use std::io::{self, Stdout, Write};

use indicatif::{ProgressBar, ProgressStyle};

use crate::status::{StatusEvent, StatusObserver, TransferState};

/// Create a progress bar for a transfer, labelled with the object name.
pub fn create_download_bar(total: u64, name: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar.set_message(name.to_string());
    bar
}

/// Renders the per-transfer progress line and forwards raw bytes in streaming mode.
pub struct ProgressReporter<W: Write = Stdout> {
    show_progress: bool,
    streaming: bool,
    bar: Option<ProgressBar>,
    sink: W,
}

impl ProgressReporter<Stdout> {
    /// Reporter writing streamed bytes to standard output.
    pub fn stdout(show_progress: bool, streaming: bool) -> Self {
        Self::new(show_progress, streaming, io::stdout())
    }
}

impl<W: Write> ProgressReporter<W> {
    /// Streaming always turns the progress bar off.
    pub fn new(show_progress: bool, streaming: bool, sink: W) -> Self {
        Self {
            show_progress: show_progress && !streaming,
            streaming,
            bar: None,
            sink,
        }
    }

    pub fn shows_progress(&self) -> bool {
        self.show_progress
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    fn update_bar(&mut self, transferred: u64, total: u64, name: &str) {
        let bar = self
            .bar
            .get_or_insert_with(|| create_download_bar(total, name));
        bar.set_length(total);
        bar.set_position(transferred);
    }
}

impl<W: Write> StatusObserver for ProgressReporter<W> {
    fn on_event(&mut self, event: &StatusEvent<'_>, state: &TransferState) -> io::Result<()> {
        match *event {
            StatusEvent::ObjectIdentified(_) => {
                // A new object starts a fresh bar.
                self.clear();
            }
            StatusEvent::Progress { transferred, total } => {
                if self.show_progress {
                    let name = state.current_object.as_deref().unwrap_or("");
                    self.update_bar(transferred, total, name);
                }
            }
            StatusEvent::RawChunk(bytes) => {
                if self.streaming {
                    self.sink.write_all(bytes)?;
                    self.sink.flush()?;
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
