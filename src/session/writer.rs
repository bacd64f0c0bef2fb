//! `AsyncWrite` adapter that reports what passes through it.

use std::io::{self, Write};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::io::AsyncWrite;

use crate::status::{StatusEvent, StatusEventBus};

/// Writes into a blocking sink and emits `RawChunk` and `Progress` events for
/// every chunk, before the write call returns.
///
/// The first failure of the sink or of an observer is kept so the session can
/// tell a local write failure apart from a transfer failure.
pub struct EventWriter<'a, W: Write> {
    inner: W,
    bus: &'a mut StatusEventBus,
    written: u64,
    total: u64,
    sink_error: Option<io::ErrorKind>,
}

impl<'a, W: Write> EventWriter<'a, W> {
    pub fn new(inner: W, bus: &'a mut StatusEventBus, total: u64) -> Self {
        bus.begin_transfer(total);
        Self {
            inner,
            bus,
            written: 0,
            total,
            sink_error: None,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// The local sink (or an observer) failed during the transfer.
    pub fn sink_error(&self) -> Option<io::ErrorKind> {
        self.sink_error
    }

    fn write_chunk(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write_all(buf)?;
        self.written += buf.len() as u64;
        self.bus.emit(StatusEvent::RawChunk(buf))?;
        self.bus.emit(StatusEvent::Progress {
            transferred: self.written,
            total: self.total.max(self.written),
        })?;
        Ok(buf.len())
    }
}

impl<W: Write + Unpin> AsyncWrite for EventWriter<'_, W> {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let result = this.write_chunk(buf);
        if let Err(e) = &result {
            this.sink_error.get_or_insert(e.kind());
        }
        Poll::Ready(result)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let result = this.inner.flush();
        if let Err(e) = &result {
            this.sink_error.get_or_insert(e.kind());
        }
        Poll::Ready(result)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.poll_flush(cx)
    }
}
