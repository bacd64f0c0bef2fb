//! Transfer lifecycle events and their synchronous dispatch.
//!
//! The session reports what it is doing through a [`StatusEventBus`] while a
//! fetch call is still running. Observers are invoked in registration order on
//! the calling thread, before the fetch returns.

use std::io;

/// A lifecycle event raised by the fetch primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent<'a> {
    /// The name of the object being transferred became known.
    ObjectIdentified(&'a str),
    /// Bytes written so far out of the expected total.
    Progress { transferred: u64, total: u64 },
    /// Literal transferred bytes. Only delivered in streaming mode.
    RawChunk(&'a [u8]),
}

/// Progress of the current transfer.
///
/// Counters are reset for every fetch; the object name is kept as the last
/// known value so it can be reported after the fetch completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferState {
    pub current_object: Option<String>,
    pub bytes_transferred: u64,
    pub total_bytes: u64,
}

/// Receives status events.
pub trait StatusObserver {
    /// Handle one event. An error means the observer's own output sink failed.
    fn on_event(&mut self, event: &StatusEvent<'_>, state: &TransferState) -> io::Result<()>;

    /// Drop any partially drawn progress output.
    fn clear(&mut self) {}
}

/// Fans status events out to the registered observers.
#[derive(Default)]
pub struct StatusEventBus {
    observers: Vec<Box<dyn StatusObserver + Send>>,
    state: TransferState,
    streaming: bool,
}

impl StatusEventBus {
    pub fn new(streaming: bool) -> Self {
        Self {
            observers: Vec::new(),
            state: TransferState::default(),
            streaming,
        }
    }

    /// Register an observer. Observers are called in registration order.
    pub fn subscribe(&mut self, observer: Box<dyn StatusObserver + Send>) {
        self.observers.push(observer);
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn state(&self) -> &TransferState {
        &self.state
    }

    /// Reset progress counters before a fetch. The last object name survives.
    pub fn begin_transfer(&mut self, total_bytes: u64) {
        self.state.bytes_transferred = 0;
        self.state.total_bytes = total_bytes;
    }

    /// Update the transfer state and dispatch `event` to every observer.
    ///
    /// Raw chunks are dropped unless streaming mode is active. The first
    /// observer error is returned after all observers have run.
    pub fn emit(&mut self, event: StatusEvent<'_>) -> io::Result<()> {
        match event {
            StatusEvent::ObjectIdentified(name) => {
                self.state.current_object = Some(name.to_string());
            }
            StatusEvent::Progress { transferred, total } => {
                self.state.bytes_transferred = transferred;
                self.state.total_bytes = total;
            }
            StatusEvent::RawChunk(_) if !self.streaming => return Ok(()),
            StatusEvent::RawChunk(_) => {}
        }

        let mut first_error = None;
        for observer in &mut self.observers {
            if let Err(e) = observer.on_event(&event, &self.state) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Ask every observer to clear its progress output.
    pub fn clear(&mut self) {
        for observer in &mut self.observers {
            observer.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every event it sees as a string, tagged with its own label.
    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl StatusObserver for Recorder {
        fn on_event(&mut self, event: &StatusEvent<'_>, state: &TransferState) -> io::Result<()> {
            let entry = match event {
                StatusEvent::ObjectIdentified(name) => format!("{}:name:{}", self.label, name),
                StatusEvent::Progress { transferred, total } => format!(
                    "{}:progress:{}/{}:{}",
                    self.label,
                    transferred,
                    total,
                    state.current_object.as_deref().unwrap_or("-")
                ),
                StatusEvent::RawChunk(bytes) => format!("{}:chunk:{}", self.label, bytes.len()),
            };
            self.log.lock().unwrap().push(entry);
            Ok(())
        }

        fn clear(&mut self) {
            self.log.lock().unwrap().push(format!("{}:clear", self.label));
        }
    }

    struct Failing;

    impl StatusObserver for Failing {
        fn on_event(&mut self, _: &StatusEvent<'_>, _: &TransferState) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn recorder(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Box<Recorder> {
        Box::new(Recorder {
            label,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = StatusEventBus::new(false);
        bus.subscribe(recorder("a", &log));
        bus.subscribe(recorder("b", &log));

        bus.emit(StatusEvent::ObjectIdentified("file.bin")).unwrap();
        bus.emit(StatusEvent::Progress {
            transferred: 5,
            total: 10,
        })
        .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "a:name:file.bin",
                "b:name:file.bin",
                "a:progress:5/10:file.bin",
                "b:progress:5/10:file.bin",
            ]
        );
        assert_eq!(bus.state().bytes_transferred, 5);
        assert_eq!(bus.state().total_bytes, 10);
    }

    #[test]
    fn test_raw_chunks_only_when_streaming() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = StatusEventBus::new(false);
        bus.subscribe(recorder("a", &log));
        bus.emit(StatusEvent::RawChunk(b"abc")).unwrap();
        assert!(log.lock().unwrap().is_empty());

        let mut bus = StatusEventBus::new(true);
        bus.subscribe(recorder("a", &log));
        bus.emit(StatusEvent::RawChunk(b"abc")).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a:chunk:3"]);
    }

    #[test]
    fn test_object_name_survives_new_transfer() {
        let mut bus = StatusEventBus::new(false);
        bus.emit(StatusEvent::ObjectIdentified("first.txt")).unwrap();
        bus.emit(StatusEvent::Progress {
            transferred: 7,
            total: 7,
        })
        .unwrap();

        bus.begin_transfer(100);
        assert_eq!(bus.state().current_object.as_deref(), Some("first.txt"));
        assert_eq!(bus.state().bytes_transferred, 0);
        assert_eq!(bus.state().total_bytes, 100);
    }

    #[test]
    fn test_observer_error_reported_after_all_observers_ran() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = StatusEventBus::new(true);
        bus.subscribe(Box::new(Failing));
        bus.subscribe(recorder("b", &log));

        let err = bus.emit(StatusEvent::RawChunk(b"x")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(*log.lock().unwrap(), vec!["b:chunk:1"]);
    }

    #[test]
    fn test_clear_reaches_every_observer() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = StatusEventBus::new(false);
        bus.subscribe(recorder("a", &log));
        bus.subscribe(recorder("b", &log));
        bus.clear();
        assert_eq!(*log.lock().unwrap(), vec!["a:clear", "b:clear"]);
    }
}
