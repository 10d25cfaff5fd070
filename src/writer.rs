//! The ingest queue and the background writer that drains it.
//!
//! Producers push [`Envelope::Record`] values onto an unbounded channel; a
//! single writer thread pops them in FIFO order, rotates the active file when
//! needed, and persists each record. [`Envelope::Shutdown`] is the only way to
//! stop the loop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::rotation::RotationManager;
use crate::session::SessionAggregator;
use crate::{Error, LogRecord, Result, SaveFormat, console, format};

/// An item on the ingest queue.
#[derive(Debug)]
pub(crate) enum Envelope {
    Record(LogRecord),
    Shutdown,
}

/// Create the ingest queue.
pub(crate) fn queue() -> (Sender<Envelope>, Receiver<Envelope>) {
    crossbeam_channel::unbounded()
}

/// Everything the writer mutates, guarded by one lock so rotation and
/// persistence never interleave.
#[derive(Debug)]
pub(crate) struct Persistence {
    rotation: RotationManager,
    session: Option<SessionAggregator>,
    format: SaveFormat,
}

impl Persistence {
    pub fn new(
        rotation: RotationManager,
        session: Option<SessionAggregator>,
        format: SaveFormat,
    ) -> Self {
        Self {
            rotation,
            session,
            format,
        }
    }

    pub fn rotation(&self) -> &RotationManager {
        &self.rotation
    }

    /// Rotate if needed, then persist one record.
    fn step(&mut self, record: LogRecord) -> Result<()> {
        self.rotation.check_and_rotate()?;

        if let Some(session) = self.session.as_mut() {
            session.push(record.clone());
        }

        match (self.format, self.session.as_ref()) {
            (SaveFormat::Json, Some(session)) => {
                let document = session.to_json()?;
                self.rotation.overwrite(&document)
            }
            (SaveFormat::Json, None) => {
                let line = format::json_line(&record)?;
                self.rotation.append_line(&line)
            }
            (SaveFormat::Txt, _) => self.rotation.append_line(&format::text_line(&record)),
        }
    }
}

pub(crate) type SharedPersistence = Arc<Mutex<Persistence>>;

pub(crate) fn lock(state: &SharedPersistence) -> MutexGuard<'_, Persistence> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The single consumer of the ingest queue.
pub(crate) struct WriterLoop {
    receiver: Receiver<Envelope>,
    state: SharedPersistence,
    flush_interval: Duration,
}

impl WriterLoop {
    pub fn new(
        receiver: Receiver<Envelope>,
        state: SharedPersistence,
        flush_interval: Duration,
    ) -> Self {
        Self {
            receiver,
            state,
            flush_interval,
        }
    }

    /// Drain the queue until the shutdown envelope arrives.
    ///
    /// A disconnected channel (every sender dropped) also ends the loop.
    pub fn run(self) -> Result<()> {
        tracing::debug!("log writer started");
        let mut written: u64 = 0;
        while let Ok(Envelope::Record(record)) = self.receiver.recv() {
            lock(&self.state).step(record)?;
            written += 1;

            if !self.flush_interval.is_zero() {
                thread::sleep(self.flush_interval);
            }
        }
        tracing::debug!(written, "log writer drained");
        Ok(())
    }

    /// Start the loop on a dedicated thread.
    ///
    /// When the loop fails and `exit_on_failure` is set, the failure is
    /// reported and the process exits with status 1; otherwise the error is
    /// returned through the join handle.
    pub fn spawn(self, exit_on_failure: bool) -> Result<JoinHandle<Result<()>>> {
        thread::Builder::new()
            .name("solelog-writer".to_string())
            .spawn(move || supervise(self, exit_on_failure))
            .map_err(|e| Error::Init(format!("failed to start log writer thread: {}", e)))
    }
}

fn supervise(writer: WriterLoop, exit_on_failure: bool) -> Result<()> {
    let result = writer.run();
    if let Err(e) = &result {
        tracing::error!(error = %e, "log writer failed");
        console::report_failure(
            "Error writing logs to file. Logging has failed and queued records were abandoned",
            e,
        );
        if exit_on_failure {
            std::process::exit(1);
        }
    }
    result
}
