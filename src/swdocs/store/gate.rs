//! The write gate.
//!
//! SQLite admits one writer at a time and answers a second one with
//! `SQLITE_BUSY`. [`WriteGate`] owns the writer state (for [`SqliteStore`],
//! the write connection and its timestamp clock), so the only way to run a
//! mutation is through [`WriteGate::with`], one caller at a time.
//!
//! Waiting for the gate is bounded. A caller that cannot get in within the
//! configured wait gets [`SwdocsError::WriteTimeout`] and may resubmit.
//!
//! The gate is released when the guard drops: on success, on error, and on
//! panic (`parking_lot` mutexes do not poison). It only serializes writers in
//! this process; several processes sharing one database file are not
//! coordinated.
//!
//! [`SqliteStore`]: super::sqlite::SqliteStore

use crate::error::{Result, SwdocsError};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

pub const DEFAULT_WRITE_WAIT: Duration = Duration::from_secs(5);

pub struct WriteGate<T> {
    slot: Mutex<T>,
    wait: Duration,
}

impl<T> WriteGate<T> {
    pub fn new(inner: T, wait: Duration) -> Self {
        Self {
            slot: Mutex::new(inner),
            wait,
        }
    }

    /// Runs `op` with exclusive access to the writer state.
    pub fn with<R>(&self, op: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let started = Instant::now();
        let mut guard = match self.slot.try_lock_for(self.wait) {
            Some(guard) => guard,
            None => {
                tracing::warn!(wait_ms = self.wait.as_millis() as u64, "write gate timed out");
                return Err(SwdocsError::WriteTimeout(self.wait));
            }
        };
        tracing::trace!(
            queued_us = started.elapsed().as_micros() as u64,
            "write gate acquired"
        );
        op(&mut guard)
    }
}
