use crate::core::db;
use crate::core::error;
use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// The DB Broker is the single door to the SQLite file.
///
/// Every operation gets its own connection, scoped to one closure call. The
/// connection is dropped on every exit path, so nothing is held between
/// requests and no lock is taken beyond what SQLite itself does.
#[derive(Debug, Clone)]
pub struct DbBroker {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl DbBroker {
    pub fn new(db_path: &Path, busy_timeout: Duration) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
            busy_timeout,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Execute a closure with a fresh connection in autocommit mode.
    pub fn with_conn<F, R>(&self, op_name: &str, f: F) -> Result<R, error::BridgeError>
    where
        F: FnOnce(&Connection) -> Result<R, error::BridgeError>,
    {
        let started = Instant::now();
        let conn = db::db_connect(&self.db_path, self.busy_timeout)?;
        let result = f(&conn);
        self.log_event(op_name, result.is_ok(), started);
        result
    }

    /// Execute a closure inside a transaction; commit on `Ok`, roll back on `Err`.
    pub fn with_tx<F, R>(&self, op_name: &str, f: F) -> Result<R, error::BridgeError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<R, error::BridgeError>,
    {
        let started = Instant::now();
        let mut conn = db::db_connect(&self.db_path, self.busy_timeout)?;
        let result = (|| -> Result<R, error::BridgeError> {
            let tx = conn.transaction()?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })();
        self.log_event(op_name, result.is_ok(), started);
        result
    }

    fn log_event(&self, op: &str, ok: bool, started: Instant) {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if ok {
            tracing::debug!(op, elapsed_ms, status = "success", "store op");
        } else {
            tracing::debug!(op, elapsed_ms, status = "error", "store op");
        }
    }
}
