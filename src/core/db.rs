use crate::core::error;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Open a connection with the pragmas every store operation relies on.
///
/// `foreign_keys` must be on for user deletion to cascade.
pub fn db_connect(db_path: &Path, busy_timeout: Duration) -> Result<Connection, error::BridgeError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(busy_timeout)
        .map_err(error::BridgeError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(error::BridgeError::RusqliteError)?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .map_err(error::BridgeError::RusqliteError)?;
    Ok(conn)
}

/// Create the directory holding the database file if it does not exist yet.
pub fn ensure_parent_dir(db_path: &Path) -> Result<(), error::BridgeError> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(error::BridgeError::IoError)?;
        }
    }
    Ok(())
}
