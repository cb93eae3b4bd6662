//! Idempotent schema evolution.
//!
//! `ensure_schema` runs on every boot. It replays the `CREATE ... IF NOT
//! EXISTS` statements from `schemas`, then walks `COLUMN_MIGRATIONS` in order.
//! Each migration probes the live column set first and only alters the table
//! when the column is missing, so a database created by any earlier version
//! converges on the current shape without losing rows. Nothing is ever
//! dropped or renamed.

use crate::core::error;
use crate::core::schemas;
use crate::core::time;
use rusqlite::{Connection, params};

/// One additive column change.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMigration {
    /// Stable identifier recorded in `schema_migrations`.
    pub name: &'static str,
    pub table: &'static str,
    pub column: &'static str,
    /// Column definition appended after `ADD COLUMN <column>`.
    pub definition: &'static str,
}

/// All column migrations in the order they shipped. Later entries may assume
/// earlier ones have landed.
pub const COLUMN_MIGRATIONS: &[ColumnMigration] = &[
    ColumnMigration {
        name: "0001_users_is_banned",
        table: "users",
        column: "is_banned",
        definition: "INTEGER NOT NULL DEFAULT 0",
    },
    ColumnMigration {
        name: "0002_users_show_in_matchup",
        table: "users",
        column: "show_in_matchup",
        definition: "INTEGER NOT NULL DEFAULT 0",
    },
    ColumnMigration {
        name: "0003_users_suspended_until",
        table: "users",
        column: "suspended_until",
        definition: "TEXT",
    },
    ColumnMigration {
        name: "0004_users_warning_message",
        table: "users",
        column: "warning_message",
        definition: "TEXT",
    },
    ColumnMigration {
        name: "0005_users_warning_ack",
        table: "users",
        column: "warning_ack",
        definition: "INTEGER NOT NULL DEFAULT 1",
    },
    ColumnMigration {
        name: "0006_events_latitude",
        table: "events",
        column: "latitude",
        definition: "REAL",
    },
    ColumnMigration {
        name: "0007_events_longitude",
        table: "events",
        column: "longitude",
        definition: "REAL",
    },
];

/// Current column names of `table`, in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, error::BridgeError> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let cols = stmt
        .query_map(params![table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cols)
}

pub fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, error::BridgeError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        params![table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Apply a single migration if its column is missing. Returns whether the
/// table was altered.
///
/// The probe is re-run for every migration rather than cached, so a column
/// added earlier in the same pass is seen and never added twice.
pub fn apply_column_migration(
    conn: &Connection,
    migration: &ColumnMigration,
) -> Result<bool, error::BridgeError> {
    let altered = if has_column(conn, migration.table, migration.column)? {
        false
    } else {
        conn.execute(
            &format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                migration.table, migration.column, migration.definition
            ),
            [],
        )?;
        tracing::info!(
            migration = migration.name,
            table = migration.table,
            column = migration.column,
            "applied column migration"
        );
        true
    };

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations(name, applied_at) VALUES(?1, ?2)",
        params![migration.name, time::now_iso()],
    )?;
    Ok(altered)
}

/// Bring the store up to the current schema. Returns the names of the
/// migrations that actually altered a table during this call.
pub fn ensure_schema(conn: &Connection) -> Result<Vec<&'static str>, error::BridgeError> {
    for ddl in schemas::TABLES {
        conn.execute(ddl, [])?;
    }
    for ddl in schemas::INDEXES {
        conn.execute(ddl, [])?;
    }

    let mut applied = Vec::new();
    for migration in COLUMN_MIGRATIONS {
        if apply_column_migration(conn, migration)? {
            applied.push(migration.name);
        }
    }
    Ok(applied)
}

/// Names recorded in the migration ledger, sorted.
pub fn recorded_migrations(conn: &Connection) -> Result<Vec<String>, error::BridgeError> {
    let mut stmt = conn.prepare("SELECT name FROM schema_migrations ORDER BY name")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
