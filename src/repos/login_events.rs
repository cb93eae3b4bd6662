//! Append-only audit trail of authentication attempts.

use crate::core::error;
use crate::core::store::Store;
use crate::core::time;
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOGIN_EVENT_LIMIT: i64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginEvent {
    pub id: i64,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub success: bool,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: String,
}

/// One attempt as reported by the caller. `user_id` is absent when the email
/// matched no account.
#[derive(Debug, Clone, Default)]
pub struct LoginAttempt<'a> {
    pub user_id: Option<i64>,
    pub email: Option<&'a str>,
    pub success: bool,
    pub ip: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

fn login_event_from_row(row: &Row<'_>) -> rusqlite::Result<LoginEvent> {
    Ok(LoginEvent {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        email: row.get("email")?,
        success: row.get::<_, i64>("success")? != 0,
        ip: row.get("ip")?,
        user_agent: row.get("user_agent")?,
        created_at: row.get("created_at")?,
    })
}

pub struct LoginEventRepo<'s> {
    store: &'s Store,
}

impl<'s> LoginEventRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Append an attempt; returns the new row id.
    pub fn record(&self, attempt: &LoginAttempt<'_>) -> Result<i64, error::BridgeError> {
        self.store.broker().with_conn("login_events.record", |conn| {
            conn.execute(
                "INSERT INTO login_events(user_id, email, success, ip, user_agent, created_at)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    attempt.user_id,
                    attempt.email,
                    i64::from(attempt.success),
                    attempt.ip,
                    attempt.user_agent,
                    time::now_iso()
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Newest first. A non-positive limit means the default.
    pub fn list(&self, limit: i64) -> Result<Vec<LoginEvent>, error::BridgeError> {
        let limit = if limit > 0 { limit } else { DEFAULT_LOGIN_EVENT_LIMIT };
        self.store.broker().with_conn("login_events.list", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, email, success, ip, user_agent, created_at
                 FROM login_events ORDER BY id DESC LIMIT ?1",
            )?;
            let rows = stmt
                .query_map(params![limit], login_event_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}
