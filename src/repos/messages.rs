use crate::core::error::{self, BridgeError};
use crate::core::store::Store;
use crate::core::time;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

pub const DEFAULT_THREAD_LIMIT: i64 = 200;

/// A directed message. Messages are never edited or deleted directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub text: String,
    pub created_at: String,
    pub is_read: bool,
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get("id")?,
        sender_id: row.get("sender_id")?,
        recipient_id: row.get("recipient_id")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
        is_read: row.get::<_, i64>("is_read")? != 0,
    })
}

fn find_by_id(conn: &Connection, message_id: i64) -> Result<Option<Message>, BridgeError> {
    let message = conn
        .query_row(
            "SELECT id, sender_id, recipient_id, text, created_at, is_read
             FROM messages WHERE id = ?1",
            params![message_id],
            message_from_row,
        )
        .optional()?;
    Ok(message)
}

pub struct MessageRepo<'s> {
    store: &'s Store,
}

impl<'s> MessageRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    pub fn send(
        &self,
        sender_id: i64,
        recipient_id: i64,
        text: &str,
    ) -> Result<Message, error::BridgeError> {
        self.store.broker().with_conn("messages.send", |conn| {
            conn.execute(
                "INSERT INTO messages(sender_id, recipient_id, text, created_at, is_read)
                 VALUES(?1, ?2, ?3, ?4, 0)",
                params![sender_id, recipient_id, text, time::now_iso()],
            )?;
            let id = conn.last_insert_rowid();
            find_by_id(conn, id)?
                .ok_or_else(|| BridgeError::NotFound(format!("message {id} after insert")))
        })
    }

    pub fn get(&self, message_id: i64) -> Result<Option<Message>, error::BridgeError> {
        self.store
            .broker()
            .with_conn("messages.get", |conn| find_by_id(conn, message_id))
    }

    /// Both directions between `user_a` and `user_b`, oldest first. Argument
    /// order does not matter.
    pub fn thread(
        &self,
        user_a: i64,
        user_b: i64,
        limit: i64,
    ) -> Result<Vec<Message>, error::BridgeError> {
        let limit = if limit > 0 { limit } else { DEFAULT_THREAD_LIMIT };
        self.store.broker().with_conn("messages.thread", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender_id, recipient_id, text, created_at, is_read
                 FROM messages
                 WHERE (sender_id = ?1 AND recipient_id = ?2)
                    OR (sender_id = ?2 AND recipient_id = ?1)
                 ORDER BY id ASC
                 LIMIT ?3",
            )?;
            let rows = stmt
                .query_map(params![user_a, user_b, limit], message_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}
