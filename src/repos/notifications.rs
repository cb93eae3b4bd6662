//! Per-user notifications.
//!
//! Storage names differ from what callers see: `notif_type` is surfaced as
//! `type`, `created_at` as `time`, and `is_read` as `isRead`.

use crate::core::error::{self, BridgeError};
use crate::core::store::Store;
use crate::core::time;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NOTIFICATION_LIMIT: i64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "type")]
    pub notif_type: String,
    pub icon: String,
    pub title: String,
    pub content: String,
    pub link: Option<String>,
    #[serde(rename = "time")]
    pub created_at: String,
    #[serde(rename = "isRead")]
    pub is_read: bool,
}

#[derive(Debug, Clone)]
pub struct NewNotification<'a> {
    pub user_id: i64,
    pub notif_type: &'a str,
    pub icon: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub link: Option<&'a str>,
}

fn notification_from_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get("id")?,
        notif_type: row.get("notif_type")?,
        icon: row.get("icon")?,
        title: row.get("title")?,
        content: row.get("content")?,
        link: row.get("link")?,
        created_at: row.get("created_at")?,
        is_read: row.get::<_, i64>("is_read")? != 0,
    })
}

const NOTIFICATION_COLUMNS: &str = "id, notif_type, icon, title, content, link, created_at, is_read";

fn find_by_id(conn: &Connection, notif_id: i64) -> Result<Option<Notification>, BridgeError> {
    let n = conn
        .query_row(
            &format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?1"),
            params![notif_id],
            notification_from_row,
        )
        .optional()?;
    Ok(n)
}

pub struct NotificationRepo<'s> {
    store: &'s Store,
}

impl<'s> NotificationRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    pub fn create(&self, new_notif: &NewNotification<'_>) -> Result<Notification, error::BridgeError> {
        self.store.broker().with_conn("notifications.create", |conn| {
            conn.execute(
                "INSERT INTO notifications(user_id, notif_type, icon, title, content, link,
                                           created_at, is_read)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, 0)",
                params![
                    new_notif.user_id,
                    new_notif.notif_type,
                    new_notif.icon,
                    new_notif.title,
                    new_notif.content,
                    new_notif.link,
                    time::now_iso()
                ],
            )?;
            let id = conn.last_insert_rowid();
            find_by_id(conn, id)?
                .ok_or_else(|| BridgeError::NotFound(format!("notification {id} after insert")))
        })
    }

    pub fn get(&self, notif_id: i64) -> Result<Option<Notification>, error::BridgeError> {
        self.store
            .broker()
            .with_conn("notifications.get", |conn| find_by_id(conn, notif_id))
    }

    /// Newest first. A non-positive limit means the default.
    pub fn list(&self, user_id: i64, limit: i64) -> Result<Vec<Notification>, error::BridgeError> {
        let limit = if limit > 0 { limit } else { DEFAULT_NOTIFICATION_LIMIT };
        self.store.broker().with_conn("notifications.list", |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications
                 WHERE user_id = ?1 ORDER BY id DESC LIMIT ?2"
            ))?;
            let rows = stmt
                .query_map(params![user_id, limit], notification_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Returns how many rows flipped to read.
    pub fn mark_all_read(&self, user_id: i64) -> Result<usize, error::BridgeError> {
        self.store.broker().with_conn("notifications.mark_all_read", |conn| {
            let n = conn.execute(
                "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
                params![user_id],
            )?;
            Ok(n)
        })
    }

    pub fn clear(&self, user_id: i64) -> Result<usize, error::BridgeError> {
        self.store.broker().with_conn("notifications.clear", |conn| {
            let n = conn.execute("DELETE FROM notifications WHERE user_id = ?1", params![user_id])?;
            Ok(n)
        })
    }
}
