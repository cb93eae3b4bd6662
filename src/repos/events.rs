//! Platform-curated community events.

use crate::core::error::{self, BridgeError};
use crate::core::store::Store;
use crate::core::time;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENT_LIMIT: i64 = 50;

const EVENT_COLUMNS: &str = "id, title, description, location, start_date, start_time, end_date, \
     end_time, link, latitude, longitude, created_at";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Stored as given; `YYYY-MM-DD` values order correctly under lexical comparison.
    pub start_date: String,
    pub start_time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,
    pub link: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewEvent<'a> {
    pub title: &'a str,
    pub start_date: &'a str,
    pub start_time: Option<&'a str>,
    pub location: Option<&'a str>,
    pub description: Option<&'a str>,
    pub end_date: Option<&'a str>,
    pub end_time: Option<&'a str>,
    pub link: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventListing {
    /// `start_date` today or later, soonest first.
    #[default]
    Upcoming,
    /// Everything, latest first.
    All,
}

/// Older rows store missing optionals as empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get("id")?,
        title: row.get("title")?,
        description: non_empty(row.get("description")?),
        location: non_empty(row.get("location")?),
        start_date: row.get("start_date")?,
        start_time: non_empty(row.get("start_time")?),
        end_date: non_empty(row.get("end_date")?),
        end_time: non_empty(row.get("end_time")?),
        link: non_empty(row.get("link")?),
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        created_at: row.get("created_at")?,
    })
}

fn find_by_id(conn: &Connection, event_id: i64) -> Result<Option<Event>, BridgeError> {
    let event = conn
        .query_row(
            &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
            params![event_id],
            event_from_row,
        )
        .optional()?;
    Ok(event)
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub struct EventRepo<'s> {
    store: &'s Store,
}

impl<'s> EventRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Create an event. `start_date` is stored trimmed but otherwise as given;
    /// listing compares it lexically, so only `YYYY-MM-DD` values order well.
    pub fn create(&self, new_event: &NewEvent<'_>) -> Result<Event, error::BridgeError> {
        let start_date = new_event.start_date.trim();
        self.store.broker().with_conn("events.create", |conn| {
            conn.execute(
                "INSERT INTO events(title, description, location, start_date, start_time, end_date,
                                    end_time, link, latitude, longitude, created_at)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    new_event.title,
                    blank_to_none(new_event.description),
                    blank_to_none(new_event.location),
                    start_date,
                    blank_to_none(new_event.start_time),
                    blank_to_none(new_event.end_date),
                    blank_to_none(new_event.end_time),
                    blank_to_none(new_event.link),
                    new_event.latitude,
                    new_event.longitude,
                    time::now_iso()
                ],
            )?;
            let id = conn.last_insert_rowid();
            find_by_id(conn, id)?
                .ok_or_else(|| BridgeError::NotFound(format!("event {id} after insert")))
        })
    }

    pub fn get(&self, event_id: i64) -> Result<Option<Event>, error::BridgeError> {
        self.store
            .broker()
            .with_conn("events.get", |conn| find_by_id(conn, event_id))
    }

    /// List against today's UTC date. A non-positive limit means the default.
    pub fn list(&self, listing: EventListing, limit: i64) -> Result<Vec<Event>, error::BridgeError> {
        self.list_as_of(listing, limit, time::today_utc())
    }

    /// Same as [`Self::list`] with an explicit notion of "today".
    pub fn list_as_of(
        &self,
        listing: EventListing,
        limit: i64,
        today: NaiveDate,
    ) -> Result<Vec<Event>, error::BridgeError> {
        let limit = if limit > 0 { limit } else { DEFAULT_EVENT_LIMIT };
        self.store.broker().with_conn("events.list", |conn| {
            let rows = match listing {
                EventListing::Upcoming => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {EVENT_COLUMNS} FROM events
                         WHERE start_date >= ?1
                         ORDER BY start_date ASC, COALESCE(start_time, '') ASC, id ASC
                         LIMIT ?2"
                    ))?;
                    stmt.query_map(
                        params![today.format("%Y-%m-%d").to_string(), limit],
                        event_from_row,
                    )?
                    .collect::<Result<Vec<_>, _>>()?
                }
                EventListing::All => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {EVENT_COLUMNS} FROM events
                         ORDER BY start_date DESC, COALESCE(start_time, '') DESC, id DESC
                         LIMIT ?1"
                    ))?;
                    stmt.query_map(params![limit], event_from_row)?
                        .collect::<Result<Vec<_>, _>>()?
                }
            };
            Ok(rows)
        })
    }

    pub fn delete(&self, event_id: i64) -> Result<bool, error::BridgeError> {
        self.store.broker().with_conn("events.delete", |conn| {
            let n = conn.execute("DELETE FROM events WHERE id = ?1", params![event_id])?;
            Ok(n > 0)
        })
    }
}
