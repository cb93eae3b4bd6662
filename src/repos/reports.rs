//! Abuse reports filed by one user against another.

use crate::core::error::{self, BridgeError};
use crate::core::store::Store;
use crate::core::time;
use crate::repos::users::{self, UserPublic};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REPORT_LIMIT: i64 = 100;
pub const REPORT_STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: i64,
    pub reporter_id: i64,
    pub target_user_id: i64,
    pub reason: String,
    pub details: Option<String>,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportView {
    #[serde(flatten)]
    pub report: Report,
    pub reporter: UserPublic,
    pub target_user: UserPublic,
}

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<Report> {
    Ok(Report {
        id: row.get("id")?,
        reporter_id: row.get("reporter_id")?,
        target_user_id: row.get("target_user_id")?,
        reason: row.get("reason")?,
        details: row.get("details")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
    })
}

fn view_by_id(conn: &Connection, report_id: i64) -> Result<Option<ReportView>, BridgeError> {
    let report = conn
        .query_row(
            "SELECT id, reporter_id, target_user_id, reason, details, status, created_at
             FROM reports WHERE id = ?1",
            params![report_id],
            report_from_row,
        )
        .optional()?;
    let Some(report) = report else {
        return Ok(None);
    };
    let reporter = users::public_by_id(conn, report.reporter_id)?;
    let target_user = users::public_by_id(conn, report.target_user_id)?;
    match (reporter, target_user) {
        (Some(reporter), Some(target_user)) => Ok(Some(ReportView {
            report,
            reporter,
            target_user,
        })),
        _ => {
            tracing::debug!(report_id, "report party missing");
            Ok(None)
        }
    }
}

pub struct ReportRepo<'s> {
    store: &'s Store,
}

impl<'s> ReportRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// File a report; it starts out `pending`.
    pub fn create(
        &self,
        reporter_id: i64,
        target_user_id: i64,
        reason: &str,
        details: Option<&str>,
    ) -> Result<ReportView, error::BridgeError> {
        self.store.broker().with_conn("reports.create", |conn| {
            conn.execute(
                "INSERT INTO reports(reporter_id, target_user_id, reason, details, status, created_at)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    reporter_id,
                    target_user_id,
                    reason,
                    details,
                    REPORT_STATUS_PENDING,
                    time::now_iso()
                ],
            )?;
            let id = conn.last_insert_rowid();
            view_by_id(conn, id)?
                .ok_or_else(|| BridgeError::NotFound(format!("report {id} after insert")))
        })
    }

    /// `None` when the report does not exist, and also when the reporter or
    /// the target is gone.
    pub fn get(&self, report_id: i64) -> Result<Option<ReportView>, error::BridgeError> {
        self.store
            .broker()
            .with_conn("reports.get", |conn| view_by_id(conn, report_id))
    }

    /// Newest first. A non-positive limit means the default. Reports with a
    /// missing or unreadable party are skipped.
    pub fn list(&self, limit: i64) -> Result<Vec<ReportView>, error::BridgeError> {
        let limit = if limit > 0 { limit } else { DEFAULT_REPORT_LIMIT };
        self.store.broker().with_conn("reports.list", |conn| {
            let ids = {
                let mut stmt = conn.prepare("SELECT id FROM reports ORDER BY id DESC LIMIT ?1")?;
                stmt.query_map(params![limit], |row| row.get::<_, i64>(0))?
                    .collect::<Result<Vec<_>, _>>()?
            };
            let mut out = Vec::with_capacity(ids.len());
            for id in ids {
                match view_by_id(conn, id) {
                    Ok(Some(view)) => out.push(view),
                    Ok(None) => {}
                    Err(e) => tracing::debug!(report_id = id, error = %e, "skipping unreadable report"),
                }
            }
            Ok(out)
        })
    }

    /// Status is free-form (`pending`, `reviewed`, `dismissed`, ...).
    pub fn update_status(
        &self,
        report_id: i64,
        status: &str,
    ) -> Result<Option<ReportView>, error::BridgeError> {
        self.store.broker().with_conn("reports.update_status", |conn| {
            conn.execute(
                "UPDATE reports SET status = ?1 WHERE id = ?2",
                params![status, report_id],
            )?;
            view_by_id(conn, report_id)
        })
    }
}
