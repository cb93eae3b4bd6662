//! Moderation state machine: ban, suspension, and warning axes of a user.
//!
//! The three axes are independent and compose. A user can be banned,
//! suspended, and carrying an unacknowledged warning at the same time.
//!
//! # Suspension
//!
//! `suspended_until` is either absent (`Active`) or a timestamp. A timestamp in
//! the future means `Suspended`; one at or before now means `Active`. Reads
//! never report a stale suspension: when [`Moderation::suspension_status`]
//! sees an expired value it clears the column before answering. That write is
//! best-effort; if it fails the answer is still `Active` and the next read
//! retries the clear. Values that do not parse as a timestamp read as
//! `Active` and are left untouched.
//!
//! # Warning
//!
//! `none -> pending` on [`Moderation::issue_warning`] (message set, ack=0),
//! `pending -> none` on [`Moderation::acknowledge_warning`] (ack=1, message
//! cleared together). Issuing while pending overwrites; warnings never stack.

use crate::core::error;
use crate::core::store::Store;
use crate::core::time;
use crate::repos::users::{self, User, UserPublic};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SuspensionStatus {
    Active,
    Suspended { until: DateTime<Utc> },
}

impl SuspensionStatus {
    pub fn is_suspended(&self) -> bool {
        matches!(self, SuspensionStatus::Suspended { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WarningStatus {
    None,
    Pending { message: String },
}

impl WarningStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, WarningStatus::Pending { .. })
    }

    fn of(user: &User) -> Self {
        match &user.warning_message {
            Some(msg) if !msg.is_empty() && !user.warning_ack => WarningStatus::Pending {
                message: msg.clone(),
            },
            _ => WarningStatus::None,
        }
    }
}

/// Raw state of all three axes for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationStatus {
    pub user_id: i64,
    pub banned: bool,
    pub suspension: SuspensionStatus,
    pub warning: WarningStatus,
}

impl ModerationStatus {
    /// Banned, currently suspended, or holding a pending warning. Whether the
    /// warning case is a hard stop or an acknowledgement prompt is the
    /// caller's policy; [`Self::is_hard_blocked`] excludes it.
    pub fn is_blocked(&self) -> bool {
        self.is_hard_blocked() || self.needs_acknowledgement()
    }

    pub fn is_hard_blocked(&self) -> bool {
        self.banned || self.suspension.is_suspended()
    }

    pub fn needs_acknowledgement(&self) -> bool {
        self.warning.is_pending()
    }
}

/// Outcome of comparing a stored `suspended_until` against `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuspensionCheck {
    /// Nothing stored, or a value that does not parse.
    NotSuspended,
    /// Stored value is at or before `now` and should be cleared.
    Expired,
    Suspended(DateTime<Utc>),
}

/// Pure decision behind the suspension axis.
pub fn evaluate_suspension(raw: Option<&str>, now: DateTime<Utc>) -> SuspensionCheck {
    let Some(until) = raw.and_then(time::parse_iso_utc) else {
        return SuspensionCheck::NotSuspended;
    };
    if until > now {
        SuspensionCheck::Suspended(until)
    } else {
        SuspensionCheck::Expired
    }
}

/// Resolve the suspension axis for a loaded row, clearing it if expired.
fn resolve_suspension(conn: &Connection, user: &User) -> SuspensionStatus {
    let raw = user.suspended_until.as_deref();
    match evaluate_suspension(raw, Utc::now()) {
        SuspensionCheck::Suspended(until) => SuspensionStatus::Suspended { until },
        SuspensionCheck::NotSuspended => SuspensionStatus::Active,
        SuspensionCheck::Expired => {
            // Only clear the exact value we judged stale.
            let cleared = conn.execute(
                "UPDATE users SET suspended_until = NULL WHERE id = ?1 AND suspended_until = ?2",
                params![user.id, raw],
            );
            if let Err(e) = cleared {
                tracing::warn!(user_id = user.id, error = %e, "lazy suspension clear failed");
            }
            SuspensionStatus::Active
        }
    }
}

pub struct Moderation<'s> {
    store: &'s Store,
}

impl<'s> Moderation<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Set or clear the ban flag. `None` if the user does not exist.
    pub fn set_banned(
        &self,
        user_id: i64,
        banned: bool,
    ) -> Result<Option<UserPublic>, error::BridgeError> {
        self.store.broker().with_conn("moderation.set_banned", |conn| {
            conn.execute(
                "UPDATE users SET is_banned = ?1 WHERE id = ?2",
                params![i64::from(banned), user_id],
            )?;
            users::public_by_id(conn, user_id)
        })
    }

    pub fn suspend_until(
        &self,
        user_id: i64,
        until: DateTime<Utc>,
    ) -> Result<Option<User>, error::BridgeError> {
        self.store.broker().with_conn("moderation.suspend", |conn| {
            conn.execute(
                "UPDATE users SET suspended_until = ?1 WHERE id = ?2",
                params![time::to_iso(&until), user_id],
            )?;
            users::find_by_id(conn, user_id)
        })
    }

    /// Administrator lift of a suspension. Returns whether the user exists.
    pub fn clear_suspension(&self, user_id: i64) -> Result<bool, error::BridgeError> {
        self.store.broker().with_conn("moderation.clear_suspension", |conn| {
            let n = conn.execute(
                "UPDATE users SET suspended_until = NULL WHERE id = ?1",
                params![user_id],
            )?;
            Ok(n > 0)
        })
    }

    /// Current suspension state; expired suspensions are cleared as a side
    /// effect. `None` if the user does not exist.
    pub fn suspension_status(
        &self,
        user_id: i64,
    ) -> Result<Option<SuspensionStatus>, error::BridgeError> {
        self.store.broker().with_conn("moderation.suspension_status", |conn| {
            Ok(users::find_by_id(conn, user_id)?.map(|user| resolve_suspension(conn, &user)))
        })
    }

    /// Issue (or overwrite) the user's pending warning. An empty message is
    /// stored as-is and reads back as no warning.
    pub fn issue_warning(&self, user_id: i64, message: &str) -> Result<bool, error::BridgeError> {
        self.store.broker().with_conn("moderation.issue_warning", |conn| {
            let n = conn.execute(
                "UPDATE users SET warning_message = ?1, warning_ack = 0 WHERE id = ?2",
                params![message, user_id],
            )?;
            Ok(n > 0)
        })
    }

    pub fn warning_status(&self, user_id: i64) -> Result<Option<WarningStatus>, error::BridgeError> {
        self.store.broker().with_conn("moderation.warning_status", |conn| {
            Ok(users::find_by_id(conn, user_id)?.map(|user| WarningStatus::of(&user)))
        })
    }

    pub fn acknowledge_warning(&self, user_id: i64) -> Result<bool, error::BridgeError> {
        self.store.broker().with_conn("moderation.acknowledge_warning", |conn| {
            let n = conn.execute(
                "UPDATE users SET warning_ack = 1, warning_message = NULL WHERE id = ?1",
                params![user_id],
            )?;
            Ok(n > 0)
        })
    }

    /// All three axes in one read. The suspension axis gets the same lazy
    /// clear as [`Self::suspension_status`].
    pub fn status(&self, user_id: i64) -> Result<Option<ModerationStatus>, error::BridgeError> {
        self.store.broker().with_conn("moderation.status", |conn| {
            let Some(user) = users::find_by_id(conn, user_id)? else {
                return Ok(None);
            };
            Ok(Some(ModerationStatus {
                user_id: user.id,
                banned: user.is_banned,
                suspension: resolve_suspension(conn, &user),
                warning: WarningStatus::of(&user),
            }))
        })
    }
}
