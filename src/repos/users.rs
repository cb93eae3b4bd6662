//! User records, registration, profiles, and the public projection.

use crate::core::error::{self, BridgeError};
use crate::core::store::Store;
use rusqlite::{Connection, OptionalExtension, Row, params, types::ToSql};
use serde::{Deserialize, Serialize};

pub(crate) const USER_COLUMNS: &str = "id, full_name, email, password, age, generation, bio, \
     match_preferences, avatar, is_admin, is_banned, show_in_matchup, suspended_until, \
     warning_message, warning_ack";

/// Full stored user row. Integer flags are already booleans here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub age: Option<i64>,
    pub generation: Option<String>,
    pub bio: Option<String>,
    pub match_preferences: Option<String>,
    pub avatar: Option<String>,
    pub is_admin: bool,
    pub is_banned: bool,
    pub show_in_matchup: bool,
    pub suspended_until: Option<String>,
    pub warning_message: Option<String>,
    /// `true` means no warning is waiting for acknowledgement.
    pub warning_ack: bool,
}

/// What other users and the API layer may see about a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPublic {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub age: Option<i64>,
    pub generation: Option<String>,
    pub bio: Option<String>,
    pub match_preferences: Option<String>,
    pub avatar: Option<String>,
    pub interests: Vec<String>,
    pub is_admin: bool,
    pub is_banned: bool,
    pub show_in_matchup: bool,
}

impl UserPublic {
    fn from_user(user: User, interests: Vec<String>) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            age: user.age,
            generation: user.generation,
            bio: user.bio,
            match_preferences: user.match_preferences,
            avatar: user.avatar,
            interests,
            is_admin: user.is_admin,
            is_banned: user.is_banned,
            show_in_matchup: user.show_in_matchup,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Partial profile update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub generation: Option<String>,
    pub bio: Option<String>,
    pub match_preferences: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    fn assignments(&self) -> Vec<(&'static str, &dyn ToSql)> {
        let mut sets: Vec<(&'static str, &dyn ToSql)> = Vec::new();
        if let Some(v) = &self.full_name {
            sets.push(("full_name", v as &dyn ToSql));
        }
        if let Some(v) = &self.email {
            sets.push(("email", v as &dyn ToSql));
        }
        if let Some(v) = &self.age {
            sets.push(("age", v as &dyn ToSql));
        }
        if let Some(v) = &self.generation {
            sets.push(("generation", v as &dyn ToSql));
        }
        if let Some(v) = &self.bio {
            sets.push(("bio", v as &dyn ToSql));
        }
        if let Some(v) = &self.match_preferences {
            sets.push(("match_preferences", v as &dyn ToSql));
        }
        if let Some(v) = &self.avatar {
            sets.push(("avatar", v as &dyn ToSql));
        }
        sets
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserFilter {
    pub exclude_user_id: Option<i64>,
    pub only_matchup: bool,
}

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        full_name: row.get("full_name")?,
        email: row.get("email")?,
        password: row.get("password")?,
        age: row.get("age")?,
        generation: row.get("generation")?,
        bio: row.get("bio")?,
        match_preferences: row.get("match_preferences")?,
        avatar: row.get("avatar")?,
        is_admin: row.get::<_, Option<i64>>("is_admin")?.unwrap_or(0) != 0,
        is_banned: row.get::<_, Option<i64>>("is_banned")?.unwrap_or(0) != 0,
        show_in_matchup: row.get::<_, Option<i64>>("show_in_matchup")?.unwrap_or(0) != 0,
        suspended_until: row.get("suspended_until")?,
        warning_message: row.get("warning_message")?,
        warning_ack: row.get::<_, Option<i64>>("warning_ack")?.unwrap_or(0) != 0,
    })
}

pub(crate) fn find_by_id(conn: &Connection, user_id: i64) -> Result<Option<User>, BridgeError> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![user_id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub(crate) fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>, BridgeError> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub(crate) fn interests_for(conn: &Connection, user_id: i64) -> Result<Vec<String>, BridgeError> {
    let mut stmt = conn.prepare(
        "SELECT interest_name FROM user_interests WHERE user_id = ?1 ORDER BY interest_name",
    )?;
    let names = stmt
        .query_map(params![user_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

pub(crate) fn public_by_id(conn: &Connection, user_id: i64) -> Result<Option<UserPublic>, BridgeError> {
    let Some(user) = find_by_id(conn, user_id)? else {
        return Ok(None);
    };
    let interests = interests_for(conn, user_id)?;
    Ok(Some(UserPublic::from_user(user, interests)))
}

/// Replace a user's interest set. Blank names are skipped; unknown tags are
/// created on the fly.
pub(crate) fn replace_interests<S: AsRef<str>>(
    conn: &Connection,
    user_id: i64,
    interests: &[S],
) -> Result<(), BridgeError> {
    conn.execute("DELETE FROM user_interests WHERE user_id = ?1", params![user_id])?;
    for name in interests {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        conn.execute("INSERT OR IGNORE INTO interests(name) VALUES(?1)", params![name])?;
        conn.execute(
            "INSERT OR IGNORE INTO user_interests(user_id, interest_name) VALUES(?1, ?2)",
            params![user_id, name],
        )?;
    }
    Ok(())
}

fn email_conflict() -> BridgeError {
    BridgeError::Conflict("Email already exists".to_string())
}

pub struct UserRepo<'s> {
    store: &'s Store,
}

impl<'s> UserRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    pub fn get(&self, user_id: i64) -> Result<Option<User>, error::BridgeError> {
        self.store
            .broker()
            .with_conn("users.get", |conn| find_by_id(conn, user_id))
    }

    /// Exact, case-sensitive email match.
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, error::BridgeError> {
        self.store
            .broker()
            .with_conn("users.get_by_email", |conn| find_by_email(conn, email))
    }

    /// Register a new non-admin account. A taken email is a `Conflict` and
    /// writes nothing.
    pub fn register(&self, new_user: &NewUser<'_>) -> Result<User, error::BridgeError> {
        self.store.broker().with_conn("users.register", |conn| {
            let inserted = conn.execute(
                "INSERT INTO users(full_name, email, password, is_admin) VALUES(?1, ?2, ?3, 0)",
                params![new_user.full_name, new_user.email, new_user.password],
            );
            match inserted {
                Ok(_) => {}
                Err(e) if BridgeError::is_unique_violation(&e) => return Err(email_conflict()),
                Err(e) => return Err(e.into()),
            }
            let id = conn.last_insert_rowid();
            find_by_id(conn, id)?
                .ok_or_else(|| BridgeError::NotFound(format!("user {id} after insert")))
        })
    }

    /// Apply a partial profile update. `None` if the user does not exist.
    pub fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, error::BridgeError> {
        self.store.broker().with_conn("users.update_profile", |conn| {
            let assignments = update.assignments();
            if !assignments.is_empty() {
                let set_sql = assignments
                    .iter()
                    .enumerate()
                    .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut values: Vec<&dyn ToSql> = assignments.iter().map(|(_, v)| *v).collect();
                values.push(&user_id);
                let sql = format!(
                    "UPDATE users SET {set_sql} WHERE id = ?{}",
                    assignments.len() + 1
                );
                match conn.execute(&sql, values.as_slice()) {
                    Ok(_) => {}
                    Err(e) if BridgeError::is_unique_violation(&e) => {
                        return Err(email_conflict());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            find_by_id(conn, user_id)
        })
    }

    pub fn set_interests<S: AsRef<str>>(
        &self,
        user_id: i64,
        interests: &[S],
    ) -> Result<(), error::BridgeError> {
        self.store
            .broker()
            .with_tx("users.set_interests", |tx| replace_interests(tx, user_id, interests))
    }

    pub fn interests(&self, user_id: i64) -> Result<Vec<String>, error::BridgeError> {
        self.store
            .broker()
            .with_conn("users.interests", |conn| interests_for(conn, user_id))
    }

    pub fn public(&self, user_id: i64) -> Result<Option<UserPublic>, error::BridgeError> {
        self.store
            .broker()
            .with_conn("users.public", |conn| public_by_id(conn, user_id))
    }

    /// Public projections ordered by id. Rows that vanish mid-listing or cannot
/// be decoded are skipped.
    pub fn list_public(&self, filter: UserFilter) -> Result<Vec<UserPublic>, error::BridgeError> {
        self.store.broker().with_conn("users.list_public", |conn| {
            let mut clauses = Vec::new();
            if filter.exclude_user_id.is_some() {
                clauses.push("id <> ?1");
            }
            if filter.only_matchup {
                clauses.push("show_in_matchup = 1");
            }
            let where_sql = if clauses.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", clauses.join(" AND "))
            };
            let mut stmt = conn.prepare(&format!("SELECT id FROM users{where_sql} ORDER BY id"))?;
            let ids = match filter.exclude_user_id {
                Some(excluded) => stmt
                    .query_map(params![excluded], |row| row.get::<_, i64>(0))?
                    .collect::<Result<Vec<_>, _>>()?,
                None => stmt
                    .query_map([], |row| row.get::<_, i64>(0))?
                    .collect::<Result<Vec<_>, _>>()?,
            };

            let mut out = Vec::with_capacity(ids.len());
            for id in ids {
                match public_by_id(conn, id) {
                    Ok(Some(user)) => out.push(user),
                    Ok(None) => tracing::debug!(user_id = id, "skipping user missing at enrichment"),
                    Err(e) => tracing::debug!(user_id = id, error = %e, "skipping unreadable user"),
                }
            }
            Ok(out)
        })
    }

    /// Everyone except `user_id`; the messaging contact list.
    pub fn contacts(&self, user_id: i64) -> Result<Vec<UserPublic>, error::BridgeError> {
        self.list_public(UserFilter {
            exclude_user_id: Some(user_id),
            only_matchup: false,
        })
    }

    pub fn set_matchup_visible(
        &self,
        user_id: i64,
        visible: bool,
    ) -> Result<Option<UserPublic>, error::BridgeError> {
        self.store.broker().with_conn("users.set_matchup_visible", |conn| {
            conn.execute(
                "UPDATE users SET show_in_matchup = ?1 WHERE id = ?2",
                params![i64::from(visible), user_id],
            )?;
            public_by_id(conn, user_id)
        })
    }

    /// Delete a user; owned rows go with it through the foreign keys.
    pub fn delete(&self, user_id: i64) -> Result<bool, error::BridgeError> {
        self.store.broker().with_conn("users.delete", |conn| {
            let n = conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
            Ok(n > 0)
        })
    }
}
