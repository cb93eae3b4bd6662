//! Skill-exchange board: offers and requests.

use crate::core::error::{self, BridgeError};
use crate::core::store::Store;
use crate::core::time;
use crate::repos::users::{self, UserPublic};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillSwapPost {
    pub id: i64,
    pub user_id: i64,
    /// `offer` or `request` by convention.
    pub post_type: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillSwapView {
    #[serde(flatten)]
    pub post: SkillSwapPost,
    pub user: UserPublic,
}

#[derive(Debug, Clone)]
pub struct NewSkillSwapPost<'a> {
    pub user_id: i64,
    pub post_type: &'a str,
    pub title: &'a str,
    pub category: &'a str,
    pub description: &'a str,
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<SkillSwapPost> {
    Ok(SkillSwapPost {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        post_type: row.get("post_type")?,
        title: row.get("title")?,
        category: row.get("category")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}

fn view_by_id(conn: &Connection, post_id: i64) -> Result<Option<SkillSwapView>, BridgeError> {
    let post = conn
        .query_row(
            "SELECT id, user_id, post_type, title, category, description, created_at
             FROM skillswap_posts WHERE id = ?1",
            params![post_id],
            post_from_row,
        )
        .optional()?;
    let Some(post) = post else {
        return Ok(None);
    };
    match users::public_by_id(conn, post.user_id)? {
        Some(user) => Ok(Some(SkillSwapView { post, user })),
        None => {
            tracing::debug!(post_id, user_id = post.user_id, "skill post author missing");
            Ok(None)
        }
    }
}

pub struct SkillSwapRepo<'s> {
    store: &'s Store,
}

impl<'s> SkillSwapRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    pub fn create(&self, new_post: &NewSkillSwapPost<'_>) -> Result<SkillSwapView, error::BridgeError> {
        self.store.broker().with_conn("skillswap.create", |conn| {
            conn.execute(
                "INSERT INTO skillswap_posts(user_id, post_type, title, category, description, created_at)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    new_post.user_id,
                    new_post.post_type,
                    new_post.title,
                    new_post.category,
                    new_post.description,
                    time::now_iso()
                ],
            )?;
            let id = conn.last_insert_rowid();
            view_by_id(conn, id)?
                .ok_or_else(|| BridgeError::NotFound(format!("skill post {id} after insert")))
        })
    }

    pub fn get(&self, post_id: i64) -> Result<Option<SkillSwapView>, error::BridgeError> {
        self.store
            .broker()
            .with_conn("skillswap.get", |conn| view_by_id(conn, post_id))
    }

    /// Newest first; posts whose author is gone or unreadable are skipped.
    pub fn list(&self) -> Result<Vec<SkillSwapView>, error::BridgeError> {
        self.store.broker().with_conn("skillswap.list", |conn| {
            let ids = {
                let mut stmt = conn.prepare("SELECT id FROM skillswap_posts ORDER BY id DESC")?;
                stmt.query_map([], |row| row.get::<_, i64>(0))?
                    .collect::<Result<Vec<_>, _>>()?
            };
            let mut out = Vec::with_capacity(ids.len());
            for id in ids {
                match view_by_id(conn, id) {
                    Ok(Some(view)) => out.push(view),
                    Ok(None) => {}
                    Err(e) => tracing::debug!(post_id = id, error = %e, "skipping unreadable skill post"),
                }
            }
            Ok(out)
        })
    }

    pub fn delete(&self, post_id: i64) -> Result<bool, error::BridgeError> {
        self.store.broker().with_conn("skillswap.delete", |conn| {
            let n = conn.execute("DELETE FROM skillswap_posts WHERE id = ?1", params![post_id])?;
            Ok(n > 0)
        })
    }
}
