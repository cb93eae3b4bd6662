//! Stories and their comments.

use crate::core::error::{self, BridgeError};
use crate::core::store::Store;
use crate::core::time;
use crate::repos::users::{self, UserPublic};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_COMMENT_LIMIT: i64 = 200;

/// The closed set of story categories. Anything else is `Untagged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryCategory {
    DayToDay,
    Tradition,
    Career,
    Untagged,
}

impl StoryCategory {
    pub const ALL: [StoryCategory; 4] = [
        StoryCategory::DayToDay,
        StoryCategory::Tradition,
        StoryCategory::Career,
        StoryCategory::Untagged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryCategory::DayToDay => "daytoday",
            StoryCategory::Tradition => "tradition",
            StoryCategory::Career => "career",
            StoryCategory::Untagged => "untagged",
        }
    }

    /// Case-insensitive match against the set; never fails.
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .unwrap_or(StoryCategory::Untagged)
    }
}

impl fmt::Display for StoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Story {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub category: StoryCategory,
    pub content: String,
    /// `ongoing` / `resolved` by convention.
    pub status: String,
    pub created_at: String,
}

/// A story with its author and live comment count.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoryView {
    #[serde(flatten)]
    pub story: Story,
    pub user: UserPublic,
    pub comments_count: i64,
}

#[derive(Debug, Clone)]
pub struct NewStory<'a> {
    pub user_id: i64,
    pub title: &'a str,
    pub category: &'a str,
    pub content: &'a str,
    pub status: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryComment {
    pub id: i64,
    pub story_id: i64,
    pub user_id: i64,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentAuthor {
    pub id: i64,
    pub full_name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: StoryComment,
    pub user: CommentAuthor,
}

fn story_from_row(row: &Row<'_>) -> rusqlite::Result<Story> {
    let raw_category: Option<String> = row.get("category")?;
    Ok(Story {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        category: StoryCategory::normalize(raw_category.as_deref().unwrap_or_default()),
        content: row.get("content")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<StoryComment> {
    Ok(StoryComment {
        id: row.get("id")?,
        story_id: row.get("story_id")?,
        user_id: row.get("user_id")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
    })
}

fn comment_view_from_row(row: &Row<'_>) -> rusqlite::Result<CommentView> {
    let comment = comment_from_row(row)?;
    let user = CommentAuthor {
        id: comment.user_id,
        full_name: row.get("full_name")?,
        avatar: row.get("avatar")?,
    };
    Ok(CommentView { comment, user })
}

fn count_comments(conn: &Connection, story_id: i64) -> Result<i64, BridgeError> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM story_comments WHERE story_id = ?1",
        params![story_id],
        |row| row.get(0),
    )?;
    Ok(n)
}

/// Full projection; `None` when the story or its author is gone.
fn view_by_id(conn: &Connection, story_id: i64) -> Result<Option<StoryView>, BridgeError> {
    let story = conn
        .query_row(
            "SELECT id, user_id, title, category, content, status, created_at
             FROM stories WHERE id = ?1",
            params![story_id],
            story_from_row,
        )
        .optional()?;
    let Some(story) = story else {
        return Ok(None);
    };
    let Some(user) = users::public_by_id(conn, story.user_id)? else {
        tracing::debug!(story_id, user_id = story.user_id, "story author missing");
        return Ok(None);
    };
    let comments_count = count_comments(conn, story.id)?;
    Ok(Some(StoryView {
        story,
        user,
        comments_count,
    }))
}

const COMMENT_VIEW_SQL: &str = "SELECT c.id, c.story_id, c.user_id, c.text, c.created_at,
            u.full_name, u.avatar
     FROM story_comments c
     JOIN users u ON u.id = c.user_id";

pub struct StoryRepo<'s> {
    store: &'s Store,
}

impl<'s> StoryRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Create a story. Unknown categories are stored as `untagged`.
    pub fn create(&self, new_story: &NewStory<'_>) -> Result<StoryView, error::BridgeError> {
        let category = StoryCategory::normalize(new_story.category);
        self.store.broker().with_conn("stories.create", |conn| {
            conn.execute(
                "INSERT INTO stories(user_id, title, category, content, status, created_at)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    new_story.user_id,
                    new_story.title,
                    category.as_str(),
                    new_story.content,
                    new_story.status.unwrap_or("ongoing"),
                    time::now_iso()
                ],
            )?;
            let id = conn.last_insert_rowid();
            view_by_id(conn, id)?
                .ok_or_else(|| BridgeError::NotFound(format!("story {id} after insert")))
        })
    }

    /// `None` both when the story does not exist and when its author is gone,
    /// since the projection cannot be completed without one.
    pub fn get(&self, story_id: i64) -> Result<Option<StoryView>, error::BridgeError> {
        self.store
            .broker()
            .with_conn("stories.get", |conn| view_by_id(conn, story_id))
    }

    /// Newest first. Stories whose projection cannot be built, or whose author
    /// row cannot be decoded, are skipped.
    pub fn list(&self) -> Result<Vec<StoryView>, error::BridgeError> {
        self.store.broker().with_conn("stories.list", |conn| {
            let ids = {
                let mut stmt = conn.prepare("SELECT id FROM stories ORDER BY id DESC")?;
                stmt.query_map([], |row| row.get::<_, i64>(0))?
                    .collect::<Result<Vec<_>, _>>()?
            };
            let mut out = Vec::with_capacity(ids.len());
            for id in ids {
                match view_by_id(conn, id) {
                    Ok(Some(view)) => out.push(view),
                    Ok(None) => {}
                    Err(e) => tracing::debug!(story_id = id, error = %e, "skipping unreadable story"),
                }
            }
            Ok(out)
        })
    }

    pub fn delete(&self, story_id: i64) -> Result<bool, error::BridgeError> {
        self.store.broker().with_conn("stories.delete", |conn| {
            let n = conn.execute("DELETE FROM stories WHERE id = ?1", params![story_id])?;
            Ok(n > 0)
        })
    }

    pub fn count_comments(&self, story_id: i64) -> Result<i64, error::BridgeError> {
        self.store
            .broker()
            .with_conn("stories.count_comments", |conn| count_comments(conn, story_id))
    }

    /// Oldest first, with a short author summary. A non-positive limit means
    /// the default.
    pub fn list_comments(
        &self,
        story_id: i64,
        limit: i64,
    ) -> Result<Vec<CommentView>, error::BridgeError> {
        let limit = if limit > 0 { limit } else { DEFAULT_COMMENT_LIMIT };
        self.store.broker().with_conn("stories.list_comments", |conn| {
            let mut stmt = conn.prepare(&format!(
                "{COMMENT_VIEW_SQL} WHERE c.story_id = ?1 ORDER BY c.id ASC LIMIT ?2"
            ))?;
            let rows = stmt
                .query_map(params![story_id, limit], comment_view_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_comment(&self, comment_id: i64) -> Result<Option<StoryComment>, error::BridgeError> {
        self.store.broker().with_conn("stories.get_comment", |conn| {
            let comment = conn
                .query_row(
                    "SELECT id, story_id, user_id, text, created_at
                     FROM story_comments WHERE id = ?1",
                    params![comment_id],
                    comment_from_row,
                )
                .optional()?;
            Ok(comment)
        })
    }

    pub fn add_comment(
        &self,
        story_id: i64,
        user_id: i64,
        text: &str,
    ) -> Result<CommentView, error::BridgeError> {
        self.store.broker().with_conn("stories.add_comment", |conn| {
            conn.execute(
                "INSERT INTO story_comments(story_id, user_id, text, created_at)
                 VALUES(?1, ?2, ?3, ?4)",
                params![story_id, user_id, text, time::now_iso()],
            )?;
            let id = conn.last_insert_rowid();
            let view = conn
                .query_row(
                    &format!("{COMMENT_VIEW_SQL} WHERE c.id = ?1"),
                    params![id],
                    comment_view_from_row,
                )
                .optional()?;
            view.ok_or_else(|| BridgeError::NotFound(format!("comment {id} after insert")))
        })
    }

    /// Delete a comment only if it belongs to `story_id`.
    pub fn delete_comment(&self, story_id: i64, comment_id: i64) -> Result<bool, error::BridgeError> {
        self.store.broker().with_conn("stories.delete_comment", |conn| {
            let n = conn.execute(
                "DELETE FROM story_comments WHERE id = ?1 AND story_id = ?2",
                params![comment_id, story_id],
            )?;
            Ok(n > 0)
        })
    }
}
