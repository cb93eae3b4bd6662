//! Centralized schema definitions for the GenerationBridge store.
//!
//! One SQLite file holds every table. Statements here are all
//! `CREATE ... IF NOT EXISTS` so they are safe to replay on each boot; columns
//! that older database files lack are added by `migration`, not here.

pub const DEFAULT_DB_NAME: &str = "app.db";

pub const USERS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        age INTEGER,
        generation TEXT,
        bio TEXT,
        match_preferences TEXT,
        avatar TEXT,
        is_admin INTEGER NOT NULL DEFAULT 0,
        is_banned INTEGER NOT NULL DEFAULT 0,
        show_in_matchup INTEGER NOT NULL DEFAULT 0,
        suspended_until TEXT,
        warning_message TEXT,
        warning_ack INTEGER NOT NULL DEFAULT 1
    )
";

pub const INTERESTS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS interests (
        name TEXT PRIMARY KEY
    )
";

pub const USER_INTERESTS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS user_interests (
        user_id INTEGER NOT NULL,
        interest_name TEXT NOT NULL,
        PRIMARY KEY (user_id, interest_name),
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (interest_name) REFERENCES interests(name) ON DELETE CASCADE
    )
";

pub const STORIES_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS stories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        category TEXT NOT NULL,
        content TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'ongoing',
        created_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )
";

pub const STORY_COMMENTS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS story_comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        story_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY (story_id) REFERENCES stories(id) ON DELETE CASCADE,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )
";
pub const STORY_COMMENTS_INDEX_STORY: &str =
    "CREATE INDEX IF NOT EXISTS idx_story_comments_story ON story_comments(story_id)";

pub const SKILLSWAP_POSTS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS skillswap_posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        post_type TEXT NOT NULL,
        title TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )
";

// latitude/longitude arrive through migration on older files.
pub const EVENTS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        location TEXT,
        start_date TEXT NOT NULL,
        start_time TEXT,
        end_date TEXT,
        end_time TEXT,
        link TEXT,
        created_at TEXT NOT NULL,
        latitude REAL,
        longitude REAL
    )
";

pub const MESSAGES_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sender_id INTEGER NOT NULL,
        recipient_id INTEGER NOT NULL,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL,
        is_read INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (sender_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (recipient_id) REFERENCES users(id) ON DELETE CASCADE
    )
";
pub const MESSAGES_INDEX_PAIR: &str =
    "CREATE INDEX IF NOT EXISTS idx_messages_pair ON messages(sender_id, recipient_id)";

pub const NOTIFICATIONS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS notifications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        notif_type TEXT NOT NULL,
        icon TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        link TEXT,
        created_at TEXT NOT NULL,
        is_read INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )
";
pub const NOTIFICATIONS_INDEX_USER: &str =
    "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id)";

pub const REPORTS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS reports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        reporter_id INTEGER NOT NULL,
        target_user_id INTEGER NOT NULL,
        reason TEXT NOT NULL,
        details TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT NOT NULL,
        FOREIGN KEY (reporter_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (target_user_id) REFERENCES users(id) ON DELETE CASCADE
    )
";

// Append-only; user_id is nullable for attempts against unknown emails.
pub const LOGIN_EVENTS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS login_events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        email TEXT,
        success INTEGER NOT NULL,
        ip TEXT,
        user_agent TEXT,
        created_at TEXT NOT NULL
    )
";

pub const SCHEMA_MIGRATIONS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS schema_migrations (
        name TEXT PRIMARY KEY,
        applied_at TEXT NOT NULL
    )
";

/// Table DDL in creation order (parents before children).
pub const TABLES: &[&str] = &[
    USERS_SCHEMA,
    INTERESTS_SCHEMA,
    USER_INTERESTS_SCHEMA,
    STORIES_SCHEMA,
    STORY_COMMENTS_SCHEMA,
    SKILLSWAP_POSTS_SCHEMA,
    EVENTS_SCHEMA,
    MESSAGES_SCHEMA,
    NOTIFICATIONS_SCHEMA,
    REPORTS_SCHEMA,
    LOGIN_EVENTS_SCHEMA,
    SCHEMA_MIGRATIONS_SCHEMA,
];

/// Indexes only touch columns present since the first schema version.
pub const INDEXES: &[&str] = &[
    STORY_COMMENTS_INDEX_STORY,
    MESSAGES_INDEX_PAIR,
    NOTIFICATIONS_INDEX_USER,
];
