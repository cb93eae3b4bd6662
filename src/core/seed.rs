//! Baseline reference data and demo content.
//!
//! `seed` runs after `migration::ensure_schema` on every boot, inside one
//! transaction, against a store that may already hold organic data:
//!
//! 1. baseline interest tags are inserted if missing;
//! 2. seed accounts are inserted if their email is free (never overwritten);
//! 3. the admin flag is cleared everywhere and set on the reserved admin
//!    email only, whose password is reset to the canonical value;
//! 4. the demo accounts are forced matchup-visible;
//! 5. each seed account's interest set is replaced with its fixed mapping;
//! 6. demo stories, comments, skill posts, and events are inserted only into
//!    empty tables, and stored story categories are normalized.
//!
//! Step 5 clobbers any edit an operator made to a seed account's interests.

use crate::core::error;
use crate::core::time;
use crate::repos::stories::StoryCategory;
use crate::repos::users;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::collections::HashMap;

pub const ADMIN_EMAIL: &str = "admin@generationbridge.com";
pub const ADMIN_PASSWORD: &str = "admin123";

pub const BASE_INTERESTS: &[&str] = &[
    "tech", "art", "music", "cooking", "reading", "sports", "gaming", "practical", "cultural",
    "religious", "technical", "creative",
];

/// Demo accounts that must always show up in Match-Up.
pub const MATCHUP_DEMO_EMAILS: &[&str] = &[
    "eleanor.martinez@generationbridge.com",
    "david.miller@generationbridge.com",
    "robert.thompson@generationbridge.com",
    "sophie.johnson@generationbridge.com",
];

#[derive(Debug, Clone, Copy)]
pub struct SeedAccount {
    pub full_name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub age: i64,
    pub generation: &'static str,
    pub bio: &'static str,
    pub match_preferences: &'static str,
    pub avatar: &'static str,
    pub interests: &'static [&'static str],
}

pub const SEED_ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        full_name: "Admin",
        email: ADMIN_EMAIL,
        password: ADMIN_PASSWORD,
        age: 30,
        generation: "Gen Y",
        bio: "Platform admin",
        match_preferences: "",
        avatar: "🛡️",
        interests: &["practical"],
    },
    SeedAccount {
        full_name: "Eleanor Martinez",
        email: "eleanor.martinez@generationbridge.com",
        password: "123456",
        age: 54,
        generation: "Baby Boomer",
        bio: "Enjoys sharing life experience and learning new tech.",
        match_preferences: "Looking for friendly chats.",
        avatar: "👩‍🦳",
        interests: &["cultural", "reading", "practical"],
    },
    SeedAccount {
        full_name: "David Miller",
        email: "david.miller@generationbridge.com",
        password: "123456",
        age: 34,
        generation: "Gen Y",
        bio: "Curious about culture and mentoring.",
        match_preferences: "Prefer weekend meetups.",
        avatar: "👨‍💼",
        interests: &["cultural", "technical", "reading"],
    },
    SeedAccount {
        full_name: "Robert Thompson",
        email: "robert.thompson@generationbridge.com",
        password: "123456",
        age: 61,
        generation: "Baby Boomer",
        bio: "Retired engineer open to mentoring and learning.",
        match_preferences: "Looking for practical exchanges.",
        avatar: "👴",
        interests: &["technical", "practical", "reading"],
    },
    SeedAccount {
        full_name: "Sophie Johnson",
        email: "sophie.johnson@generationbridge.com",
        password: "123456",
        age: 22,
        generation: "Gen Z",
        bio: "Student who loves creative projects and learning.",
        match_preferences: "Prefer quick sessions.",
        avatar: "👩‍🎓",
        interests: &["creative", "tech", "music"],
    },
    SeedAccount {
        full_name: "Alice Tan",
        email: "alice@example.com",
        password: "123456",
        age: 21,
        generation: "Gen Z",
        bio: "Hi, I'm Alice.",
        match_preferences: "",
        avatar: "😊",
        interests: &["tech", "creative", "gaming"],
    },
    SeedAccount {
        full_name: "Mr Lim",
        email: "mr_lim@example.com",
        password: "123456",
        age: 52,
        generation: "Gen X",
        bio: "Happy to mentor.",
        match_preferences: "",
        avatar: "👨‍🏫",
        interests: &["practical", "technical", "reading"],
    },
    SeedAccount {
        full_name: "Mei Chen",
        email: "mei.chen@example.com",
        password: "123456",
        age: 29,
        generation: "Gen Y",
        bio: "Enjoys cooking and culture.",
        match_preferences: "",
        avatar: "👩‍🍳",
        interests: &["cooking", "cultural", "music"],
    },
    SeedAccount {
        full_name: "Jason Ng",
        email: "jason.ng@example.com",
        password: "123456",
        age: 45,
        generation: "Gen X",
        bio: "DIY and practical skills enthusiast.",
        match_preferences: "",
        avatar: "🧰",
        interests: &["practical", "sports", "technical"],
    },
];

/// Is `email` one of the reserved seed identities?
pub fn is_seed_email(email: &str) -> bool {
    SEED_ACCOUNTS.iter().any(|a| a.email == email)
}

struct DemoStory {
    author: &'static str,
    title: &'static str,
    category: &'static str,
    content: &'static str,
    status: &'static str,
}

const DEMO_STORIES: &[DemoStory] = &[
    DemoStory {
        author: "sophie.johnson@generationbridge.com",
        title: "Balancing school and part-time work",
        category: "daytoday",
        content: "I am struggling to balance classes, assignments, and a part-time job. Any tips from someone who has been through this?",
        status: "ongoing",
    },
    DemoStory {
        author: "robert.thompson@generationbridge.com",
        title: "Career change after 50",
        category: "career",
        content: "I would like to share my experience switching careers later in life and hear others' perspectives on staying relevant.",
        status: "ongoing",
    },
    DemoStory {
        author: "eleanor.martinez@generationbridge.com",
        title: "Keeping traditions alive in a modern family",
        category: "tradition",
        content: "How do you keep family traditions meaningful when everyone is busy and lives far apart?",
        status: "resolved",
    },
    DemoStory {
        author: "david.miller@generationbridge.com",
        title: "Finding community in a new city",
        category: "untagged",
        content: "Recently moved and finding it hard to build a social circle. What worked for you?",
        status: "ongoing",
    },
];

/// Commenters added to each of the newest demo stories.
const DEMO_COMMENTS: &[(&str, &str)] = &[
    (
        "alice@example.com",
        "I relate to this. One thing that helped me was planning my week in blocks.",
    ),
    (
        "mr_lim@example.com",
        "Try small consistent steps, habit building is more sustainable than big changes.",
    ),
];
const DEMO_COMMENTED_STORIES: i64 = 3;

struct DemoSkillPost {
    author: &'static str,
    post_type: &'static str,
    title: &'static str,
    category: &'static str,
    description: &'static str,
}

const DEMO_SKILL_POSTS: &[DemoSkillPost] = &[
    DemoSkillPost {
        author: "robert.thompson@generationbridge.com",
        post_type: "offer",
        title: "Excel Basics for Budgeting",
        category: "practical",
        description: "I can teach formulas, pivot tables, and simple budgets. Availability: Weeknights 8-10pm.",
    },
    DemoSkillPost {
        author: "sophie.johnson@generationbridge.com",
        post_type: "offer",
        title: "Intro to Video Editing (Mobile)",
        category: "creative",
        description: "Learn quick edits for short-form videos. Availability: Weekends 2-6pm.",
    },
    DemoSkillPost {
        author: "eleanor.martinez@generationbridge.com",
        post_type: "offer",
        title: "Traditional Family Recipes",
        category: "cultural",
        description: "Cooking session sharing classic family recipes. Availability: Saturday mornings.",
    },
    DemoSkillPost {
        author: "david.miller@generationbridge.com",
        post_type: "request",
        title: "Public Speaking Practice",
        category: "practical",
        description: "Seeking coaching for confident presentations. Prefer 30-minute sessions.",
    },
    DemoSkillPost {
        author: "alice@example.com",
        post_type: "request",
        title: "Basic Networking / LinkedIn Tips",
        category: "technical",
        description: "Need help improving my profile and networking approach.",
    },
    DemoSkillPost {
        author: "mr_lim@example.com",
        post_type: "offer",
        title: "Interview Preparation Mentoring",
        category: "technical",
        description: "Mock interviews and resume feedback. Availability: Tue/Thu 7-9pm.",
    },
];

struct DemoEvent {
    title: &'static str,
    description: &'static str,
    location: &'static str,
    start_date: &'static str,
    start_time: Option<&'static str>,
    link: &'static str,
    coords: Option<(f64, f64)>,
}

const DEMO_EVENTS: &[DemoEvent] = &[
    DemoEvent {
        title: "Punggol Meadows RC Line Dance Interest Group",
        description: "Community line dance interest group session organised by Punggol Meadows RC.",
        location: "Punggol Meadows Community Centre, Singapore",
        start_date: "2026-05-01",
        start_time: None,
        link: "https://www.onepa.gov.sg/events/punggol-meadows-rc-line-dance-interest-group-64220439",
        coords: None,
    },
    DemoEvent {
        title: "Jurong Spring CACC Giant Delight 2025",
        description: "Community celebration and family activity event by Jurong Spring CACC.",
        location: "Jurong Spring, Singapore",
        start_date: "2025-06-25",
        start_time: None,
        link: "https://www.onepa.gov.sg/events/jurong-spring-cacc-giant-delight-2025-62571032",
        coords: None,
    },
    DemoEvent {
        title: "SAFRA: What's New in February 2026",
        description: "Official SAFRA listing of February 2026 events including Total Defence 2026, Lunar New Year celebrations, and Buddies Day Out.",
        location: "Multiple SAFRA Clubs, Singapore",
        start_date: "2026-02-01",
        start_time: None,
        link: "https://www.safra.sg/nsman-magazine/things-to-do/Things-to-do/2026/02/04/whats-new-in-february-2026",
        coords: None,
    },
    DemoEvent {
        title: "Community Connectors: Bendemeer Senior Befriending",
        description: "Youth volunteers engage seniors through conversations, community activities, and social support.",
        location: "Lion Befrienders Active Ageing Centre, Bendemeer, Singapore",
        start_date: "2026-03-01",
        start_time: Some("14:00"),
        link: "https://www.volunteer.gov.sg/volunteer/opportunity/details/?id=dfbd8f85-98ba-ee11-ac5f-0aec74081c56",
        coords: Some((1.3216, 103.8622)),
    },
    DemoEvent {
        title: "Joyful Connections: SGH Senior Companionship",
        description: "Hospital-based befriending programme where youth volunteers engage elderly patients through games and conversation.",
        location: "Singapore General Hospital, Singapore",
        start_date: "2026-03-18",
        start_time: Some("10:00"),
        link: "https://www.volunteer.gov.sg/volunteer/opportunity/details/?id=5cce7e81-93c3-f011-ac7e-027d80ecb760",
        coords: Some((1.2789, 103.8345)),
    },
    DemoEvent {
        title: "Le Celebake: Youth & Seniors Intergenerational Baking",
        description: "Youth and seniors come together for baking workshops and bonding sessions.",
        location: "Jalan Kukoh, Singapore",
        start_date: "2026-03-08",
        start_time: Some("10:00"),
        link: "https://www.volunteer.gov.sg/volunteer/opportunity/details/?id=1e1ed635-f2cf-ee11-ac5e-027d80ecb760",
        coords: Some((1.2867, 103.8397)),
    },
];

/// What one `seed` pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub interests_inserted: usize,
    pub accounts_inserted: usize,
    pub stories_inserted: usize,
    pub comments_inserted: usize,
    pub skill_posts_inserted: usize,
    pub events_inserted: usize,
    pub stories_normalized: usize,
}

fn table_is_empty(conn: &Connection, table: &str) -> Result<bool, error::BridgeError> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count == 0)
}

fn seed_interests(conn: &Connection) -> Result<usize, error::BridgeError> {
    let mut inserted = 0;
    for name in BASE_INTERESTS {
        inserted += conn.execute("INSERT OR IGNORE INTO interests(name) VALUES(?1)", params![name])?;
    }
    Ok(inserted)
}

fn seed_accounts(conn: &Connection) -> Result<usize, error::BridgeError> {
    let mut inserted = 0;
    for a in SEED_ACCOUNTS {
        inserted += conn.execute(
            "INSERT OR IGNORE INTO users(full_name, email, password, age, generation, bio,
                                         match_preferences, avatar, is_admin, is_banned)
             VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, 0)",
            params![
                a.full_name,
                a.email,
                a.password,
                a.age,
                a.generation,
                a.bio,
                a.match_preferences,
                a.avatar
            ],
        )?;
    }
    Ok(inserted)
}

/// Exactly one admin: the reserved email, with the canonical password.
fn enforce_single_admin(conn: &Connection) -> Result<(), error::BridgeError> {
    conn.execute("UPDATE users SET is_admin = 0 WHERE is_admin <> 0", [])?;
    conn.execute(
        "UPDATE users SET is_admin = 1, password = ?1 WHERE email = ?2",
        params![ADMIN_PASSWORD, ADMIN_EMAIL],
    )?;
    Ok(())
}

fn force_matchup_visible(conn: &Connection) -> Result<(), error::BridgeError> {
    for email in MATCHUP_DEMO_EMAILS {
        conn.execute(
            "UPDATE users SET show_in_matchup = 1 WHERE email = ?1",
            params![email],
        )?;
    }
    Ok(())
}

fn seed_ids(conn: &Connection) -> Result<HashMap<&'static str, i64>, error::BridgeError> {
    let mut ids = HashMap::new();
    for a in SEED_ACCOUNTS {
        let id: Option<i64> = conn
            .query_row("SELECT id FROM users WHERE email = ?1", params![a.email], |row| {
                row.get(0)
            })
            .optional()?;
        if let Some(id) = id {
            ids.insert(a.email, id);
        }
    }
    Ok(ids)
}

fn reset_seed_interests(
    conn: &Connection,
    ids: &HashMap<&'static str, i64>,
) -> Result<(), error::BridgeError> {
    for a in SEED_ACCOUNTS {
        if let Some(&id) = ids.get(a.email) {
            users::replace_interests(conn, id, a.interests)?;
        }
    }
    Ok(())
}

fn seed_stories(
    conn: &Connection,
    ids: &HashMap<&'static str, i64>,
) -> Result<usize, error::BridgeError> {
    if !table_is_empty(conn, "stories")? {
        return Ok(0);
    }
    let mut inserted = 0;
    for s in DEMO_STORIES {
        let Some(&uid) = ids.get(s.author) else {
            continue;
        };
        inserted += conn.execute(
            "INSERT INTO stories(user_id, title, category, content, status, created_at)
             VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                uid,
                s.title,
                StoryCategory::normalize(s.category).as_str(),
                s.content,
                s.status,
                time::now_iso()
            ],
        )?;
    }
    Ok(inserted)
}

/// Legacy rows: lower-case known categories, everything else becomes `untagged`.
fn normalize_story_categories(conn: &Connection) -> Result<usize, error::BridgeError> {
    let allowed = StoryCategory::ALL
        .iter()
        .map(|c| format!("'{}'", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let mut changed = conn.execute(
        &format!(
            "UPDATE stories SET category = lower(trim(category))
             WHERE lower(trim(category)) IN ({allowed}) AND category <> lower(trim(category))"
        ),
        [],
    )?;
    changed += conn.execute(
        &format!(
            "UPDATE stories SET category = 'untagged'
             WHERE category IS NULL OR lower(trim(category)) NOT IN ({allowed})"
        ),
        [],
    )?;
    Ok(changed)
}

fn seed_comments(
    conn: &Connection,
    ids: &HashMap<&'static str, i64>,
) -> Result<usize, error::BridgeError> {
    if !table_is_empty(conn, "story_comments")? {
        return Ok(0);
    }
    let story_ids = {
        let mut stmt = conn.prepare("SELECT id FROM stories ORDER BY id DESC LIMIT ?1")?;
        stmt.query_map(params![DEMO_COMMENTED_STORIES], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?
    };
    let mut inserted = 0;
    for sid in story_ids {
        for (email, text) in DEMO_COMMENTS {
            let Some(&uid) = ids.get(email) else {
                continue;
            };
            inserted += conn.execute(
                "INSERT INTO story_comments(story_id, user_id, text, created_at)
                 VALUES(?1, ?2, ?3, ?4)",
                params![sid, uid, text, time::now_iso()],
            )?;
        }
    }
    Ok(inserted)
}

fn seed_skill_posts(
    conn: &Connection,
    ids: &HashMap<&'static str, i64>,
) -> Result<usize, error::BridgeError> {
    if !table_is_empty(conn, "skillswap_posts")? {
        return Ok(0);
    }
    let mut inserted = 0;
    for p in DEMO_SKILL_POSTS {
        let Some(&uid) = ids.get(p.author) else {
            continue;
        };
        inserted += conn.execute(
            "INSERT INTO skillswap_posts(user_id, post_type, title, category, description, created_at)
             VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
            params![uid, p.post_type, p.title, p.category, p.description, time::now_iso()],
        )?;
    }
    Ok(inserted)
}

fn seed_events(conn: &Connection) -> Result<usize, error::BridgeError> {
    if !table_is_empty(conn, "events")? {
        return Ok(0);
    }
    let mut inserted = 0;
    for e in DEMO_EVENTS {
        inserted += conn.execute(
            "INSERT INTO events(title, description, location, start_date, start_time, end_date,
                                end_time, link, latitude, longitude, created_at)
             VALUES(?1, ?2, ?3, ?4, ?5, NULL, NULL, ?6, ?7, ?8, ?9)",
            params![
                e.title,
                e.description,
                e.location,
                e.start_date,
                e.start_time,
                e.link,
                e.coords.map(|c| c.0),
                e.coords.map(|c| c.1),
                time::now_iso()
            ],
        )?;
    }
    Ok(inserted)
}

/// Run every seeding step against `conn`. The caller owns the transaction.
pub fn seed(conn: &Connection) -> Result<SeedReport, error::BridgeError> {
    let mut report = SeedReport {
        interests_inserted: seed_interests(conn)?,
        accounts_inserted: seed_accounts(conn)?,
        ..SeedReport::default()
    };
    enforce_single_admin(conn)?;
    force_matchup_visible(conn)?;

    let ids = seed_ids(conn)?;
    reset_seed_interests(conn, &ids)?;

    report.stories_inserted = seed_stories(conn, &ids)?;
    report.stories_normalized = normalize_story_categories(conn)?;
    report.comments_inserted = seed_comments(conn, &ids)?;
    report.skill_posts_inserted = seed_skill_posts(conn, &ids)?;
    report.events_inserted = seed_events(conn)?;

    tracing::info!(
        interests = report.interests_inserted,
        accounts = report.accounts_inserted,
        stories = report.stories_inserted,
        comments = report.comments_inserted,
        skill_posts = report.skill_posts_inserted,
        events = report.events_inserted,
        normalized = report.stories_normalized,
        "seed pass complete"
    );
    Ok(report)
}
