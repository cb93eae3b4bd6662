use genbridge::repos::stories::{NewStory, StoryCategory};
use genbridge::repos::users::NewUser;
use genbridge::{DatabaseConfig, Store};
use rusqlite::{Connection, params};
use tempfile::tempdir;

fn test_store() -> (tempfile::TempDir, Store, i64, i64) {
    let tmp = tempdir().unwrap();
    let store = Store::open(&DatabaseConfig::at(tmp.path().join("stories.db"))).unwrap();
    let author = store
        .users()
        .register(&NewUser {
            full_name: "Ada",
            email: "ada@example.com",
            password: "pw",
        })
        .unwrap();
    let reader = store
        .users()
        .register(&NewUser {
            full_name: "Bob",
            email: "bob@example.com",
            password: "pw",
        })
        .unwrap();
    (tmp, store, author.id, reader.id)
}

fn story<'a>(user_id: i64, title: &'a str, category: &'a str) -> NewStory<'a> {
    NewStory {
        user_id,
        title,
        category,
        content: "body",
        status: None,
    }
}

#[test]
fn test_unknown_category_is_stored_untagged() {
    let (_tmp, store, author, _) = test_store();
    let view = store.stories().create(&story(author, "Odd", "random")).unwrap();
    assert_eq!(view.story.category, StoryCategory::Untagged);
    assert_eq!(view.story.status, "ongoing");

    let conn = Connection::open(store.db_path()).unwrap();
    let stored: String = conn
        .query_row(
            "SELECT category FROM stories WHERE id = ?1",
            params![view.story.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "untagged");

    let mixed = store.stories().create(&story(author, "Work", "CAREER")).unwrap();
    assert_eq!(mixed.story.category, StoryCategory::Career);
}

#[test]
fn test_projection_has_author_and_live_comment_count() {
    let (_tmp, store, author, reader) = test_store();
    let created = store.stories().create(&story(author, "Hello", "daytoday")).unwrap();
    assert_eq!(created.user.email, "ada@example.com");
    assert_eq!(created.comments_count, 0);

    store.stories().add_comment(created.story.id, reader, "first").unwrap();
    store.stories().add_comment(created.story.id, author, "second").unwrap();

    let view = store.stories().get(created.story.id).unwrap().unwrap();
    assert_eq!(view.comments_count, 2);
    assert_eq!(store.stories().count_comments(created.story.id).unwrap(), 2);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["category"], serde_json::json!("daytoday"));
    assert_eq!(json["comments_count"], serde_json::json!(2));
    assert!(json["user"].get("password").is_none());
}

#[test]
fn test_list_is_newest_first() {
    let (_tmp, store, author, _) = test_store();
    let a = store.stories().create(&story(author, "A", "career")).unwrap();
    let b = store.stories().create(&story(author, "B", "career")).unwrap();

    let list = store.stories().list().unwrap();
    assert_eq!(list[0].story.id, b.story.id);
    assert_eq!(list[1].story.id, a.story.id);
    assert!(list.windows(2).all(|w| w[0].story.id > w[1].story.id));
}

#[test]
fn test_list_skips_story_whose_author_is_gone() {
    let (_tmp, store, author, _) = test_store();
    store.stories().create(&story(author, "Kept", "career")).unwrap();
    let before = store.stories().list().unwrap().len();

    let conn = Connection::open(store.db_path()).unwrap();
    conn.execute("PRAGMA foreign_keys=OFF;", []).unwrap();
    conn.execute(
        "INSERT INTO stories(user_id, title, category, content, status, created_at)
         VALUES(424242, 'Orphan', 'career', 'x', 'ongoing', '2024-01-01T00:00:00+00:00')",
        [],
    )
    .unwrap();
    let orphan_id = conn.last_insert_rowid();

    assert!(store.stories().get(orphan_id).unwrap().is_none());
    let list = store.stories().list().unwrap();
    assert_eq!(list.len(), before);
    assert!(list.iter().all(|s| s.story.title != "Orphan"));
}

#[test]
fn test_list_skips_story_whose_author_row_is_unreadable() {
    let (_tmp, store, author, reader) = test_store();
    let kept = store.stories().create(&story(author, "Kept", "career")).unwrap();
    let broken = store.stories().create(&story(reader, "Broken", "career")).unwrap();

    let conn = Connection::open(store.db_path()).unwrap();
    conn.execute("UPDATE users SET age = 'forty' WHERE id = ?1", params![reader])
        .unwrap();

    let list = store.stories().list().unwrap();
    assert!(list.iter().any(|s| s.story.id == kept.story.id));
    assert!(list.iter().all(|s| s.story.id != broken.story.id));
}

#[test]
fn test_comments_oldest_first_with_author_summary() {
    let (_tmp, store, author, reader) = test_store();
    let s = store.stories().create(&story(author, "Chat", "tradition")).unwrap();
    let c1 = store.stories().add_comment(s.story.id, reader, "one").unwrap();
    let c2 = store.stories().add_comment(s.story.id, author, "two").unwrap();
    store.stories().add_comment(s.story.id, reader, "three").unwrap();

    let comments = store.stories().list_comments(s.story.id, 0).unwrap();
    let texts: Vec<&str> = comments.iter().map(|c| c.comment.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
    assert_eq!(comments[0].user.full_name, "Bob");
    assert_eq!(comments[1].user.id, author);

    let limited = store.stories().list_comments(s.story.id, 2).unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[1].comment.id, c2.comment.id);

    let fetched = store.stories().get_comment(c1.comment.id).unwrap().unwrap();
    assert_eq!(fetched.story_id, s.story.id);
    assert!(store.stories().get_comment(999_999).unwrap().is_none());
}

#[test]
fn test_comment_delete_is_scoped_to_its_story() {
    let (_tmp, store, author, reader) = test_store();
    let mine = store.stories().create(&story(author, "Mine", "career")).unwrap();
    let other = store.stories().create(&story(author, "Other", "career")).unwrap();
    let c = store.stories().add_comment(mine.story.id, reader, "keep me").unwrap();

    assert!(
        !store
            .stories()
            .delete_comment(other.story.id, c.comment.id)
            .unwrap()
    );
    assert!(store.stories().get_comment(c.comment.id).unwrap().is_some());

    assert!(
        store
            .stories()
            .delete_comment(mine.story.id, c.comment.id)
            .unwrap()
    );
    assert!(store.stories().get_comment(c.comment.id).unwrap().is_none());
    assert_eq!(store.stories().count_comments(mine.story.id).unwrap(), 0);
}

#[test]
fn test_delete_story_takes_comments_with_it() {
    let (_tmp, store, author, reader) = test_store();
    let s = store.stories().create(&story(author, "Bye", "career")).unwrap();
    let c = store.stories().add_comment(s.story.id, reader, "gone soon").unwrap();

    assert!(store.stories().delete(s.story.id).unwrap());
    assert!(!store.stories().delete(s.story.id).unwrap());
    assert!(store.stories().get(s.story.id).unwrap().is_none());
    assert!(store.stories().get_comment(c.comment.id).unwrap().is_none());
}
