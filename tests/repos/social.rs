use chrono::NaiveDate;
use genbridge::repos::events::{EventListing, NewEvent};
use genbridge::repos::login_events::LoginAttempt;
use genbridge::repos::notifications::NewNotification;
use genbridge::repos::skillswap::NewSkillSwapPost;
use genbridge::repos::stories::NewStory;
use genbridge::repos::users::NewUser;
use genbridge::{DatabaseConfig, Store};
use tempfile::tempdir;

fn test_store() -> (tempfile::TempDir, Store, i64, i64) {
    let tmp = tempdir().unwrap();
    let store = Store::open(&DatabaseConfig::at(tmp.path().join("social.db"))).unwrap();
    let a = store
        .users()
        .register(&NewUser {
            full_name: "Ada",
            email: "ada@example.com",
            password: "pw",
        })
        .unwrap();
    let b = store
        .users()
        .register(&NewUser {
            full_name: "Bob",
            email: "bob@example.com",
            password: "pw",
        })
        .unwrap();
    (tmp, store, a.id, b.id)
}

fn event<'a>(title: &'a str, start_date: &'a str, start_time: Option<&'a str>) -> NewEvent<'a> {
    NewEvent {
        title,
        start_date,
        start_time,
        ..NewEvent::default()
    }
}

#[test]
fn test_thread_is_symmetric_and_oldest_first() {
    let (_tmp, store, a, b) = test_store();
    let m1 = store.messages().send(a, b, "hi bob").unwrap();
    let m2 = store.messages().send(b, a, "hi ada").unwrap();
    let m3 = store.messages().send(a, b, "how are you?").unwrap();
    assert!(!m1.is_read);

    let ab = store.messages().thread(a, b, 0).unwrap();
    let ba = store.messages().thread(b, a, 0).unwrap();
    assert_eq!(ab, ba);
    let ids: Vec<i64> = ab.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![m1.id, m2.id, m3.id]);

    assert_eq!(store.messages().thread(a, b, 2).unwrap().len(), 2);
    assert_eq!(store.messages().get(m2.id).unwrap().unwrap().text, "hi ada");
    assert!(store.messages().get(999_999).unwrap().is_none());
}

#[test]
fn test_thread_excludes_third_parties() {
    let (_tmp, store, a, b) = test_store();
    let carol = store
        .users()
        .get_by_email("alice@example.com")
        .unwrap()
        .unwrap()
        .id;
    store.messages().send(a, b, "for bob").unwrap();
    store.messages().send(a, carol, "for alice").unwrap();
    store.messages().send(carol, b, "alice to bob").unwrap();

    let thread = store.messages().thread(a, b, 0).unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].text, "for bob");
}

#[test]
fn test_upcoming_events_ascending_by_date_time_id() {
    let (_tmp, store, _, _) = test_store();
    let late = store.events().create(&event("Late", "2101-03-01", Some("18:00"))).unwrap();
    let early = store.events().create(&event("Early", "2101-03-01", Some("09:00"))).unwrap();
    let untimed = store.events().create(&event("Untimed", "2101-03-01", None)).unwrap();
    let next_day = store.events().create(&event("Next", "2101-03-02", None)).unwrap();
    store.events().create(&event("Past", "2100-12-31", None)).unwrap();

    let today = NaiveDate::from_ymd_opt(2101, 3, 1).unwrap();
    let upcoming = store
        .events()
        .list_as_of(EventListing::Upcoming, 0, today)
        .unwrap();
    let ids: Vec<i64> = upcoming.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![untimed.id, early.id, late.id, next_day.id]);

    let limited = store
        .events()
        .list_as_of(EventListing::Upcoming, 2, today)
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn test_all_events_descending() {
    let (_tmp, store, _, _) = test_store();
    let first = store.events().create(&event("First", "2102-01-01", None)).unwrap();
    let second = store.events().create(&event("Second", "2102-01-01", None)).unwrap();
    let older = store.events().create(&event("Older", "2101-06-01", Some("10:00"))).unwrap();

    let all = store.events().list(EventListing::All, -5).unwrap();
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].id, first.id);
    assert_eq!(all[2].id, older.id);
    // Seeded demo events sort after these far-future ones.
    assert_eq!(all.len(), 9);
    assert!(all.windows(2).all(|w| w[0].start_date >= w[1].start_date));
}

#[test]
fn test_non_positive_event_limit_means_fifty() {
    let (_tmp, store, _, _) = test_store();
    for i in 0..55 {
        let title = format!("Meetup {i}");
        store
            .events()
            .create(&event(&title, "2101-02-01", None))
            .unwrap();
    }
    let today = NaiveDate::from_ymd_opt(2101, 1, 1).unwrap();

    let upcoming = store
        .events()
        .list_as_of(EventListing::Upcoming, 0, today)
        .unwrap();
    assert_eq!(upcoming.len(), 50);

    let all = store
        .events()
        .list_as_of(EventListing::All, -1, today)
        .unwrap();
    assert_eq!(all.len(), 50);

    // An explicit limit above the default is honoured.
    let wide = store
        .events()
        .list_as_of(EventListing::All, 100, today)
        .unwrap();
    assert_eq!(wide.len(), 55 + 6);
}

#[test]
fn test_event_fields_round_trip() {
    let (_tmp, store, _, _) = test_store();
    let created = store
        .events()
        .create(&NewEvent {
            title: "Picnic",
            start_date: "2101-05-05",
            start_time: Some(""),
            location: Some("East Coast Park"),
            link: Some("   "),
            latitude: Some(1.3008),
            longitude: Some(103.9122),
            ..NewEvent::default()
        })
        .unwrap();
    assert_eq!(created.start_time, None);
    assert_eq!(created.link, None);
    assert_eq!(created.location.as_deref(), Some("East Coast Park"));
    assert_eq!(created.latitude, Some(1.3008));

    // Odd date shapes are stored as given, never rejected.
    let slashed = store
        .events()
        .create(&event("Slashed", " 2030/01/05 ", None))
        .unwrap();
    assert_eq!(slashed.start_date, "2030/01/05");
    let free_text = store
        .events()
        .create(&event("Vague", "next tuesday", None))
        .unwrap();
    assert_eq!(
        store.events().get(free_text.id).unwrap().unwrap().start_date,
        "next tuesday"
    );

    assert!(store.events().delete(created.id).unwrap());
    assert!(store.events().get(created.id).unwrap().is_none());
    assert!(!store.events().delete(created.id).unwrap());
}

#[test]
fn test_skillswap_posts() {
    let (_tmp, store, a, _) = test_store();
    let seeded = store.skillswap().list().unwrap().len();
    let post = store
        .skillswap()
        .create(&NewSkillSwapPost {
            user_id: a,
            post_type: "offer",
            title: "Guitar basics",
            category: "creative",
            description: "Weekends",
        })
        .unwrap();
    assert_eq!(post.user.email, "ada@example.com");

    let list = store.skillswap().list().unwrap();
    assert_eq!(list.len(), seeded + 1);
    assert_eq!(list[0].post.id, post.post.id);

    assert!(store.skillswap().delete(post.post.id).unwrap());
    assert!(store.skillswap().get(post.post.id).unwrap().is_none());
}

#[test]
fn test_notifications_lifecycle_and_projection() {
    let (_tmp, store, a, b) = test_store();
    for i in 0..3 {
        store
            .notifications()
            .create(&NewNotification {
                user_id: a,
                notif_type: "message",
                icon: "💬",
                title: "New message",
                content: &format!("message {i}"),
                link: Some("/messages"),
            })
            .unwrap();
    }
    store
        .notifications()
        .create(&NewNotification {
            user_id: b,
            notif_type: "system",
            icon: "ℹ️",
            title: "Welcome",
            content: "hello",
            link: None,
        })
        .unwrap();

    let list = store.notifications().list(a, 0).unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].content, "message 2");
    assert!(list.iter().all(|n| !n.is_read));

    let json = serde_json::to_value(&list[0]).unwrap();
    assert_eq!(json["type"], serde_json::json!("message"));
    assert_eq!(json["isRead"], serde_json::json!(false));
    assert!(json.get("time").is_some());
    assert!(json.get("notif_type").is_none());

    assert_eq!(store.notifications().mark_all_read(a).unwrap(), 3);
    assert!(store.notifications().list(a, 0).unwrap().iter().all(|n| n.is_read));
    assert_eq!(store.notifications().mark_all_read(a).unwrap(), 0);

    assert_eq!(store.notifications().clear(a).unwrap(), 3);
    assert!(store.notifications().list(a, 0).unwrap().is_empty());
    // Other users are untouched.
    assert_eq!(store.notifications().list(b, 0).unwrap().len(), 1);
}

#[test]
fn test_reports_pending_then_updated() {
    let (_tmp, store, a, b) = test_store();
    let first = store
        .reports()
        .create(a, b, "spam", Some("keeps sending links"))
        .unwrap();
    assert_eq!(first.report.status, "pending");
    assert_eq!(first.reporter.id, a);
    assert_eq!(first.target_user.id, b);

    let second = store.reports().create(b, a, "rude", None).unwrap();
    let list = store.reports().list(0).unwrap();
    assert_eq!(list[0].report.id, second.report.id);
    assert_eq!(list[1].report.id, first.report.id);
    assert_eq!(store.reports().list(1).unwrap().len(), 1);

    let updated = store
        .reports()
        .update_status(first.report.id, "reviewed")
        .unwrap()
        .unwrap();
    assert_eq!(updated.report.status, "reviewed");
    assert!(store.reports().update_status(999_999, "x").unwrap().is_none());
}

#[test]
fn test_login_events_append_newest_first() {
    let (_tmp, store, a, _) = test_store();
    store
        .login_events()
        .record(&LoginAttempt {
            user_id: Some(a),
            email: Some("ada@example.com"),
            success: true,
            ip: Some("127.0.0.1"),
            user_agent: Some("curl/8"),
        })
        .unwrap();
    store
        .login_events()
        .record(&LoginAttempt {
            email: Some("nobody@example.com"),
            ..LoginAttempt::default()
        })
        .unwrap();

    let events = store.login_events().list(0).unwrap();
    assert_eq!(events.len(), 2);
    assert!(!events[0].success);
    assert_eq!(events[0].user_id, None);
    assert_eq!(events[1].user_id, Some(a));
    assert_eq!(store.login_events().list(1).unwrap().len(), 1);
}

#[test]
fn test_interests_include_baseline() {
    let (_tmp, store, _, _) = test_store();
    let tags = store.interests().list().unwrap();
    for base in genbridge::core::seed::BASE_INTERESTS {
        assert!(tags.iter().any(|t| t == base), "missing {base}");
    }
    assert!(tags.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_deleting_user_cascades_owned_rows() {
    let (_tmp, store, a, b) = test_store();
    let s = store
        .stories()
        .create(&NewStory {
            user_id: a,
            title: "Mine",
            category: "career",
            content: "x",
            status: None,
        })
        .unwrap();
    let m = store.messages().send(a, b, "bye").unwrap();
    store
        .notifications()
        .create(&NewNotification {
            user_id: a,
            notif_type: "system",
            icon: "!",
            title: "t",
            content: "c",
            link: None,
        })
        .unwrap();
    let r = store.reports().create(b, a, "spam", None).unwrap();

    assert!(store.users().delete(a).unwrap());

    assert!(store.stories().get(s.story.id).unwrap().is_none());
    assert!(store.messages().get(m.id).unwrap().is_none());
    assert!(store.notifications().list(a, 0).unwrap().is_empty());
    assert!(store.reports().get(r.report.id).unwrap().is_none());
    assert!(store.messages().thread(a, b, 0).unwrap().is_empty());
}
