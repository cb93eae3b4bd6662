use genbridge::repos::users::{NewUser, ProfileUpdate, UserFilter};
use genbridge::{DatabaseConfig, Store};
use rusqlite::{Connection, params};
use tempfile::tempdir;

fn test_store() -> (tempfile::TempDir, Store) {
    let tmp = tempdir().unwrap();
    let store = Store::open(&DatabaseConfig::at(tmp.path().join("users.db"))).unwrap();
    (tmp, store)
}

fn new_user<'a>(name: &'a str, email: &'a str) -> NewUser<'a> {
    NewUser {
        full_name: name,
        email,
        password: "secret",
    }
}

#[test]
fn test_register_and_lookup() {
    let (_tmp, store) = test_store();
    let user = store.users().register(&new_user("Ada", "ada@example.com")).unwrap();
    assert!(!user.is_admin);
    assert!(!user.is_banned);

    let by_email = store.users().get_by_email("ada@example.com").unwrap().unwrap();
    assert_eq!(by_email.id, user.id);
    let by_id = store.users().get(user.id).unwrap().unwrap();
    assert_eq!(by_id, by_email);

    // Case-sensitive as stored.
    assert!(store.users().get_by_email("ADA@example.com").unwrap().is_none());
    assert!(store.users().get(987_654).unwrap().is_none());
}

#[test]
fn test_duplicate_email_is_conflict_and_writes_nothing() {
    let (_tmp, store) = test_store();
    store.users().register(&new_user("Ada", "ada@example.com")).unwrap();

    let err = store
        .users()
        .register(&new_user("Impostor", "ada@example.com"))
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(err.to_string().contains("Email already exists"));

    let conn = Connection::open(store.db_path()).unwrap();
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            params!["ada@example.com"],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(n, 1);
}

#[test]
fn test_reserved_seed_email_cannot_be_registered() {
    let (_tmp, store) = test_store();
    let err = store
        .users()
        .register(&new_user("Fake Admin", genbridge::core::seed::ADMIN_EMAIL))
        .unwrap_err();
    assert!(err.is_conflict());
}

#[test]
fn test_profile_update_only_touches_given_fields() {
    let (_tmp, store) = test_store();
    let user = store.users().register(&new_user("Ada", "ada@example.com")).unwrap();

    let updated = store
        .users()
        .update_profile(
            user.id,
            &ProfileUpdate {
                bio: Some("Engineer".to_string()),
                age: Some(36),
                ..ProfileUpdate::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("Engineer"));
    assert_eq!(updated.age, Some(36));
    assert_eq!(updated.full_name, "Ada");
    assert_eq!(updated.email, "ada@example.com");

    // Empty update is a read.
    let same = store
        .users()
        .update_profile(user.id, &ProfileUpdate::default())
        .unwrap()
        .unwrap();
    assert_eq!(same, updated);

    assert!(
        store
            .users()
            .update_profile(987_654, &ProfileUpdate::default())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_email_change_onto_taken_address_is_conflict() {
    let (_tmp, store) = test_store();
    let ada = store.users().register(&new_user("Ada", "ada@example.com")).unwrap();
    store.users().register(&new_user("Bob", "bob@example.com")).unwrap();

    let err = store
        .users()
        .update_profile(
            ada.id,
            &ProfileUpdate {
                email: Some("bob@example.com".to_string()),
                full_name: Some("Ada L".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .unwrap_err();
    assert!(err.is_conflict());

    let ada = store.users().get(ada.id).unwrap().unwrap();
    assert_eq!(ada.email, "ada@example.com");
    assert_eq!(ada.full_name, "Ada", "rejected update leaves the row as it was");
}

#[test]
fn test_public_projection_shape() {
    let (_tmp, store) = test_store();
    let user = store.users().register(&new_user("Ada", "ada@example.com")).unwrap();
    store
        .users()
        .set_interests(user.id, &["music", "art", " ", "zymurgy"])
        .unwrap();

    let public = store.users().public(user.id).unwrap().unwrap();
    assert_eq!(public.interests, vec!["art", "music", "zymurgy"]);
    assert!(!public.is_admin);
    assert!(!public.show_in_matchup);

    let json = serde_json::to_value(&public).unwrap();
    let obj = json.as_object().unwrap();
    assert!(!obj.contains_key("password"));
    assert_eq!(obj["is_banned"], serde_json::json!(false));
    assert_eq!(obj.len(), 12);

    // Full rows never serialize the credential either.
    let full = serde_json::to_value(store.users().get(user.id).unwrap().unwrap()).unwrap();
    assert!(full.get("password").is_none());

    // Unknown tags were created on the fly.
    assert!(store.interests().list().unwrap().contains(&"zymurgy".to_string()));
}

#[test]
fn test_set_interests_replaces_previous_set() {
    let (_tmp, store) = test_store();
    let user = store.users().register(&new_user("Ada", "ada@example.com")).unwrap();
    store.users().set_interests(user.id, &["music", "art"]).unwrap();
    store.users().set_interests(user.id, &["tech"]).unwrap();
    assert_eq!(store.users().interests(user.id).unwrap(), vec!["tech"]);

    let none: [&str; 0] = [];
    store.users().set_interests(user.id, &none).unwrap();
    assert!(store.users().interests(user.id).unwrap().is_empty());
}

#[test]
fn test_list_public_filters() {
    let (_tmp, store) = test_store();
    let ada = store.users().register(&new_user("Ada", "ada@example.com")).unwrap();

    let everyone = store.users().list_public(UserFilter::default()).unwrap();
    assert!(everyone.iter().any(|u| u.id == ada.id));
    assert!(everyone.windows(2).all(|w| w[0].id < w[1].id));

    let contacts = store.users().contacts(ada.id).unwrap();
    assert_eq!(contacts.len(), everyone.len() - 1);
    assert!(contacts.iter().all(|u| u.id != ada.id));

    let matchup = store
        .users()
        .list_public(UserFilter {
            exclude_user_id: None,
            only_matchup: true,
        })
        .unwrap();
    assert_eq!(matchup.len(), genbridge::core::seed::MATCHUP_DEMO_EMAILS.len());
    assert!(matchup.iter().all(|u| u.show_in_matchup));

    store.users().set_matchup_visible(ada.id, true).unwrap();
    let matchup_without_ada = store
        .users()
        .list_public(UserFilter {
            exclude_user_id: Some(ada.id),
            only_matchup: true,
        })
        .unwrap();
    assert_eq!(matchup_without_ada.len(), matchup.len());
}

#[test]
fn test_list_public_skips_unreadable_rows() {
    let (_tmp, store) = test_store();
    let ada = store.users().register(&new_user("Ada", "ada@example.com")).unwrap();
    let bob = store.users().register(&new_user("Bob", "bob@example.com")).unwrap();
    let before = store.users().list_public(UserFilter::default()).unwrap().len();

    let conn = Connection::open(store.db_path()).unwrap();
    conn.execute("UPDATE users SET age = 'forty' WHERE id = ?1", params![bob.id])
        .unwrap();

    let everyone = store.users().list_public(UserFilter::default()).unwrap();
    assert_eq!(everyone.len(), before - 1);
    assert!(everyone.iter().any(|u| u.id == ada.id));
    assert!(everyone.iter().all(|u| u.id != bob.id));
}

#[test]
fn test_delete_user() {
    let (_tmp, store) = test_store();
    let user = store.users().register(&new_user("Ada", "ada@example.com")).unwrap();
    store.users().set_interests(user.id, &["art"]).unwrap();

    assert!(store.users().delete(user.id).unwrap());
    assert!(!store.users().delete(user.id).unwrap());
    assert!(store.users().get(user.id).unwrap().is_none());
    assert!(store.users().interests(user.id).unwrap().is_empty());
}
