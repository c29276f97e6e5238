// tests/guest_message_selection.rs
//! Exclusive selection of one generated message per (session, contact).

mod common;

use common::test_pool;
use introlink_core::store::{GuestStore, NewGuestContact};
use sqlx::SqlitePool;

const SESSION: &str = "S1";

async fn seed_contact_with_versions(pool: &SqlitePool) -> (String, Vec<String>) {
    let store = GuestStore::new(pool);

    let contact = store
        .insert_contact(
            SESSION,
            &NewGuestContact {
                first_name: "Bob".to_string(),
                bio_input: "Bob runs platform at Acme.".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("seed contact");

    let mut ids = Vec::new();
    for version in ["Version 1", "Version 2", "Version 3"] {
        let message = store
            .insert_message(SESSION, &contact.id, version, &format!("{} text", version))
            .await
            .expect("seed message");
        ids.push(message.id);
    }

    (contact.id, ids)
}

async fn selected_versions(pool: &SqlitePool, contact_id: &str) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT version_name FROM guest_messages \
         WHERE session_id = ? AND guest_contact_id = ? AND is_selected = TRUE",
    )
    .bind(SESSION)
    .bind(contact_id)
    .fetch_all(pool)
    .await
    .expect("selection query")
}

#[tokio::test]
async fn exactly_one_message_is_selected() {
    let pool = test_pool().await;
    let (contact_id, ids) = seed_contact_with_versions(&pool).await;

    let store = GuestStore::new(&pool);
    assert!(store
        .select_message(SESSION, &contact_id, &ids[1])
        .await
        .expect("select"));

    let selected = selected_versions(&pool, &contact_id).await;
    assert_eq!(selected, vec!["Version 2".to_string()]);
}

#[tokio::test]
async fn reselection_moves_the_flag() {
    let pool = test_pool().await;
    let (contact_id, ids) = seed_contact_with_versions(&pool).await;

    let store = GuestStore::new(&pool);
    assert!(store
        .select_message(SESSION, &contact_id, &ids[1])
        .await
        .expect("select"));
    assert!(store
        .select_message(SESSION, &contact_id, &ids[2])
        .await
        .expect("reselect"));

    let selected = selected_versions(&pool, &contact_id).await;
    assert_eq!(selected, vec!["Version 3".to_string()]);
}

#[tokio::test]
async fn selecting_an_unknown_message_reports_failure() {
    let pool = test_pool().await;
    let (contact_id, ids) = seed_contact_with_versions(&pool).await;

    let store = GuestStore::new(&pool);
    assert!(store
        .select_message(SESSION, &contact_id, &ids[0])
        .await
        .expect("select"));

    // Clears the old flag but sets nothing new; the caller sees false
    let updated = store
        .select_message(SESSION, &contact_id, "not-a-message-id")
        .await
        .expect("select unknown");
    assert!(!updated);

    assert!(selected_versions(&pool, &contact_id).await.is_empty());
}

#[tokio::test]
async fn selected_message_is_fetchable_by_session() {
    let pool = test_pool().await;
    let (contact_id, ids) = seed_contact_with_versions(&pool).await;

    let store = GuestStore::new(&pool);
    assert!(store
        .select_message(SESSION, &contact_id, &ids[0])
        .await
        .expect("select"));

    let message = store
        .find_selected_message(SESSION)
        .await
        .expect("fetch")
        .expect("one selected message");
    assert_eq!(message.version_name, "Version 1");
    assert_eq!(message.guest_contact_id, contact_id);
}
