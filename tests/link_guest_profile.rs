// tests/link_guest_profile.rs
//! End-to-end coverage of the guest linking workflow: identity
//! resolution, ordered transfer, tolerant cleanup.

mod common;

use common::{count, test_pool};
use introlink_core::linking;
use introlink_core::store::{
    CompanyRepository, ContactRepository, GuestStore, MessageRepository, NewGuestContact,
    NewGuestProfile, ProfileRepository,
};
use sqlx::SqlitePool;

const USER: &str = "U1";
const SESSION: &str = "S1";

async fn seed_profile(pool: &SqlitePool, first_name: &str) {
    GuestStore::new(pool)
        .upsert_profile(
            SESSION,
            &NewGuestProfile {
                first_name: Some(first_name.to_string()),
                background_input: "Ten years of platform engineering.".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("seed profile");
}

async fn seed_contact(pool: &SqlitePool, first_name: &str, company: Option<&str>) -> String {
    GuestStore::new(pool)
        .insert_contact(
            SESSION,
            &NewGuestContact {
                first_name: first_name.to_string(),
                current_company: company.map(str::to_string),
                bio_input: format!("{} works somewhere interesting.", first_name),
                ..Default::default()
            },
        )
        .await
        .expect("seed contact")
        .id
}

async fn seed_selected_message(pool: &SqlitePool, guest_contact_id: &str, text: &str) {
    let store = GuestStore::new(pool);
    let message = store
        .insert_message(SESSION, guest_contact_id, "Version 1", text)
        .await
        .expect("seed message");
    assert!(store
        .select_message(SESSION, guest_contact_id, &message.id)
        .await
        .expect("select message"));
}

#[tokio::test]
async fn no_guest_session_is_a_repeatable_no_op() {
    let pool = test_pool().await;

    let first = linking::link_guest_profile(&pool, USER, "never-seen")
        .await
        .expect("link");
    let second = linking::link_guest_profile(&pool, USER, "never-seen")
        .await
        .expect("link again");

    assert!(first.is_none());
    assert!(second.is_none());

    for table in [
        "user_profiles",
        "user_summaries",
        "companies",
        "contacts",
        "saved_message_versions",
    ] {
        assert_eq!(count(&pool, table).await, 0, "{} should be empty", table);
    }
}

#[tokio::test]
async fn same_company_name_resolves_to_one_row() {
    let pool = test_pool().await;
    seed_profile(&pool, "Ada").await;
    seed_contact(&pool, "Bob", Some("Acme")).await;
    seed_contact(&pool, "Carol", Some("Acme")).await;

    let report = linking::link_guest_profile(&pool, USER, SESSION)
        .await
        .expect("link")
        .expect("guest data present");

    assert_eq!(report.outcome.contacts, 2);
    assert_eq!(count(&pool, "companies").await, 1);

    let company = CompanyRepository::new(&pool)
        .find_by_exact_name(USER, "Acme")
        .await
        .expect("lookup")
        .expect("company exists");
    assert_eq!(company.status, "active");

    let contacts = ContactRepository::new(&pool)
        .list_for_user(USER)
        .await
        .expect("list contacts");
    assert_eq!(contacts.len(), 2);
    for contact in &contacts {
        assert_eq!(contact.company_id.as_deref(), Some(company.id.as_str()));
    }
}

#[tokio::test]
async fn one_bad_contact_does_not_block_the_rest() {
    let pool = test_pool().await;
    seed_profile(&pool, "Ada").await;
    seed_contact(&pool, "Bob", Some("Acme")).await;
    // Empty name passes guest intake but violates the permanent-table check
    seed_contact(&pool, "", None).await;
    seed_contact(&pool, "Carol", None).await;

    let report = linking::link_guest_profile(&pool, USER, SESSION)
        .await
        .expect("link")
        .expect("guest data present");

    assert_eq!(report.outcome.contacts, 2);
    assert_eq!(count(&pool, "contacts").await, 2);
}

#[tokio::test]
async fn selected_message_needs_a_transferred_contact() {
    let pool = test_pool().await;
    seed_profile(&pool, "Ada").await;
    let doomed = seed_contact(&pool, "", None).await;
    seed_selected_message(&pool, &doomed, "Hi there").await;

    let report = linking::link_guest_profile(&pool, USER, SESSION)
        .await
        .expect("link")
        .expect("guest data present");

    assert_eq!(report.outcome.contacts, 0);
    assert_eq!(report.outcome.messages, 0);
    assert_eq!(count(&pool, "saved_message_versions").await, 0);
}

#[tokio::test]
async fn message_follows_its_own_contact() {
    let pool = test_pool().await;
    seed_profile(&pool, "Ada").await;
    seed_contact(&pool, "Carol", None).await;
    let bob_guest_id = seed_contact(&pool, "Bob", Some("Acme")).await;
    seed_selected_message(&pool, &bob_guest_id, "Hi Bob").await;

    let report = linking::link_guest_profile(&pool, USER, SESSION)
        .await
        .expect("link")
        .expect("guest data present");

    assert_eq!(report.outcome.messages, 1);

    let contacts = ContactRepository::new(&pool)
        .list_for_user(USER)
        .await
        .expect("list contacts");
    let bob = contacts
        .iter()
        .find(|c| c.first_name == "Bob")
        .expect("Bob transferred");

    let messages = MessageRepository::new(&pool)
        .list_for_contact(USER, &bob.id)
        .await
        .expect("list messages");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_text, "Hi Bob");
}

#[tokio::test]
async fn fatal_profile_failure_leaves_guest_rows_intact() {
    let pool = test_pool().await;
    seed_profile(&pool, "Ada").await;
    seed_contact(&pool, "Bob", Some("Acme")).await;

    // Break the one fatal step
    sqlx::query("DROP TABLE user_profiles")
        .execute(&pool)
        .await
        .expect("drop table");

    let result = linking::link_guest_profile(&pool, USER, SESSION).await;
    assert!(result.is_err());

    // Cleanup must not have run: everything is still there for a retry
    assert_eq!(count(&pool, "guest_profiles").await, 1);
    assert_eq!(count(&pool, "guest_contacts").await, 1);
}

#[tokio::test]
async fn retried_link_does_not_duplicate_the_profile() {
    let pool = test_pool().await;
    seed_profile(&pool, "Ada").await;

    linking::link_guest_profile(&pool, USER, SESSION)
        .await
        .expect("first link")
        .expect("guest data present");

    // The guest comes back before the first link's client saw the response
    seed_profile(&pool, "Ada B.").await;
    linking::link_guest_profile(&pool, USER, SESSION)
        .await
        .expect("second link")
        .expect("guest data present");

    assert_eq!(count(&pool, "user_profiles").await, 1);

    let profile = ProfileRepository::new(&pool)
        .find_by_user(USER)
        .await
        .expect("fetch")
        .expect("profile exists");
    assert_eq!(profile.first_name.as_deref(), Some("Ada B."));
}

#[tokio::test]
async fn full_scenario_ada_bob_acme() {
    let pool = test_pool().await;
    seed_profile(&pool, "Ada").await;
    let bob_guest_id = seed_contact(&pool, "Bob", Some("Acme")).await;
    seed_selected_message(&pool, &bob_guest_id, "Hi Bob").await;

    let report = linking::link_guest_profile(&pool, USER, SESSION)
        .await
        .expect("link")
        .expect("guest data present");

    assert!(report.outcome.profile);
    assert!(!report.outcome.summary);
    assert_eq!(report.outcome.contacts, 1);
    assert_eq!(report.outcome.messages, 1);
    assert!(report.cleanup_errors.is_empty());

    let profile = ProfileRepository::new(&pool)
        .find_by_user(USER)
        .await
        .expect("fetch profile")
        .expect("profile exists");
    assert_eq!(profile.first_name.as_deref(), Some("Ada"));

    let company = CompanyRepository::new(&pool)
        .find_by_exact_name(USER, "Acme")
        .await
        .expect("lookup company")
        .expect("company exists");

    let contacts = ContactRepository::new(&pool)
        .list_for_user(USER)
        .await
        .expect("list contacts");
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].first_name, "Bob");
    assert_eq!(contacts[0].company_id.as_deref(), Some(company.id.as_str()));

    let messages = MessageRepository::new(&pool)
        .list_for_contact(USER, &contacts[0].id)
        .await
        .expect("list messages");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_text, "Hi Bob");

    for table in [
        "guest_profiles",
        "guest_summaries",
        "guest_contacts",
        "guest_messages",
    ] {
        assert_eq!(count(&pool, table).await, 0, "{} should be empty", table);
    }
}
