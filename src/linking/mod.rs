// src/linking/mod.rs
//! Guest-session-to-account migration: resolve the guest bundle, copy it
//! into the permanent tables in dependency order, then clean up.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::store::{
    CompanyRepository, Contact, ContactRepository, GuestContact, GuestMessage, GuestProfile,
    GuestStore, GuestSummary, MessageRepository, ProfileRepository,
};
use crate::utils::non_blank;

/// Everything a guest session accumulated, fetched read-only in one pass
#[derive(Debug, Clone)]
pub struct GuestBundle {
    pub profile: GuestProfile,
    pub summary: Option<GuestSummary>,
    pub contacts: Vec<GuestContact>,
    pub selected_message: Option<GuestMessage>,
}

/// What actually made it across, reported back to the caller
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct TransferOutcome {
    pub profile: bool,
    pub summary: bool,
    pub contacts: u32,
    pub messages: u32,
}

#[derive(Debug)]
pub struct LinkReport {
    pub outcome: TransferOutcome,
    pub cleanup_errors: Vec<String>,
}

/// Identity resolver: read-only lookup of the guest rows for a session.
/// Returns None when the session never stored a profile, which is the
/// common case for users who signed up directly or already linked.
pub async fn resolve_guest_bundle(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Option<GuestBundle>> {
    let store = GuestStore::new(pool);

    let profile = match store
        .find_profile(session_id)
        .await
        .context("Failed to fetch guest profile")?
    {
        Some(profile) => profile,
        None => return Ok(None),
    };

    let summary = store
        .find_summary(session_id)
        .await
        .context("Failed to fetch guest summary")?;
    let contacts = store
        .list_contacts(session_id)
        .await
        .context("Failed to fetch guest contacts")?;
    let selected_message = store
        .find_selected_message(session_id)
        .await
        .context("Failed to fetch selected guest message")?;

    Ok(Some(GuestBundle {
        profile,
        summary,
        contacts,
        selected_message,
    }))
}

/// Transfer orchestrator. Writes permanent rows only; guest rows are not
/// touched here. The profile write is the one fatal step — everything
/// after it degrades row by row.
pub async fn transfer(
    pool: &SqlitePool,
    user_id: &str,
    bundle: &GuestBundle,
) -> Result<TransferOutcome> {
    let profiles = ProfileRepository::new(pool);
    let messages = MessageRepository::new(pool);

    let mut outcome = TransferOutcome::default();

    profiles
        .upsert_from_guest(user_id, &bundle.profile)
        .await
        .context("Failed to write user profile")?;
    outcome.profile = true;

    if let Some(summary) = &bundle.summary {
        match profiles.upsert_summary_from_guest(user_id, summary).await {
            Ok(_) => outcome.summary = true,
            Err(e) => warn!(
                "Guest summary transfer failed for session {}: {:#}",
                bundle.profile.session_id, e
            ),
        }
    }

    // (guest contact id, transferred contact) pairs, in transfer order
    let mut transferred: Vec<(String, Contact)> = Vec::new();
    for guest_contact in &bundle.contacts {
        match transfer_contact(pool, user_id, guest_contact).await {
            Ok(contact) => {
                outcome.contacts += 1;
                transferred.push((guest_contact.id.clone(), contact));
            }
            Err(e) => warn!(
                "Guest contact {} transfer failed for session {}: {:#}",
                guest_contact.id, bundle.profile.session_id, e
            ),
        }
    }

    if let Some(message) = &bundle.selected_message {
        let target = transferred
            .iter()
            .find(|(guest_id, _)| *guest_id == message.guest_contact_id)
            .or_else(|| transferred.first());

        if let Some((_, contact)) = target {
            match messages
                .create(
                    user_id,
                    &contact.id,
                    contact.company_id.as_deref(),
                    &message.version_name,
                    &message.message_text,
                )
                .await
            {
                Ok(_) => outcome.messages = 1,
                Err(e) => warn!(
                    "Selected message transfer failed for session {}: {:#}",
                    bundle.profile.session_id, e
                ),
            }
        }
    }

    info!(
        "Transferred guest session {} to user {}: {} contacts, summary: {}, messages: {}",
        bundle.profile.session_id, user_id, outcome.contacts, outcome.summary, outcome.messages
    );

    Ok(outcome)
}

/// One contact: resolve its company by exact name (reusing an existing
/// row or creating one with status active), then insert the contact.
async fn transfer_contact(
    pool: &SqlitePool,
    user_id: &str,
    guest_contact: &GuestContact,
) -> Result<Contact> {
    let companies = CompanyRepository::new(pool);
    let contacts = ContactRepository::new(pool);

    let company_id = match non_blank(guest_contact.current_company.as_deref()) {
        Some(name) => {
            let company = match companies
                .find_by_exact_name(user_id, &name)
                .await
                .with_context(|| format!("Failed to look up company '{}'", name))?
            {
                Some(existing) => existing,
                None => companies
                    .create(user_id, &name, None, None)
                    .await
                    .with_context(|| format!("Failed to create company '{}'", name))?,
            };
            Some(company.id)
        }
        None => None,
    };

    contacts
        .create(
            user_id,
            &crate::store::NewContact {
                company_id,
                first_name: guest_contact.first_name.clone(),
                last_name: guest_contact.last_name.clone(),
                current_role: guest_contact.current_role.clone(),
                location: guest_contact.location.clone(),
                notes: non_blank(Some(&guest_contact.bio_input)),
            },
        )
        .await
        .context("Failed to insert contact")
}

/// Cleanup stage: four independent deletes, children first. Failures are
/// collected as warnings, never raised — a crash or error here leaves
/// guest rows behind for a retry, not a broken account.
pub async fn cleanup_guest_rows(pool: &SqlitePool, session_id: &str) -> Vec<String> {
    let store = GuestStore::new(pool);
    let mut errors = Vec::new();

    if let Err(e) = store.delete_messages(session_id).await {
        errors.push(format!("Failed to delete guest messages: {:#}", e));
    }
    if let Err(e) = store.delete_contacts(session_id).await {
        errors.push(format!("Failed to delete guest contacts: {:#}", e));
    }
    if let Err(e) = store.delete_summary(session_id).await {
        errors.push(format!("Failed to delete guest summary: {:#}", e));
    }
    if let Err(e) = store.delete_profile(session_id).await {
        errors.push(format!("Failed to delete guest profile: {:#}", e));
    }

    for error in &errors {
        warn!("Cleanup issue for session {}: {}", session_id, error);
    }

    errors
}

/// The full workflow. Ok(None) means the session had nothing to link.
/// Err means the fatal profile step failed and no guest data was removed.
pub async fn link_guest_profile(
    pool: &SqlitePool,
    user_id: &str,
    session_id: &str,
) -> Result<Option<LinkReport>> {
    let bundle = match resolve_guest_bundle(pool, session_id).await? {
        Some(bundle) => bundle,
        None => {
            info!("No guest profile found for session: {}", session_id);
            return Ok(None);
        }
    };

    let outcome = transfer(pool, user_id, &bundle).await?;
    let cleanup_errors = cleanup_guest_rows(pool, session_id).await;

    Ok(Some(LinkReport {
        outcome,
        cleanup_errors,
    }))
}
