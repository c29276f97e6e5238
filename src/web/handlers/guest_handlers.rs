// src/web/handlers/guest_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::ai::{self, GeminiClient};
use crate::database::DatabaseConfig;
use crate::store::{GuestStore, NewGuestContact, NewGuestProfile};
use crate::utils::require_field;
use crate::web::types::{
    ApiError, GenerateMessagesRequest, GuestContactRequest, GuestContactResponse,
    GuestMessagesResponse, GuestProfileRequest, GuestProfileResponse, GuestSummaryRequest,
    GuestSummaryResponse, SelectMessageRequest, SelectMessageResponse,
};

fn pool_or_error<'a>(db_config: &'a State<DatabaseConfig>) -> Result<&'a sqlx::SqlitePool, ApiError> {
    db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })
}

pub async fn save_guest_profile_handler(
    request: Json<GuestProfileRequest>,
    db_config: &State<DatabaseConfig>,
    gemini: &State<GeminiClient>,
) -> Result<Json<GuestProfileResponse>, ApiError> {
    let session_id = require_field(&request.session_id, "sessionId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let background_input = require_field(&request.background_input, "backgroundInput")
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = pool_or_error(db_config)?;

    let extracted = ai::extract_profile(gemini, background_input)
        .await
        .map_err(|e| {
            error!("Profile extraction failed for session {}: {:#}", session_id, e);
            ApiError::upstream("Could not extract profile fields from the provided text")
        })?;

    let store = GuestStore::new(pool);
    let profile = store
        .upsert_profile(
            session_id,
            &NewGuestProfile {
                first_name: extracted.first_name,
                last_name: extracted.last_name,
                current_role: extracted.current_role,
                current_company: extracted.current_company,
                location: extracted.location,
                background_input: background_input.to_string(),
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to store guest profile for session {}: {:#}", session_id, e);
            ApiError::internal("Failed to store guest profile")
        })?;

    info!("Stored guest profile for session: {}", session_id);

    Ok(Json(GuestProfileResponse {
        success: true,
        profile,
    }))
}

pub async fn generate_guest_summary_handler(
    request: Json<GuestSummaryRequest>,
    db_config: &State<DatabaseConfig>,
    gemini: &State<GeminiClient>,
) -> Result<Json<GuestSummaryResponse>, ApiError> {
    let session_id = require_field(&request.session_id, "sessionId")
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = pool_or_error(db_config)?;
    let store = GuestStore::new(pool);

    let profile = store
        .find_profile(session_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch guest profile for session {}: {:#}", session_id, e);
            ApiError::internal("Failed to fetch guest profile")
        })?
        .ok_or_else(|| ApiError::not_found("No guest profile found for this session"))?;

    let generated = ai::generate_summary(gemini, &profile).await.map_err(|e| {
        error!("Summary generation failed for session {}: {:#}", session_id, e);
        ApiError::upstream("Could not generate a summary from the stored profile")
    })?;

    let summary = store
        .upsert_summary(
            session_id,
            &generated.experience_highlights,
            &generated.key_skills_text(),
            &generated.value_proposition,
        )
        .await
        .map_err(|e| {
            error!("Failed to store guest summary for session {}: {:#}", session_id, e);
            ApiError::internal("Failed to store guest summary")
        })?;

    Ok(Json(GuestSummaryResponse {
        success: true,
        summary,
    }))
}

pub async fn add_guest_contact_handler(
    request: Json<GuestContactRequest>,
    db_config: &State<DatabaseConfig>,
    gemini: &State<GeminiClient>,
) -> Result<Json<GuestContactResponse>, ApiError> {
    let session_id = require_field(&request.session_id, "sessionId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let bio_input = require_field(&request.bio_input, "bioInput")
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = pool_or_error(db_config)?;

    let extracted = ai::extract_contact(gemini, bio_input).await.map_err(|e| {
        error!("Contact extraction failed for session {}: {:#}", session_id, e);
        ApiError::upstream("Could not extract contact fields from the provided bio")
    })?;

    let store = GuestStore::new(pool);
    let contact = store
        .insert_contact(
            session_id,
            &NewGuestContact {
                // Guest intake is lenient: a missing name is stored empty and
                // surfaces later, at transfer time, where names are required.
                first_name: extracted.first_name.unwrap_or_default(),
                last_name: extracted.last_name,
                current_role: extracted.current_role,
                current_company: extracted.current_company,
                location: extracted.location,
                bio_input: bio_input.to_string(),
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to store guest contact for session {}: {:#}", session_id, e);
            ApiError::internal("Failed to store guest contact")
        })?;

    info!("Stored guest contact {} for session: {}", contact.id, session_id);

    Ok(Json(GuestContactResponse {
        success: true,
        contact,
    }))
}

pub async fn generate_guest_messages_handler(
    request: Json<GenerateMessagesRequest>,
    db_config: &State<DatabaseConfig>,
    gemini: &State<GeminiClient>,
) -> Result<Json<GuestMessagesResponse>, ApiError> {
    let session_id = require_field(&request.session_id, "sessionId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let contact_id = require_field(&request.contact_id, "contactId")
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = pool_or_error(db_config)?;
    let store = GuestStore::new(pool);

    let profile = store
        .find_profile(session_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch guest profile for session {}: {:#}", session_id, e);
            ApiError::internal("Failed to fetch guest profile")
        })?
        .ok_or_else(|| ApiError::not_found("No guest profile found for this session"))?;

    let contact = store
        .find_contact(session_id, contact_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch guest contact for session {}: {:#}", session_id, e);
            ApiError::internal("Failed to fetch guest contact")
        })?
        .ok_or_else(|| ApiError::not_found("No such contact for this session"))?;

    let variants = ai::generate_outreach_variants(gemini, &profile, &contact)
        .await
        .map_err(|e| {
            error!("Message generation failed for session {}: {:#}", session_id, e);
            ApiError::upstream("Could not generate outreach messages")
        })?;

    let mut messages = Vec::with_capacity(variants.len());
    for variant in &variants {
        let message = store
            .insert_message(
                session_id,
                contact_id,
                &variant.version_name,
                &variant.message_text,
            )
            .await
            .map_err(|e| {
                error!("Failed to store generated message for session {}: {:#}", session_id, e);
                ApiError::internal("Failed to store generated messages")
            })?;
        messages.push(message);
    }

    info!(
        "Generated {} messages for session {} contact {}",
        messages.len(),
        session_id,
        contact_id
    );

    Ok(Json(GuestMessagesResponse {
        success: true,
        messages,
    }))
}

pub async fn select_guest_message_handler(
    request: Json<SelectMessageRequest>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<SelectMessageResponse>, ApiError> {
    let session_id = require_field(&request.session_id, "sessionId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let contact_id = require_field(&request.contact_id, "contactId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let message_id = require_field(&request.message_id, "messageId")
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = pool_or_error(db_config)?;
    let store = GuestStore::new(pool);

    let selected = store
        .select_message(session_id, contact_id, message_id)
        .await
        .map_err(|e| {
            error!("Failed to select message for session {}: {:#}", session_id, e);
            ApiError::internal("Failed to select message")
        })?;

    if !selected {
        return Err(ApiError::not_found("No such message for this contact"));
    }

    Ok(Json(SelectMessageResponse {
        success: true,
        message: "Message selected".to_string(),
    }))
}
