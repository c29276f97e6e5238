// src/web/handlers/message_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::database::DatabaseConfig;
use crate::email::ResendMailer;
use crate::store::MessageRepository;
use crate::utils::require_field;
use crate::web::types::{
    ApiError, SavedMessagesResponse, SendMessageRequest, SendMessageResponse,
};

pub async fn list_saved_messages_handler(
    user_id: String,
    contact_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<SavedMessagesResponse>, ApiError> {
    let user_id =
        require_field(&user_id, "user_id").map_err(|e| ApiError::validation(e.to_string()))?;
    let contact_id = require_field(&contact_id, "contact_id")
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })?;

    let messages = MessageRepository::new(pool)
        .list_for_contact(user_id, contact_id)
        .await
        .map_err(|e| {
            error!("Failed to list messages for user {}: {:#}", user_id, e);
            ApiError::internal("Failed to list saved messages")
        })?;

    Ok(Json(SavedMessagesResponse {
        success: true,
        messages,
    }))
}

pub async fn send_saved_message_handler(
    request: Json<SendMessageRequest>,
    db_config: &State<DatabaseConfig>,
    mailer: &State<ResendMailer>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let user_id = require_field(&request.user_id, "userId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let message_id = require_field(&request.message_id, "messageId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let to_email = require_field(&request.to_email, "toEmail")
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })?;

    let message = MessageRepository::new(pool)
        .find_by_id(user_id, message_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch message {} for user {}: {:#}", message_id, user_id, e);
            ApiError::internal("Failed to fetch saved message")
        })?
        .ok_or_else(|| ApiError::not_found("No such saved message"))?;

    let subject = format!("Your saved outreach message ({})", message.version_name);
    let email_id = mailer
        .send_text(to_email, &subject, &message.message_text)
        .await
        .map_err(|e| {
            error!("Failed to email message {} for user {}: {:#}", message_id, user_id, e);
            ApiError::upstream("Failed to send email")
        })?;

    info!("Emailed message {} to {}", message_id, to_email);

    Ok(Json(SendMessageResponse {
        success: true,
        message: "Message sent".to_string(),
        email_id,
    }))
}
