// src/web/handlers/link_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::database::DatabaseConfig;
use crate::linking;
use crate::utils::require_field;
use crate::web::types::{ApiError, LinkRequest, LinkResponse};

pub async fn link_guest_profile_handler(
    request: Json<LinkRequest>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<LinkResponse>, ApiError> {
    let user_id = require_field(&request.user_id, "userId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let session_id = require_field(&request.session_id, "sessionId")
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })?;

    info!("Linking guest session {} to user {}", session_id, user_id);

    match linking::link_guest_profile(pool, user_id, session_id).await {
        Ok(None) => Ok(Json(LinkResponse::no_guest())),
        Ok(Some(report)) => Ok(Json(LinkResponse::linked(report))),
        Err(e) => {
            error!("Guest link failed for session {}: {:#}", session_id, e);
            Err(ApiError::internal(format!(
                "Failed to link guest profile: {}",
                e
            )))
        }
    }
}
