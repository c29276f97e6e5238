// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;

use crate::web::types::HealthResponse;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
