// src/web/handlers/company_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::database::DatabaseConfig;
use crate::store::CompanyRepository;
use crate::utils::require_field;
use crate::web::types::{ApiError, CompaniesResponse, CompanyResponse, CreateCompanyRequest};

pub async fn list_companies_handler(
    user_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<CompaniesResponse>, ApiError> {
    let user_id =
        require_field(&user_id, "user_id").map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })?;

    let companies = CompanyRepository::new(pool)
        .list_for_user(user_id)
        .await
        .map_err(|e| {
            error!("Failed to list companies for user {}: {:#}", user_id, e);
            ApiError::internal("Failed to list companies")
        })?;

    Ok(Json(CompaniesResponse {
        success: true,
        companies,
    }))
}

pub async fn create_company_handler(
    request: Json<CreateCompanyRequest>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let user_id = require_field(&request.user_id, "userId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let name =
        require_field(&request.name, "name").map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })?;

    let company = CompanyRepository::new(pool)
        .create(
            user_id,
            name,
            request.website.as_deref(),
            request.industry.as_deref(),
        )
        .await
        .map_err(|e| {
            error!("Failed to create company for user {}: {:#}", user_id, e);
            ApiError::internal("Failed to create company")
        })?;

    info!("Created company {} for user {}", company.id, user_id);

    Ok(Json(CompanyResponse {
        success: true,
        company,
    }))
}
