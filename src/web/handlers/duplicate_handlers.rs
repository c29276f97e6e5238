// src/web/handlers/duplicate_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use crate::ai::duplicates::{filter_matches, DuplicateReport, ExistingRecord};
use crate::database::DatabaseConfig;
use crate::store::{CompanyRepository, ContactRepository};
use crate::utils::{full_name, require_field};
use crate::web::types::{ApiError, CompanyDuplicateRequest, ContactDuplicateRequest};
use crate::web::ClassifierState;

pub async fn check_company_duplicates_handler(
    request: Json<CompanyDuplicateRequest>,
    db_config: &State<DatabaseConfig>,
    classifier: &State<ClassifierState>,
) -> Result<Json<DuplicateReport>, ApiError> {
    let user_id = require_field(&request.user_id, "userId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let name =
        require_field(&request.name, "name").map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })?;

    let companies = CompanyRepository::new(pool)
        .list_for_user(user_id)
        .await
        .map_err(|e| {
            error!("Failed to list companies for user {}: {:#}", user_id, e);
            ApiError::internal("Failed to load existing companies")
        })?;

    let existing: Vec<ExistingRecord> = companies
        .into_iter()
        .map(|company| ExistingRecord {
            id: company.id,
            name: company.name,
        })
        .collect();

    let matches = classifier
        .0
        .classify(name, &existing)
        .await
        .map_err(|e| {
            error!("Duplicate classification failed for user {}: {:#}", user_id, e);
            ApiError::internal("Duplicate check failed")
        })?;

    Ok(Json(filter_matches(matches, &existing)))
}

pub async fn check_contact_duplicates_handler(
    request: Json<ContactDuplicateRequest>,
    db_config: &State<DatabaseConfig>,
    classifier: &State<ClassifierState>,
) -> Result<Json<DuplicateReport>, ApiError> {
    let user_id = require_field(&request.user_id, "userId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let first_name = require_field(&request.first_name, "firstName")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let last_name = require_field(&request.last_name, "lastName")
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })?;

    let contacts = ContactRepository::new(pool)
        .list_for_user(user_id)
        .await
        .map_err(|e| {
            error!("Failed to list contacts for user {}: {:#}", user_id, e);
            ApiError::internal("Failed to load existing contacts")
        })?;

    let existing: Vec<ExistingRecord> = contacts
        .iter()
        .map(|contact| ExistingRecord {
            id: contact.id.clone(),
            name: full_name(&contact.first_name, contact.last_name.as_deref()),
        })
        .collect();

    let candidate = full_name(first_name, Some(last_name));

    let matches = classifier
        .0
        .classify(&candidate, &existing)
        .await
        .map_err(|e| {
            error!("Duplicate classification failed for user {}: {:#}", user_id, e);
            ApiError::internal("Duplicate check failed")
        })?;

    Ok(Json(filter_matches(matches, &existing)))
}
