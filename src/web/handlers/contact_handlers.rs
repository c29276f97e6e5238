// src/web/handlers/contact_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use std::collections::HashMap;
use tracing::{error, info};

use crate::database::DatabaseConfig;
use crate::store::{CompanyRepository, ContactRepository, NewContact};
use crate::utils::require_field;
use crate::web::types::{
    ApiError, ContactResponse, ContactsResponse, CreateContactRequest, CsvResponse,
};

pub async fn list_contacts_handler(
    user_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ContactsResponse>, ApiError> {
    let user_id =
        require_field(&user_id, "user_id").map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })?;

    let contacts = ContactRepository::new(pool)
        .list_for_user(user_id)
        .await
        .map_err(|e| {
            error!("Failed to list contacts for user {}: {:#}", user_id, e);
            ApiError::internal("Failed to list contacts")
        })?;

    Ok(Json(ContactsResponse {
        success: true,
        contacts,
    }))
}

pub async fn create_contact_handler(
    request: Json<CreateContactRequest>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ContactResponse>, ApiError> {
    let user_id = require_field(&request.user_id, "userId")
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let first_name = require_field(&request.first_name, "firstName")
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })?;

    let contact = ContactRepository::new(pool)
        .create(
            user_id,
            &NewContact {
                company_id: request.company_id.clone(),
                first_name: first_name.to_string(),
                last_name: request.last_name.clone(),
                current_role: request.current_role.clone(),
                location: request.location.clone(),
                notes: request.notes.clone(),
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to create contact for user {}: {:#}", user_id, e);
            ApiError::internal("Failed to create contact")
        })?;

    info!("Created contact {} for user {}", contact.id, user_id);

    Ok(Json(ContactResponse {
        success: true,
        contact,
    }))
}

pub async fn export_contacts_handler(
    user_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<CsvResponse, ApiError> {
    let user_id =
        require_field(&user_id, "user_id").map_err(|e| ApiError::validation(e.to_string()))?;

    let pool = db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal("Database connection failed")
    })?;

    let contacts = ContactRepository::new(pool)
        .list_for_user(user_id)
        .await
        .map_err(|e| {
            error!("Failed to list contacts for user {}: {:#}", user_id, e);
            ApiError::internal("Failed to list contacts")
        })?;

    let companies = CompanyRepository::new(pool)
        .list_for_user(user_id)
        .await
        .map_err(|e| {
            error!("Failed to list companies for user {}: {:#}", user_id, e);
            ApiError::internal("Failed to list companies")
        })?;

    let company_names: HashMap<String, String> = companies
        .into_iter()
        .map(|company| (company.id, company.name))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "first_name",
            "last_name",
            "role",
            "company",
            "location",
            "notes",
            "created_at",
        ])
        .map_err(|e| {
            error!("CSV write failed for user {}: {:#}", user_id, e);
            ApiError::internal("Failed to build CSV export")
        })?;

    for contact in &contacts {
        let company = contact
            .company_id
            .as_ref()
            .and_then(|id| company_names.get(id))
            .map(String::as_str)
            .unwrap_or("");

        writer
            .write_record([
                contact.first_name.as_str(),
                contact.last_name.as_deref().unwrap_or(""),
                contact.current_role.as_deref().unwrap_or(""),
                company,
                contact.location.as_deref().unwrap_or(""),
                contact.notes.as_deref().unwrap_or(""),
                &contact.created_at.to_rfc3339(),
            ])
            .map_err(|e| {
                error!("CSV write failed for user {}: {:#}", user_id, e);
                ApiError::internal("Failed to build CSV export")
            })?;
    }

    let data = writer.into_inner().map_err(|e| {
        error!("CSV flush failed for user {}: {:#}", user_id, e);
        ApiError::internal("Failed to build CSV export")
    })?;

    info!("Exported {} contacts for user {}", contacts.len(), user_id);

    Ok(CsvResponse {
        data,
        filename: "contacts.csv".to_string(),
    })
}
