// src/web/mod.rs

pub mod cors;
pub mod handlers;
pub mod types;

pub use types::*;

use crate::ai::{DuplicateClassifier, GeminiClassifier, GeminiClient};
use crate::config::AppConfig;
use crate::database::DatabaseConfig;
use crate::email::ResendMailer;
use anyhow::Result;
use cors::Cors;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, State};
use tracing::{error, info};

/// Managed duplicate classifier, swappable without touching handlers
pub struct ClassifierState(pub Box<dyn DuplicateClassifier>);

#[post("/link-guest-profile", data = "<request>")]
pub async fn link_guest_profile(
    request: Json<LinkRequest>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<LinkResponse>, ApiError> {
    handlers::link_guest_profile_handler(request, db_config).await
}

#[post("/guest/profile", data = "<request>")]
pub async fn save_guest_profile(
    request: Json<GuestProfileRequest>,
    db_config: &State<DatabaseConfig>,
    gemini: &State<GeminiClient>,
) -> Result<Json<GuestProfileResponse>, ApiError> {
    handlers::save_guest_profile_handler(request, db_config, gemini).await
}

#[post("/guest/summary", data = "<request>")]
pub async fn generate_guest_summary(
    request: Json<GuestSummaryRequest>,
    db_config: &State<DatabaseConfig>,
    gemini: &State<GeminiClient>,
) -> Result<Json<GuestSummaryResponse>, ApiError> {
    handlers::generate_guest_summary_handler(request, db_config, gemini).await
}

#[post("/guest/contacts", data = "<request>")]
pub async fn add_guest_contact(
    request: Json<GuestContactRequest>,
    db_config: &State<DatabaseConfig>,
    gemini: &State<GeminiClient>,
) -> Result<Json<GuestContactResponse>, ApiError> {
    handlers::add_guest_contact_handler(request, db_config, gemini).await
}

#[post("/guest/messages/generate", data = "<request>")]
pub async fn generate_guest_messages(
    request: Json<GenerateMessagesRequest>,
    db_config: &State<DatabaseConfig>,
    gemini: &State<GeminiClient>,
) -> Result<Json<GuestMessagesResponse>, ApiError> {
    handlers::generate_guest_messages_handler(request, db_config, gemini).await
}

#[post("/guest/messages/select", data = "<request>")]
pub async fn select_guest_message(
    request: Json<SelectMessageRequest>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<SelectMessageResponse>, ApiError> {
    handlers::select_guest_message_handler(request, db_config).await
}

#[post("/check-company-duplicates", data = "<request>")]
pub async fn check_company_duplicates(
    request: Json<CompanyDuplicateRequest>,
    db_config: &State<DatabaseConfig>,
    classifier: &State<ClassifierState>,
) -> Result<Json<crate::ai::DuplicateReport>, ApiError> {
    handlers::check_company_duplicates_handler(request, db_config, classifier).await
}

#[post("/check-contact-duplicates", data = "<request>")]
pub async fn check_contact_duplicates(
    request: Json<ContactDuplicateRequest>,
    db_config: &State<DatabaseConfig>,
    classifier: &State<ClassifierState>,
) -> Result<Json<crate::ai::DuplicateReport>, ApiError> {
    handlers::check_contact_duplicates_handler(request, db_config, classifier).await
}

#[get("/companies?<user_id>")]
pub async fn list_companies(
    user_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<CompaniesResponse>, ApiError> {
    handlers::list_companies_handler(user_id, db_config).await
}

#[post("/companies", data = "<request>")]
pub async fn create_company(
    request: Json<CreateCompanyRequest>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<CompanyResponse>, ApiError> {
    handlers::create_company_handler(request, db_config).await
}

#[get("/contacts?<user_id>")]
pub async fn list_contacts(
    user_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ContactsResponse>, ApiError> {
    handlers::list_contacts_handler(user_id, db_config).await
}

#[post("/contacts", data = "<request>")]
pub async fn create_contact(
    request: Json<CreateContactRequest>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ContactResponse>, ApiError> {
    handlers::create_contact_handler(request, db_config).await
}

#[get("/contacts/export?<user_id>")]
pub async fn export_contacts(
    user_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<CsvResponse, ApiError> {
    handlers::export_contacts_handler(user_id, db_config).await
}

#[get("/messages?<user_id>&<contact_id>")]
pub async fn list_saved_messages(
    user_id: String,
    contact_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<SavedMessagesResponse>, ApiError> {
    handlers::list_saved_messages_handler(user_id, contact_id, db_config).await
}

#[post("/messages/send", data = "<request>")]
pub async fn send_saved_message(
    request: Json<SendMessageRequest>,
    db_config: &State<DatabaseConfig>,
    mailer: &State<ResendMailer>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    handlers::send_saved_message_handler(request, db_config, mailer).await
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers

#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody::new("bad_request", "Invalid request format"))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorBody> {
    Json(ErrorBody::new("not_found", "Resource not found"))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody::new("internal_error", "Internal server error"))
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let mut db_config = DatabaseConfig::new(config.database_path.clone());

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {:#}", e);
        return Err(e);
    }

    if let Err(e) = db_config.migrate().await {
        error!("Failed to run database migrations: {:#}", e);
        return Err(e);
    }

    let gemini = GeminiClient::from_config(&config.gemini)?;
    let classifier = ClassifierState(Box::new(GeminiClassifier::new(GeminiClient::from_config(
        &config.gemini,
    )?)));
    let mailer = ResendMailer::from_config(&config.email)?;
    let cors = Cors::new(config.allowed_origins.clone());

    info!("Starting Introlink API server");
    info!("Database: {}", db_config.database_path.display());
    info!("CORS allow-list: {}", config.allowed_origins.join(", "));

    rocket::build()
        .attach(cors)
        .manage(db_config)
        .manage(gemini)
        .manage(classifier)
        .manage(mailer)
        .register("/api", catchers![bad_request, not_found, internal_error])
        .mount(
            "/api",
            routes![
                link_guest_profile,
                save_guest_profile,
                generate_guest_summary,
                add_guest_contact,
                generate_guest_messages,
                select_guest_message,
                check_company_duplicates,
                check_contact_duplicates,
                list_companies,
                create_company,
                list_contacts,
                create_contact,
                export_contacts,
                list_saved_messages,
                send_saved_message,
                health,
                options,
            ],
        )
        .launch()
        .await?;

    Ok(())
}
