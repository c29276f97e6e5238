// src/web/types.rs
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};
use std::io::Cursor;

use crate::linking::{LinkReport, TransferOutcome};
use crate::store::{
    Company, Contact, GuestContact, GuestMessage, GuestProfile, GuestSummary, SavedMessageVersion,
};

// ===== Error responses =====

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// JSON error carrying a real HTTP status code
#[derive(Debug)]
pub struct ApiError {
    pub status: Status,
    pub body: ErrorBody,
}

impl ApiError {
    fn new(status: Status, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody::new(error, message),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(Status::BadRequest, "validation_error", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Status::NotFound, "not_found", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Status::InternalServerError, "internal_error", message)
    }

    /// A dependency (model API, email provider) failed, not this service
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(Status::BadGateway, "upstream_error", message)
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let body = serde_json::to_string(&self.body).map_err(|_| Status::InternalServerError)?;

        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

// ===== File download responses =====

pub struct CsvResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl<'r> Responder<'r, 'static> for CsvResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), Cursor::new(self.data))
            .ok()
    }
}

// ===== Link workflow =====

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct LinkRequest {
    pub user_id: String,
    pub session_id: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct LinkResponse {
    pub success: bool,
    pub message: String,
    pub transferred: TransferOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_errors: Option<Vec<String>>,
}

impl LinkResponse {
    pub fn no_guest() -> Self {
        Self {
            success: true,
            message: "No guest profile found to link".to_string(),
            transferred: TransferOutcome::default(),
            cleanup_errors: None,
        }
    }

    pub fn linked(report: LinkReport) -> Self {
        Self {
            success: true,
            message: "Guest profile linked successfully".to_string(),
            transferred: report.outcome,
            cleanup_errors: if report.cleanup_errors.is_empty() {
                None
            } else {
                Some(report.cleanup_errors)
            },
        }
    }
}

// ===== Guest intake =====

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct GuestProfileRequest {
    pub session_id: String,
    pub background_input: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct GuestProfileResponse {
    pub success: bool,
    pub profile: GuestProfile,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct GuestSummaryRequest {
    pub session_id: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct GuestSummaryResponse {
    pub success: bool,
    pub summary: GuestSummary,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct GuestContactRequest {
    pub session_id: String,
    pub bio_input: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct GuestContactResponse {
    pub success: bool,
    pub contact: GuestContact,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct GenerateMessagesRequest {
    pub session_id: String,
    pub contact_id: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct GuestMessagesResponse {
    pub success: bool,
    pub messages: Vec<GuestMessage>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SelectMessageRequest {
    pub session_id: String,
    pub contact_id: String,
    pub message_id: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SelectMessageResponse {
    pub success: bool,
    pub message: String,
}

// ===== Duplicate checks =====

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CompanyDuplicateRequest {
    pub user_id: String,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ContactDuplicateRequest {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
}

// ===== Companies, contacts, saved messages =====

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub user_id: String,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct CompanyResponse {
    pub success: bool,
    pub company: Company,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct CompaniesResponse {
    pub success: bool,
    pub companies: Vec<Company>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CreateContactRequest {
    pub user_id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub current_role: Option<String>,
    pub location: Option<String>,
    pub company_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ContactResponse {
    pub success: bool,
    pub contact: Contact,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ContactsResponse {
    pub success: bool,
    pub contacts: Vec<Contact>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SavedMessagesResponse {
    pub success: bool,
    pub messages: Vec<SavedMessageVersion>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub user_id: String,
    pub message_id: String,
    pub to_email: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: String,
    pub email_id: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: String,
}
