// src/ai/mod.rs

pub mod duplicates;
pub mod extraction;
pub mod gemini;
pub mod messages;
pub mod summary;

pub use duplicates::{
    Confidence, DuplicateClassifier, DuplicateMatch, DuplicateReport, ExactMatchClassifier,
    ExistingRecord, GeminiClassifier,
};
pub use extraction::{extract_contact, extract_profile, ExtractedPerson};
pub use gemini::{extract_json_object, GeminiClient};
pub use messages::{generate_outreach_variants, MessageVariant};
pub use summary::{generate_summary, GeneratedSummary};
