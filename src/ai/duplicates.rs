// src/ai/duplicates.rs
//! Duplicate detection behind a pluggable classifier interface. The LLM
//! implementation can be swapped or stubbed without touching callers;
//! the exact-match implementation doubles as its fallback.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use super::gemini::GeminiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// A row the caller already owns, candidate ids must come from this set
#[derive(Debug, Clone)]
pub struct ExistingRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub id: String,
    pub name: String,
    pub confidence: Confidence,
    pub reasoning: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub is_duplicate: bool,
    pub matches: Vec<DuplicateMatch>,
}

#[rocket::async_trait]
pub trait DuplicateClassifier: Send + Sync {
    async fn classify(
        &self,
        candidate: &str,
        existing: &[ExistingRecord],
    ) -> Result<Vec<DuplicateMatch>>;
}

/// Deterministic baseline: case-insensitive exact name equality
pub struct ExactMatchClassifier;

#[rocket::async_trait]
impl DuplicateClassifier for ExactMatchClassifier {
    async fn classify(
        &self,
        candidate: &str,
        existing: &[ExistingRecord],
    ) -> Result<Vec<DuplicateMatch>> {
        let needle = candidate.trim().to_lowercase();

        Ok(existing
            .iter()
            .filter(|record| record.name.trim().to_lowercase() == needle)
            .map(|record| DuplicateMatch {
                id: record.id.clone(),
                name: record.name.clone(),
                confidence: Confidence::High,
                reasoning: "Exact name match".to_string(),
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct MatchesPayload {
    #[serde(default)]
    matches: Vec<DuplicateMatch>,
}

/// LLM-backed classifier; malformed or empty model output falls back to
/// the exact matcher rather than failing the request.
pub struct GeminiClassifier {
    client: GeminiClient,
}

impl GeminiClassifier {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    fn prompt(candidate: &str, existing: &[ExistingRecord]) -> String {
        let listing: String = existing
            .iter()
            .map(|record| format!("{} | {}\n", record.id, record.name))
            .collect();

        format!(
            "A user is about to add \"{candidate}\" to their list. Below are \
             their existing records as `id | name` lines. Identify entries \
             likely to be the same real-world entity, accounting for \
             abbreviations, suffixes and misspellings. Respond with a single \
             JSON object only: {{\"matches\": [{{\"id\": \"...\", \"name\": \
             \"...\", \"confidence\": \"high|medium|low\", \"reasoning\": \
             \"...\"}}]}}. Use an empty array when nothing matches.\n\n{listing}"
        )
    }
}

#[rocket::async_trait]
impl DuplicateClassifier for GeminiClassifier {
    async fn classify(
        &self,
        candidate: &str,
        existing: &[ExistingRecord],
    ) -> Result<Vec<DuplicateMatch>> {
        if existing.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = Self::prompt(candidate, existing);
        match self.client.generate_json::<MatchesPayload>(&prompt).await {
            Ok(payload) => Ok(payload.matches),
            Err(e) => {
                warn!(
                    "Duplicate classification via model failed, using exact match fallback: {:#}",
                    e
                );
                ExactMatchClassifier.classify(candidate, existing).await
            }
        }
    }
}

/// Defensive post-filter applied to every implementation's output: drop
/// matches whose id is not in the caller's own set, drop low confidence,
/// and flag a duplicate only on a remaining high-confidence match.
pub fn filter_matches(matches: Vec<DuplicateMatch>, existing: &[ExistingRecord]) -> DuplicateReport {
    let known_ids: HashSet<&str> = existing.iter().map(|record| record.id.as_str()).collect();

    let kept: Vec<DuplicateMatch> = matches
        .into_iter()
        .filter(|m| known_ids.contains(m.id.as_str()))
        .filter(|m| m.confidence != Confidence::Low)
        .collect();

    DuplicateReport {
        is_duplicate: kept.iter().any(|m| m.confidence == Confidence::High),
        matches: kept,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Vec<ExistingRecord> {
        vec![
            ExistingRecord {
                id: "c1".to_string(),
                name: "Acme".to_string(),
            },
            ExistingRecord {
                id: "c2".to_string(),
                name: "Globex".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_exact_match_is_case_insensitive() {
        let matches = ExactMatchClassifier
            .classify("acme", &existing())
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "c1");
        assert_eq!(matches[0].confidence, Confidence::High);
    }

    #[tokio::test]
    async fn test_exact_match_no_hit() {
        let matches = ExactMatchClassifier
            .classify("Initech", &existing())
            .await
            .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_filter_drops_unknown_ids_and_low_confidence() {
        let matches = vec![
            DuplicateMatch {
                id: "c1".to_string(),
                name: "Acme".to_string(),
                confidence: Confidence::High,
                reasoning: "same name".to_string(),
            },
            DuplicateMatch {
                id: "made-up".to_string(),
                name: "Acme Inc".to_string(),
                confidence: Confidence::High,
                reasoning: "hallucinated id".to_string(),
            },
            DuplicateMatch {
                id: "c2".to_string(),
                name: "Globex".to_string(),
                confidence: Confidence::Low,
                reasoning: "weak hunch".to_string(),
            },
        ];

        let report = filter_matches(matches, &existing());
        assert!(report.is_duplicate);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].id, "c1");
    }

    #[test]
    fn test_filter_medium_only_is_not_duplicate() {
        let matches = vec![DuplicateMatch {
            id: "c2".to_string(),
            name: "Globex".to_string(),
            confidence: Confidence::Medium,
            reasoning: "similar".to_string(),
        }];

        let report = filter_matches(matches, &existing());
        assert!(!report.is_duplicate);
        assert_eq!(report.matches.len(), 1);
    }

    #[test]
    fn test_confidence_parses_lowercase() {
        let m: DuplicateMatch = serde_json::from_str(
            r#"{"id": "c1", "name": "Acme", "confidence": "high", "reasoning": "x"}"#,
        )
        .unwrap();
        assert_eq!(m.confidence, Confidence::High);
    }
}
