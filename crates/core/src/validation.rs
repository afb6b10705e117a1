//! Community validation: crowd-claims, verdicts, and responses.
//!
//! A validation prompt is a synthetic message injected after some
//! successful turns, asking the student to confirm or debunk a claim
//! other students have made. Each response is persisted write-only —
//! no running tally is kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A crowd-sourced claim awaiting community validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationClaim {
    pub id: u32,
    pub text: String,
    pub subject: String,
}

/// The fixed catalog of claims the pipeline draws from.
pub fn claim_catalog() -> Vec<ValidationClaim> {
    vec![
        ValidationClaim {
            id: 1,
            text: "Professor Robson takes attendance in every Software Engineering lecture?"
                .into(),
            subject: "Software Engineering".into(),
        },
        ValidationClaim {
            id: 2,
            text: "They say the Calculus 1 exam allows one A4 sheet of notes. True?".into(),
            subject: "Calculus 1".into(),
        },
        ValidationClaim {
            id: 3,
            text: "Is it true that Ethics has no final exam, only assignments?".into(),
            subject: "Ethics".into(),
        },
    ]
}

/// The student's answer to a validation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationVerdict {
    /// "It's true"
    True,
    /// "It's a myth"
    Myth,
    /// The student skipped the question
    Skip,
}

/// A persisted, write-only validation response keyed by claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub claim_id: u32,
    pub verdict: ValidationVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responder_id: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl ValidationResponse {
    pub fn new(claim_id: u32, verdict: ValidationVerdict, responder_id: Option<String>) -> Self {
        Self {
            claim_id,
            verdict,
            responder_id,
            submitted_at: Utc::now(),
        }
    }
}
