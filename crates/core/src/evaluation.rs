//! Course evaluation records and the search filters that narrow them.
//!
//! Evaluation records are owned by the document store; the pipeline
//! consumes them read-only. The record `id` is an opaque stable token
//! assigned by the store and must be surfaced verbatim as the citation key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored course/professor evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Store-assigned opaque identifier — the citation key.
    pub id: String,

    pub subject: String,
    pub instructor: String,
    pub term: String,

    /// How clearly the instructor presented the material (1-5).
    pub clarity_rating: u8,

    /// How well assessments matched what was taught (1-5).
    pub alignment_rating: u8,

    /// Free-text opinion.
    pub free_text: String,

    pub submitted_at: DateTime<Utc>,

    /// Who submitted this evaluation, if signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter_id: Option<String>,
}

/// A new evaluation about to be stored (the store assigns the id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvaluation {
    pub subject: String,
    pub instructor: String,
    pub term: String,
    pub clarity_rating: u8,
    pub alignment_rating: u8,
    pub free_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter_id: Option<String>,
}

/// Optional equality filters that narrow the knowledge query.
///
/// Each field is either unset or exactly one value from a closed catalog;
/// values are never validated against existence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.instructor.is_none() && self.term.is_none()
    }

    /// Render the active filters as a one-line natural-language statement.
    ///
    /// Returns `None` when no filter is set, so the composer can omit the
    /// section entirely.
    pub fn describe(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut parts = Vec::new();
        if let Some(subject) = &self.subject {
            parts.push(format!("subject {subject}"));
        }
        if let Some(instructor) = &self.instructor {
            parts.push(format!("instructor {instructor}"));
        }
        if let Some(term) = &self.term {
            parts.push(format!("term {term}"));
        }
        Some(format!(
            "The student is currently asking about: {}.",
            parts.join(", ")
        ))
    }
}

/// A query for recent evaluations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationQuery {
    /// Equality constraints for each set filter field.
    pub filters: SearchFilters,

    /// Maximum number of records, most recent first.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

impl EvaluationQuery {
    pub fn new(filters: SearchFilters) -> Self {
        Self {
            filters,
            limit: default_limit(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl EvaluationRecord {
    /// Whether this record matches every set filter field (equality).
    pub fn matches(&self, filters: &SearchFilters) -> bool {
        filters.subject.as_deref().is_none_or(|s| s == self.subject)
            && filters
                .instructor
                .as_deref()
                .is_none_or(|i| i == self.instructor)
            && filters.term.as_deref().is_none_or(|t| t == self.term)
    }
}
