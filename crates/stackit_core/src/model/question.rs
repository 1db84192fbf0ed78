//! Question domain model.
//!
//! # Responsibility
//! - Define the question write model and its validation rules.
//! - Define the read model surfaced to list/detail use-cases.
//!
//! # Invariants
//! - `id` is stable and never reused for another question.
//! - `vote_count` is the aggregate score and may be negative.
//! - `answer_count` mirrors the number of persisted answers.

use crate::model::user::UserId;
use crate::model::{ValidationError, TITLE_MAX_CHARS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a question.
pub type QuestionId = Uuid;

/// Write model for a question.
///
/// Counters and timestamps are storage-assigned and only appear on the
/// read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    /// Raw body text (markdown or sanitized HTML; format is opaque here).
    pub body: String,
    /// Derived plain-text summary for list cards. Filled by the service layer.
    pub preview_text: Option<String>,
    pub author_id: UserId,
}

impl Question {
    /// Creates a new question with a generated stable ID.
    pub fn new(title: impl Into<String>, body: impl Into<String>, author_id: UserId) -> Self {
        Self::with_id(Uuid::new_v4(), title, body, author_id)
    }

    /// Creates a question with a caller-provided stable ID.
    pub fn with_id(
        id: QuestionId,
        title: impl Into<String>,
        body: impl Into<String>,
        author_id: UserId,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            preview_text: None,
            author_id,
        }
    }

    /// Checks write-model invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let title_chars = self.title.chars().count();
        if title_chars > TITLE_MAX_CHARS {
            return Err(ValidationError::TitleTooLong {
                max_chars: TITLE_MAX_CHARS,
                actual_chars: title_chars,
            });
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        Ok(())
    }
}

/// Read model for question list/detail use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub title: String,
    pub body: String,
    pub preview_text: Option<String>,
    pub author_id: UserId,
    /// Tags normalized to lowercase, sorted by name.
    pub tags: Vec<String>,
    /// Aggregate score. May be negative.
    pub vote_count: i64,
    pub answer_count: i64,
    /// Unix epoch milliseconds, assigned at insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, touched on content/answer changes.
    pub updated_at: i64,
}
