//! Answer domain model.

use crate::model::question::QuestionId;
use crate::model::user::UserId;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an answer.
pub type AnswerId = Uuid;

/// Write model for an answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub body: String,
    pub author_id: UserId,
}

impl Answer {
    /// Creates a new answer with a generated stable ID.
    pub fn new(question_id: QuestionId, body: impl Into<String>, author_id: UserId) -> Self {
        Self::with_id(Uuid::new_v4(), question_id, body, author_id)
    }

    /// Creates an answer with a caller-provided stable ID.
    pub fn with_id(
        id: AnswerId,
        question_id: QuestionId,
        body: impl Into<String>,
        author_id: UserId,
    ) -> Self {
        Self {
            id,
            question_id,
            body: body.into(),
            author_id,
        }
    }

    /// Checks write-model invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.body.trim().is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        Ok(())
    }
}

/// Read model for answer listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub body: String,
    pub author_id: UserId,
    /// Aggregate score. May be negative.
    pub vote_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
