//! Notification domain model.
//!
//! # Responsibility
//! - Define the notification write/read models and trigger kinds.
//! - Provide constructors for the message shapes the product uses.
//!
//! # Invariants
//! - Notifications are constructed by event producers; this core stores
//!   and serves them but never decides when to create one.
//! - `created_at` is assigned at insert and immutable afterwards.

use crate::model::answer::AnswerId;
use crate::model::question::{QuestionId, QuestionRecord};
use crate::model::user::UserId;
use crate::vote::VoteTarget;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a notification.
pub type NotificationId = Uuid;

/// Triggering action behind a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone answered the recipient's question.
    NewAnswer,
    /// The recipient's question or answer received an upvote.
    VoteReceived,
    /// The recipient's question gained an accepted/answered status change.
    QuestionAnswered,
}

/// Write model for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    /// Human-readable summary shown in the notification feed.
    pub message: String,
    pub question_id: Option<QuestionId>,
    pub answer_id: Option<AnswerId>,
    /// User whose action produced this notification, when known.
    pub triggered_by: Option<UserId>,
    pub recipient_id: UserId,
}

impl Notification {
    /// Creates a bare notification with a generated stable ID.
    pub fn new(kind: NotificationKind, message: impl Into<String>, recipient_id: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            question_id: None,
            answer_id: None,
            triggered_by: None,
            recipient_id,
        }
    }

    /// Builds the "new answer" notification for a question's author.
    pub fn new_answer(
        question: &QuestionRecord,
        answer_id: AnswerId,
        triggered_by: UserId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: NotificationKind::NewAnswer,
            message: format!(
                "Your question \"{}\" received a new answer",
                question.title
            ),
            question_id: Some(question.id),
            answer_id: Some(answer_id),
            triggered_by: Some(triggered_by),
            recipient_id: question.author_id,
        }
    }

    /// Builds the "vote received" notification for an item's author.
    ///
    /// Only upvotes notify; callers skip construction for downvotes.
    pub fn vote_received(target: VoteTarget, triggered_by: UserId, recipient_id: UserId) -> Self {
        let (noun, question_id, answer_id) = match target {
            VoteTarget::Question(id) => ("question", Some(id), None),
            VoteTarget::Answer(id) => ("answer", None, Some(id)),
        };
        Self {
            id: Uuid::new_v4(),
            kind: NotificationKind::VoteReceived,
            message: format!("Your {noun} received an upvote"),
            question_id,
            answer_id,
            triggered_by: Some(triggered_by),
            recipient_id,
        }
    }
}

/// Read model including ledger state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    /// Monotonic insertion sequence; tie-breaker for listing order.
    pub seq: i64,
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub question_id: Option<QuestionId>,
    pub answer_id: Option<AnswerId>,
    pub triggered_by: Option<UserId>,
    pub recipient_id: UserId,
    pub read: bool,
    pub created_at: i64,
}
