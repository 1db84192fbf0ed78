//! Core domain logic for StackIt.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod vote;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::answer::{Answer, AnswerId, AnswerRecord};
pub use model::notification::{Notification, NotificationId, NotificationKind, NotificationRecord};
pub use model::question::{Question, QuestionId, QuestionRecord};
pub use model::user::{User, UserId};
pub use model::ValidationError;
pub use repo::answer_repo::{AnswerRepository, SqliteAnswerRepository};
pub use repo::notification_repo::{NotificationRepository, SqliteNotificationRepository};
pub use repo::question_repo::{QuestionListQuery, QuestionRepository, SqliteQuestionRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::vote_repo::{SqliteVoteRepository, VoteReceipt, VoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::answer_service::{AnswerService, AnswerServiceError, PostAnswerRequest};
pub use service::notification_service::{NotificationService, NotificationServiceError};
pub use service::question_service::{
    AskQuestionRequest, QuestionListResult, QuestionService, QuestionServiceError,
};
pub use service::vote_service::{VoteService, VoteServiceError};
pub use vote::{toggle_vote, InvalidVoteKind, VoteKind, VoteState, VoteTarget, VoteTransition};

/// Minimal health-check API for transport shells.
pub fn ping() -> &'static str {
    "ok"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_reports_ok() {
        assert_eq!(ping(), "ok");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
