//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before persistence.
//! - Repository APIs return semantic errors (`...NotFound`,
//!   `ConcurrentModification`) in addition to DB transport errors.

use crate::db::DbError;
use crate::model::answer::AnswerId;
use crate::model::notification::NotificationId;
use crate::model::question::QuestionId;
use crate::model::ValidationError;
use crate::vote::VoteTarget;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod answer_repo;
pub mod notification_repo;
pub mod question_repo;
pub mod user_repo;
pub mod vote_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Shared error type for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Write model failed domain validation; nothing was persisted.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap failure.
    Db(DbError),
    QuestionNotFound(QuestionId),
    AnswerNotFound(AnswerId),
    NotificationNotFound(NotificationId),
    /// The guarded aggregate update observed a score that changed under it.
    /// The whole read-modify-write was rolled back; retry belongs to the
    /// caller.
    ConcurrentModification(VoteTarget),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::QuestionNotFound(id) => write!(f, "question not found: {id}"),
            Self::AnswerNotFound(id) => write!(f, "answer not found: {id}"),
            Self::NotificationNotFound(id) => write!(f, "notification not found: {id}"),
            Self::ConcurrentModification(target) => {
                write!(f, "concurrent modification detected on {target}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_optional_uuid(
    value: Option<String>,
    column: &'static str,
) -> RepoResult<Option<Uuid>> {
    value.map(|text| parse_uuid(&text, column)).transpose()
}
