//! Answer use-case service.
//!
//! # Responsibility
//! - Provide post/get/list entry points for answers.
//! - Delegate persistence and counter maintenance to the repository.

use crate::model::answer::{Answer, AnswerId, AnswerRecord};
use crate::model::question::QuestionId;
use crate::model::user::UserId;
use crate::repo::answer_repo::AnswerRepository;
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for answer use-cases.
#[derive(Debug)]
pub enum AnswerServiceError {
    /// Parent question does not exist.
    QuestionNotFound(QuestionId),
    /// Target answer does not exist.
    AnswerNotFound(AnswerId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for AnswerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuestionNotFound(id) => write!(f, "question not found: {id}"),
            Self::AnswerNotFound(id) => write!(f, "answer not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent answer state: {details}"),
        }
    }
}

impl Error for AnswerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AnswerServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::QuestionNotFound(id) => Self::QuestionNotFound(id),
            RepoError::AnswerNotFound(id) => Self::AnswerNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Input for the post-answer use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAnswerRequest {
    pub question_id: QuestionId,
    pub body: String,
    pub author_id: UserId,
}

/// Answer service facade over repository implementations.
pub struct AnswerService<R: AnswerRepository> {
    repo: R,
}

impl<R: AnswerRepository> AnswerService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Posts one answer to an existing question.
    ///
    /// The repository bumps the parent question's `answer_count` in the
    /// same transaction.
    pub fn post_answer(
        &mut self,
        request: &PostAnswerRequest,
    ) -> Result<AnswerRecord, AnswerServiceError> {
        let answer = Answer::new(request.question_id, request.body.clone(), request.author_id);
        let id = self.repo.create_answer(&answer)?;
        self.repo
            .get_answer(id)?
            .ok_or(AnswerServiceError::InconsistentState(
                "created answer not found in read-back",
            ))
    }

    /// Gets one answer by stable ID.
    pub fn get_answer(&self, id: AnswerId) -> RepoResult<Option<AnswerRecord>> {
        self.repo.get_answer(id)
    }

    /// Lists a question's answers, highest score first.
    pub fn list_for_question(&self, question_id: QuestionId) -> RepoResult<Vec<AnswerRecord>> {
        self.repo.list_for_question(question_id)
    }
}
