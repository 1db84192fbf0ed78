//! Vote use-case service.
//!
//! # Responsibility
//! - Parse transport-level vote kind input before any mutation.
//! - Apply toggle transitions through the vote repository.
//!
//! # Invariants
//! - Invalid vote kinds are rejected before the repository is touched.
//! - The service never retries a conflicted application.

use crate::model::answer::AnswerId;
use crate::model::question::QuestionId;
use crate::model::user::UserId;
use crate::repo::vote_repo::{VoteReceipt, VoteRepository};
use crate::repo::RepoError;
use crate::vote::{InvalidVoteKind, VoteKind, VoteState, VoteTarget};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for vote use-cases.
#[derive(Debug)]
pub enum VoteServiceError {
    /// Requested vote kind is neither `up` nor `down`.
    InvalidVoteKind(InvalidVoteKind),
    /// The votable item does not exist in the backing store.
    ItemNotFound(VoteTarget),
    /// The serialized read-modify-write observed a conflicting update.
    /// Callers decide whether re-reading state and retrying is safe.
    Conflict(VoteTarget),
    /// Other persistence-layer failure.
    Repo(RepoError),
}

impl Display for VoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidVoteKind(err) => write!(f, "{err}"),
            Self::ItemNotFound(target) => write!(f, "votable item not found: {target}"),
            Self::Conflict(target) => write!(f, "concurrent vote detected on {target}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for VoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidVoteKind(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidVoteKind> for VoteServiceError {
    fn from(value: InvalidVoteKind) -> Self {
        Self::InvalidVoteKind(value)
    }
}

impl From<RepoError> for VoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::QuestionNotFound(id) => Self::ItemNotFound(VoteTarget::Question(id)),
            RepoError::AnswerNotFound(id) => Self::ItemNotFound(VoteTarget::Answer(id)),
            RepoError::ConcurrentModification(target) => Self::Conflict(target),
            other => Self::Repo(other),
        }
    }
}

/// Vote service facade over repository implementations.
pub struct VoteService<R: VoteRepository> {
    repo: R,
}

impl<R: VoteRepository> VoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Parses a transport-level vote kind and applies the toggle.
    ///
    /// Rejects anything but `up`/`down` before touching stored state.
    pub fn cast_vote(
        &mut self,
        target: VoteTarget,
        user_id: UserId,
        requested: &str,
    ) -> Result<VoteReceipt, VoteServiceError> {
        let kind: VoteKind = requested.parse()?;
        self.apply(target, user_id, kind)
    }

    /// Applies one typed toggle request.
    pub fn apply(
        &mut self,
        target: VoteTarget,
        user_id: UserId,
        kind: VoteKind,
    ) -> Result<VoteReceipt, VoteServiceError> {
        Ok(self.repo.apply_vote(target, user_id, kind)?)
    }

    /// Toggles the acting user's vote on one question.
    pub fn vote_question(
        &mut self,
        question_id: QuestionId,
        user_id: UserId,
        kind: VoteKind,
    ) -> Result<VoteReceipt, VoteServiceError> {
        self.apply(VoteTarget::Question(question_id), user_id, kind)
    }

    /// Toggles the acting user's vote on one answer.
    pub fn vote_answer(
        &mut self,
        answer_id: AnswerId,
        user_id: UserId,
        kind: VoteKind,
    ) -> Result<VoteReceipt, VoteServiceError> {
        self.apply(VoteTarget::Answer(answer_id), user_id, kind)
    }

    /// Returns the acting user's current vote on one item.
    pub fn current_vote(
        &self,
        target: VoteTarget,
        user_id: UserId,
    ) -> Result<VoteState, VoteServiceError> {
        Ok(self.repo.current_vote(target, user_id)?)
    }
}
