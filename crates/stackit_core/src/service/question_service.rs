//! Question use-case service.
//!
//! # Responsibility
//! - Validate and normalize ask-question input before persistence.
//! - Derive plain-text previews for list rendering.
//!
//! # Invariants
//! - Tags are normalized to lowercase and deduplicated before storage.
//! - Question list is always sorted by `created_at DESC, uuid ASC`.

use crate::model::question::{Question, QuestionId, QuestionRecord};
use crate::model::user::UserId;
use crate::repo::question_repo::{
    normalize_question_limit, normalize_tag, normalize_tags, QuestionListQuery,
    QuestionRepository,
};
use crate::repo::{RepoError, RepoResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PREVIEW_MAX_CHARS: usize = 140;

static HTML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid html tag regex"));
static MARKUP_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\*_`#>~]+").expect("valid markup symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for question use-cases.
#[derive(Debug)]
pub enum QuestionServiceError {
    /// Tag input contains blank values.
    InvalidTag(String),
    /// Target question does not exist.
    QuestionNotFound(QuestionId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for QuestionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::QuestionNotFound(id) => write!(f, "question not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent question state: {details}")
            }
        }
    }
}

impl Error for QuestionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for QuestionServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::QuestionNotFound(id) => Self::QuestionNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Input for the ask-question use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskQuestionRequest {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub author_id: UserId,
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionListResult {
    /// List items sorted by `created_at DESC, uuid ASC`.
    pub items: Vec<QuestionRecord>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Question service facade over repository implementations.
pub struct QuestionService<R: QuestionRepository> {
    repo: R,
}

impl<R: QuestionRepository> QuestionService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one question with normalized tags and a derived preview.
    pub fn ask_question(
        &mut self,
        request: &AskQuestionRequest,
    ) -> Result<QuestionRecord, QuestionServiceError> {
        for tag in &request.tags {
            if tag.trim().is_empty() {
                return Err(QuestionServiceError::InvalidTag(tag.clone()));
            }
        }
        let tags = normalize_tags(&request.tags);

        let mut question = Question::new(
            request.title.clone(),
            request.body.clone(),
            request.author_id,
        );
        question.preview_text = derive_plain_preview(request.body.as_str());

        let id = self.repo.create_question(&question, &tags)?;
        self.repo
            .get_question(id)?
            .ok_or(QuestionServiceError::InconsistentState(
                "created question not found in read-back",
            ))
    }

    /// Gets one question by stable ID.
    pub fn get_question(&self, id: QuestionId) -> RepoResult<Option<QuestionRecord>> {
        self.repo.get_question(id)
    }

    /// Lists questions using optional single-tag filter and pagination.
    pub fn list_questions(
        &self,
        tag: Option<String>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<QuestionListResult, QuestionServiceError> {
        let normalized_tag = tag.and_then(|value| normalize_tag(value.as_str()));
        let applied_limit = normalize_question_limit(limit);
        let query = QuestionListQuery {
            tag: normalized_tag,
            limit: Some(applied_limit),
            offset,
        };
        let items = self.repo.list_questions(&query)?;
        Ok(QuestionListResult {
            items,
            applied_limit,
        })
    }
}

/// Derives a plain-text preview from a question body.
///
/// Rules:
/// - HTML tags and markdown symbols removed, whitespace collapsed.
/// - First 140 chars retained; empty result collapses to `None`.
pub fn derive_plain_preview(body: &str) -> Option<String> {
    let without_tags = HTML_TAG_RE.replace_all(body, " ");
    let without_symbols = MARKUP_SYMBOL_RE.replace_all(&without_tags, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}
