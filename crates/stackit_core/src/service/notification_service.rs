//! Notification use-case service.
//!
//! # Responsibility
//! - Store constructed notifications and serve the per-recipient feed.
//! - Own read/unread transitions exposed to transport layers.
//!
//! # Invariants
//! - The service stores what event producers constructed; it never decides
//!   when a notification should exist.

use crate::model::notification::{Notification, NotificationId, NotificationRecord};
use crate::model::user::UserId;
use crate::repo::notification_repo::NotificationRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for notification use-cases.
#[derive(Debug)]
pub enum NotificationServiceError {
    /// Target notification does not exist.
    NotificationNotFound(NotificationId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NotificationServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotificationNotFound(id) => write!(f, "notification not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotificationServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NotificationServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotificationNotFound(id) => Self::NotificationNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Notification service facade over repository implementations.
pub struct NotificationService<R: NotificationRepository> {
    repo: R,
}

impl<R: NotificationRepository> NotificationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores one constructed notification; returns its insertion sequence.
    pub fn record(&self, notification: &Notification) -> Result<i64, NotificationServiceError> {
        Ok(self.repo.record_notification(notification)?)
    }

    /// Marks one notification read. No-op when already read.
    pub fn mark_read(&self, id: NotificationId) -> Result<(), NotificationServiceError> {
        Ok(self.repo.mark_read(id)?)
    }

    /// Marks every unread notification of one recipient read.
    ///
    /// Idempotent; returns how many rows changed.
    pub fn mark_all_read(&self, recipient_id: UserId) -> Result<u64, NotificationServiceError> {
        Ok(self.repo.mark_all_read(recipient_id)?)
    }

    /// Counts one recipient's unread notifications.
    pub fn unread_count(&self, recipient_id: UserId) -> Result<u64, NotificationServiceError> {
        Ok(self.repo.unread_count(recipient_id)?)
    }

    /// Lists one recipient's notifications, most recent first.
    ///
    /// Unknown recipients yield an empty list, not an error.
    pub fn list_for_recipient(
        &self,
        recipient_id: UserId,
    ) -> Result<Vec<NotificationRecord>, NotificationServiceError> {
        Ok(self.repo.list_for_recipient(recipient_id)?)
    }
}
