//! Notification ledger persistence.
//!
//! # Responsibility
//! - Store constructed notifications and own read/unread transitions.
//! - Serve deterministic per-recipient listings and unread counts.
//!
//! # Invariants
//! - `created_at` is assigned at insert and never updated.
//! - Listing order is total: `created_at DESC, seq DESC`.
//! - Marking a read notification read again changes nothing and is not an
//!   error; marking a missing id fails with `NotificationNotFound`.

use crate::model::notification::{
    Notification, NotificationId, NotificationKind, NotificationRecord,
};
use crate::model::user::UserId;
use crate::repo::{parse_optional_uuid, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const NOTIFICATION_SELECT_SQL: &str = "SELECT
    seq,
    uuid,
    kind,
    message,
    question_uuid,
    answer_uuid,
    triggered_by_uuid,
    recipient_uuid,
    is_read,
    created_at
FROM notifications";

/// Repository interface for the notification ledger.
pub trait NotificationRepository {
    /// Stores one constructed notification; returns its insertion sequence.
    fn record_notification(&self, notification: &Notification) -> RepoResult<i64>;
    /// Gets one notification by id.
    fn get_notification(&self, id: NotificationId) -> RepoResult<Option<NotificationRecord>>;
    /// Marks one notification read. No-op when already read.
    fn mark_read(&self, id: NotificationId) -> RepoResult<()>;
    /// Marks every unread notification of one recipient read; returns how
    /// many rows changed.
    fn mark_all_read(&self, recipient_id: UserId) -> RepoResult<u64>;
    /// Counts one recipient's unread notifications.
    fn unread_count(&self, recipient_id: UserId) -> RepoResult<u64>;
    /// Lists one recipient's notifications, most recent first.
    fn list_for_recipient(&self, recipient_id: UserId) -> RepoResult<Vec<NotificationRecord>>;
}

/// SQLite-backed notification repository.
pub struct SqliteNotificationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotificationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NotificationRepository for SqliteNotificationRepository<'_> {
    fn record_notification(&self, notification: &Notification) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO notifications (
                uuid,
                kind,
                message,
                question_uuid,
                answer_uuid,
                triggered_by_uuid,
                recipient_uuid
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                notification.id.to_string(),
                notification_kind_to_db(notification.kind),
                notification.message.as_str(),
                notification.question_id.map(|id| id.to_string()),
                notification.answer_id.map(|id| id.to_string()),
                notification.triggered_by.map(|id| id.to_string()),
                notification.recipient_id.to_string(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_notification(&self, id: NotificationId) -> RepoResult<Option<NotificationRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTIFICATION_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_notification_row(row)?));
        }

        Ok(None)
    }

    fn mark_read(&self, id: NotificationId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotificationNotFound(id));
        }

        Ok(())
    }

    fn mark_all_read(&self, recipient_id: UserId) -> RepoResult<u64> {
        let changed = self.conn.execute(
            "UPDATE notifications
             SET is_read = 1
             WHERE recipient_uuid = ?1 AND is_read = 0;",
            [recipient_id.to_string()],
        )?;

        Ok(changed as u64)
    }

    fn unread_count(&self, recipient_id: UserId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM notifications
             WHERE recipient_uuid = ?1 AND is_read = 0;",
            [recipient_id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    fn list_for_recipient(&self, recipient_id: UserId) -> RepoResult<Vec<NotificationRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTIFICATION_SELECT_SQL}
             WHERE recipient_uuid = ?1
             ORDER BY created_at DESC, seq DESC;"
        ))?;

        let mut rows = stmt.query([recipient_id.to_string()])?;
        let mut notifications = Vec::new();
        while let Some(row) = rows.next()? {
            notifications.push(parse_notification_row(row)?);
        }

        Ok(notifications)
    }
}

fn notification_kind_to_db(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::NewAnswer => "new_answer",
        NotificationKind::VoteReceived => "vote_received",
        NotificationKind::QuestionAnswered => "question_answered",
    }
}

fn parse_notification_kind(value: &str) -> Option<NotificationKind> {
    match value {
        "new_answer" => Some(NotificationKind::NewAnswer),
        "vote_received" => Some(NotificationKind::VoteReceived),
        "question_answered" => Some(NotificationKind::QuestionAnswered),
        _ => None,
    }
}

fn parse_notification_row(row: &Row<'_>) -> RepoResult<NotificationRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "notifications.uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = parse_notification_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid notification kind `{kind_text}` in notifications.kind"
        ))
    })?;

    let recipient_text: String = row.get("recipient_uuid")?;
    let recipient_id = parse_uuid(&recipient_text, "notifications.recipient_uuid")?;

    let read = match row.get::<_, i64>("is_read")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_read value `{other}` in notifications.is_read"
            )));
        }
    };

    Ok(NotificationRecord {
        seq: row.get("seq")?,
        id,
        kind,
        message: row.get("message")?,
        question_id: parse_optional_uuid(
            row.get("question_uuid")?,
            "notifications.question_uuid",
        )?,
        answer_id: parse_optional_uuid(row.get("answer_uuid")?, "notifications.answer_uuid")?,
        triggered_by: parse_optional_uuid(
            row.get("triggered_by_uuid")?,
            "notifications.triggered_by_uuid",
        )?,
        recipient_id,
        read,
        created_at: row.get("created_at")?,
    })
}
