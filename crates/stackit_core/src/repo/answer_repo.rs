//! Answer repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist answers and keep the parent question's answer count in step.
//!
//! # Invariants
//! - `create_answer` inserts the row and bumps `answer_count` in one
//!   immediate transaction, or does neither.
//! - Answer listing is deterministic: `vote_count DESC, created_at ASC,
//!   uuid ASC`.

use crate::model::answer::{Answer, AnswerId, AnswerRecord};
use crate::model::question::QuestionId;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, TransactionBehavior};

const ANSWER_SELECT_SQL: &str = "SELECT
    uuid,
    question_uuid,
    body,
    author_uuid,
    vote_count,
    created_at,
    updated_at
FROM answers";

/// Repository interface for answer operations.
pub trait AnswerRepository {
    /// Creates one answer and bumps the parent question's counters.
    fn create_answer(&mut self, answer: &Answer) -> RepoResult<AnswerId>;
    /// Gets one answer by id.
    fn get_answer(&self, id: AnswerId) -> RepoResult<Option<AnswerRecord>>;
    /// Lists a question's answers, highest score first.
    fn list_for_question(&self, question_id: QuestionId) -> RepoResult<Vec<AnswerRecord>>;
}

/// SQLite-backed answer repository.
pub struct SqliteAnswerRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteAnswerRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl AnswerRepository for SqliteAnswerRepository<'_> {
    fn create_answer(&mut self, answer: &Answer) -> RepoResult<AnswerId> {
        answer.validate()?;

        let question_uuid = answer.question_id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let bumped = tx.execute(
            "UPDATE questions
             SET
                answer_count = answer_count + 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [question_uuid.as_str()],
        )?;
        if bumped == 0 {
            return Err(RepoError::QuestionNotFound(answer.question_id));
        }

        tx.execute(
            "INSERT INTO answers (uuid, question_uuid, body, author_uuid)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                answer.id.to_string(),
                question_uuid.as_str(),
                answer.body.as_str(),
                answer.author_id.to_string(),
            ],
        )?;

        tx.commit()?;
        Ok(answer.id)
    }

    fn get_answer(&self, id: AnswerId) -> RepoResult<Option<AnswerRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ANSWER_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_answer_row(row)?));
        }

        Ok(None)
    }

    fn list_for_question(&self, question_id: QuestionId) -> RepoResult<Vec<AnswerRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ANSWER_SELECT_SQL}
             WHERE question_uuid = ?1
             ORDER BY vote_count DESC, created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([question_id.to_string()])?;
        let mut answers = Vec::new();
        while let Some(row) = rows.next()? {
            answers.push(parse_answer_row(row)?);
        }

        Ok(answers)
    }
}

fn parse_answer_row(row: &Row<'_>) -> RepoResult<AnswerRecord> {
    let uuid_text: String = row.get("uuid")?;
    let question_text: String = row.get("question_uuid")?;
    let author_text: String = row.get("author_uuid")?;

    Ok(AnswerRecord {
        id: parse_uuid(&uuid_text, "answers.uuid")?,
        question_id: parse_uuid(&question_text, "answers.question_uuid")?,
        body: row.get("body")?,
        author_id: parse_uuid(&author_text, "answers.author_uuid")?,
        vote_count: row.get("vote_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
