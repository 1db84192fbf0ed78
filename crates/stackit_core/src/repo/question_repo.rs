//! Question repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist questions together with their tag links in one transaction.
//! - Keep SQL details and list ordering inside the repository boundary.
//!
//! # Invariants
//! - Write paths call `Question::validate()` before SQL mutations.
//! - Question listing is deterministic: `created_at DESC, uuid ASC`.
//! - Tag names are normalized to lowercase before persistence.

use crate::model::question::{Question, QuestionId, QuestionRecord};
use crate::repo::{parse_uuid, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::collections::BTreeSet;

const QUESTION_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    body,
    preview_text,
    author_uuid,
    vote_count,
    answer_count,
    created_at,
    updated_at
FROM questions";

const QUESTIONS_DEFAULT_LIMIT: u32 = 20;
const QUESTIONS_LIMIT_MAX: u32 = 50;

/// Query options for question listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionListQuery {
    /// Optional single-tag exact match filter.
    pub tag: Option<String>,
    /// Maximum rows to return. Defaults to 20 and clamps to 50.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for question operations.
pub trait QuestionRepository {
    /// Creates one question with its full tag set in a single transaction.
    fn create_question(&mut self, question: &Question, tags: &[String]) -> RepoResult<QuestionId>;
    /// Gets one question by id.
    fn get_question(&self, id: QuestionId) -> RepoResult<Option<QuestionRecord>>;
    /// Lists questions newest-first using single-tag filter + pagination.
    fn list_questions(&self, query: &QuestionListQuery) -> RepoResult<Vec<QuestionRecord>>;
}

/// SQLite-backed question repository.
pub struct SqliteQuestionRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteQuestionRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl QuestionRepository for SqliteQuestionRepository<'_> {
    fn create_question(&mut self, question: &Question, tags: &[String]) -> RepoResult<QuestionId> {
        question.validate()?;

        let question_uuid = question.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO questions (uuid, title, body, preview_text, author_uuid)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                question_uuid.as_str(),
                question.title.as_str(),
                question.body.as_str(),
                question.preview_text.as_deref(),
                question.author_id.to_string(),
            ],
        )?;

        for tag in tags {
            tx.execute(
                "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
                [tag.as_str()],
            )?;
            tx.execute(
                "INSERT INTO question_tags (question_uuid, tag_id)
                 SELECT ?1, id
                 FROM tags
                 WHERE name = ?2 COLLATE NOCASE;",
                params![question_uuid.as_str(), tag.as_str()],
            )?;
        }

        tx.commit()?;
        Ok(question.id)
    }

    fn get_question(&self, id: QuestionId) -> RepoResult<Option<QuestionRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUESTION_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_question_row(row, self.conn)?));
        }

        Ok(None)
    }

    fn list_questions(&self, query: &QuestionListQuery) -> RepoResult<Vec<QuestionRecord>> {
        let mut sql = format!("{QUESTION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(tag) = query.tag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM question_tags qt
                    INNER JOIN tags t ON t.id = qt.tag_id
                    WHERE qt.question_uuid = questions.uuid
                      AND t.name = ? COLLATE NOCASE
                )",
            );
            bind_values.push(Value::Text(tag.clone()));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC");
        let limit = normalize_question_limit(query.limit);
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut questions = Vec::new();
        while let Some(row) = rows.next()? {
            questions.push(parse_question_row(row, self.conn)?);
        }

        Ok(questions)
    }
}

/// Normalizes list limit according to the questions contract.
pub fn normalize_question_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => QUESTIONS_DEFAULT_LIMIT,
        Some(value) if value > QUESTIONS_LIMIT_MAX => QUESTIONS_LIMIT_MAX,
        Some(value) => value,
    }
}

/// Normalizes one tag value: trimmed and lowercased; blank input yields None.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values into sorted order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

fn parse_question_row(row: &Row<'_>, conn: &Connection) -> RepoResult<QuestionRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "questions.uuid")?;
    let author_text: String = row.get("author_uuid")?;
    let author_id = parse_uuid(&author_text, "questions.author_uuid")?;
    let tags = load_tags_for_question(conn, &uuid_text)?;

    Ok(QuestionRecord {
        id,
        title: row.get("title")?,
        body: row.get("body")?,
        preview_text: row.get("preview_text")?,
        author_id,
        tags,
        vote_count: row.get("vote_count")?,
        answer_count: row.get("answer_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_tags_for_question(conn: &Connection, question_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM question_tags qt
         INNER JOIN tags t ON t.id = qt.tag_id
         WHERE qt.question_uuid = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([question_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::{normalize_question_limit, normalize_tags};

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_question_limit(None), 20);
        assert_eq!(normalize_question_limit(Some(0)), 20);
        assert_eq!(normalize_question_limit(Some(7)), 7);
        assert_eq!(normalize_question_limit(Some(500)), 50);
    }

    #[test]
    fn tags_normalize_lowercase_and_dedupe() {
        let tags = vec![
            "Rust".to_string(),
            "  rust ".to_string(),
            "SQLite".to_string(),
            "".to_string(),
        ];
        assert_eq!(
            normalize_tags(&tags),
            vec!["rust".to_string(), "sqlite".to_string()]
        );
    }
}
