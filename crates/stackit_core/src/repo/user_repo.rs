//! User persistence.

use crate::model::user::{User, UserId};
use crate::repo::{parse_uuid, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for user identity records.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (uuid, username, email) VALUES (?1, ?2, ?3);",
            params![
                user.id.to_string(),
                user.username.as_str(),
                user.email.as_str(),
            ],
        )?;
        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                "SELECT uuid, username, email FROM users WHERE uuid = ?1;",
                [id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>("uuid")?,
                        row.get::<_, String>("username")?,
                        row.get::<_, String>("email")?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((uuid_text, username, email)) => {
                let parsed = parse_uuid(&uuid_text, "users.uuid")?;
                Ok(Some(User::with_id(parsed, username, email)))
            }
            None => Ok(None),
        }
    }
}
