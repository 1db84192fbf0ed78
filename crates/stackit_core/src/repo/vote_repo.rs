//! Vote persistence: per-user vote rows plus guarded score aggregation.
//!
//! # Responsibility
//! - Load the acting user's previous vote state for one votable item.
//! - Apply `toggle_vote` transitions atomically against the item score.
//!
//! # Invariants
//! - Vote state is keyed by `(item kind, item id, user id)`; a missing row
//!   is the `none` state.
//! - The aggregate update is guarded on the score observed inside the same
//!   transaction; a guard miss surfaces `ConcurrentModification` and
//!   commits nothing.
//! - The repository never retries; retry policy belongs to the caller.

use crate::model::user::UserId;
use crate::repo::{RepoError, RepoResult};
use crate::vote::{toggle_vote, VoteKind, VoteState, VoteTarget};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

/// Updated item state returned by a vote application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteReceipt {
    pub target: VoteTarget,
    /// Aggregate score after the toggle. May be negative.
    pub score: i64,
    /// The acting user's vote state after the toggle.
    pub vote: VoteState,
}

/// Repository interface for vote state and score aggregation.
pub trait VoteRepository {
    /// Returns the acting user's current vote on one item.
    fn current_vote(&self, target: VoteTarget, user_id: UserId) -> RepoResult<VoteState>;
    /// Applies one toggle request and returns the updated item state.
    fn apply_vote(
        &mut self,
        target: VoteTarget,
        user_id: UserId,
        requested: VoteKind,
    ) -> RepoResult<VoteReceipt>;
}

/// SQLite-backed vote repository.
pub struct SqliteVoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteVoteRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl VoteRepository for SqliteVoteRepository<'_> {
    fn current_vote(&self, target: VoteTarget, user_id: UserId) -> RepoResult<VoteState> {
        load_vote_state(self.conn, target, user_id)
    }

    fn apply_vote(
        &mut self,
        target: VoteTarget,
        user_id: UserId,
        requested: VoteKind,
    ) -> RepoResult<VoteReceipt> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let score = load_item_score(&tx, target)?;
        let previous = load_vote_state(&tx, target, user_id)?;
        let transition = toggle_vote(previous, requested);

        store_vote_state(&tx, target, user_id, transition.next)?;

        // Guard on the score observed in this transaction so a stale read
        // can never be folded into the aggregate.
        let changed = tx.execute(
            &format!(
                "UPDATE {} SET vote_count = ?1 WHERE uuid = ?2 AND vote_count = ?3;",
                score_table(target)
            ),
            params![score + transition.delta, target.id().to_string(), score],
        )?;
        if changed == 0 {
            return Err(RepoError::ConcurrentModification(target));
        }

        tx.commit()?;
        Ok(VoteReceipt {
            target,
            score: score + transition.delta,
            vote: transition.next,
        })
    }
}

fn score_table(target: VoteTarget) -> &'static str {
    match target {
        VoteTarget::Question(_) => "questions",
        VoteTarget::Answer(_) => "answers",
    }
}

fn item_kind_to_db(target: VoteTarget) -> &'static str {
    match target {
        VoteTarget::Question(_) => "question",
        VoteTarget::Answer(_) => "answer",
    }
}

fn vote_kind_to_db(kind: VoteKind) -> &'static str {
    match kind {
        VoteKind::Up => "up",
        VoteKind::Down => "down",
    }
}

fn parse_vote_kind(value: &str) -> Option<VoteKind> {
    match value {
        "up" => Some(VoteKind::Up),
        "down" => Some(VoteKind::Down),
        _ => None,
    }
}

fn load_item_score(conn: &Connection, target: VoteTarget) -> RepoResult<i64> {
    let score = conn
        .query_row(
            &format!(
                "SELECT vote_count FROM {} WHERE uuid = ?1;",
                score_table(target)
            ),
            [target.id().to_string()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    score.ok_or_else(|| match target {
        VoteTarget::Question(id) => RepoError::QuestionNotFound(id),
        VoteTarget::Answer(id) => RepoError::AnswerNotFound(id),
    })
}

fn load_vote_state(conn: &Connection, target: VoteTarget, user_id: UserId) -> RepoResult<VoteState> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT kind
             FROM votes
             WHERE item_kind = ?1 AND item_uuid = ?2 AND user_uuid = ?3;",
            params![
                item_kind_to_db(target),
                target.id().to_string(),
                user_id.to_string(),
            ],
            |row| row.get(0),
        )
        .optional()?;

    match stored {
        None => Ok(VoteState::None),
        Some(value) => parse_vote_kind(&value)
            .map(VoteState::from)
            .ok_or_else(|| {
                RepoError::InvalidData(format!("invalid vote kind `{value}` in votes.kind"))
            }),
    }
}

fn store_vote_state(
    conn: &Connection,
    target: VoteTarget,
    user_id: UserId,
    next: VoteState,
) -> RepoResult<()> {
    match next {
        VoteState::None => {
            conn.execute(
                "DELETE FROM votes
                 WHERE item_kind = ?1 AND item_uuid = ?2 AND user_uuid = ?3;",
                params![
                    item_kind_to_db(target),
                    target.id().to_string(),
                    user_id.to_string(),
                ],
            )?;
        }
        VoteState::Up => {
            upsert_vote_row(conn, target, user_id, VoteKind::Up)?;
        }
        VoteState::Down => {
            upsert_vote_row(conn, target, user_id, VoteKind::Down)?;
        }
    }
    Ok(())
}

fn upsert_vote_row(
    conn: &Connection,
    target: VoteTarget,
    user_id: UserId,
    kind: VoteKind,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO votes (item_kind, item_uuid, user_uuid, kind)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (item_kind, item_uuid, user_uuid)
         DO UPDATE SET kind = excluded.kind;",
        params![
            item_kind_to_db(target),
            target.id().to_string(),
            user_id.to_string(),
            vote_kind_to_db(kind),
        ],
    )?;
    Ok(())
}
