//! Vote toggle state machine.
//!
//! # Responsibility
//! - Own the pure transition from (previous per-user state, requested
//!   kind) to (next state, score delta).
//! - Define the votable-item identity shared by persistence and services.
//!
//! # Invariants
//! - Repeating the same request removes the vote (toggle-to-none); it
//!   never double-counts.
//! - The score delta always equals the signed difference between the
//!   contributions of the next and previous states, so an item's score
//!   stays the sum of all active vote contributions.

use crate::model::answer::AnswerId;
use crate::model::question::QuestionId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// A vote request: the direction the user clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Up,
    Down,
}

/// One user's active vote state on one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteState {
    /// No active vote by this user.
    #[default]
    None,
    Up,
    Down,
}

impl VoteState {
    /// Signed score contribution of this state.
    pub fn contribution(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

impl From<VoteKind> for VoteState {
    fn from(value: VoteKind) -> Self {
        match value {
            VoteKind::Up => Self::Up,
            VoteKind::Down => Self::Down,
        }
    }
}

/// Rejected vote kind input (anything but `up`/`down`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVoteKind(pub String);

impl Display for InvalidVoteKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid vote kind `{}`; expected up|down", self.0)
    }
}

impl Error for InvalidVoteKind {}

impl FromStr for VoteKind {
    type Err = InvalidVoteKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(InvalidVoteKind(value.to_string())),
        }
    }
}

/// Identity of a votable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTarget {
    Question(QuestionId),
    Answer(AnswerId),
}

impl VoteTarget {
    /// Stable id of the underlying item.
    pub fn id(self) -> Uuid {
        match self {
            Self::Question(id) | Self::Answer(id) => id,
        }
    }
}

impl Display for VoteTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Question(id) => write!(f, "question {id}"),
            Self::Answer(id) => write!(f, "answer {id}"),
        }
    }
}

/// Result of one toggle application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    /// The user's vote state after the toggle.
    pub next: VoteState,
    /// Signed adjustment to apply to the item's aggregate score.
    pub delta: i64,
}

/// Applies one toggle request against the previous per-user state.
///
/// Transition table:
///
/// | previous | requested | next | delta |
/// |----------|-----------|------|-------|
/// | none     | up        | up   | +1    |
/// | none     | down      | down | -1    |
/// | up       | up        | none | -1    |
/// | down     | down      | none | +1    |
/// | up       | down      | down | -2    |
/// | down     | up        | up   | +2    |
pub fn toggle_vote(previous: VoteState, requested: VoteKind) -> VoteTransition {
    let next = if previous == VoteState::from(requested) {
        VoteState::None
    } else {
        VoteState::from(requested)
    };
    VoteTransition {
        next,
        delta: next.contribution() - previous.contribution(),
    }
}

#[cfg(test)]
mod tests {
    use super::{toggle_vote, InvalidVoteKind, VoteKind, VoteState, VoteTransition};

    #[test]
    fn transition_table_is_exact() {
        let table = [
            (VoteState::None, VoteKind::Up, VoteState::Up, 1),
            (VoteState::None, VoteKind::Down, VoteState::Down, -1),
            (VoteState::Up, VoteKind::Up, VoteState::None, -1),
            (VoteState::Down, VoteKind::Down, VoteState::None, 1),
            (VoteState::Up, VoteKind::Down, VoteState::Down, -2),
            (VoteState::Down, VoteKind::Up, VoteState::Up, 2),
        ];

        for (previous, requested, next, delta) in table {
            assert_eq!(
                toggle_vote(previous, requested),
                VoteTransition { next, delta },
                "row ({previous:?}, {requested:?})"
            );
        }
    }

    #[test]
    fn double_toggle_returns_to_start_for_any_score() {
        for kind in [VoteKind::Up, VoteKind::Down] {
            for start_score in [-3_i64, 0, 5, 1000] {
                let first = toggle_vote(VoteState::None, kind);
                let second = toggle_vote(first.next, kind);
                assert_eq!(second.next, VoteState::None);
                assert_eq!(start_score + first.delta + second.delta, start_score);
            }
        }
    }

    #[test]
    fn alternating_toggle_is_not_a_no_op() {
        let up = toggle_vote(VoteState::None, VoteKind::Up);
        let flipped = toggle_vote(up.next, VoteKind::Down);
        assert_eq!(flipped.next, VoteState::Down);
        assert_eq!(flipped.delta, -2);
    }

    #[test]
    fn parse_accepts_canonical_and_padded_input() {
        assert_eq!("up".parse::<VoteKind>().unwrap(), VoteKind::Up);
        assert_eq!(" DOWN ".parse::<VoteKind>().unwrap(), VoteKind::Down);
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        let err = "sideways".parse::<VoteKind>().unwrap_err();
        assert_eq!(err, InvalidVoteKind("sideways".to_string()));
    }

    #[test]
    fn vote_enums_serialize_as_snake_case() {
        assert_eq!(serde_json::to_string(&VoteKind::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&VoteState::Down).unwrap(), "\"down\"");
        assert_eq!(serde_json::to_string(&VoteState::None).unwrap(), "\"none\"");
    }
}
