//! # Core Type Definitions
//!
//! This module contains all core types for the team-formation engine:
//! - Identifiers (`ParticipantId`, `GoalId`, `CycleId`, `ChapterId`)
//! - Inputs (`Participant`, `Score`, `Goal`, `Vote`)
//! - Outputs (`TeamSize`, `FormedTeam`)
//! - Error types (`FormationError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where they are used as `BTreeMap`/`BTreeSet` keys
//! - Carry no interior mutability

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier of a participant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

/// Unique identifier of a goal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub String);

/// Identifier of the cycle a formation run belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(pub String);

/// Identifier of the chapter whose participants are eligible.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(pub String);

macro_rules! string_id {
    ($($name:ident),*) => {$(
        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    )*};
}

string_id!(ParticipantId, GoalId, CycleId, ChapterId);

// =============================================================================
// SCORE
// =============================================================================

/// Competency score of a participant.
///
/// Always non-negative. Input that cannot be read as a number becomes 0:
/// - integers are taken as-is, negatives clamp to 0
/// - floats truncate toward zero
/// - strings are read by their leading decimal digits (`"120xp"` is 120)
/// - `null`, missing or any other shape is 0
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize,
)]
#[serde(transparent)]
pub struct Score(pub u64);

impl Score {
    /// Create a score from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw score value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Read a score from free text, the way spreadsheet exports tend to carry it.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        let text = text.trim_start();
        let digits = match text.strip_prefix('+') {
            Some(rest) => rest,
            None if text.starts_with('-') => return Self(0),
            None => text,
        };

        let value = digits
            .bytes()
            .take_while(u8::is_ascii_digit)
            .fold(0u64, |acc, b| {
                acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
            });
        Self(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawScore>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawScore::Unsigned(v)) => Self(v),
            Some(RawScore::Signed(v)) => Self(u64::try_from(v).unwrap_or(0)),
            // `as` saturates: negatives and NaN become 0
            Some(RawScore::Float(v)) => Self(v as u64),
            Some(RawScore::Text(s)) => Self::parse_lenient(&s),
            Some(RawScore::Other(_)) | None => Self(0),
        })
    }
}

// =============================================================================
// PARTICIPANT
// =============================================================================

/// A participant eligible for team assignment in one formation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique participant identifier.
    pub id: ParticipantId,
    /// Competency score; absent or unreadable scores count as 0.
    #[serde(default, alias = "ecc")]
    pub score: Score,
}

impl Participant {
    /// Create a new participant.
    #[must_use]
    pub fn new(id: impl Into<String>, score: u64) -> Self {
        Self {
            id: ParticipantId::new(id),
            score: Score::new(score),
        }
    }
}

// =============================================================================
// GOAL & VOTE
// =============================================================================

/// A goal participants can vote for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique goal identifier. Goals with an empty identifier are ignored.
    #[serde(alias = "url")]
    pub id: GoalId,
    /// Recommended team size; the configured default applies when absent or zero.
    #[serde(default, alias = "teamSize", skip_serializing_if = "Option::is_none")]
    pub team_size: Option<usize>,
}

impl Goal {
    /// Create a goal without a recommended team size.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: GoalId::new(id),
            team_size: None,
        }
    }

    /// Create a goal with a recommended team size.
    #[must_use]
    pub fn with_team_size(id: impl Into<String>, team_size: usize) -> Self {
        Self {
            id: GoalId::new(id),
            team_size: Some(team_size),
        }
    }

    /// The recommended team size, or `default` when the goal carries none.
    ///
    /// A size of zero counts as unset.
    #[must_use]
    pub fn recommended_size(&self, default: usize) -> usize {
        self.team_size.filter(|&size| size > 0).unwrap_or(default)
    }
}

/// A participant's ranked goal preferences, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// The voting participant.
    #[serde(alias = "playerId")]
    pub participant: ParticipantId,
    /// Ranked goals. May be empty.
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Vote {
    /// Create a vote.
    #[must_use]
    pub fn new(participant: impl Into<String>, goals: Vec<Goal>) -> Self {
        Self {
            participant: ParticipantId::new(participant),
            goals,
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Composition of one team: how many regular and advanced seats it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamSize {
    /// Regular seats.
    pub regular: usize,
    /// Advanced seats.
    pub advanced: usize,
}

impl TeamSize {
    /// Create a new team size.
    #[must_use]
    pub const fn new(regular: usize, advanced: usize) -> Self {
        Self { regular, advanced }
    }

    /// Total seats on the team.
    #[must_use]
    pub const fn total(self) -> usize {
        self.regular + self.advanced
    }
}

/// A team produced by a formation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormedTeam {
    /// The goal this team works on.
    pub goal: Goal,
    /// Member identifiers, regular members first (by rank) then advanced.
    pub members: Vec<ParticipantId>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that abort a formation run.
///
/// - All variants are terminal; the engine never retries
/// - No partial result is ever returned alongside an error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormationError {
    /// No participants were supplied.
    #[error("No eligible participants supplied")]
    EmptyParticipantPool,

    /// No votes were supplied.
    #[error("No votes supplied for the cycle")]
    EmptyVotePool,

    /// No participant reaches the advanced threshold.
    #[error("Not enough advanced participants to anchor any team")]
    InsufficientAdvancedParticipants,

    /// Regular participants named no usable goal.
    #[error("No goal preferences submitted by regular participants")]
    NoVotesFromRegularParticipants,

    /// Grouping converged to zero goal groups.
    #[error("Could not form goal groups from submitted votes")]
    NoGoalGroupsFormed,

    /// A team size too small to hold one advanced and one regular participant.
    #[error("Invalid team size {size} for goal {goal:?} (minimum is 2)")]
    InvalidTeamSize {
        /// The goal carrying the size, or `None` for the configured default.
        goal: Option<GoalId>,
        /// The rejected size.
        size: usize,
    },

    /// Team slicing selected the same participant for two teams.
    #[error("Participant {participant} assigned to more than one team for goal {goal}")]
    DoubleAssignment {
        /// The participant selected twice.
        participant: ParticipantId,
        /// The goal group being materialised.
        goal: GoalId,
    },

    /// The formed teams do not cover every participant exactly once.
    #[error("Formed teams cover {actual} participants, expected {expected}")]
    CoverageMismatch {
        /// Distinct participants supplied.
        expected: usize,
        /// Distinct participants placed on teams.
        actual: usize,
    },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn score_from_json(json: &str) -> Score {
        serde_json::from_str(json).expect("score")
    }

    #[test]
    fn score_reads_integers() {
        assert_eq!(score_from_json("120"), Score(120));
        assert_eq!(score_from_json("-4"), Score(0));
    }

    #[test]
    fn score_truncates_floats() {
        assert_eq!(score_from_json("99.9"), Score(99));
        assert_eq!(score_from_json("-1.5"), Score(0));
    }

    #[test]
    fn score_reads_leading_digits_of_text() {
        assert_eq!(score_from_json("\"120xp\""), Score(120));
        assert_eq!(score_from_json("\" +42\""), Score(42));
        assert_eq!(score_from_json("\"-42\""), Score(0));
        assert_eq!(score_from_json("\"abc\""), Score(0));
    }

    #[test]
    fn score_defaults_to_zero() {
        assert_eq!(score_from_json("null"), Score(0));
        assert_eq!(score_from_json("true"), Score(0));
        assert_eq!(score_from_json("{\"nested\":1}"), Score(0));

        let participant: Participant = serde_json::from_str(r#"{"id":"p1"}"#).expect("parse");
        assert_eq!(participant.score, Score(0));
    }

    #[test]
    fn score_text_saturates() {
        assert_eq!(
            Score::parse_lenient("99999999999999999999999"),
            Score(u64::MAX)
        );
    }

    #[test]
    fn vote_accepts_legacy_field_names() {
        let json = r#"{"playerId":"p1","goals":[{"url":"g1","teamSize":4},{"url":"g2"}]}"#;
        let vote: Vote = serde_json::from_str(json).expect("parse");

        assert_eq!(vote.participant.as_str(), "p1");
        assert_eq!(vote.goals[0], Goal::with_team_size("g1", 4));
        assert_eq!(vote.goals[1], Goal::new("g2"));
    }

    #[test]
    fn vote_without_goals_is_empty() {
        let vote: Vote = serde_json::from_str(r#"{"participant":"p1"}"#).expect("parse");
        assert!(vote.goals.is_empty());
    }

    #[test]
    fn goal_recommended_size_falls_back() {
        assert_eq!(Goal::new("g").recommended_size(5), 5);
        assert_eq!(Goal::with_team_size("g", 3).recommended_size(5), 3);
    }

    #[test]
    fn goal_zero_team_size_means_unset() {
        let goal: Goal = serde_json::from_str(r#"{"url":"g","teamSize":0}"#).expect("parse");
        assert_eq!(goal.team_size, Some(0));
        assert_eq!(goal.recommended_size(5), 5);
        assert_eq!(Goal::with_team_size("g", 1).recommended_size(5), 1);
    }

    #[test]
    fn team_size_total() {
        assert_eq!(TeamSize::new(4, 1).total(), 5);
    }
}
