//! # teamform-core
//!
//! The deterministic team-formation engine - THE LOGIC.
//!
//! Given eligible participants and their ranked goal votes for a cycle, the
//! engine partitions participants into goal-aligned teams:
//! - every team is anchored by one advanced participant wherever possible
//! - team sizes stay within one of the goal's recommended size
//! - every participant lands on exactly one team
//!
//! ## Stages
//!
//! 1. [`classifier`] - advanced / regular tiers by competency score
//! 2. [`grouping`] - preference-based goal groups, capped by advanced count
//! 3. [`balancer`] - round-robin placement of leftovers and advanced
//! 4. [`partition`] - team sizes and member slicing per goal group
//!
//! ## Architectural Constraints
//!
//! - Pure and synchronous: no async, no I/O, no global state
//! - Deterministic: identical inputs give identical teams, ties broken by
//!   input order
//! - Storage lives behind the [`Roster`] and [`TeamSink`] traits

// =============================================================================
// MODULES
// =============================================================================

pub mod balancer;
pub mod classifier;
pub mod config;
pub mod formation;
pub mod grouping;
pub mod partition;
pub mod primitives;
pub mod roster;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ChapterId, CycleId, FormationError, FormedTeam, Goal, GoalId, Participant, ParticipantId,
    Score, TeamSize, Vote,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use balancer::distribute;
pub use classifier::{Tiers, classify, rank_by_score};
pub use config::FormationConfig;
pub use formation::{Formation, GroupSummary, form, form_teams};
pub use grouping::{GoalGroup, Grouping, group_by_goal};
pub use partition::{Partition, PartitionStrategy, arrange, materialize, team_sizes};

// =============================================================================
// RE-EXPORTS: Collaborators
// =============================================================================

pub use roster::{MemoryRoster, MemorySink, PersistedTeam, Roster, TeamSink, form_cycle};
