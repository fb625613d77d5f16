//! # Formation Pipeline
//!
//! Entry point tying the four stages together:
//!
//! ```text
//! participants ─► classify ─► group_by_goal ─► distribute ─► arrange (per group) ─► teams
//!                   │              │
//!                 votes ───────────┘
//! ```
//!
//! A run either yields teams covering every participant exactly once or an
//! error. Nothing partial is returned.

use crate::balancer::distribute;
use crate::classifier::classify;
use crate::grouping::group_by_goal;
use crate::partition::{PartitionStrategy, arrange};
use crate::{
    FormationConfig, FormationError, FormedTeam, Goal, GoalId, Participant, ParticipantId, Vote,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Audit record for one goal group of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// The group's goal.
    pub goal: Goal,
    /// Recommended team size applied.
    pub team_size: usize,
    /// Regular members after balancing.
    pub regular: usize,
    /// Advanced members after balancing.
    pub advanced: usize,
    /// How the partitioner placed the leftover.
    pub strategy: PartitionStrategy,
    /// Number of teams formed.
    pub teams: usize,
}

/// Result of a complete formation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    /// Formed teams, grouped by goal in group creation order.
    pub teams: Vec<FormedTeam>,
    /// One summary per goal group, same order as `teams`.
    pub groups: Vec<GroupSummary>,
    /// Goals whose groups were dissolved during grouping.
    pub dropped_goals: Vec<GoalId>,
}

impl Formation {
    /// Check whether any group fell back to an unbalanced partition.
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.groups
            .iter()
            .any(|g| g.strategy == PartitionStrategy::Fallback)
    }
}

/// Form goal-aligned teams.
///
/// # Errors
/// - `InvalidTeamSize` for an unusable configured or per-goal team size
/// - `EmptyParticipantPool` / `EmptyVotePool` when an input is empty
/// - any error of the classifier, grouping engine or partitioner
pub fn form(
    participants: &[Participant],
    votes: &[Vote],
    config: &FormationConfig,
) -> Result<Formation, FormationError> {
    config.validate()?;

    if participants.is_empty() {
        return Err(FormationError::EmptyParticipantPool);
    }
    if votes.is_empty() {
        return Err(FormationError::EmptyVotePool);
    }

    let tiers = classify(participants, config.advanced_threshold)?;
    let grouping = group_by_goal(&tiers, votes)?;
    let dropped_goals = grouping.dropped.clone();
    let groups = distribute(grouping, &tiers.advanced);

    let mut teams = Vec::new();
    let mut summaries = Vec::with_capacity(groups.len());

    for group in &groups {
        let team_size = config.team_size_for(&group.goal)?;
        let (partition, group_teams) = arrange(group, team_size)?;

        summaries.push(GroupSummary {
            goal: group.goal.clone(),
            team_size,
            regular: group.regular.len(),
            advanced: group.advanced.len(),
            strategy: partition.strategy,
            teams: group_teams.len(),
        });
        teams.extend(group_teams);
    }

    verify_coverage(&teams, tiers.len())?;

    let formation = Formation {
        teams,
        groups: summaries,
        dropped_goals,
    };

    tracing::info!(
        participants = tiers.len(),
        advanced = tiers.advanced.len(),
        groups = formation.groups.len(),
        teams = formation.teams.len(),
        dropped = formation.dropped_goals.len(),
        fallback = formation.has_fallback(),
        "formed teams"
    );

    Ok(formation)
}

/// Form goal-aligned teams, returning only the teams.
pub fn form_teams(
    participants: &[Participant],
    votes: &[Vote],
    config: &FormationConfig,
) -> Result<Vec<FormedTeam>, FormationError> {
    form(participants, votes, config).map(|formation| formation.teams)
}

fn verify_coverage(teams: &[FormedTeam], expected: usize) -> Result<(), FormationError> {
    let mut seen: BTreeSet<&ParticipantId> = BTreeSet::new();
    for team in teams {
        for member in &team.members {
            if !seen.insert(member) {
                return Err(FormationError::DoubleAssignment {
                    participant: member.clone(),
                    goal: team.goal.id.clone(),
                });
            }
        }
    }

    if seen.len() != expected {
        return Err(FormationError::CoverageMismatch {
            expected,
            actual: seen.len(),
        });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(participant: &str, goals: &[&str]) -> Vote {
        Vote::new(participant, goals.iter().map(|g| Goal::new(*g)).collect())
    }

    #[test]
    fn empty_inputs_are_rejected_first() {
        let config = FormationConfig::default();
        assert_eq!(
            form(&[], &[vote("r0", &["g"])], &config),
            Err(FormationError::EmptyParticipantPool)
        );
        assert_eq!(
            form(&[Participant::new("a", 100)], &[], &config),
            Err(FormationError::EmptyVotePool)
        );
    }

    #[test]
    fn invalid_config_is_rejected_before_inputs() {
        let config = FormationConfig::new(100, 0);
        assert!(matches!(
            form(&[], &[], &config),
            Err(FormationError::InvalidTeamSize { goal: None, size: 0 })
        ));
    }

    #[test]
    fn invalid_goal_size_aborts_run() {
        let pool = vec![Participant::new("a", 100), Participant::new("r", 0)];
        let votes = vec![Vote::new("r", vec![Goal::with_team_size("g", 1)])];

        let result = form(&pool, &votes, &FormationConfig::default());

        assert!(matches!(
            result,
            Err(FormationError::InvalidTeamSize { goal: Some(_), size: 1 })
        ));
    }

    #[test]
    fn summary_tracks_groups() {
        let pool = vec![
            Participant::new("a", 100),
            Participant::new("r0", 0),
            Participant::new("r1", 0),
        ];
        let votes = vec![vote("r0", &["g1"]), vote("r1", &["g2", "g1"])];

        let formation = form(&pool, &votes, &FormationConfig::new(100, 3)).expect("form");

        assert_eq!(formation.groups.len(), 1);
        assert_eq!(formation.groups[0].strategy, PartitionStrategy::Exact);
        assert_eq!(formation.groups[0].regular, 2);
        assert_eq!(formation.groups[0].advanced, 1);
        assert_eq!(formation.dropped_goals, vec![GoalId::new("g2")]);
        assert!(!formation.has_fallback());
    }

    #[test]
    fn coverage_detects_missing_members() {
        let teams = vec![FormedTeam {
            goal: Goal::new("g"),
            members: vec![ParticipantId::new("p")],
        }];
        assert_eq!(
            verify_coverage(&teams, 2),
            Err(FormationError::CoverageMismatch {
                expected: 2,
                actual: 1
            })
        );
    }
}
