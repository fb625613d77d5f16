//! # Goal Grouping Engine
//!
//! Clusters regular participants around the goals they voted for.
//!
//! Every goal group must later receive an advanced participant, so the
//! number of groups is capped at
//! `min(advanced participants, distinct goals voted for)`.
//!
//! ## Passes
//!
//! Each pass hands every unassigned voter to the group of their next
//! preferred goal, consuming that preference. While there are more groups
//! than the cap, the least popular group is dissolved and its members go
//! back to the pool to try their next preference. Voters who run out of
//! preferences stay unassigned and join the leftover pool.

use crate::classifier::Tiers;
use crate::{FormationError, Goal, GoalId, Participant, ParticipantId, Vote};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

// =============================================================================
// GOAL GROUP
// =============================================================================

/// Participants converging on one goal before team partitioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalGroup {
    /// The shared goal.
    pub goal: Goal,
    /// Regular members, in the order they joined.
    pub regular: Vec<Participant>,
    /// Advanced members, in the order they joined.
    pub advanced: Vec<Participant>,
}

impl GoalGroup {
    /// Create an empty group for `goal`.
    #[must_use]
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            regular: Vec::new(),
            advanced: Vec::new(),
        }
    }

    /// Total members of either tier.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regular.len() + self.advanced.len()
    }

    /// Check whether the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regular.is_empty() && self.advanced.is_empty()
    }
}

/// Group indices ranked by regular member count, largest first.
/// Ties keep insertion order.
#[must_use]
pub fn ranked_order(groups: &[GoalGroup]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by(|&a, &b| groups[b].regular.len().cmp(&groups[a].regular.len()));
    order
}

// =============================================================================
// GROUPING RESULT
// =============================================================================

/// Outcome of preference-based grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    /// Surviving groups, in creation order.
    pub groups: Vec<GoalGroup>,
    /// Regular participants without a group (non-voters and exhausted
    /// voters), in tier order.
    pub unassigned: Vec<Participant>,
    /// The group cap that was enforced.
    pub cap: usize,
    /// Goals whose groups were dissolved, in the order they were dropped.
    pub dropped: Vec<GoalId>,
    /// Number of assignment passes run.
    pub passes: usize,
}

/// One regular participant's surviving vote and remaining preferences.
struct Ballot<'a> {
    participant: &'a Participant,
    goals: &'a [Goal],
    preferences: VecDeque<GoalId>,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Group regular participants by their ranked goal preferences.
///
/// Votes from unknown or advanced participants are ignored. When the same
/// participant votes twice, the later vote replaces the earlier one.
///
/// # Errors
/// - `NoVotesFromRegularParticipants` if no regular participant names a goal
/// - `NoGoalGroupsFormed` if grouping ends with no surviving group
pub fn group_by_goal(tiers: &Tiers, votes: &[Vote]) -> Result<Grouping, FormationError> {
    let mut ballots = collect_ballots(tiers, votes);
    let catalog = GoalCatalog::from_ballots(&ballots);

    if catalog.is_empty() {
        return Err(FormationError::NoVotesFromRegularParticipants);
    }

    let cap = tiers.advanced.len().min(catalog.len());

    let mut groups: Vec<GoalGroup> = Vec::new();
    let mut assigned: BTreeSet<&ParticipantId> = BTreeSet::new();
    let mut dropped = Vec::new();
    let mut passes = 0usize;

    loop {
        passes += 1;

        for ballot in &mut ballots {
            let participant: &Participant = ballot.participant;
            if assigned.contains(&participant.id) {
                continue;
            }
            // exhausted ballots stay unassigned for good
            let Some(goal_id) = ballot.preferences.pop_front() else {
                continue;
            };

            let index = match groups.iter().position(|g| g.goal.id == goal_id) {
                Some(index) => index,
                None => {
                    groups.push(GoalGroup::new(catalog.goal(&goal_id)));
                    groups.len() - 1
                }
            };
            groups[index].regular.push(participant.clone());
            assigned.insert(&participant.id);
        }

        tracing::debug!(pass = passes, groups = groups.len(), cap, "grouping pass");

        if groups.len() <= cap {
            break;
        }

        // ranked last: fewest members, latest created on ties
        let Some(&victim) = ranked_order(&groups).last() else {
            break;
        };
        let group = groups.remove(victim);
        tracing::debug!(
            goal = %group.goal.id,
            members = group.regular.len(),
            "dissolving least popular goal group"
        );
        for member in &group.regular {
            assigned.remove(&member.id);
        }
        dropped.push(group.goal.id);
    }

    if groups.is_empty() {
        return Err(FormationError::NoGoalGroupsFormed);
    }

    let unassigned = tiers
        .regular
        .iter()
        .filter(|p| !assigned.contains(&p.id))
        .cloned()
        .collect();

    Ok(Grouping {
        groups,
        unassigned,
        cap,
        dropped,
        passes,
    })
}

fn collect_ballots<'a>(tiers: &'a Tiers, votes: &'a [Vote]) -> Vec<Ballot<'a>> {
    let regular: BTreeMap<&ParticipantId, &Participant> =
        tiers.regular.iter().map(|p| (&p.id, p)).collect();

    let mut positions: BTreeMap<&ParticipantId, usize> = BTreeMap::new();
    let mut ballots: Vec<Ballot<'a>> = Vec::new();

    for vote in votes {
        let Some(&participant) = regular.get(&vote.participant) else {
            continue;
        };
        let preferences = usable_preferences(&vote.goals);

        match positions.get(&participant.id) {
            Some(&pos) => {
                ballots[pos].goals = &vote.goals;
                ballots[pos].preferences = preferences;
            }
            None => {
                positions.insert(&participant.id, ballots.len());
                ballots.push(Ballot {
                    participant,
                    goals: &vote.goals,
                    preferences,
                });
            }
        }
    }

    ballots
}

/// Non-empty goal ids, each counted at its first occurrence only.
fn usable_preferences(goals: &[Goal]) -> VecDeque<GoalId> {
    let mut seen = BTreeSet::new();
    goals
        .iter()
        .filter(|g| !g.id.as_str().is_empty())
        .filter(|g| seen.insert(&g.id))
        .map(|g| g.id.clone())
        .collect()
}

// =============================================================================
// GOAL CATALOG
// =============================================================================

/// Distinct goals named by regular participants. The first occurrence of a
/// goal id supplies its details.
struct GoalCatalog {
    goals: BTreeMap<GoalId, Goal>,
}

impl GoalCatalog {
    fn from_ballots(ballots: &[Ballot<'_>]) -> Self {
        let mut goals = BTreeMap::new();
        for goal in ballots.iter().flat_map(|b| b.goals) {
            if !goal.id.as_str().is_empty() {
                goals.entry(goal.id.clone()).or_insert_with(|| goal.clone());
            }
        }
        Self { goals }
    }

    fn len(&self) -> usize {
        self.goals.len()
    }

    fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    fn goal(&self, id: &GoalId) -> Goal {
        self.goals.get(id).cloned().unwrap_or_else(|| Goal {
            id: id.clone(),
            team_size: None,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    fn pool(advanced: usize, regular: usize) -> Vec<Participant> {
        let mut pool: Vec<Participant> = (0..advanced)
            .map(|i| Participant::new(format!("a{i}"), 100))
            .collect();
        pool.extend((0..regular).map(|i| Participant::new(format!("r{i}"), 0)));
        pool
    }

    fn vote(participant: &str, goals: &[&str]) -> Vote {
        Vote::new(participant, goals.iter().map(|g| Goal::new(*g)).collect())
    }

    fn members(group: &GoalGroup) -> Vec<&str> {
        group.regular.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn single_goal_forms_single_group() {
        let tiers = classify(&pool(1, 3), 100).expect("classify");
        let votes = vec![vote("r0", &["g1"]), vote("r1", &["g1"]), vote("r2", &["g1"])];

        let grouping = group_by_goal(&tiers, &votes).expect("group");

        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(members(&grouping.groups[0]), vec!["r0", "r1", "r2"]);
        assert!(grouping.unassigned.is_empty());
        assert_eq!(grouping.passes, 1);
    }

    #[test]
    fn cap_forces_reassignment_to_next_preference() {
        let tiers = classify(&pool(1, 3), 100).expect("classify");
        let votes = vec![
            vote("r0", &["g1"]),
            vote("r1", &["g1"]),
            vote("r2", &["g2", "g1"]),
        ];

        let grouping = group_by_goal(&tiers, &votes).expect("group");

        assert_eq!(grouping.cap, 1);
        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.groups[0].goal.id.as_str(), "g1");
        assert_eq!(members(&grouping.groups[0]), vec!["r0", "r1", "r2"]);
        assert_eq!(grouping.dropped, vec![GoalId::new("g2")]);
    }

    #[test]
    fn exhausted_voter_becomes_leftover() {
        let tiers = classify(&pool(1, 3), 100).expect("classify");
        let votes = vec![
            vote("r0", &["g1"]),
            vote("r1", &["g1"]),
            vote("r2", &["g2"]),
        ];

        let grouping = group_by_goal(&tiers, &votes).expect("group");

        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.unassigned.len(), 1);
        assert_eq!(grouping.unassigned[0].id.as_str(), "r2");
    }

    #[test]
    fn ties_drop_latest_created_group() {
        let tiers = classify(&pool(1, 2), 100).expect("classify");
        let votes = vec![vote("r0", &["g1"]), vote("r1", &["g2"])];

        let grouping = group_by_goal(&tiers, &votes).expect("group");

        assert_eq!(grouping.groups[0].goal.id.as_str(), "g1");
        assert_eq!(grouping.dropped, vec![GoalId::new("g2")]);
    }

    #[test]
    fn non_voters_and_empty_votes_are_unassigned() {
        let tiers = classify(&pool(1, 3), 100).expect("classify");
        let votes = vec![vote("r0", &["g1"]), vote("r1", &[])];

        let grouping = group_by_goal(&tiers, &votes).expect("group");

        let leftovers: Vec<_> = grouping.unassigned.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(leftovers, vec!["r1", "r2"]);
    }

    #[test]
    fn advanced_and_unknown_votes_are_ignored() {
        let tiers = classify(&pool(2, 1), 100).expect("classify");
        let votes = vec![
            vote("a0", &["g9"]),
            vote("ghost", &["g8"]),
            vote("r0", &["g1"]),
        ];

        let grouping = group_by_goal(&tiers, &votes).expect("group");

        assert_eq!(grouping.cap, 1);
        assert_eq!(grouping.groups[0].goal.id.as_str(), "g1");
    }

    #[test]
    fn fails_when_no_regular_votes() {
        let tiers = classify(&pool(2, 2), 100).expect("classify");
        let votes = vec![vote("a0", &["g1"]), vote("r0", &[])];

        assert_eq!(
            group_by_goal(&tiers, &votes),
            Err(FormationError::NoVotesFromRegularParticipants)
        );
    }

    #[test]
    fn later_vote_replaces_earlier() {
        let tiers = classify(&pool(1, 1), 100).expect("classify");
        let votes = vec![vote("r0", &["g1"]), vote("r0", &["g2"])];

        let grouping = group_by_goal(&tiers, &votes).expect("group");

        assert_eq!(grouping.groups[0].goal.id.as_str(), "g2");
        assert_eq!(grouping.cap, 1);
    }

    #[test]
    fn first_goal_occurrence_supplies_details() {
        let tiers = classify(&pool(1, 2), 100).expect("classify");
        let votes = vec![
            Vote::new("r0", vec![Goal::with_team_size("g1", 3)]),
            Vote::new("r1", vec![Goal::with_team_size("g1", 7)]),
        ];

        let grouping = group_by_goal(&tiers, &votes).expect("group");

        assert_eq!(grouping.groups[0].goal.team_size, Some(3));
    }

    #[test]
    fn blank_and_repeated_preferences_are_skipped() {
        let prefs = usable_preferences(&[Goal::new(""), Goal::new("g1"), Goal::new("g1")]);
        assert_eq!(prefs, VecDeque::from(vec![GoalId::new("g1")]));
    }

    #[test]
    fn ranked_order_is_descending_and_stable() {
        let mut a = GoalGroup::new(Goal::new("a"));
        a.regular.push(Participant::new("x", 0));
        let b = GoalGroup::new(Goal::new("b"));
        let mut c = GoalGroup::new(Goal::new("c"));
        c.regular.push(Participant::new("y", 0));
        c.regular.push(Participant::new("z", 0));
        let d = GoalGroup::new(Goal::new("d"));

        assert_eq!(ranked_order(&[a, b, c, d]), vec![2, 0, 1, 3]);
    }
}
