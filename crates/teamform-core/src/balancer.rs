//! # Fair Distribution Balancer
//!
//! Places everyone grouping did not: leftover regular participants and all
//! advanced participants.
//!
//! Both pools are ranked by score (highest first, ties in input order) and
//! dealt one per group in a fixed cycle. The cycle visits groups from most
//! to least popular, and each pool starts its own cycle at the first group.
//! Since grouping caps the group count at the number of advanced
//! participants, every group receives at least one of them.

use crate::Participant;
use crate::classifier::rank_by_score;
use crate::grouping::{GoalGroup, Grouping, ranked_order};

/// Deal leftover regular participants and all advanced participants into
/// the groups of `grouping`.
///
/// Returns the groups in creation order.
#[must_use]
pub fn distribute(grouping: Grouping, advanced: &[Participant]) -> Vec<GoalGroup> {
    let Grouping {
        mut groups,
        unassigned,
        ..
    } = grouping;

    if groups.is_empty() {
        return groups;
    }

    let cycle = ranked_order(&groups);

    for (turn, participant) in rank_by_score(&unassigned).into_iter().enumerate() {
        let index = cycle[turn % cycle.len()];
        groups[index].regular.push(participant);
    }

    for (turn, participant) in rank_by_score(advanced).into_iter().enumerate() {
        let index = cycle[turn % cycle.len()];
        groups[index].advanced.push(participant);
    }

    tracing::debug!(
        groups = groups.len(),
        leftovers = unassigned.len(),
        advanced = advanced.len(),
        "distributed leftover and advanced participants"
    );

    groups
}

// =============================================================================
// TESTS
// =============================================================================
