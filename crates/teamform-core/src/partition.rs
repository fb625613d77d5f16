//! # Team Size Partitioner
//!
//! Splits one goal group into teams sized within one of the recommended
//! size `S`, each anchored by an advanced participant where possible.
//!
//! ## Sizing
//!
//! "Perfect" teams hold `S - 1` regular participants and one advanced.
//! Whatever does not fit into perfect teams is the leftover, placed by the
//! first strategy that applies:
//!
//! | Strategy | When | Effect |
//! |----------|------|--------|
//! | `LeftoverTeam` | leftover alone is a valid size | one extra team (forced to one advanced) |
//! | `Spread` | leftover fits one-per-team | perfect teams grow by one |
//! | `Borrow` | perfect teams can lend enough regulars | extra team of `S - 1` |
//! | `Fallback` | nothing else works | extra team of whatever is left |
//!
//! `Fallback` may produce a team outside `[S - 1, S + 1]`. It is logged and
//! accepted: rejecting it would leave participants without a team.
//!
//! ## Materialising
//!
//! Size pairs are turned into members by slicing the score-ranked regular and
//! advanced lists front to back. Regular slices wrap to the start when a run
//! passes the end. Advanced slices stop at the end of the pool: when a group
//! has fewer advanced participants than advanced seats, the later teams go
//! without one. A participant picked for two different teams is an internal
//! inconsistency and aborts the run with `FormationError::DoubleAssignment`.

use crate::classifier::rank_by_score;
use crate::grouping::GoalGroup;
use crate::primitives::MIN_TEAM_SIZE;
use crate::{FormationError, FormedTeam, Participant, ParticipantId, TeamSize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// PARTITION
// =============================================================================

/// How the leftover of a partition was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartitionStrategy {
    /// Everyone fit into perfect teams.
    Exact,
    /// The leftover formed its own team.
    LeftoverTeam,
    /// The leftover was spread over perfect teams, one each.
    Spread,
    /// Perfect teams lent regular participants to complete a leftover team.
    Borrow,
    /// The leftover became a team as-is, possibly outside the size band.
    Fallback,
}

impl PartitionStrategy {
    /// Get the strategy name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::LeftoverTeam => "leftover-team",
            Self::Spread => "spread",
            Self::Borrow => "borrow",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for PartitionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Team compositions computed for one goal group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Recommended team size the partition was computed for.
    pub team_size: usize,
    /// One entry per team, in slicing order.
    pub sizes: Vec<TeamSize>,
    /// How the leftover was placed.
    pub strategy: PartitionStrategy,
}

impl Partition {
    /// Check whether `size` lies within `[S - 1, S + 1]`.
    #[must_use]
    pub fn in_band(&self, size: TeamSize) -> bool {
        let total = size.total();
        total + 1 >= self.team_size && total <= self.team_size + 1
    }

    /// Number of teams outside `[S - 1, S + 1]`.
    #[must_use]
    pub fn out_of_band(&self) -> usize {
        self.sizes.iter().filter(|s| !self.in_band(**s)).count()
    }

    /// Total regular seats.
    #[must_use]
    pub fn regular_seats(&self) -> usize {
        self.sizes.iter().map(|s| s.regular).sum()
    }

    /// Total advanced seats.
    #[must_use]
    pub fn advanced_seats(&self) -> usize {
        self.sizes.iter().map(|s| s.advanced).sum()
    }
}

/// Compute team compositions for `regular` regular and `advanced` advanced
/// participants at recommended size `team_size`.
///
/// Every regular participant gets exactly one seat. Advanced seats may
/// exceed `advanced` when a team had to be forced to hold one.
///
/// # Errors
/// Returns `FormationError::InvalidTeamSize` if `team_size < 2`.
pub fn team_sizes(
    team_size: usize,
    regular: usize,
    advanced: usize,
) -> Result<Partition, FormationError> {
    if team_size < MIN_TEAM_SIZE {
        return Err(FormationError::InvalidTeamSize {
            goal: None,
            size: team_size,
        });
    }

    // leave room for exactly one advanced participant
    let perfect_regular = team_size - 1;
    let num_perfect = regular / perfect_regular;
    let mut sizes = vec![TeamSize::new(perfect_regular, 1); num_perfect];

    let remaining_regular = regular % perfect_regular;
    let remaining_advanced = advanced.saturating_sub(num_perfect);
    let total_remaining = remaining_regular + remaining_advanced;

    let partition = |sizes, strategy| Partition {
        team_size,
        sizes,
        strategy,
    };

    if total_remaining == 0 {
        return Ok(partition(sizes, PartitionStrategy::Exact));
    }

    let max_remaining = if remaining_advanced > 0 {
        total_remaining
    } else {
        remaining_regular + 1
    };
    let min_size = team_size - 1;
    let max_size = team_size + 1;
    let mut leftover = TeamSize::new(remaining_regular, remaining_advanced);

    if (min_size..=max_size).contains(&max_remaining) {
        leftover.advanced = leftover.advanced.max(1);
        sizes.push(leftover);
        return Ok(partition(sizes, PartitionStrategy::LeftoverTeam));
    }

    if total_remaining <= num_perfect {
        // regulars first, then advanced, continuing along the same teams
        let mut slots = sizes.iter_mut();
        for _ in 0..remaining_regular {
            if let Some(team) = slots.next() {
                team.regular += 1;
            }
        }
        for _ in 0..remaining_advanced {
            if let Some(team) = slots.next() {
                team.advanced += 1;
            }
        }
        return Ok(partition(sizes, PartitionStrategy::Spread));
    }

    if min_size.saturating_sub(max_remaining) <= num_perfect {
        leftover.advanced = leftover.advanced.max(1);
        let mut donors = sizes.iter_mut();
        while leftover.total() < min_size {
            let Some(donor) = donors.next() else {
                break;
            };
            donor.regular -= 1;
            leftover.regular += 1;
        }
        sizes.push(leftover);
        return Ok(partition(sizes, PartitionStrategy::Borrow));
    }

    sizes.push(leftover);
    Ok(partition(sizes, PartitionStrategy::Fallback))
}

// =============================================================================
// MATERIALISATION
// =============================================================================

/// Slice `pool` into consecutive runs of the given lengths, wrapping to the
/// front when a run passes the end.
///
/// A run longer than the whole pool is truncated to the pool length.
#[must_use]
pub fn slice_with_wraparound(lengths: &[usize], pool: &[Participant]) -> Vec<Vec<Participant>> {
    if pool.is_empty() {
        return vec![Vec::new(); lengths.len()];
    }

    let mut start = 0usize;
    lengths
        .iter()
        .map(|&len| {
            let end = (start + len).min(pool.len());
            let mut run = pool[start..end].to_vec();
            let wrapped = len.saturating_sub(run.len()).min(pool.len());
            run.extend_from_slice(&pool[..wrapped]);
            start = (start + len) % pool.len();
            run
        })
        .collect()
}

/// Slice `pool` into consecutive runs of the given lengths without wrapping.
///
/// Once the pool is used up, the remaining runs come back short or empty.
#[must_use]
pub fn slice_until_exhausted(lengths: &[usize], pool: &[Participant]) -> Vec<Vec<Participant>> {
    let mut rest = pool;
    lengths
        .iter()
        .map(|&len| {
            let (run, tail) = rest.split_at(len.min(rest.len()));
            rest = tail;
            run.to_vec()
        })
        .collect()
}

/// Turn a partition of `group` into concrete teams.
///
/// Members of each team are its ranked regular slice followed by its ranked
/// advanced slice, each participant listed once. Advanced seats beyond the
/// group's advanced participants stay empty.
///
/// # Errors
/// Returns `FormationError::DoubleAssignment` if a participant lands on two
/// teams, which only a partition inconsistent with `group` can cause.
pub fn materialize(
    group: &GoalGroup,
    partition: &Partition,
) -> Result<Vec<FormedTeam>, FormationError> {
    let ranked_regular = rank_by_score(&group.regular);
    let ranked_advanced = rank_by_score(&group.advanced);

    let regular_lengths: Vec<usize> = partition.sizes.iter().map(|s| s.regular).collect();
    let advanced_lengths: Vec<usize> = partition.sizes.iter().map(|s| s.advanced).collect();

    let regular_runs = slice_with_wraparound(&regular_lengths, &ranked_regular);
    let advanced_runs = slice_until_exhausted(&advanced_lengths, &ranked_advanced);

    let mut placed: BTreeSet<ParticipantId> = BTreeSet::new();
    let mut teams = Vec::with_capacity(partition.sizes.len());

    for (regular_run, advanced_run) in regular_runs.into_iter().zip(advanced_runs) {
        let mut members: Vec<ParticipantId> = Vec::with_capacity(regular_run.len() + 1);
        for participant in regular_run.into_iter().chain(advanced_run) {
            if members.contains(&participant.id) {
                continue;
            }
            if !placed.insert(participant.id.clone()) {
                return Err(FormationError::DoubleAssignment {
                    participant: participant.id,
                    goal: group.goal.id.clone(),
                });
            }
            members.push(participant.id);
        }
        teams.push(FormedTeam {
            goal: group.goal.clone(),
            members,
        });
    }

    Ok(teams)
}

/// Partition and materialise one goal group at recommended size `team_size`.
pub fn arrange(
    group: &GoalGroup,
    team_size: usize,
) -> Result<(Partition, Vec<FormedTeam>), FormationError> {
    let partition = team_sizes(team_size, group.regular.len(), group.advanced.len())?;

    if partition.strategy == PartitionStrategy::Fallback {
        tracing::warn!(
            goal = %group.goal.id,
            team_size,
            regular = group.regular.len(),
            advanced = group.advanced.len(),
            "no balanced partition; leftover kept as its own team"
        );
    }
    let unanchored = partition
        .advanced_seats()
        .saturating_sub(group.advanced.len());
    if unanchored > 0 {
        tracing::warn!(
            goal = %group.goal.id,
            team_size,
            advanced = group.advanced.len(),
            seats = partition.advanced_seats(),
            "too few advanced participants to anchor every team"
        );
    }
    let out_of_band = partition.out_of_band();
    if out_of_band > 0 {
        tracing::warn!(
            goal = %group.goal.id,
            team_size,
            teams = out_of_band,
            strategy = %partition.strategy,
            "teams outside recommended size band"
        );
    }

    let teams = materialize(group, &partition)?;
    Ok((partition, teams))
}

// =============================================================================
// TESTS
// =============================================================================
