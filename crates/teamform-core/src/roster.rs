//! # Collaborator Contracts
//!
//! The engine does not store anything. Participants and votes come from a
//! [`Roster`]; formed teams go to a [`TeamSink`].
//!
//! # Extension Point
//!
//! Both traits are meant for external adapters (files, databases, services).
//! The in-crate [`MemoryRoster`] and [`MemorySink`] keep everything in
//! `BTreeMap`s and `Vec`s and never fail.

use crate::{
    ChapterId, CycleId, FormationConfig, FormationError, FormedTeam, Goal, Participant,
    ParticipantId, Vote, form_teams,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;

// =============================================================================
// TRAITS
// =============================================================================

/// Source of formation inputs.
pub trait Roster {
    /// Error raised while fetching.
    type Error;

    /// Participants of `chapter` eligible for assignment.
    fn eligible_participants(&self, chapter: &ChapterId) -> Result<Vec<Participant>, Self::Error>;

    /// Votes submitted for `cycle`.
    fn votes(&self, cycle: &CycleId) -> Result<Vec<Vote>, Self::Error>;
}

/// Destination of formed teams.
pub trait TeamSink {
    /// Error raised while persisting.
    type Error;

    /// Persist every team of one run. Called only with a complete result.
    fn persist_teams(
        &mut self,
        chapter: &ChapterId,
        cycle: &CycleId,
        teams: Vec<FormedTeam>,
    ) -> Result<Vec<PersistedTeam>, Self::Error>;
}

/// A team as handed to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTeam {
    /// Chapter the members belong to.
    pub chapter: ChapterId,
    /// Cycle the team was formed for.
    pub cycle: CycleId,
    /// The team's goal.
    pub goal: Goal,
    /// Member identifiers.
    pub members: Vec<ParticipantId>,
}

impl PersistedTeam {
    /// Attach run context to a formed team.
    #[must_use]
    pub fn new(chapter: &ChapterId, cycle: &CycleId, team: FormedTeam) -> Self {
        Self {
            chapter: chapter.clone(),
            cycle: cycle.clone(),
            goal: team.goal,
            members: team.members,
        }
    }
}

impl From<Infallible> for FormationError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Fetch inputs, form teams and persist them.
///
/// Nothing reaches `sink` unless formation succeeds.
pub fn form_cycle<R, S, E>(
    roster: &R,
    sink: &mut S,
    chapter: &ChapterId,
    cycle: &CycleId,
    config: &FormationConfig,
) -> Result<Vec<PersistedTeam>, E>
where
    R: Roster,
    S: TeamSink,
    E: From<R::Error> + From<S::Error> + From<FormationError>,
{
    let participants = roster.eligible_participants(chapter)?;
    let votes = roster.votes(cycle)?;

    tracing::debug!(
        chapter = %chapter,
        cycle = %cycle,
        participants = participants.len(),
        votes = votes.len(),
        "fetched formation inputs"
    );

    let teams = form_teams(&participants, &votes, config)?;
    Ok(sink.persist_teams(chapter, cycle, teams)?)
}

// =============================================================================
// IN-MEMORY IMPLEMENTATIONS
// =============================================================================

/// Roster backed by in-memory maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoster {
    participants: BTreeMap<ChapterId, Vec<Participant>>,
    votes: BTreeMap<CycleId, Vec<Vote>>,
}

impl MemoryRoster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the participants of `chapter`.
    #[must_use]
    pub fn with_participants(mut self, chapter: ChapterId, participants: Vec<Participant>) -> Self {
        self.participants.insert(chapter, participants);
        self
    }

    /// Set the votes of `cycle`.
    #[must_use]
    pub fn with_votes(mut self, cycle: CycleId, votes: Vec<Vote>) -> Self {
        self.votes.insert(cycle, votes);
        self
    }
}

impl Roster for MemoryRoster {
    type Error = Infallible;

    fn eligible_participants(&self, chapter: &ChapterId) -> Result<Vec<Participant>, Infallible> {
        Ok(self.participants.get(chapter).cloned().unwrap_or_default())
    }

    fn votes(&self, cycle: &CycleId) -> Result<Vec<Vote>, Infallible> {
        Ok(self.votes.get(cycle).cloned().unwrap_or_default())
    }
}

/// Sink that keeps persisted teams in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Everything persisted so far, in order.
    pub persisted: Vec<PersistedTeam>,
}

impl TeamSink for MemorySink {
    type Error = Infallible;

    fn persist_teams(
        &mut self,
        chapter: &ChapterId,
        cycle: &CycleId,
        teams: Vec<FormedTeam>,
    ) -> Result<Vec<PersistedTeam>, Infallible> {
        let records: Vec<PersistedTeam> = teams
            .into_iter()
            .map(|team| PersistedTeam::new(chapter, cycle, team))
            .collect();
        self.persisted.extend(records.iter().cloned());
        Ok(records)
    }
}

// =============================================================================
// TESTS
// =============================================================================
