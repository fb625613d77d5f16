//! # Participant Classifier
//!
//! Splits the eligible pool into advanced and regular tiers.
//!
//! - Advanced: `score >= threshold`
//! - Regular: everyone else
//! - Input order is kept inside each tier; later stages rely on it for ties

use crate::{FormationError, Participant, ParticipantId};
use std::collections::BTreeMap;

/// The two tiers of one formation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tiers {
    /// Participants at or above the threshold, in input order.
    pub advanced: Vec<Participant>,
    /// All other participants, in input order.
    pub regular: Vec<Participant>,
}

impl Tiers {
    /// Total number of distinct participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.advanced.len() + self.regular.len()
    }

    /// Check whether both tiers are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.advanced.is_empty() && self.regular.is_empty()
    }
}

/// Classify participants by competency score.
///
/// Participants are keyed by id: a repeated id keeps the position of its
/// first appearance and the data of its last.
///
/// # Errors
/// Returns `FormationError::InsufficientAdvancedParticipants` if nobody
/// reaches `threshold`.
pub fn classify(participants: &[Participant], threshold: u64) -> Result<Tiers, FormationError> {
    let unique = dedup_by_id(participants);

    let (advanced, regular): (Vec<_>, Vec<_>) = unique
        .into_iter()
        .partition(|p| p.score.value() >= threshold);

    if advanced.is_empty() {
        return Err(FormationError::InsufficientAdvancedParticipants);
    }

    tracing::debug!(
        advanced = advanced.len(),
        regular = regular.len(),
        threshold,
        "classified participants"
    );

    Ok(Tiers { advanced, regular })
}

/// Rank participants by score, highest first. Ties keep input order.
#[must_use]
pub fn rank_by_score(participants: &[Participant]) -> Vec<Participant> {
    let mut ranked = participants.to_vec();
    // sort_by is stable
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

fn dedup_by_id(participants: &[Participant]) -> Vec<Participant> {
    let mut positions: BTreeMap<&ParticipantId, usize> = BTreeMap::new();
    let mut unique: Vec<Participant> = Vec::with_capacity(participants.len());

    for participant in participants {
        match positions.get(&participant.id) {
            Some(&pos) => unique[pos] = participant.clone(),
            None => {
                positions.insert(&participant.id, unique.len());
                unique.push(participant.clone());
            }
        }
    }

    unique
}

// =============================================================================
// TESTS
// =============================================================================
