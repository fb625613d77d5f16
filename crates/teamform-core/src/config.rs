//! # Formation Configuration
//!
//! Explicit parameters for one formation run.

use crate::primitives::{DEFAULT_ADVANCED_THRESHOLD, DEFAULT_TEAM_SIZE, MIN_TEAM_SIZE};
use crate::{FormationError, Goal};
use serde::{Deserialize, Serialize};

/// Parameters passed into every formation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    /// Scores at or above this value are advanced.
    pub advanced_threshold: u64,
    /// Recommended team size for goals that carry none.
    pub default_team_size: usize,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            advanced_threshold: DEFAULT_ADVANCED_THRESHOLD,
            default_team_size: DEFAULT_TEAM_SIZE,
        }
    }
}

impl FormationConfig {
    /// Create a configuration from explicit values.
    #[must_use]
    pub const fn new(advanced_threshold: u64, default_team_size: usize) -> Self {
        Self {
            advanced_threshold,
            default_team_size,
        }
    }

    /// Reject a default team size that cannot hold an advanced participant
    /// plus at least one regular participant.
    pub fn validate(&self) -> Result<(), FormationError> {
        if self.default_team_size < MIN_TEAM_SIZE {
            return Err(FormationError::InvalidTeamSize {
                goal: None,
                size: self.default_team_size,
            });
        }
        Ok(())
    }

    /// Recommended team size for `goal`, validated. A goal size of zero
    /// falls back to the default; a goal size of one is rejected.
    pub fn team_size_for(&self, goal: &Goal) -> Result<usize, FormationError> {
        let size = goal.recommended_size(self.default_team_size);
        if size < MIN_TEAM_SIZE {
            return Err(FormationError::InvalidTeamSize {
                goal: Some(goal.id.clone()),
                size,
            });
        }
        Ok(size)
    }
}
