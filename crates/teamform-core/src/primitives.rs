//! # Formation Primitives
//!
//! Reference constants for the team-formation engine.
//!
//! These are defaults only. Every run receives its values through
//! [`FormationConfig`](crate::FormationConfig); nothing here is read as
//! process-wide state.

/// Minimum competency score for a participant to count as advanced.
///
/// Advanced participants anchor teams: every team is seeded with one.
pub const DEFAULT_ADVANCED_THRESHOLD: u64 = 100;

/// Recommended team size used when a goal carries none.
pub const DEFAULT_TEAM_SIZE: usize = 5;

/// Smallest usable recommended team size.
///
/// One seat is reserved for an advanced participant, so anything below 2
/// leaves no room for regular participants.
pub const MIN_TEAM_SIZE: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_team_size_is_usable() {
        assert!(DEFAULT_TEAM_SIZE >= MIN_TEAM_SIZE);
    }

    #[test]
    fn advanced_threshold_is_one_hundred() {
        assert_eq!(DEFAULT_ADVANCED_THRESHOLD, 100);
    }
}
