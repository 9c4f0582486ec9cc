//! Match outcome selection
//!
//! Evaluated once per round after the chest has drifted. Priority:
//! chest overlap, then bounds, then round budget.

use serde::{Deserialize, Serialize};

use super::chest::DriftReport;
use super::state::MatchRules;

/// How a round (or the match) ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Not terminal: play another round
    Continue,
    /// Budget used up with nobody reaching the chest
    RoundsExhausted,
    /// A token left the axis
    BoundsViolated,
    /// The chest reached a token and the players decided whether to share
    SharedObjectReached { sharing: bool },
}

impl Outcome {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Continue)
    }

    /// Ending routed to by the scene collaborator
    pub fn ending(&self) -> Option<Ending> {
        match self {
            Outcome::Continue => None,
            Outcome::RoundsExhausted => Some(Ending::Unknown),
            Outcome::SharedObjectReached { sharing: true } => Some(Ending::WinWin),
            Outcome::SharedObjectReached { sharing: false } | Outcome::BoundsViolated => {
                Some(Ending::Fail)
            }
        }
    }
}

/// End screens a finished match routes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ending {
    /// Both players shared the chest
    WinWin,
    /// Someone fell off, or refused to share
    Fail,
    /// The rounds ran out first
    Unknown,
}

impl Ending {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ending::WinWin => "WinWinEnd",
            Ending::Fail => "FailEnd",
            Ending::Unknown => "UnknownEnd",
        }
    }
}

/// Result of evaluating a resolved round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The chest reached a token: the players must decide
    AwaitChoice,
    /// Decided without a choice (`Continue` or a terminal outcome)
    Decided(Outcome),
}

/// Pick the verdict for a round.
///
/// `rounds_remaining` is the budget before this round is counted; the
/// caller decrements it when the verdict is `Continue` or `RoundsExhausted`.
pub fn select_outcome(
    drift: &DriftReport,
    new_a: i32,
    new_b: i32,
    rules: &MatchRules,
    rounds_remaining: u32,
) -> Verdict {
    if drift.overlap() {
        return Verdict::AwaitChoice;
    }

    if !rules.in_bounds(new_a) || !rules.in_bounds(new_b) {
        log::info!(
            "token out of bounds: A={}, B={}, bounds=[{}, {}]",
            new_a,
            new_b,
            rules.min_position,
            rules.max_position
        );
        return Verdict::Decided(Outcome::BoundsViolated);
    }

    if rounds_remaining.saturating_sub(1) == 0 {
        return Verdict::Decided(Outcome::RoundsExhausted);
    }

    Verdict::Decided(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::chest::drift_chest;

    #[test]
    fn test_overlap_beats_bounds() {
        let rules = MatchRules::default();
        // A is out of bounds but the chest sweeps 0 -> 14 over it
        let drift = drift_chest(0, 11, 3);
        assert!(drift.reached_a);
        assert_eq!(select_outcome(&drift, 11, 3, &rules, 5), Verdict::AwaitChoice);
    }

    #[test]
    fn test_bounds_violation() {
        let rules = MatchRules::default();
        let drift = drift_chest(0, -4, 11);
        assert!(!drift.overlap());
        assert_eq!(
            select_outcome(&drift, -4, 11, &rules, 5),
            Verdict::Decided(Outcome::BoundsViolated)
        );
    }

    #[test]
    fn test_bounds_beats_exhaustion() {
        let rules = MatchRules::default();
        let drift = drift_chest(0, -4, 11);
        assert_eq!(
            select_outcome(&drift, -4, 11, &rules, 1),
            Verdict::Decided(Outcome::BoundsViolated)
        );
    }

    #[test]
    fn test_last_round_exhausts() {
        let rules = MatchRules::default();
        let drift = drift_chest(0, -4, 6);
        assert_eq!(
            select_outcome(&drift, -4, 6, &rules, 1),
            Verdict::Decided(Outcome::RoundsExhausted)
        );
        assert_eq!(
            select_outcome(&drift, -4, 6, &rules, 2),
            Verdict::Decided(Outcome::Continue)
        );
    }

    #[test]
    fn test_endings() {
        assert_eq!(Outcome::Continue.ending(), None);
        assert_eq!(Outcome::RoundsExhausted.ending(), Some(Ending::Unknown));
        assert_eq!(Outcome::BoundsViolated.ending(), Some(Ending::Fail));
        assert_eq!(
            Outcome::SharedObjectReached { sharing: true }.ending(),
            Some(Ending::WinWin)
        );
        assert_eq!(
            Outcome::SharedObjectReached { sharing: false }.ending(),
            Some(Ending::Fail)
        );
        assert!(!Outcome::Continue.is_terminal());
        assert!(Outcome::BoundsViolated.is_terminal());
    }
}
