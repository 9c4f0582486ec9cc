//! Deterministic round resolution
//!
//! All gameplay rules live here. This module must stay pure and deterministic:
//! - Integer positions only
//! - Both tokens resolve against the same pre-round snapshot
//! - No rendering or platform dependencies

pub mod action;
pub mod chest;
pub mod outcome;
pub mod state;
pub mod tick;

pub use action::{ActionKind, apply_reversal, contribution, resolve_actions};
pub use chest::{DriftReport, drift_chest, drift_target, path_contains};
pub use outcome::{Ending, Outcome, Verdict, select_outcome};
pub use state::{
    Chest, GameEvent, MatchRules, MatchState, PhaseContext, RoundPhase, Side, Token,
};
pub use tick::{TickInput, resolve_round, tick};
