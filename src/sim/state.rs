//! Match state and core simulation types
//!
//! The match owns every mutable piece of gameplay state. Collaborators only
//! read it, or feed it through `submit_*` and [`super::tick`].

use serde::{Deserialize, Serialize};

use super::action::ActionKind;
use super::outcome::Outcome;
use crate::consts::*;

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Round banner, held for a fixed delay
    RoundStart,
    /// Waiting for both players; `active` is the side whose input is accepted
    PlayerInput { active: Side },
    /// Actions locked in, resolution pending
    Calculating,
    /// The chest reached a token; waiting for share / not-share
    Choice,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::RoundStart => "RoundStart",
            RoundPhase::PlayerInput { .. } => "PlayerInput",
            RoundPhase::Calculating => "Calculating",
            RoundPhase::Choice => "Choice",
        }
    }
}

/// Rule parameters fixed at match creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchRules {
    /// Round budget
    pub max_rounds: u32,
    /// Lowest legal token position (inclusive)
    pub min_position: i32,
    /// Highest legal token position (inclusive)
    pub max_position: i32,
    pub initial_a: i32,
    pub initial_b: i32,
    pub initial_chest: i32,
    /// Seconds the round banner is held before input opens
    pub round_start_secs: f32,
    /// Seconds the "calculating" banner is held before resolution
    pub calculating_secs: f32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            min_position: DEFAULT_MIN_POSITION,
            max_position: DEFAULT_MAX_POSITION,
            initial_a: DEFAULT_INITIAL_A,
            initial_b: DEFAULT_INITIAL_B,
            initial_chest: DEFAULT_INITIAL_CHEST,
            round_start_secs: DEFAULT_ROUND_START_SECS,
            calculating_secs: DEFAULT_CALCULATING_SECS,
        }
    }
}

impl MatchRules {
    /// Whether a token position is inside the legal bounds
    #[inline]
    pub fn in_bounds(&self, pos: i32) -> bool {
        (self.min_position..=self.max_position).contains(&pos)
    }
}

/// A player-controlled token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub position: i32,
    /// Action committed this round (`None` until the player chooses)
    pub action: Option<ActionKind>,
    /// The chest's path crossed this token in the last resolution
    pub reached_chest: bool,
}

impl Token {
    pub fn new(position: i32) -> Self {
        Self {
            position,
            action: None,
            reached_chest: false,
        }
    }

    #[inline]
    pub fn has_chosen(&self) -> bool {
        self.action.is_some()
    }

    fn reset_round(&mut self) {
        self.action = None;
        self.reached_chest = false;
    }
}

/// The shared object both tokens drag around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chest {
    pub position: i32,
}

/// Snapshot handed to phase observers alongside the new phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseContext {
    pub rounds_remaining: u32,
    pub a_chosen: bool,
    pub b_chosen: bool,
    pub a_reached_chest: bool,
    pub b_reached_chest: bool,
}

/// Outbound notifications, queued during a tick and drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PositionsChanged { a: i32, b: i32, chest: i32 },
    PhaseChanged { phase: RoundPhase, context: PhaseContext },
    MatchEnded { outcome: Outcome },
}

/// Complete match state (deterministic, in-memory only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Rule parameters (immutable after creation)
    rules: MatchRules,
    /// Rounds left in the budget
    pub rounds_remaining: u32,
    /// Current phase
    pub phase: RoundPhase,
    /// Terminal outcome, set exactly once
    pub outcome: Option<Outcome>,
    pub a: Token,
    pub b: Token,
    pub chest: Chest,
    /// Seconds left on the current phase's hold
    pub phase_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending outbound events
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl MatchState {
    /// Create a match at its initial layout, entering the first round
    pub fn new(rules: MatchRules) -> Self {
        let mut state = Self {
            rules,
            rounds_remaining: rules.max_rounds,
            phase: RoundPhase::RoundStart,
            outcome: None,
            a: Token::new(rules.initial_a),
            b: Token::new(rules.initial_b),
            chest: Chest {
                position: rules.initial_chest,
            },
            phase_timer: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        };

        log::info!(
            "match created: A={}, B={}, chest={}, bounds=[{}, {}], rounds={}",
            state.a.position,
            state.b.position,
            state.chest.position,
            rules.min_position,
            rules.max_position,
            rules.max_rounds
        );

        state.push_positions();
        state.begin_round();
        state
    }

    #[inline]
    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn token(&self, side: Side) -> &Token {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn token_mut(&mut self, side: Side) -> &mut Token {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    /// Match has reached a terminal outcome
    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[inline]
    pub fn both_chosen(&self) -> bool {
        self.a.has_chosen() && self.b.has_chosen()
    }

    /// Side whose input is currently accepted, if any
    pub fn active_side(&self) -> Option<Side> {
        match self.phase {
            RoundPhase::PlayerInput { active } if !self.is_over() => Some(active),
            _ => None,
        }
    }

    pub fn context(&self) -> PhaseContext {
        PhaseContext {
            rounds_remaining: self.rounds_remaining,
            a_chosen: self.a.has_chosen(),
            b_chosen: self.b.has_chosen(),
            a_reached_chest: self.a.reached_chest,
            b_reached_chest: self.b.reached_chest,
        }
    }

    /// Commit an action for the active token.
    ///
    /// Ignored outside `PlayerInput` or when the active token already chose.
    /// Returns whether the action was accepted.
    pub fn submit_action(&mut self, action: ActionKind) -> bool {
        let Some(active) = self.active_side() else {
            log::debug!("action {:?} ignored in phase {}", action, self.phase.as_str());
            return false;
        };

        let token = self.token_mut(active);
        if token.has_chosen() {
            log::debug!("action {:?} ignored: {} already chose", action, active.as_str());
            return false;
        }
        token.action = Some(action);
        log::info!("player {} chose {:?}", active.as_str(), action);

        if self.both_chosen() {
            let hold = self.rules.calculating_secs;
            self.enter_phase(RoundPhase::Calculating, hold);
        } else {
            self.enter_phase(RoundPhase::PlayerInput { active: active.other() }, 0.0);
        }
        true
    }

    /// Commit the action bound to a 1-based trigger; out-of-range triggers are ignored
    pub fn submit_trigger(&mut self, trigger: u8) -> bool {
        match ActionKind::from_trigger(trigger) {
            Some(action) => self.submit_action(action),
            None => false,
        }
    }

    /// Resolve the share decision. Ignored outside `Choice`.
    pub fn submit_choice(&mut self, share: bool) -> bool {
        if self.phase != RoundPhase::Choice || self.is_over() {
            log::debug!("choice ignored in phase {}", self.phase.as_str());
            return false;
        }
        log::info!("chest decision: {}", if share { "share" } else { "not share" });
        self.finish(Outcome::SharedObjectReached { sharing: share });
        true
    }

    /// Drain queued outbound events in emission order
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset per-round bookkeeping and show the round banner
    pub(crate) fn begin_round(&mut self) {
        self.a.reset_round();
        self.b.reset_round();
        log::info!("round start ({} remaining)", self.rounds_remaining);
        let hold = self.rules.round_start_secs;
        self.enter_phase(RoundPhase::RoundStart, hold);
    }

    pub(crate) fn enter_phase(&mut self, phase: RoundPhase, hold_secs: f32) {
        self.phase = phase;
        self.phase_timer = hold_secs;
        self.events.push(GameEvent::PhaseChanged {
            phase,
            context: self.context(),
        });
    }

    pub(crate) fn push_positions(&mut self) {
        self.events.push(GameEvent::PositionsChanged {
            a: self.a.position,
            b: self.b.position,
            chest: self.chest.position,
        });
    }

    /// Record the terminal outcome; later calls are ignored
    pub(crate) fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_some() {
            return;
        }
        log::info!("match ended: {:?}", outcome);
        self.outcome = Some(outcome);
        self.events.push(GameEvent::MatchEnded { outcome });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_layout() {
        let mut state = MatchState::new(MatchRules::default());
        assert_eq!(state.a.position, -5);
        assert_eq!(state.b.position, 5);
        assert_eq!(state.chest.position, 0);
        assert_eq!(state.rounds_remaining, 10);
        assert_eq!(state.phase, RoundPhase::RoundStart);
        assert!(!state.is_over());

        let events = state.take_events();
        assert_eq!(events[0], GameEvent::PositionsChanged { a: -5, b: 5, chest: 0 });
        assert!(matches!(
            events[1],
            GameEvent::PhaseChanged {
                phase: RoundPhase::RoundStart,
                ..
            }
        ));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_actions_ignored_outside_input() {
        let mut state = MatchState::new(MatchRules::default());
        assert!(!state.submit_action(ActionKind::SelfAdd1));
        assert!(!state.a.has_chosen());
        assert!(!state.submit_choice(true));
        assert!(state.outcome.is_none());
    }

    #[test]
    fn test_strict_alternation() {
        let mut state = MatchState::new(MatchRules::default());
        state.enter_phase(RoundPhase::PlayerInput { active: Side::A }, 0.0);

        assert_eq!(state.active_side(), Some(Side::A));
        assert!(state.submit_action(ActionKind::EnemyAdd1));
        assert_eq!(state.a.action, Some(ActionKind::EnemyAdd1));
        assert_eq!(state.active_side(), Some(Side::B));

        assert!(state.submit_trigger(2));
        assert_eq!(state.b.action, Some(ActionKind::SelfMinus1));
        assert_eq!(state.phase, RoundPhase::Calculating);

        // Both committed: nothing more is accepted
        assert!(!state.submit_action(ActionKind::Nothing));
        assert_eq!(state.a.action, Some(ActionKind::EnemyAdd1));
    }

    #[test]
    fn test_out_of_range_trigger_ignored() {
        let mut state = MatchState::new(MatchRules::default());
        state.enter_phase(RoundPhase::PlayerInput { active: Side::A }, 0.0);
        assert!(!state.submit_trigger(0));
        assert!(!state.submit_trigger(9));
        assert_eq!(state.active_side(), Some(Side::A));
        assert!(!state.a.has_chosen());
    }

    #[test]
    fn test_finish_only_once() {
        let mut state = MatchState::new(MatchRules::default());
        state.take_events();
        state.finish(Outcome::BoundsViolated);
        state.finish(Outcome::RoundsExhausted);
        assert_eq!(state.outcome, Some(Outcome::BoundsViolated));
        let ended = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::MatchEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_in_bounds_inclusive() {
        let rules = MatchRules::default();
        assert!(rules.in_bounds(-10));
        assert!(rules.in_bounds(10));
        assert!(!rules.in_bounds(11));
        assert!(!rules.in_bounds(-11));
    }
}
