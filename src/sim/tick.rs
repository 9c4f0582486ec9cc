//! Round state machine
//!
//! Poll-driven: the host calls [`tick`] every frame. Time-based holds count
//! down `phase_timer`; input and choice phases simply yield until something
//! arrives. Resolution runs to completion inside a single tick.

use super::action::{ActionKind, resolve_actions};
use super::chest::drift_chest;
use super::outcome::{Outcome, Verdict, select_outcome};
use super::state::{MatchState, RoundPhase, Side};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Action for whichever token is active
    pub action: Option<ActionKind>,
    /// Share decision (Choice phase only)
    pub share: Option<bool>,
}

impl TickInput {
    pub fn action(action: ActionKind) -> Self {
        Self {
            action: Some(action),
            ..Default::default()
        }
    }

    pub fn choice(share: bool) -> Self {
        Self {
            share: Some(share),
            ..Default::default()
        }
    }
}

/// Advance the match by one tick of `dt` seconds
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;

    if let Some(action) = input.action {
        state.submit_action(action);
    }
    if let Some(share) = input.share {
        state.submit_choice(share);
    }

    match state.phase {
        RoundPhase::RoundStart => {
            state.phase_timer -= dt;
            if state.phase_timer <= 0.0 {
                state.enter_phase(RoundPhase::PlayerInput { active: Side::A }, 0.0);
            }
        }

        // Yield until both tokens have chosen; submit_action moves us on
        RoundPhase::PlayerInput { .. } => {}

        RoundPhase::Calculating => {
            state.phase_timer -= dt;
            if state.phase_timer <= 0.0 {
                resolve_round(state);
            }
        }

        // Waits indefinitely for submit_choice
        RoundPhase::Choice => {}
    }
}

/// Resolve the locked-in actions and decide what happens next
pub fn resolve_round(state: &mut MatchState) {
    let (Some(action_a), Some(action_b)) = (state.a.action, state.b.action) else {
        log::error!("resolve_round called before both players chose; skipping");
        return;
    };

    log::debug!(
        "resolving: A={} ({:?}), B={} ({:?}), chest={}",
        state.a.position,
        action_a,
        state.b.position,
        action_b,
        state.chest.position
    );

    let (new_a, new_b) = resolve_actions(action_a, action_b, state.a.position, state.b.position);
    state.a.position = new_a;
    state.b.position = new_b;

    let drift = drift_chest(state.chest.position, new_a, new_b);
    state.chest.position = drift.to;
    state.a.reached_chest = drift.reached_a;
    state.b.reached_chest = drift.reached_b;
    state.push_positions();

    let rules = *state.rules();
    match select_outcome(&drift, new_a, new_b, &rules, state.rounds_remaining) {
        Verdict::AwaitChoice => {
            log::info!(
                "chest swept [{}, {}] and reached A={} B={}",
                drift.span().0,
                drift.span().1,
                drift.reached_a,
                drift.reached_b
            );
            state.enter_phase(RoundPhase::Choice, 0.0);
        }
        Verdict::Decided(Outcome::Continue) => {
            state.rounds_remaining -= 1;
            state.begin_round();
        }
        Verdict::Decided(Outcome::RoundsExhausted) => {
            state.rounds_remaining = state.rounds_remaining.saturating_sub(1);
            state.finish(Outcome::RoundsExhausted);
        }
        Verdict::Decided(outcome) => state.finish(outcome),
    }
}
