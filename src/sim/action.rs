//! Player actions and the round resolver
//!
//! Both tokens pick one action per round. Resolution happens in three passes
//! so the result never depends on which token is applied first:
//! 1. Reversal: `ReverseEnemy` flips the opponent's self-move
//! 2. Effect: each action becomes a signed (self, opponent) contribution
//! 3. Combine: contributions are summed onto the pre-round snapshot

use serde::{Deserialize, Serialize};

use super::state::Side;
use crate::consts::ACTION_TRIGGER_COUNT;

/// The six fixed action kinds, in trigger order (keys 1-6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Move own token +1
    SelfAdd1,
    /// Move own token -1
    SelfMinus1,
    /// Move opponent token +1
    EnemyAdd1,
    /// Move opponent token -1
    EnemyMinus1,
    /// Flip the opponent's self-move this round
    ReverseEnemy,
    Nothing,
}

impl ActionKind {
    pub const ALL: [ActionKind; ACTION_TRIGGER_COUNT] = [
        ActionKind::SelfAdd1,
        ActionKind::SelfMinus1,
        ActionKind::EnemyAdd1,
        ActionKind::EnemyMinus1,
        ActionKind::ReverseEnemy,
        ActionKind::Nothing,
    ];

    /// Map a 1-based trigger (key `1`..`6`) to its action
    pub fn from_trigger(trigger: u8) -> Option<Self> {
        match trigger {
            1..=6 => Some(Self::ALL[(trigger - 1) as usize]),
            _ => None,
        }
    }

    /// 1-based trigger bound to this action
    pub fn trigger(self) -> u8 {
        match self {
            ActionKind::SelfAdd1 => 1,
            ActionKind::SelfMinus1 => 2,
            ActionKind::EnemyAdd1 => 3,
            ActionKind::EnemyMinus1 => 4,
            ActionKind::ReverseEnemy => 5,
            ActionKind::Nothing => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::SelfAdd1 => "Self +1",
            ActionKind::SelfMinus1 => "Self -1",
            ActionKind::EnemyAdd1 => "Enemy +1",
            ActionKind::EnemyMinus1 => "Enemy -1",
            ActionKind::ReverseEnemy => "Reverse Enemy",
            ActionKind::Nothing => "Nothing",
        }
    }

    /// Signed contribution as `(effect on acting token, effect on opponent)`
    pub fn effect(self) -> (i32, i32) {
        match self {
            ActionKind::SelfAdd1 => (1, 0),
            ActionKind::SelfMinus1 => (-1, 0),
            ActionKind::EnemyAdd1 => (0, 1),
            ActionKind::EnemyMinus1 => (0, -1),
            ActionKind::ReverseEnemy | ActionKind::Nothing => (0, 0),
        }
    }

    /// The action as seen after an opponent's `ReverseEnemy`
    fn reversed(self) -> Self {
        match self {
            ActionKind::SelfAdd1 => ActionKind::SelfMinus1,
            ActionKind::SelfMinus1 => ActionKind::SelfAdd1,
            other => other,
        }
    }
}

/// Apply the reversal pass to a pair of chosen actions.
///
/// Both reversals read the unreversed choices, so mutual `ReverseEnemy`
/// never compounds: each side simply becomes `Nothing`.
pub fn apply_reversal(a: ActionKind, b: ActionKind) -> (ActionKind, ActionKind) {
    let mut final_a = a;
    let mut final_b = b;

    if a == ActionKind::ReverseEnemy {
        final_b = b.reversed();
        final_a = ActionKind::Nothing;
    }
    if b == ActionKind::ReverseEnemy {
        final_a = a.reversed();
        final_b = ActionKind::Nothing;
    }

    // A reversed ReverseEnemy is still ReverseEnemy; it has no effect either way
    if final_a == ActionKind::ReverseEnemy {
        final_a = ActionKind::Nothing;
    }
    if final_b == ActionKind::ReverseEnemy {
        final_b = ActionKind::Nothing;
    }

    (final_a, final_b)
}

/// Contribution of one side's action to `(delta A, delta B)`
pub fn contribution(actor: Side, action: ActionKind) -> (i32, i32) {
    let (on_self, on_opponent) = action.effect();
    match actor {
        Side::A => (on_self, on_opponent),
        Side::B => (on_opponent, on_self),
    }
}

/// Resolve one round: both actions against the same pre-round snapshot.
///
/// Returns the new `(A position, B position)`.
pub fn resolve_actions(action_a: ActionKind, action_b: ActionKind, pos_a: i32, pos_b: i32) -> (i32, i32) {
    let (final_a, final_b) = apply_reversal(action_a, action_b);

    let (a_on_a, a_on_b) = contribution(Side::A, final_a);
    let (b_on_a, b_on_b) = contribution(Side::B, final_b);

    log::debug!(
        "resolve: A {:?}->{:?}, B {:?}->{:?}, deltas A={:+} B={:+}",
        action_a,
        final_a,
        action_b,
        final_b,
        a_on_a + b_on_a,
        a_on_b + b_on_b
    );

    (
        pos_a.saturating_add(a_on_a + b_on_a),
        pos_b.saturating_add(a_on_b + b_on_b),
    )
}
