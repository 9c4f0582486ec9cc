//! Presentation helpers: status banner, name highlighting, axis strip
//!
//! Pure functions of the match state. Nothing here feeds back into the sim.

use crate::settings::{Palette, Rgba};
use crate::sim::{ActionKind, MatchState, RoundPhase, Side};

/// Font scale applied to a highlighted name
pub const HIGHLIGHT_FONT_SCALE: f32 = 2.0;

/// Banner text for the current phase
pub fn status_text(state: &MatchState) -> String {
    match state.phase {
        RoundPhase::RoundStart => "Round Start".to_string(),
        RoundPhase::PlayerInput { active } => {
            if state.both_chosen() {
                "Both players have chosen".to_string()
            } else if !state.token(active).has_chosen() {
                format!("Waiting for Player {} (Press 1-6)", active.as_str())
            } else {
                "Waiting for player input".to_string()
            }
        }
        RoundPhase::Calculating => "Calculating...".to_string(),
        RoundPhase::Choice => match (state.a.reached_chest, state.b.reached_chest) {
            (true, true) => "Both players reached the chest! Choose whether to share".to_string(),
            (true, false) => "Player A reached the chest! Choose whether to share".to_string(),
            (false, true) => "Player B reached the chest! Choose whether to share".to_string(),
            (false, false) => "Player reached the chest! Choose whether to share".to_string(),
        },
    }
}

/// Whether a player's name should be highlighted.
///
/// During input the side waiting to choose is highlighted; during the
/// choice every side the chest reached is.
pub fn is_highlighted(state: &MatchState, side: Side) -> bool {
    let token = state.token(side);
    match state.phase {
        RoundPhase::PlayerInput { active } => active == side && !token.has_chosen(),
        RoundPhase::Choice => token.reached_chest,
        _ => false,
    }
}

/// How to draw a player's name
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameStyle {
    pub color: Rgba,
    /// Multiplier on the base font size
    pub font_scale: f32,
}

pub fn name_style(state: &MatchState, side: Side, palette: &Palette) -> NameStyle {
    let pair = match side {
        Side::A => palette.a,
        Side::B => palette.b,
    };
    if is_highlighted(state, side) {
        NameStyle {
            color: pair.highlight,
            font_scale: HIGHLIGHT_FONT_SCALE,
        }
    } else {
        NameStyle {
            color: pair.normal,
            font_scale: 1.0,
        }
    }
}

/// One line per action, as shown on the action panel
pub fn action_menu() -> Vec<String> {
    ActionKind::ALL
        .iter()
        .map(|action| format!("[{}] {}", action.trigger(), action.label()))
        .collect()
}

/// Text strip of the axis, one cell per position.
///
/// `A`/`B` mark tokens, `C` the chest, `*` shared cells. A chest beyond
/// the bounds is drawn as `<` or `>` at the matching end.
pub fn axis_strip(state: &MatchState) -> String {
    let rules = state.rules();
    let (a, b, chest) = (state.a.position, state.b.position, state.chest.position);

    let cell = |pos: i32| -> char {
        let here = [a == pos, b == pos, chest == pos];
        match here.iter().filter(|h| **h).count() {
            0 => {
                if pos == 0 {
                    '|'
                } else {
                    '-'
                }
            }
            1 if here[0] => 'A',
            1 if here[1] => 'B',
            1 => 'C',
            _ => '*',
        }
    };

    let left = if chest < rules.min_position { '<' } else { '[' };
    let right = if chest > rules.max_position { '>' } else { ']' };

    let mut strip = String::new();
    strip.push(left);
    strip.extend((rules.min_position..=rules.max_position).map(cell));
    strip.push(right);
    strip
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{MatchRules, TickInput, tick};

    fn input_phase() -> MatchState {
        let mut state = MatchState::new(MatchRules {
            round_start_secs: 0.0,
            ..Default::default()
        });
        tick(&mut state, &TickInput::default(), 0.1);
        state
    }

    #[test]
    fn test_status_follows_turns() {
        let mut state = MatchState::new(MatchRules::default());
        assert_eq!(status_text(&state), "Round Start");

        state = input_phase();
        assert_eq!(status_text(&state), "Waiting for Player A (Press 1-6)");
        state.submit_action(ActionKind::Nothing);
        assert_eq!(status_text(&state), "Waiting for Player B (Press 1-6)");
        state.submit_action(ActionKind::Nothing);
        assert_eq!(status_text(&state), "Calculating...");
    }

    #[test]
    fn test_highlight_active_player() {
        let palette = Settings::default().palette();
        let mut state = input_phase();

        let a = name_style(&state, Side::A, &palette);
        assert_eq!(a.font_scale, 2.0);
        assert_eq!(a.color.to_rgb_u32(), 0xFFFF00);
        assert_eq!(name_style(&state, Side::B, &palette).font_scale, 1.0);

        state.submit_action(ActionKind::SelfAdd1);
        assert!(!is_highlighted(&state, Side::A));
        let b = name_style(&state, Side::B, &palette);
        assert_eq!(b.color.to_rgb_u32(), 0xFF0000);
    }

    #[test]
    fn test_choice_highlights_reached_players() {
        let mut state = MatchState::new(MatchRules {
            initial_a: 2,
            initial_b: 5,
            round_start_secs: 0.0,
            calculating_secs: 0.0,
            ..Default::default()
        });
        tick(&mut state, &TickInput::default(), 0.1);
        tick(&mut state, &TickInput::action(ActionKind::Nothing), 0.1);
        tick(&mut state, &TickInput::action(ActionKind::Nothing), 0.1);

        // 0 + 2 + 5 = 7, path [0, 7] covers both
        assert_eq!(state.phase, RoundPhase::Choice);
        assert!(is_highlighted(&state, Side::A));
        assert!(is_highlighted(&state, Side::B));
        assert_eq!(
            status_text(&state),
            "Both players reached the chest! Choose whether to share"
        );
    }

    #[test]
    fn test_axis_strip() {
        let state = MatchState::new(MatchRules {
            min_position: -3,
            max_position: 3,
            initial_a: -2,
            initial_b: 2,
            initial_chest: 2,
            ..Default::default()
        });
        assert_eq!(axis_strip(&state), "[-A-|-*-]");

        let state = MatchState::new(MatchRules {
            min_position: -3,
            max_position: 3,
            initial_a: -1,
            initial_b: 1,
            initial_chest: 9,
            ..Default::default()
        });
        assert_eq!(axis_strip(&state), "[--A|B-->");
    }

    #[test]
    fn test_action_menu() {
        let menu = action_menu();
        assert_eq!(menu.len(), 6);
        assert_eq!(menu[0], "[1] Self +1");
        assert_eq!(menu[4], "[5] Reverse Enemy");
    }
}
