//! Balance Chest entry point
//!
//! Console host: drives the match one fixed tick at a time, reading moves
//! from stdin or from a seeded demo bot.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use balance_chest::consts::SIM_DT;
use balance_chest::settings::Palette;
use balance_chest::sim::{ActionKind, Ending, Outcome, RoundPhase, Side, TickInput};
use balance_chest::ui;
use balance_chest::{AxisView, Entity, MatchHost, MatchObserver, Settings};

/// Balance Chest console host
#[derive(Debug, Parser)]
#[command(name = "balance-chest")]
#[command(about = "Two-player see-saw balance game", long_about = None)]
struct Options {
    /// Settings JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Let a seeded bot play both sides
    #[arg(long, value_name = "SEED")]
    demo: Option<u64>,

    /// Print a JSON summary when the match ends
    #[arg(long)]
    json: bool,
}

/// Routes the finished match to its ending screen
#[derive(Debug, Default)]
struct EndingRouter {
    ending: Option<Ending>,
}

impl MatchObserver for EndingRouter {
    fn on_match_ended(&mut self, outcome: Outcome) {
        self.ending = outcome.ending();
        if let Some(ending) = self.ending {
            log::info!("Switching to {}", ending.as_str());
        }
    }
}

/// Where moves come from
enum Controller {
    Console,
    /// Demo bot: plays random moves from a seeded RNG
    Bot(Pcg32),
}

impl Controller {
    fn pick_action(&mut self, side: Side) -> Option<ActionKind> {
        match self {
            Controller::Bot(rng) => {
                let action = ActionKind::ALL[rng.random_range(0..ActionKind::ALL.len())];
                println!("Player {} picks [{}] {}", side.as_str(), action.trigger(), action.label());
                Some(action)
            }
            Controller::Console => loop {
                let line = prompt(&format!("Player {} action (1-6, q to quit): ", side.as_str()))?;
                let line = line.trim();
                if line.eq_ignore_ascii_case("q") {
                    return None;
                }
                match line.parse::<u8>().ok().and_then(ActionKind::from_trigger) {
                    Some(action) => return Some(action),
                    None => println!("Press a key from 1 to 6"),
                }
            },
        }
    }

    fn pick_share(&mut self) -> Option<bool> {
        match self {
            Controller::Bot(rng) => {
                let share = rng.random_bool(0.5);
                println!("Decision: {}", if share { "share" } else { "don't share" });
                Some(share)
            }
            Controller::Console => loop {
                let line = prompt("Share the chest? (s = share, n = don't, q to quit): ")?;
                match line.trim().to_ascii_lowercase().as_str() {
                    "s" | "share" | "y" => return Some(true),
                    "n" | "no" => return Some(false),
                    "q" => return None,
                    _ => println!("Answer s or n"),
                }
            },
        }
    }
}

/// Read one line from stdin; `None` on EOF or read error
fn prompt(text: &str) -> Option<String> {
    print!("{}", text);
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(err) => {
            log::error!("stdin read failed: {}", err);
            None
        }
    }
}

/// Final report printed with `--json`
#[derive(Debug, Serialize)]
struct MatchSummary {
    outcome: Option<Outcome>,
    ending: Option<&'static str>,
    rounds_remaining: u32,
    token_a: i32,
    token_b: i32,
    chest: i32,
    axis_rotation_deg: f32,
}

fn print_status(host: &MatchHost, view: &AxisView, palette: &Palette) {
    let state = host.state();
    println!();
    println!("Round {} | {}", state.rounds_remaining, ui::status_text(state));
    println!("  {}", ui::axis_strip(state));

    for (side, entity) in [(Side::A, Entity::TokenA), (Side::B, Entity::TokenB)] {
        let style = ui::name_style(state, side, palette);
        let marker = if style.font_scale > 1.0 { ">>" } else { "  " };
        // Where the token settles; the view may still be tweening toward it
        let placed = view
            .target_placement(entity)
            .map(|p| format!("({:.1}, {:.1})", p.position.x, p.position.y))
            .unwrap_or_else(|_| "-".to_string());
        println!(
            "{} Player {} [#{:06X}] at {:>3}  world {}",
            marker,
            side.as_str(),
            style.color.to_rgb_u32(),
            state.token(side).position,
            placed
        );
    }
    println!(
        "   Chest at {:>3}, axis tilt {:+.1}°",
        state.chest.position,
        view.target_pose().rotation_deg
    );
}

fn main() {
    env_logger::init();
    let options = Options::parse();
    log::info!("Balance Chest starting...");

    let settings = Settings::load_or_default(options.config.as_deref());
    let palette = settings.palette();
    let rules = settings.match_rules();

    let mut host = MatchHost::new(rules);
    let view = Rc::new(RefCell::new(AxisView::new(
        Some(settings.axis_geometry()),
        settings.unit_degree,
        settings.height_offsets(),
        settings.smooth_secs,
    )));
    let router = Rc::new(RefCell::new(EndingRouter::default()));
    host.subscribe(Box::new(view.clone()));
    host.subscribe(Box::new(router.clone()));

    let mut controller = match options.demo {
        Some(seed) => {
            log::info!("Demo mode with seed: {}", seed);
            Controller::Bot(Pcg32::seed_from_u64(seed))
        }
        None => {
            for line in ui::action_menu() {
                println!("{}", line);
            }
            Controller::Console
        }
    };

    let mut input = TickInput::default();
    let mut last_phase: Option<RoundPhase> = None;
    let mut abandoned = false;

    while !host.is_over() {
        host.advance(&input, SIM_DT);
        view.borrow_mut().advance(SIM_DT);
        input = TickInput::default();

        let phase = host.state().phase;
        if last_phase != Some(phase) {
            print_status(&host, &view.borrow(), &palette);
            last_phase = Some(phase);
        }
        if host.is_over() {
            break;
        }

        match phase {
            RoundPhase::PlayerInput { active } => match controller.pick_action(active) {
                Some(action) => input = TickInput::action(action),
                None => {
                    abandoned = true;
                    break;
                }
            },
            RoundPhase::Choice => match controller.pick_share() {
                Some(share) => input = TickInput::choice(share),
                None => {
                    abandoned = true;
                    break;
                }
            },
            RoundPhase::RoundStart | RoundPhase::Calculating => {}
        }
    }

    if abandoned {
        log::info!("Match abandoned");
        return;
    }

    let state = host.state();
    let ending = router.borrow().ending;
    println!();
    match (state.outcome, ending) {
        (Some(outcome), Some(ending)) => println!("Match over: {:?} -> {}", outcome, ending.as_str()),
        (outcome, _) => println!("Match over: {:?}", outcome),
    }

    if options.json {
        let summary = MatchSummary {
            outcome: state.outcome,
            ending: ending.map(|e| e.as_str()),
            rounds_remaining: state.rounds_remaining,
            token_a: state.a.position,
            token_b: state.b.position,
            chest: state.chest.position,
            axis_rotation_deg: view.borrow().target_pose().rotation_deg,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(err) => log::error!("Failed to serialize summary: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_parse() {
        let options =
            Options::try_parse_from(["balance-chest", "--demo", "7", "--json", "--config", "m.json"])
                .unwrap();
        assert_eq!(options.demo, Some(7));
        assert!(options.json);
        assert_eq!(options.config, Some(PathBuf::from("m.json")));

        let options = Options::try_parse_from(["balance-chest"]).unwrap();
        assert_eq!(options.demo, None);
        assert!(!options.json);
    }

    #[test]
    fn test_options_reject_bad_input() {
        assert!(Options::try_parse_from(["balance-chest", "--demo", "abc"]).is_err());
        assert!(Options::try_parse_from(["balance-chest", "--demo"]).is_err());
        assert!(Options::try_parse_from(["balance-chest", "--fast"]).is_err());
    }
}
