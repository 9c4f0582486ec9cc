//! Match host: owns a match and its observers
//!
//! Observers are registered explicitly and live exactly as long as the host
//! (or until unsubscribed). Events queued by the simulation are dispatched
//! in emission order after every [`MatchHost::advance`] and inbound call.

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::{
    ActionKind, GameEvent, MatchRules, MatchState, Outcome, PhaseContext, RoundPhase, TickInput,
    tick,
};

/// Receives outbound match notifications. All methods default to no-ops.
pub trait MatchObserver {
    /// New token and chest positions (also sent once at match creation)
    fn on_positions_changed(&mut self, _a: i32, _b: i32, _chest: i32) {}

    fn on_phase_changed(&mut self, _phase: RoundPhase, _context: &PhaseContext) {}

    /// Fired exactly once per match
    fn on_match_ended(&mut self, _outcome: Outcome) {}
}

/// Lets a host keep its own handle to an observer it registered
impl<T: MatchObserver> MatchObserver for Rc<RefCell<T>> {
    fn on_positions_changed(&mut self, a: i32, b: i32, chest: i32) {
        self.borrow_mut().on_positions_changed(a, b, chest);
    }

    fn on_phase_changed(&mut self, phase: RoundPhase, context: &PhaseContext) {
        self.borrow_mut().on_phase_changed(phase, context);
    }

    fn on_match_ended(&mut self, outcome: Outcome) {
        self.borrow_mut().on_match_ended(outcome);
    }
}

/// Handle returned by [`MatchHost::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// A running match plus the observers scoped to it
pub struct MatchHost {
    state: MatchState,
    observers: Vec<(ObserverId, Box<dyn MatchObserver>)>,
    next_observer: u32,
}

impl MatchHost {
    pub fn new(rules: MatchRules) -> Self {
        Self {
            state: MatchState::new(rules),
            observers: Vec::new(),
            next_observer: 1,
        }
    }

    #[inline]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Register an observer; it receives every event not yet dispatched
    pub fn subscribe(&mut self, observer: Box<dyn MatchObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, observer));
        log::debug!("observer {:?} subscribed", id);
        id
    }

    /// Remove an observer, handing it back to the caller
    pub fn unsubscribe(&mut self, id: ObserverId) -> Option<Box<dyn MatchObserver>> {
        let index = self.observers.iter().position(|(oid, _)| *oid == id)?;
        log::debug!("observer {:?} unsubscribed", id);
        Some(self.observers.remove(index).1)
    }

    /// Run one tick and dispatch what it produced
    pub fn advance(&mut self, input: &TickInput, dt: f32) {
        tick(&mut self.state, input, dt);
        self.dispatch();
    }

    /// Inbound action for the active token (no-op outside `PlayerInput`)
    pub fn submit_action(&mut self, action: ActionKind) -> bool {
        let accepted = self.state.submit_action(action);
        self.dispatch();
        accepted
    }

    /// Inbound 1-based trigger (keys 1-6); anything else is ignored
    pub fn submit_trigger(&mut self, trigger: u8) -> bool {
        let accepted = self.state.submit_trigger(trigger);
        self.dispatch();
        accepted
    }

    /// Inbound share decision (no-op outside `Choice`)
    pub fn submit_choice(&mut self, share: bool) -> bool {
        let accepted = self.state.submit_choice(share);
        self.dispatch();
        accepted
    }

    /// Deliver queued events to every observer, in order
    pub fn dispatch(&mut self) {
        for event in self.state.take_events() {
            for (_, observer) in self.observers.iter_mut() {
                match &event {
                    GameEvent::PositionsChanged { a, b, chest } => {
                        observer.on_positions_changed(*a, *b, *chest)
                    }
                    GameEvent::PhaseChanged { phase, context } => {
                        observer.on_phase_changed(*phase, context)
                    }
                    GameEvent::MatchEnded { outcome } => observer.on_match_ended(*outcome),
                }
            }
        }
    }
}

impl Drop for MatchHost {
    fn drop(&mut self) {
        if !self.observers.is_empty() {
            log::debug!("match host dropped; releasing {} observers", self.observers.len());
        }
        self.observers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        positions: Vec<(i32, i32, i32)>,
        phases: Vec<RoundPhase>,
        endings: Vec<Outcome>,
    }

    impl MatchObserver for Recorder {
        fn on_positions_changed(&mut self, a: i32, b: i32, chest: i32) {
            self.positions.push((a, b, chest));
        }

        fn on_phase_changed(&mut self, phase: RoundPhase, _context: &PhaseContext) {
            self.phases.push(phase);
        }

        fn on_match_ended(&mut self, outcome: Outcome) {
            self.endings.push(outcome);
        }
    }

    #[test]
    fn test_initial_events_reach_early_subscribers() {
        let mut host = MatchHost::new(MatchRules::default());
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        host.subscribe(Box::new(recorder.clone()));
        host.dispatch();

        let rec = recorder.borrow();
        assert_eq!(rec.positions, vec![(-5, 5, 0)]);
        assert_eq!(rec.phases, vec![RoundPhase::RoundStart]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut host = MatchHost::new(MatchRules::default());
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let id = host.subscribe(Box::new(recorder.clone()));
        assert!(host.unsubscribe(id).is_some());
        assert!(host.unsubscribe(id).is_none());
        assert_eq!(host.observer_count(), 0);

        host.dispatch();
        assert!(recorder.borrow().positions.is_empty());
    }

    #[test]
    fn test_drop_releases_observers() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        {
            let mut host = MatchHost::new(MatchRules::default());
            host.subscribe(Box::new(recorder.clone()));
            assert_eq!(Rc::strong_count(&recorder), 2);
        }
        assert_eq!(Rc::strong_count(&recorder), 1);
    }

    #[test]
    fn test_ignored_input_reports_false() {
        let mut host = MatchHost::new(MatchRules::default());
        assert!(!host.submit_action(ActionKind::SelfAdd1));
        assert!(!host.submit_choice(false));
        assert!(!host.submit_trigger(3));
    }
}
