//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all event sequences.

use super::*;
use crate::transcript::{Role, Turn};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Zéèà ?]{1,30}".prop_map(String::from),
        Just(String::new()),
        "[ \t\n]{1,5}".prop_map(String::from),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::StudentSubmit { text }),
        "[a-zA-Z .?]{0,40}".prop_map(|answer| Event::TutorAnswered { answer }),
        "[a-zA-Z ]{0,20}".prop_map(|message| Event::TutorFailed { message }),
    ]
}

fn arb_state() -> impl Strategy<Value = RequestState> {
    prop_oneof![Just(RequestState::Idle), Just(RequestState::Pending)]
}

// ============================================================================
// Model
// ============================================================================

#[derive(Default)]
struct Model {
    state: RequestState,
    turns: Vec<Turn>,
    requests: usize,
    accepted_submits: usize,
}

impl Model {
    fn apply(&mut self, event: Event) -> Result<(), TransitionError> {
        let is_submit = matches!(event, Event::StudentSubmit { .. });
        let result = transition(&self.state, event)?;
        self.state = result.new_state;
        if is_submit {
            self.accepted_submits += 1;
        }
        for effect in result.effects {
            match effect {
                Effect::AppendTurn(turn) => self.turns.push(turn),
                Effect::RequestTutor => self.requests += 1,
                Effect::ClearDraft => {}
            }
        }
        Ok(())
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Same state and event always give the same result
    #[test]
    fn prop_transition_is_deterministic(state in arb_state(), event in arb_event()) {
        let first = transition(&state, event.clone());
        let second = transition(&state, event);
        prop_assert_eq!(first, second);
    }

    /// A rejected event leaves the model exactly as it was
    #[test]
    fn prop_rejection_mutates_nothing(
        events in proptest::collection::vec(arb_event(), 0..20),
        probe in arb_event(),
    ) {
        let mut model = Model::default();
        for event in events {
            let _ = model.apply(event);
        }
        let (state, turns, requests) = (model.state, model.turns.clone(), model.requests);
        if model.apply(probe).is_err() {
            prop_assert_eq!(model.state, state);
            prop_assert_eq!(model.turns, turns);
            prop_assert_eq!(model.requests, requests);
        }
    }

    /// Turns strictly alternate student/tutor, starting with a student
    #[test]
    fn prop_turns_alternate(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut model = Model::default();
        for event in events {
            let _ = model.apply(event);
        }
        for (i, turn) in model.turns.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::Student } else { Role::Tutor };
            prop_assert_eq!(turn.role(), expected);
        }
    }

    /// Pending exactly while the last turn is an unanswered student turn
    #[test]
    fn prop_pending_iff_awaiting_tutor(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut model = Model::default();
        for event in events {
            let _ = model.apply(event);
            let awaiting = model.turns.last().map(Turn::role) == Some(Role::Student);
            prop_assert_eq!(model.state.is_pending(), awaiting);
        }
    }

    /// One student turn and one request per accepted submit
    #[test]
    fn prop_single_flight(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut model = Model::default();
        for event in events {
            let _ = model.apply(event);
        }
        let students = model.turns.iter().filter(|t| t.role() == Role::Student).count();
        prop_assert_eq!(students, model.accepted_submits);
        prop_assert_eq!(model.requests, model.accepted_submits);
    }

    /// Submits while pending are always rejected as in-flight
    #[test]
    fn prop_busy_submit_rejected(text in arb_text()) {
        let result = transition(&RequestState::Pending, Event::StudentSubmit { text });
        prop_assert_eq!(result, Err(TransitionError::RequestAlreadyInFlight));
    }

    /// Blank input never leaves Idle
    #[test]
    fn prop_blank_submit_rejected(text in "[ \t\n\r]{0,10}") {
        let result = transition(&RequestState::Idle, Event::StudentSubmit { text });
        prop_assert_eq!(result, Err(TransitionError::EmptyInput));
    }

    /// Every completion from Pending lands back in Idle
    #[test]
    fn prop_completion_always_idle(answer in ".{0,40}", failed in any::<bool>()) {
        let event = if failed {
            Event::TutorFailed { message: answer }
        } else {
            Event::TutorAnswered { answer }
        };
        let result = transition(&RequestState::Pending, event).unwrap();
        prop_assert_eq!(result.new_state, RequestState::Idle);
        prop_assert_eq!(result.effects.len(), 1);
    }
}
