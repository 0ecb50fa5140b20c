//! Timeout fallback state machine.
//!
//! # States
//! - Initial: nothing sent yet
//! - AwaitingFirstResponse: initial request in flight
//! - Polling: got a 504, wait budget armed, one poll in flight
//! - Resolved: outcome produced; terminal
//!
//! # State Transitions
//! ```text
//! Initial → AwaitingFirstResponse: Start
//! AwaitingFirstResponse → Resolved: initial result other than 504
//! AwaitingFirstResponse → Polling: initial result 504 (arm budget, first poll)
//! Polling → Polling: poll result 204 (next poll)
//! Polling → Resolved: poll result other than 204 (cancel budget)
//! Polling → Resolved: budget expired
//! Resolved → Resolved: every event, no effects
//! ```
//!
//! # Design Decisions
//! - `transition` is pure; I/O and timers live in the controller
//! - Events that make no sense in the current state are ignored, which is
//!   what turns a late poll result or a late budget expiry into a no-op

use reqwest::StatusCode;

use crate::protocol::headers::{is_not_ready, should_poll};

/// Lifecycle of one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Initial,
    AwaitingFirstResponse,
    /// `polls` counts poll requests issued so far, including the one in flight.
    Polling { polls: u32 },
    Resolved,
}

/// Something the controller observed.
///
/// A `None` status means the round trip failed before any status arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start,
    InitialResult(Option<StatusCode>),
    PollResult(Option<StatusCode>),
    BudgetExpired,
}

/// Which result the dispatcher should receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The response that triggered the transition.
    Latest,
    /// The wait budget ran out; apply the expiry policy.
    BudgetExpired,
}

/// Work the controller must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    IssueInitial,
    StartBudget,
    IssuePoll,
    CancelBudget,
    Resolve(Resolution),
}

impl State {
    pub fn is_resolved(&self) -> bool {
        matches!(self, State::Resolved)
    }
}

/// Compute the next state and the effects to run.
pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    match (state, event) {
        (State::Initial, Event::Start) => (State::AwaitingFirstResponse, vec![Effect::IssueInitial]),

        (State::AwaitingFirstResponse, Event::InitialResult(Some(status))) if should_poll(status) => (
            State::Polling { polls: 1 },
            vec![Effect::StartBudget, Effect::IssuePoll],
        ),
        (State::AwaitingFirstResponse, Event::InitialResult(_)) => {
            (State::Resolved, vec![Effect::Resolve(Resolution::Latest)])
        }

        (State::Polling { polls }, Event::PollResult(Some(status))) if is_not_ready(status) => (
            State::Polling { polls: polls + 1 },
            vec![Effect::IssuePoll],
        ),
        (State::Polling { .. }, Event::PollResult(_)) => (
            State::Resolved,
            vec![Effect::CancelBudget, Effect::Resolve(Resolution::Latest)],
        ),
        (State::Polling { .. }, Event::BudgetExpired) => {
            (State::Resolved, vec![Effect::Resolve(Resolution::BudgetExpired)])
        }

        (state, _) => (state, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events: &[Event]) -> (State, Vec<Effect>) {
        let mut state = State::Initial;
        let mut all = Vec::new();
        for event in events {
            let (next, effects) = transition(state, *event);
            state = next;
            all.extend(effects);
        }
        (state, all)
    }

    #[test]
    fn test_fast_path_never_polls() {
        let (state, effects) = run(&[Event::Start, Event::InitialResult(Some(StatusCode::OK))]);
        assert_eq!(state, State::Resolved);
        assert_eq!(
            effects,
            vec![Effect::IssueInitial, Effect::Resolve(Resolution::Latest)]
        );
    }

    #[test]
    fn test_transport_failure_resolves_without_polling() {
        let (state, effects) = run(&[Event::Start, Event::InitialResult(None)]);
        assert_eq!(state, State::Resolved);
        assert!(!effects.contains(&Effect::IssuePoll));
        assert!(!effects.contains(&Effect::StartBudget));
    }

    #[test]
    fn test_other_server_errors_do_not_poll() {
        for status in [StatusCode::BAD_GATEWAY, StatusCode::SERVICE_UNAVAILABLE, StatusCode::NO_CONTENT] {
            let (state, effects) = run(&[Event::Start, Event::InitialResult(Some(status))]);
            assert_eq!(state, State::Resolved);
            assert!(!effects.contains(&Effect::IssuePoll), "{} must not poll", status);
        }
    }

    #[test]
    fn test_gateway_timeout_starts_budget_then_polls() {
        let (state, effects) = run(&[
            Event::Start,
            Event::InitialResult(Some(StatusCode::GATEWAY_TIMEOUT)),
        ]);
        assert_eq!(state, State::Polling { polls: 1 });
        assert_eq!(
            effects,
            vec![Effect::IssueInitial, Effect::StartBudget, Effect::IssuePoll]
        );
    }

    #[test]
    fn test_n_not_ready_polls_then_terminal() {
        let mut events = vec![
            Event::Start,
            Event::InitialResult(Some(StatusCode::GATEWAY_TIMEOUT)),
        ];
        events.extend(std::iter::repeat(Event::PollResult(Some(StatusCode::NO_CONTENT))).take(3));

        let (state, effects) = run(&events);
        assert_eq!(state, State::Polling { polls: 4 });
        assert_eq!(effects.iter().filter(|e| **e == Effect::IssuePoll).count(), 4);

        let (state, effects) = transition(state, Event::PollResult(Some(StatusCode::OK)));
        assert_eq!(state, State::Resolved);
        assert_eq!(
            effects,
            vec![Effect::CancelBudget, Effect::Resolve(Resolution::Latest)]
        );
    }

    #[test]
    fn test_poll_gateway_timeout_is_terminal() {
        let state = State::Polling { polls: 1 };
        let (state, effects) = transition(state, Event::PollResult(Some(StatusCode::GATEWAY_TIMEOUT)));
        assert_eq!(state, State::Resolved);
        assert_eq!(effects.last(), Some(&Effect::Resolve(Resolution::Latest)));
    }

    #[test]
    fn test_budget_expiry_resolves_without_more_polls() {
        let (state, effects) = transition(State::Polling { polls: 7 }, Event::BudgetExpired);
        assert_eq!(state, State::Resolved);
        assert_eq!(effects, vec![Effect::Resolve(Resolution::BudgetExpired)]);
    }

    #[test]
    fn test_late_events_after_resolution_are_noops() {
        for event in [
            Event::Start,
            Event::BudgetExpired,
            Event::PollResult(Some(StatusCode::OK)),
            Event::PollResult(Some(StatusCode::NO_CONTENT)),
            Event::InitialResult(Some(StatusCode::GATEWAY_TIMEOUT)),
        ] {
            let (state, effects) = transition(State::Resolved, event);
            assert_eq!(state, State::Resolved);
            assert!(effects.is_empty(), "{:?} must be ignored", event);
        }
    }

    #[test]
    fn test_budget_then_poll_race_resolves_once() {
        let (state, first) = transition(State::Polling { polls: 2 }, Event::BudgetExpired);
        let (state, second) = transition(state, Event::PollResult(Some(StatusCode::OK)));
        assert!(state.is_resolved());
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());

        let (state, first) = transition(State::Polling { polls: 2 }, Event::PollResult(Some(StatusCode::OK)));
        let (state, second) = transition(state, Event::BudgetExpired);
        assert!(state.is_resolved());
        assert!(first.contains(&Effect::CancelBudget));
        assert!(second.is_empty());
    }

    #[test]
    fn test_out_of_order_events_are_ignored() {
        assert_eq!(
            transition(State::Initial, Event::BudgetExpired),
            (State::Initial, Vec::new())
        );
        assert_eq!(
            transition(State::AwaitingFirstResponse, Event::PollResult(Some(StatusCode::OK))),
            (State::AwaitingFirstResponse, Vec::new())
        );
        assert_eq!(
            transition(State::Polling { polls: 1 }, Event::Start),
            (State::Polling { polls: 1 }, Vec::new())
        );
    }
}
