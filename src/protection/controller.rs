//! Timeout fallback controller.
//!
//! # Responsibilities
//! - Tag the initial request with the correlation ID
//! - Feed every observed result into the state machine
//! - Run the effects it asks for (issue, poll, arm or cancel the budget)
//! - Produce exactly one `Outcome`
//!
//! # Design Decisions
//! - One controller per logical request; nothing shared between requests
//! - One poll in flight at a time; the next poll is issued only after the
//!   previous result is known
//! - The budget is a `tokio::time::Sleep` raced against the in-flight poll;
//!   whichever loses is dropped, so a late result is never observed

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep, Sleep};

use crate::config::{BudgetExpiry, PollingConfig};
use crate::error::Error;
use crate::observability::metrics::{self, RequestPath};
use crate::protection::outcome::Outcome;
use crate::protection::state::{transition, Effect, Event, Resolution, State};
use crate::protocol::correlation::CorrelationId;
use crate::protocol::headers::{should_poll, Marker};
use crate::transport::{OutboundRequest, RequestIssuer, Response};

/// Drives one logical request to its outcome.
pub struct Controller<'a, I> {
    issuer: &'a I,
    polling: &'a PollingConfig,
    id: CorrelationId,
    initial: Option<OutboundRequest>,
    poll: OutboundRequest,
    state: State,
    polls: u32,
}

impl<'a, I: RequestIssuer> Controller<'a, I> {
    /// Prepare the tagged initial request and the poll template.
    pub fn new(
        issuer: &'a I,
        polling: &'a PollingConfig,
        id: CorrelationId,
        request: OutboundRequest,
    ) -> Result<Self, Error> {
        let (name, value) = Marker::Poll.header(&id)?;
        let mut poll = OutboundRequest::new(request.verb, request.url.clone());
        poll.headers.insert(name, value);

        let (name, value) = Marker::InitialRequest.header(&id)?;
        let mut initial = request;
        initial.headers.insert(name, value);

        Ok(Self {
            issuer,
            polling,
            id,
            initial: Some(initial),
            poll,
            state: State::Initial,
            polls: 0,
        })
    }

    fn apply(&mut self, event: Event) -> Vec<Effect> {
        let (next, effects) = transition(self.state, event);
        tracing::trace!(
            correlation_id = %self.id,
            from = ?self.state,
            to = ?next,
            event = ?event,
            "State transition"
        );
        self.state = next;
        effects
    }

    /// Run the request to completion.
    pub async fn run(mut self) -> Outcome {
        let mut latest: Option<Result<Response, Error>> = None;
        let mut gateway_timeout: Option<Response> = None;
        let mut budget: Option<Pin<Box<Sleep>>> = None;
        let mut effects: VecDeque<Effect> = self.apply(Event::Start).into();

        while let Some(effect) = effects.pop_front() {
            match effect {
                Effect::IssueInitial => {
                    let Some(request) = self.initial.take() else {
                        continue;
                    };
                    tracing::debug!(
                        correlation_id = %self.id,
                        verb = %request.verb,
                        url = %request.url,
                        "Issuing initial request"
                    );
                    let result = self.issuer.issue(request).await;
                    let status = result.as_ref().ok().map(|r| r.status);
                    if let Ok(response) = &result {
                        if should_poll(response.status) {
                            gateway_timeout = Some(response.clone());
                        }
                    }
                    latest = Some(result);
                    effects.extend(self.apply(Event::InitialResult(status)));
                }
                Effect::StartBudget => {
                    tracing::info!(
                        correlation_id = %self.id,
                        url = %self.poll.url,
                        budget_ms = self.polling.poll_timeout_ms,
                        "Gateway timeout, switching to polling"
                    );
                    budget = Some(Box::pin(sleep(self.polling.poll_timeout())));
                }
                Effect::IssuePoll => {
                    if let State::Polling { polls } = self.state {
                        self.polls = polls;
                    }
                    let poll = self.poll_once(self.polls);
                    let event = match budget.as_mut() {
                        Some(deadline) => tokio::select! {
                            biased;
                            result = poll => {
                                let status = result.as_ref().ok().map(|r| r.status);
                                latest = Some(result);
                                Event::PollResult(status)
                            }
                            _ = deadline => Event::BudgetExpired,
                        },
                        None => {
                            let result = poll.await;
                            let status = result.as_ref().ok().map(|r| r.status);
                            latest = Some(result);
                            Event::PollResult(status)
                        }
                    };
                    effects.extend(self.apply(event));
                }
                Effect::CancelBudget => {
                    budget = None;
                }
                Effect::Resolve(resolution) => {
                    // Drop any armed timer before handing out the outcome.
                    drop(budget.take());
                    let outcome = self.resolve(resolution, latest.take(), gateway_timeout.take());
                    self.record(&outcome);
                    return outcome;
                }
            }
        }

        drop(budget);
        Outcome::ApplicationError(Error::transport("request ended without a result"))
    }

    fn poll_once(&self, attempt: u32) -> impl Future<Output = Result<Response, Error>> + Send + 'a {
        let issuer = self.issuer;
        let request = self.poll.clone();
        let delay = if attempt > 1 {
            self.polling.poll_delay()
        } else {
            Duration::ZERO
        };
        let id = self.id.clone();

        async move {
            if !delay.is_zero() {
                sleep(delay).await;
            }
            tracing::debug!(correlation_id = %id, attempt, "Polling for result");
            metrics::record_poll();
            issuer.issue(request).await
        }
    }

    fn resolve(
        &self,
        resolution: Resolution,
        latest: Option<Result<Response, Error>>,
        gateway_timeout: Option<Response>,
    ) -> Outcome {
        match resolution {
            Resolution::Latest => match latest {
                Some(result) => Outcome::from_result(result),
                None => Outcome::ApplicationError(Error::transport("no response observed")),
            },
            Resolution::BudgetExpired => {
                metrics::record_budget_expired();
                tracing::warn!(
                    correlation_id = %self.id,
                    url = %self.poll.url,
                    budget_ms = self.polling.poll_timeout_ms,
                    policy = ?self.polling.on_budget_expiry,
                    "Wait budget expired before a result was available"
                );
                // A 204 seen last only means "not ready"; it is never a result.
                match (self.polling.on_budget_expiry, gateway_timeout) {
                    (BudgetExpiry::GatewayTimeout, Some(response)) => Outcome::from_response(response),
                    _ => Outcome::Timeout(self.polling.poll_timeout()),
                }
            }
        }
    }

    fn record(&self, outcome: &Outcome) {
        let polled = self.polls > 0;
        metrics::record_request(if polled {
            RequestPath::Polled
        } else {
            RequestPath::Direct
        });
        metrics::record_outcome(outcome.label());
        tracing::debug!(
            correlation_id = %self.id,
            outcome = outcome.label(),
            polls = self.polls,
            "Request resolved"
        );
    }
}
