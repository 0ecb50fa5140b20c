//! Timeout-protected client.
//!
//! Wraps any [`RequestIssuer`] so a gateway timeout on the first response is
//! continued by polling instead of being reported. Callers opt in by building
//! a `TimeoutProtected` around their issuer; the issuer itself is untouched.
//!
//! ```no_run
//! use timeout_protection::{Callbacks, HttpIssuer, ProtectionConfig, TimeoutProtected};
//! use reqwest::header::HeaderMap;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProtectionConfig::default();
//! let client = TimeoutProtected::with_config(HttpIssuer::new(&config.transport)?, config.polling);
//!
//! client
//!     .get(
//!         "http://localhost:8080/reports/slow",
//!         HeaderMap::new(),
//!         Callbacks::new()
//!             .on_load(|r| println!("{}", r.text()))
//!             .on_error(|e| eprintln!("{}", e)),
//!     )
//!     .await;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;

use crate::config::{BudgetExpiry, PollingConfig};
use crate::error::Error;
use crate::protection::controller::Controller;
use crate::protection::dispatch::{dispatch, Callbacks};
use crate::protection::outcome::Outcome;
use crate::protocol::correlation::{CorrelationIdProvider, UuidProvider};
use crate::transport::{OutboundRequest, Payload, RequestIssuer, Response, Verb};

/// Decorator adding gateway-timeout polling to an issuer.
#[derive(Debug, Clone)]
pub struct TimeoutProtected<I, P = UuidProvider> {
    issuer: I,
    ids: P,
    polling: PollingConfig,
}

impl<I: RequestIssuer> TimeoutProtected<I> {
    /// Wrap `issuer` with the default 60 second wait budget.
    pub fn new(issuer: I) -> Self {
        Self::with_config(issuer, PollingConfig::default())
    }

    pub fn with_config(issuer: I, polling: PollingConfig) -> Self {
        Self {
            issuer,
            ids: UuidProvider,
            polling,
        }
    }
}

impl<I, P> TimeoutProtected<I, P> {
    /// Override the wait budget.
    pub fn poll_timeout(mut self, budget: Duration) -> Self {
        self.polling.poll_timeout_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Choose what budget expiry hands to the callbacks.
    pub fn on_budget_expiry(mut self, policy: BudgetExpiry) -> Self {
        self.polling.on_budget_expiry = policy;
        self
    }

    /// Replace the correlation ID source.
    pub fn with_id_provider<Q: CorrelationIdProvider>(self, ids: Q) -> TimeoutProtected<I, Q> {
        TimeoutProtected {
            issuer: self.issuer,
            ids,
            polling: self.polling,
        }
    }

    pub fn polling(&self) -> &PollingConfig {
        &self.polling
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }
}

impl<I, P> TimeoutProtected<I, P>
where
    I: RequestIssuer,
    P: CorrelationIdProvider,
{
    /// Run one logical request and return its outcome.
    pub async fn send(&self, request: OutboundRequest) -> Outcome {
        let id = self.ids.next_id();
        match Controller::new(&self.issuer, &self.polling, id, request) {
            Ok(controller) => controller.run().await,
            Err(err) => Outcome::ApplicationError(err),
        }
    }

    /// Run one logical request, invoke the matching callbacks once, and
    /// return the outcome.
    pub async fn send_with(&self, request: OutboundRequest, callbacks: Callbacks) -> Outcome {
        let outcome = self.send(request).await;
        dispatch(&outcome, callbacks);
        outcome
    }

    /// Like [`send`](Self::send) with the outcome collapsed into a `Result`.
    pub async fn fetch(&self, request: OutboundRequest) -> Result<Response, Error> {
        self.send(request).await.into_result()
    }

    async fn call(
        &self,
        verb: Verb,
        url: &str,
        headers: HeaderMap,
        payload: Option<Payload>,
        callbacks: Callbacks,
    ) -> Outcome {
        match OutboundRequest::parse(verb, url) {
            Ok(mut request) => {
                request.headers = headers;
                request.payload = payload;
                self.send_with(request, callbacks).await
            }
            Err(err) => {
                let outcome = Outcome::ApplicationError(err);
                dispatch(&outcome, callbacks);
                outcome
            }
        }
    }

    pub async fn get(&self, url: &str, headers: HeaderMap, callbacks: Callbacks) -> Outcome {
        self.call(Verb::Get, url, headers, None, callbacks).await
    }

    pub async fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        payload: Option<Payload>,
        callbacks: Callbacks,
    ) -> Outcome {
        self.call(Verb::Post, url, headers, payload, callbacks).await
    }

    pub async fn put(
        &self,
        url: &str,
        headers: HeaderMap,
        payload: Option<Payload>,
        callbacks: Callbacks,
    ) -> Outcome {
        self.call(Verb::Put, url, headers, payload, callbacks).await
    }

    pub async fn delete(&self, url: &str, headers: HeaderMap, callbacks: Callbacks) -> Outcome {
        self.call(Verb::Delete, url, headers, None, callbacks).await
    }

    /// POST `body` exactly as given.
    pub async fn raw_post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: impl Into<Bytes>,
        callbacks: Callbacks,
    ) -> Outcome {
        let payload = Payload::Raw(body.into());
        self.call(Verb::RawPost, url, headers, Some(payload), callbacks).await
    }
}
