//! reqwest-backed request issuer.
//!
//! # Responsibilities
//! - Map each verb family onto one reqwest call
//! - Buffer the response body so every result has the same shape
//! - Report connection and body failures as `Error::Transport`
//!
//! # Design Decisions
//! - Non-success statuses are not errors here; 504 and 204 must reach the controller
//! - Redirects are not followed, a 3xx is handed back like any other status
//! - Connection pool shared by the initial request and all its polls

use std::time::Duration;

use crate::config::TransportConfig;
use crate::error::Error;
use crate::transport::issuer::RequestIssuer;
use crate::transport::request::{OutboundRequest, Payload};
use crate::transport::response::Response;

/// HTTP issuer over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpIssuer {
    client: reqwest::Client,
}

impl HttpIssuer {
    /// Build a client from transport settings.
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.clone());

        if config.request_timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(config.request_timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: OutboundRequest) -> Result<Response, Error> {
        let OutboundRequest {
            verb,
            url,
            headers,
            payload,
        } = request;

        tracing::trace!(verb = %verb, url = %url, "Issuing request");

        let mut builder = self.client.request(verb.method(), url).headers(headers);
        builder = match payload {
            Some(Payload::Form(fields)) => builder.form(&fields),
            Some(Payload::Json(value)) => builder.json(&value),
            Some(Payload::Raw(bytes)) => builder.body(bytes),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

impl RequestIssuer for HttpIssuer {
    fn issue(
        &self,
        request: OutboundRequest,
    ) -> impl std::future::Future<Output = Result<Response, Error>> + Send {
        self.send(request)
    }
}
