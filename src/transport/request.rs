//! Outbound request description.

use std::fmt;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use crate::error::Error;

/// The verb families a protected client exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    /// POST whose body is sent exactly as given.
    RawPost,
}

impl Verb {
    /// HTTP method used on the wire.
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post | Verb::RawPost => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::RawPost => "POST(raw)",
        };
        f.write_str(s)
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
    /// JSON document.
    Json(serde_json::Value),
    /// Bytes sent untouched.
    Raw(Bytes),
}

/// One HTTP call as handed to a [`RequestIssuer`](crate::transport::RequestIssuer).
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub verb: Verb,
    pub url: Url,
    pub headers: HeaderMap,
    pub payload: Option<Payload>,
}

impl OutboundRequest {
    pub fn new(verb: Verb, url: Url) -> Self {
        Self {
            verb,
            url,
            headers: HeaderMap::new(),
            payload: None,
        }
    }

    /// Parse `url` and build a request without headers or body.
    pub fn parse(verb: Verb, url: &str) -> Result<Self, Error> {
        let parsed = Url::parse(url).map_err(|source| Error::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self::new(verb, parsed))
    }

    /// Add a header, replacing any previous value under the same name.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }
}
