//! Correlation IDs tying an initial request to its polls.
//!
//! # Design Decisions
//! - Opaque string; the server only compares it for equality
//! - UUID v4 by default, same as request IDs elsewhere in the stack
//! - Provider is a trait so tests can mint predictable IDs

use std::fmt;

use uuid::Uuid;

/// Opaque token minted once per logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CorrelationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh correlation IDs.
pub trait CorrelationIdProvider: Send + Sync {
    /// Mint an ID that has never been handed out before.
    fn next_id(&self) -> CorrelationId;
}

/// Random UUID v4 provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidProvider;

impl CorrelationIdProvider for UuidProvider {
    fn next_id(&self) -> CorrelationId {
        CorrelationId::from(Uuid::new_v4())
    }
}

impl<F> CorrelationIdProvider for F
where
    F: Fn() -> CorrelationId + Send + Sync,
{
    fn next_id(&self) -> CorrelationId {
        self()
    }
}
