//! Wire protocol between the client and a timeout-protected backend.
//!
//! # Data Flow
//! ```text
//! initial request  ── x-cloudfoundry-timeout-protection-initial-request: <id> ──▶
//!                  ◀── 504 Gateway Timeout (switch to polling) / anything else (final)
//! poll request     ── x-cloudfoundry-timeout-protection-poll: <id> ──▶
//!                  ◀── 204 No Content (not ready) / anything else (final)
//! ```
//!
//! # Design Decisions
//! - Polls reuse the request URL; only the marker header signals intent
//! - One correlation ID per logical request, shared by every poll

pub mod correlation;
pub mod headers;

pub use correlation::{CorrelationId, CorrelationIdProvider, UuidProvider};
pub use headers::{INITIAL_REQUEST_HEADER, POLL_HEADER};
