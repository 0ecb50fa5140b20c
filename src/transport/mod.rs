//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! OutboundRequest (verb, url, headers, payload)
//!     → issuer.rs (RequestIssuer: one call, one result)
//!     → http_client.rs (reqwest-backed implementation)
//!     → Response (status, headers, buffered body) or Error::Transport
//! ```
//!
//! # Design Decisions
//! - All verbs go through the same `issue` shape; the controller never branches on verb
//! - No retries at this layer
//! - Transport failures are values, never panics

pub mod http_client;
pub mod issuer;
pub mod request;
pub mod response;

pub use http_client::HttpIssuer;
pub use issuer::{issuer_fn, FnIssuer, RequestIssuer};
pub use request::{OutboundRequest, Payload, Verb};
pub use response::Response;
