//! Gateway timeout protection for HTTP clients.
//!
//! A request whose backend work outlives the proxy's connection limit comes
//! back as `504 Gateway Timeout`. `TimeoutProtected` turns that 504 into a
//! poll loop against the same URL and reports a single outcome to the caller,
//! as if the first request had simply taken longer.

pub mod config;
pub mod error;
pub mod observability;
pub mod protection;
pub mod protocol;
pub mod transport;

pub use config::{BudgetExpiry, ProtectionConfig};
pub use error::{Error, Result};
pub use protection::{Callbacks, Outcome, TimeoutProtected};
pub use transport::{HttpIssuer, OutboundRequest, Payload, RequestIssuer, Response, Verb};
