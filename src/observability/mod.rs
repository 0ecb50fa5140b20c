//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Controller produces:
//!     → tracing events (correlation_id, url, status, polls)
//!     → metrics.rs (counters per path, poll and outcome)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout) when running the CLI
//!     → any `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder on its own
//! - Correlation ID is attached to every event of a logical request

pub mod logging;
pub mod metrics;
