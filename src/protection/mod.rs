//! Gateway timeout protection subsystem.
//!
//! # Data Flow
//! ```text
//! caller → client.rs (TimeoutProtected::get/post/put/delete/raw_post)
//!     → controller.rs (mint correlation ID, tag initial request)
//!     → issuer (initial request)
//!         ├─ status != 504 → outcome.rs (classify) → dispatch.rs
//!         └─ status == 504 → arm wait budget
//!               → poll (same URL, poll header) ─┬─ 204 → poll again
//!                                               ├─ other → cancel budget → dispatch.rs
//!               budget fires ───────────────────┴─ expiry policy → dispatch.rs
//! ```
//!
//! # Design Decisions
//! - state.rs is a pure (state, event) → (state, effects) function
//! - Callbacks fire exactly once per logical request, never per round trip
//! - Budget expiry behaviour is a configuration choice (`BudgetExpiry`)

pub mod client;
pub mod controller;
pub mod dispatch;
pub mod outcome;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use client::TimeoutProtected;
pub use controller::Controller;
pub use dispatch::{dispatch, Callbacks};
pub use outcome::Outcome;
pub use state::{transition, Effect, Event, Resolution, State};
