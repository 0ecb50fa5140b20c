//! Completion dispatch.
//!
//! # Responsibilities
//! - Hold the caller's optional callbacks
//! - Route an outcome to `on_load` or `on_error`, then `on_complete`
//!
//! # Design Decisions
//! - Callbacks are `FnOnce` and `dispatch` consumes the record, so a second
//!   dispatch for the same logical request does not type-check
//! - Missing callbacks are no-ops

use std::fmt;

use crate::error::Error;
use crate::protection::outcome::Outcome;
use crate::transport::Response;

type LoadFn = Box<dyn FnOnce(&Response) + Send>;
type ErrorFn = Box<dyn FnOnce(&Error) + Send>;
type CompleteFn = Box<dyn FnOnce(&Outcome) + Send>;

/// Optional success / error / completion callbacks of one logical request.
#[derive(Default)]
pub struct Callbacks {
    on_load: Option<LoadFn>,
    on_error: Option<ErrorFn>,
    on_complete: Option<CompleteFn>,
}

impl Callbacks {
    /// No callbacks at all.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_load<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&Response) + Send + 'static,
    {
        self.on_load = Some(Box::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&Error) + Send + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Runs after `on_load`/`on_error`, whatever the outcome.
    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&Outcome) + Send + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_load", &self.on_load.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Invoke the callbacks matching `outcome`.
pub fn dispatch(outcome: &Outcome, callbacks: Callbacks) {
    let Callbacks {
        on_load,
        on_error,
        on_complete,
    } = callbacks;

    match outcome {
        Outcome::Success(response) => {
            if let Some(f) = on_load {
                f(response);
            }
        }
        Outcome::ApplicationError(err) => {
            if let Some(f) = on_error {
                f(err);
            }
        }
        Outcome::Timeout(budget) => {
            if let Some(f) = on_error {
                f(&Error::PollTimeout(*budget));
            }
        }
    }

    if let Some(f) = on_complete {
        f(outcome);
    }
}
