//! Final outcome of a logical request and status classification.

use std::time::Duration;

use reqwest::StatusCode;

use crate::error::Error;
use crate::transport::Response;

/// The single result a logical request resolves to.
#[derive(Debug)]
pub enum Outcome {
    /// The final response carried a success status.
    Success(Response),
    /// Transport failure or a non-success final status.
    ApplicationError(Error),
    /// The wait budget expired and the policy asks for an explicit timeout.
    Timeout(Duration),
}

/// True for statuses handed to `on_load`.
pub fn is_success_status(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::NOT_MODIFIED
}

impl Outcome {
    /// Classify a buffered response.
    pub fn from_response(response: Response) -> Self {
        if is_success_status(response.status) {
            Outcome::Success(response)
        } else {
            Outcome::ApplicationError(Error::Status {
                status: response.status,
                body: response.body,
            })
        }
    }

    /// Classify whatever an issuer returned.
    pub fn from_result(result: Result<Response, Error>) -> Self {
        match result {
            Ok(response) => Self::from_response(response),
            Err(err) => Outcome::ApplicationError(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::ApplicationError(Error::Transport(_)) => "transport_error",
            Outcome::ApplicationError(_) => "application_error",
            Outcome::Timeout(_) => "timeout",
        }
    }

    /// Collapse into a plain `Result`.
    pub fn into_result(self) -> Result<Response, Error> {
        match self {
            Outcome::Success(response) => Ok(response),
            Outcome::ApplicationError(err) => Err(err),
            Outcome::Timeout(budget) => Err(Error::PollTimeout(budget)),
        }
    }
}
