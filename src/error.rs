//! Error definitions shared by the transport and protection layers.

use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

/// Boxed error used to carry transport failures of any issuer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced to `on_error` or returned from the async API.
#[derive(Debug, Error)]
pub enum Error {
    /// No status code was obtained (connection refused, reset, DNS, ...).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The final response carried a non-success status.
    #[error("request failed with status {status}")]
    Status { status: StatusCode, body: Bytes },

    /// The wait budget elapsed before a poll returned a terminal result.
    #[error("no result after polling for {0:?}")]
    PollTimeout(Duration),

    /// A caller-supplied header could not be encoded.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The target URL could not be parsed.
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl Error {
    /// Wrap any transport-level failure.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Transport(err.into())
    }

    /// Status code of the response behind this error, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the error came from the wait budget rather than the server.
    pub fn is_poll_timeout(&self) -> bool {
        matches!(self, Error::PollTimeout(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

/// Result type for protected requests.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PollTimeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "no result after polling for 60s");
        assert!(err.is_poll_timeout());

        let err = Error::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Bytes::from_static(b"boom"),
        };
        assert!(err.to_string().contains("500"));
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_transport_wraps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::transport(io);
        assert!(err.to_string().starts_with("transport error"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.status(), None);
    }
}
