//! Marker headers and the status contract of the polling protocol.

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::StatusCode;

use crate::error::Error;
use crate::protocol::correlation::CorrelationId;

/// Header carried by the first request of a logical request.
pub const INITIAL_REQUEST_HEADER: &str = "x-cloudfoundry-timeout-protection-initial-request";

/// Header carried by every poll request.
pub const POLL_HEADER: &str = "x-cloudfoundry-timeout-protection-poll";

/// Status on the initial request that switches the client to polling.
pub const SWITCH_TO_POLLING: StatusCode = StatusCode::GATEWAY_TIMEOUT;

/// Status on a poll that means "not ready, poll again".
pub const NOT_READY: StatusCode = StatusCode::NO_CONTENT;

/// Which marker a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    InitialRequest,
    Poll,
}

impl Marker {
    /// Header name for this marker.
    pub fn header_name(self) -> HeaderName {
        match self {
            Marker::InitialRequest => HeaderName::from_static(INITIAL_REQUEST_HEADER),
            Marker::Poll => HeaderName::from_static(POLL_HEADER),
        }
    }

    /// Header name and value tagging a request with `id`.
    pub fn header(self, id: &CorrelationId) -> Result<(HeaderName, HeaderValue), Error> {
        let value = HeaderValue::from_str(id.as_str())
            .map_err(|e| Error::InvalidHeader(format!("{}: {}", self.header_name(), e)))?;
        Ok((self.header_name(), value))
    }
}

/// True when the initial response asks the client to start polling.
pub fn should_poll(status: StatusCode) -> bool {
    status == SWITCH_TO_POLLING
}

/// True when a poll response means the result is not available yet.
pub fn is_not_ready(status: StatusCode) -> bool {
    status == NOT_READY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_headers_carry_id() {
        let id = CorrelationId::from("abc-123");

        let (name, value) = Marker::InitialRequest.header(&id).unwrap();
        assert_eq!(name.as_str(), INITIAL_REQUEST_HEADER);
        assert_eq!(value, "abc-123");

        let (name, value) = Marker::Poll.header(&id).unwrap();
        assert_eq!(name.as_str(), POLL_HEADER);
        assert_eq!(value, "abc-123");
    }

    #[test]
    fn test_marker_rejects_unencodable_id() {
        let id = CorrelationId::from("bad\nid");
        let err = Marker::Poll.header(&id).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn test_status_contract() {
        assert!(should_poll(StatusCode::GATEWAY_TIMEOUT));
        assert!(!should_poll(StatusCode::BAD_GATEWAY));
        assert!(!should_poll(StatusCode::OK));

        assert!(is_not_ready(StatusCode::NO_CONTENT));
        assert!(!is_not_ready(StatusCode::OK));
        assert!(!is_not_ready(StatusCode::GATEWAY_TIMEOUT));
    }
}
