//! Scripted in-memory issuer for unit tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::Error;
use crate::transport::{OutboundRequest, RequestIssuer, Response};

/// What one scripted round trip returns.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Status(u16, &'static str),
    Refused,
}

impl Reply {
    fn into_result(self) -> Result<Response, Error> {
        match self {
            Reply::Status(code, body) => {
                let status = StatusCode::from_u16(code).expect("valid status code");
                Ok(Response::new(status, body))
            }
            Reply::Refused => Err(Error::transport("connection refused")),
        }
    }
}

/// Replays a fixed list of replies, each after a delay, then an optional
/// reply forever.
pub(crate) struct ScriptedIssuer {
    steps: Mutex<VecDeque<(Duration, Reply)>>,
    forever: Option<(Duration, Reply)>,
    seen: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedIssuer {
    pub(crate) fn new(steps: Vec<(u64, Reply)>) -> Self {
        Self {
            steps: Mutex::new(
                steps
                    .into_iter()
                    .map(|(ms, reply)| (Duration::from_millis(ms), reply))
                    .collect(),
            ),
            forever: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn then_forever(mut self, delay_ms: u64, reply: Reply) -> Self {
        self.forever = Some((Duration::from_millis(delay_ms), reply));
        self
    }

    /// Every request issued so far, in order.
    pub(crate) fn requests(&self) -> Vec<OutboundRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl RequestIssuer for ScriptedIssuer {
    fn issue(&self, request: OutboundRequest) -> impl Future<Output = Result<Response, Error>> + Send {
        self.seen.lock().unwrap().push(request);
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.forever.clone());

        async move {
            let (delay, reply) = step.expect("script exhausted");
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            reply.into_result()
        }
    }
}
