//! The request-issuing primitive every protected client wraps.

use std::future::Future;
use std::sync::Arc;

use crate::error::Error;
use crate::transport::request::OutboundRequest;
use crate::transport::response::Response;

/// Issues one HTTP call and resolves exactly once.
///
/// A status code of any value is `Ok`; only failures that produced no status
/// (connection refused, reset, unreadable body) are `Err(Error::Transport)`.
pub trait RequestIssuer: Send + Sync {
    fn issue(&self, request: OutboundRequest) -> impl Future<Output = Result<Response, Error>> + Send;
}

impl<T: RequestIssuer> RequestIssuer for Arc<T> {
    fn issue(&self, request: OutboundRequest) -> impl Future<Output = Result<Response, Error>> + Send {
        (**self).issue(request)
    }
}

impl<T: RequestIssuer> RequestIssuer for &T {
    fn issue(&self, request: OutboundRequest) -> impl Future<Output = Result<Response, Error>> + Send {
        (**self).issue(request)
    }
}

/// Issuer backed by a plain async function.
#[derive(Clone)]
pub struct FnIssuer<F> {
    f: F,
}

/// Adapt `f` into a [`RequestIssuer`].
pub fn issuer_fn<F, Fut>(f: F) -> FnIssuer<F>
where
    F: Fn(OutboundRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, Error>> + Send,
{
    FnIssuer { f }
}

impl<F, Fut> RequestIssuer for FnIssuer<F>
where
    F: Fn(OutboundRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, Error>> + Send,
{
    fn issue(&self, request: OutboundRequest) -> impl Future<Output = Result<Response, Error>> + Send {
        (self.f)(request)
    }
}
