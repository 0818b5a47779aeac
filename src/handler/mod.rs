//! Request handler module
//!
//! A route handler turns a request into a response. Anything implementing
//! [`Handler`] can be registered; plain closures go through [`from_fn`].

pub mod context;

pub use context::RequestContext;

use crate::error::HandlerError;
use crate::http::{Request, Response};

/// Route handler
pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request) -> Result<Response, HandlerError>;
}

/// Handler backed by a closure
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a closure as a [`Handler`]
pub const fn from_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&Request) -> Result<Response, HandlerError> + Send + Sync,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&Request) -> Result<Response, HandlerError> + Send + Sync,
{
    fn handle(&self, request: &Request) -> Result<Response, HandlerError> {
        (self.f)(request)
    }
}

/// Handler that always answers with the same response
#[derive(Debug, Clone)]
pub struct StaticResponse(pub Response);

impl Handler for StaticResponse {
    fn handle(&self, _request: &Request) -> Result<Response, HandlerError> {
        Ok(self.0.clone())
    }
}
