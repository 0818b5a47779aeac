//! Per-request context
//!
//! Carries the parsed request and the single response slot through the
//! middleware chain and into the route handler.

use crate::error::RouterError;
use crate::http::{Request, Response};
use hyper::Method;
use std::time::{Duration, Instant};

/// Request context, created per dispatch and discarded afterwards
#[derive(Debug)]
pub struct RequestContext {
    request: Request,
    response: Option<Response>,
    started: Instant,
}

impl RequestContext {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            response: None,
            started: Instant::now(),
        }
    }

    pub const fn request(&self) -> &Request {
        &self.request
    }

    pub const fn method(&self) -> &Method {
        &self.request.method
    }

    pub fn path(&self) -> &str {
        &self.request.path
    }

    /// Write the response for this request.
    ///
    /// A request gets exactly one response; a second call is rejected and the
    /// first response is kept.
    pub fn send(&mut self, response: Response) -> Result<(), RouterError> {
        if self.response.is_some() {
            return Err(RouterError::ResponseAlreadySent);
        }
        self.response = Some(response);
        Ok(())
    }

    pub const fn is_sent(&self) -> bool {
        self.response.is_some()
    }

    pub const fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Mutable access to an already written response, e.g. to add headers
    pub fn response_mut(&mut self) -> Option<&mut Response> {
        self.response.as_mut()
    }

    /// Time since the context was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn into_response(self) -> Option<Response> {
        self.response
    }
}
