//! Request logging middleware

use super::{Middleware, Next};
use crate::error::HandlerError;
use crate::handler::RequestContext;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Logs one access log line per request after the rest of the chain ran
#[derive(Debug, Clone)]
pub struct AccessLog {
    format: String,
}

impl AccessLog {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// Fill status, size and timing from the finished context.
    ///
    /// An empty slot means the chain produced no response, which the
    /// transport answers with 500; that is what gets logged.
    fn finish(ctx: &RequestContext, mut entry: AccessLogEntry) -> AccessLogEntry {
        let fallback;
        let resp = match ctx.response() {
            Some(resp) => resp,
            None => {
                fallback = http::build_500_response();
                &fallback
            }
        };
        entry.status = resp.status.as_u16();
        entry.body_bytes = resp.body.len();
        entry.request_time_us = u64::try_from(ctx.elapsed().as_micros()).unwrap_or(u64::MAX);
        entry
    }
}

impl Default for AccessLog {
    fn default() -> Self {
        Self::new("combined")
    }
}

impl Middleware for AccessLog {
    fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> Result<(), HandlerError> {
        let entry = AccessLogEntry::from_request(ctx.request());
        let result = next.run(ctx);
        logger::log_access(&Self::finish(ctx, entry), &self.format);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Request, Response};
    use hyper::{Method, StatusCode};

    #[test]
    fn test_finish_copies_response_fields() {
        let req = Request::new(Method::GET, "/about");
        let mut ctx = RequestContext::new(req);
        let entry = AccessLogEntry::from_request(ctx.request());
        ctx.send(Response::text("About page").with_status(StatusCode::CREATED))
            .unwrap();

        let entry = AccessLog::finish(&ctx, entry);
        assert_eq!(entry.status, 201);
        assert_eq!(entry.body_bytes, 10);
        assert_eq!(entry.path, "/about");
    }

    #[test]
    fn test_finish_without_response_logs_500() {
        let ctx = RequestContext::new(Request::new(Method::GET, "/"));
        let entry = AccessLogEntry::from_request(ctx.request());

        let entry = AccessLog::finish(&ctx, entry);
        assert_eq!(entry.status, 500);
        assert_eq!(entry.body_bytes, http::build_500_response().body.len());
    }

    #[test]
    fn test_failing_inner_middleware_is_logged_as_500() {
        let chain: Vec<std::sync::Arc<dyn Middleware>> = vec![
            std::sync::Arc::new(AccessLog::new("common")),
            std::sync::Arc::new(crate::middleware::from_fn(|_ctx, _next| {
                Err(HandlerError::other("boom"))
            })),
        ];
        let endpoint = |_ctx: &mut RequestContext| -> Result<(), HandlerError> { Ok(()) };

        let mut ctx = RequestContext::new(Request::new(Method::GET, "/"));
        let entry = AccessLogEntry::from_request(ctx.request());
        Next::new(&chain, &endpoint).run(&mut ctx).unwrap();

        // The entry AccessLog wrote matches what the client receives
        let entry = AccessLog::finish(&ctx, entry);
        assert_eq!(entry.status, 500);
        assert_eq!(ctx.response().unwrap().status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_passes_through_to_next() {
        let chain: Vec<std::sync::Arc<dyn Middleware>> =
            vec![std::sync::Arc::new(AccessLog::new("common"))];
        let endpoint = |ctx: &mut RequestContext| -> Result<(), HandlerError> {
            ctx.send(Response::text("Hello World!"))?;
            Ok(())
        };

        let mut ctx = RequestContext::new(Request::new(Method::GET, "/"));
        Next::new(&chain, &endpoint).run(&mut ctx).unwrap();
        assert_eq!(ctx.response().unwrap().body, "Hello World!");
    }
}
