//! Middleware module
//!
//! Middleware runs before route dispatch, in registration order. Each one
//! either writes a response and returns (short-circuit) or hands the context
//! on with [`Next::run`].
//!
//! A stage that fails (returns `Err` or panics) is answered with 500 at its
//! own boundary, so middleware further out sees the final response when
//! `next.run` returns.

mod access_log;
mod body_limit;

pub use access_log::AccessLog;
pub use body_limit::BodyLimit;

use crate::error::HandlerError;
use crate::handler::RequestContext;
use crate::http;
use crate::logger;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Final stage invoked once every middleware has called `next`
pub type Endpoint<'a> = dyn Fn(&mut RequestContext) -> Result<(), HandlerError> + 'a;

/// Middleware entry
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> Result<(), HandlerError>;
}

/// Continuation over the remaining middleware and the endpoint
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    endpoint: &'a Endpoint<'a>,
}

impl<'a> Next<'a> {
    pub(crate) fn new(chain: &'a [Arc<dyn Middleware>], endpoint: &'a Endpoint<'a>) -> Self {
        Self { chain, endpoint }
    }

    /// Run the rest of the chain.
    ///
    /// Stops without error if a response has already been written, so a
    /// middleware that responds and then calls `next` cannot produce a second
    /// response. If the next stage fails before responding, a 500 is written
    /// here.
    pub fn run(self, ctx: &mut RequestContext) -> Result<(), HandlerError> {
        if ctx.is_sent() {
            logger::log_warning(&format!(
                "next() called after response was sent: {} {}",
                ctx.method(),
                ctx.path()
            ));
            return Ok(());
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| match self.chain.split_first() {
            Some((current, rest)) => current.handle(ctx, Next::new(rest, self.endpoint)),
            None => (self.endpoint)(ctx),
        }));
        let err = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => e,
            Err(payload) => HandlerError::from_panic(payload.as_ref()),
        };

        logger::log_error(&format!(
            "Request failed: {} {}: {err}",
            ctx.method(),
            ctx.path()
        ));
        if !ctx.is_sent() {
            ctx.send(http::build_500_response())?;
        }
        Ok(())
    }
}

/// Middleware backed by a closure
pub struct MiddlewareFn<F> {
    f: F,
}

/// Wrap a closure as a [`Middleware`]
pub const fn from_fn<F>(f: F) -> MiddlewareFn<F>
where
    F: Fn(&mut RequestContext, Next<'_>) -> Result<(), HandlerError> + Send + Sync,
{
    MiddlewareFn { f }
}

impl<F> Middleware for MiddlewareFn<F>
where
    F: Fn(&mut RequestContext, Next<'_>) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> Result<(), HandlerError> {
        (self.f)(ctx, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Request, Response};
    use hyper::Method;
    use std::sync::Mutex;

    fn recorder(name: &'static str, log: Arc<Mutex<Vec<&'static str>>>) -> Arc<dyn Middleware> {
        Arc::new(from_fn(move |ctx, next| {
            log.lock().unwrap().push(name);
            next.run(ctx)
        }))
    }

    #[test]
    fn test_chain_runs_in_order_then_endpoint() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![recorder("A", Arc::clone(&log)), recorder("B", Arc::clone(&log))];
        let endpoint_log = Arc::clone(&log);
        let endpoint = move |ctx: &mut RequestContext| -> Result<(), HandlerError> {
            endpoint_log.lock().unwrap().push("H");
            ctx.send(Response::text("done"))?;
            Ok(())
        };

        let mut ctx = RequestContext::new(Request::new(Method::GET, "/"));
        Next::new(&chain, &endpoint).run(&mut ctx).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["A", "B", "H"]);
        assert_eq!(ctx.response().unwrap().body, "done");
    }

    #[test]
    fn test_next_after_send_does_not_continue() {
        let chain: Vec<Arc<dyn Middleware>> = vec![Arc::new(from_fn(|ctx, next| {
            ctx.send(Response::text("early"))?;
            next.run(ctx)
        }))];
        let endpoint = |ctx: &mut RequestContext| -> Result<(), HandlerError> {
            ctx.send(Response::text("late"))?;
            Ok(())
        };

        let mut ctx = RequestContext::new(Request::new(Method::GET, "/"));
        Next::new(&chain, &endpoint).run(&mut ctx).unwrap();
        assert_eq!(ctx.response().unwrap().body, "early");
    }

    #[test]
    fn test_failing_stage_answers_500_before_outer_returns() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let outer_seen = Arc::clone(&seen);
        let chain: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(from_fn(move |ctx, next| {
                let result = next.run(ctx);
                outer_seen
                    .lock()
                    .unwrap()
                    .push(ctx.response().map(|r| r.status.as_u16()));
                result
            })),
            Arc::new(from_fn(|_ctx, _next| Err(HandlerError::other("rejected")))),
        ];
        let endpoint = |_ctx: &mut RequestContext| -> Result<(), HandlerError> { Ok(()) };

        let mut ctx = RequestContext::new(Request::new(Method::GET, "/"));
        Next::new(&chain, &endpoint).run(&mut ctx).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![Some(500)]);
        assert_eq!(ctx.response().unwrap().status.as_u16(), 500);
    }

    #[test]
    fn test_failure_after_send_keeps_response() {
        let chain: Vec<Arc<dyn Middleware>> = vec![Arc::new(from_fn(|ctx, _next| {
            ctx.send(Response::text("partial"))?;
            Err(HandlerError::other("late failure"))
        }))];
        let endpoint = |_ctx: &mut RequestContext| -> Result<(), HandlerError> { Ok(()) };

        let mut ctx = RequestContext::new(Request::new(Method::GET, "/"));
        Next::new(&chain, &endpoint).run(&mut ctx).unwrap();
        assert_eq!(ctx.response().unwrap().body, "partial");
    }
}
