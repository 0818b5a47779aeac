//! Request routing dispatch module
//!
//! The [`Router`] owns the route table and the middleware chain. It is built
//! once at startup and then only read, so a single instance can be shared
//! across connections behind an `Arc` without locking.

use super::matcher::{match_route, Route};
use crate::error::{HandlerError, RouterError};
use crate::handler::{self, Handler, RequestContext};
use crate::http::{self, Request, Response};
use crate::logger;
use crate::middleware::{self, Middleware, Next};
use hyper::Method;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route.
    ///
    /// Registering the same (method, path) pair twice is a configuration
    /// error; the first registration is kept.
    pub fn register(
        &mut self,
        method: Method,
        path: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RouterError> {
        let path = path.into();
        if match_route(&method, &path, &self.routes).is_some() {
            return Err(RouterError::DuplicateRoute { method, path });
        }

        self.routes.push(Route {
            method,
            path,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    pub fn get<F>(&mut self, path: impl Into<String>, f: F) -> Result<(), RouterError>
    where
        F: Fn(&Request) -> Result<Response, HandlerError> + Send + Sync + 'static,
    {
        self.register(Method::GET, path, handler::from_fn(f))
    }

    pub fn post<F>(&mut self, path: impl Into<String>, f: F) -> Result<(), RouterError>
    where
        F: Fn(&Request) -> Result<Response, HandlerError> + Send + Sync + 'static,
    {
        self.register(Method::POST, path, handler::from_fn(f))
    }

    /// Append a middleware to the end of the chain
    pub fn use_middleware(&mut self, middleware: impl Middleware + 'static) -> &mut Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Append a closure middleware to the end of the chain
    pub fn use_fn<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut RequestContext, Next<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.use_middleware(middleware::from_fn(f))
    }

    /// Registered routes in registration order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn middleware_count(&self) -> usize {
        self.middleware.len()
    }

    /// Dispatch one request.
    ///
    /// Runs the middleware chain, then the matching route handler. Unknown
    /// routes get 404; a failing handler or middleware gets 500. Returns
    /// [`RouterError::NoResponse`] if the chain ended without any response.
    pub fn dispatch(&self, request: Request) -> Result<Response, RouterError> {
        let method = request.method.clone();
        let path = request.path.clone();
        let mut ctx = RequestContext::new(request);

        let endpoint = |ctx: &mut RequestContext| -> Result<(), HandlerError> {
            self.route_request(ctx);
            Ok(())
        };
        if let Err(e) = Next::new(&self.middleware, &endpoint).run(&mut ctx) {
            logger::log_error(&format!("Request failed: {method} {path}: {e}"));
        }

        ctx.into_response()
            .ok_or(RouterError::NoResponse { method, path })
    }

    /// Final stage of the chain: exact lookup and handler invocation
    fn route_request(&self, ctx: &mut RequestContext) {
        let response = match match_route(ctx.method(), ctx.path(), &self.routes) {
            Some(route) => invoke(route, ctx.request()),
            None => {
                logger::log_warning(&format!("Route not found: {} {}", ctx.method(), ctx.path()));
                http::build_404_response()
            }
        };

        if let Err(e) = ctx.send(response) {
            logger::log_error(&format!("Dropping handler response: {e}"));
        }
    }
}

/// Call a route handler, turning errors and panics into 500
fn invoke(route: &Route, request: &Request) -> Response {
    let result = panic::catch_unwind(AssertUnwindSafe(|| route.handler.handle(request)))
        .unwrap_or_else(|payload| Err(HandlerError::from_panic(payload.as_ref())));

    result.unwrap_or_else(|e| {
        logger::log_error(&format!(
            "Handler for {} {} failed: {e}",
            route.method, route.path
        ));
        http::build_500_response()
    })
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}
