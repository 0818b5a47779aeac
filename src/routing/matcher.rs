//! Route matching module
//!
//! Exact, case-sensitive comparison of method and path. No prefixes,
//! wildcards or parameters.

use crate::handler::Handler;
use hyper::Method;
use std::fmt;
use std::sync::Arc;

/// A (method, path) pair mapped to a handler
#[derive(Clone)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub handler: Arc<dyn Handler>,
}

impl Route {
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == *method && self.path == path
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Find the first route matching method and path
pub fn match_route<'a>(method: &Method, path: &str, routes: &'a [Route]) -> Option<&'a Route> {
    routes.iter().find(|route| route.matches(method, path))
}
