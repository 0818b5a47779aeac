//! Minimal HTTP request router
//!
//! A [`Router`] holds exact (method, path) routes and an ordered middleware
//! chain. [`Router::dispatch`] runs the chain, then the matching handler, and
//! always yields exactly one response. The `server` module hosts a router
//! behind a tokio + hyper listener.
//!
//! ```
//! use rust_router::{Request, Response, Router};
//! use hyper::Method;
//!
//! let mut router = Router::new();
//! router.get("/", |_req| Ok(Response::text("Hello World!"))).unwrap();
//!
//! let resp = router.dispatch(Request::new(Method::GET, "/")).unwrap();
//! assert_eq!(resp.body, "Hello World!");
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod middleware;
pub mod routing;
pub mod server;
pub mod view;

pub use error::{HandlerError, RouterError, ViewError};
pub use handler::{Handler, RequestContext};
pub use http::{Request, Response};
pub use middleware::{Middleware, Next};
pub use routing::Router;
