//! Routing module
//!
//! Request dispatch: middleware chain in registration order, then exact
//! (method, path) lookup of a single route handler.

mod matcher;
mod router;

pub use matcher::{match_route, Route};
pub use router::Router;
