//! HTTP protocol layer module
//!
//! Transport-independent request and response values seen by the router,
//! plus the conversions to and from hyper types used by the server.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::Request;
pub use response::{
    build_404_response, build_413_response, build_500_response, Response,
};
