//! Error types shared by the router, handlers and view rendering

use hyper::Method;
use std::any::Any;
use thiserror::Error;

/// Router configuration and dispatch errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A route with the same method and path is already registered
    #[error("duplicate route: {method} {path} is already registered")]
    DuplicateRoute { method: Method, path: String },

    /// The middleware chain finished without anyone writing a response
    #[error("no response produced for {method} {path}: a middleware neither responded nor called next")]
    NoResponse { method: Method, path: String },

    /// A second response was written for the same request
    #[error("response already sent")]
    ResponseAlreadySent,
}

/// Failure raised by a handler or middleware while serving a request
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("view rendering failed: {0}")]
    View(#[from] ViewError),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error("handler panicked: {0}")]
    Panic(String),

    #[error("{0}")]
    Other(String),
}

impl HandlerError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Turn a caught panic payload into an error
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self::Panic(message)
    }
}

/// View rendering errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("view not found: {0}")]
    NotFound(String),

    #[error("view '{view}' references unknown variable '{variable}'")]
    MissingVariable { view: String, variable: String },

    #[error("view '{0}' has an unterminated placeholder")]
    Unterminated(String),
}
