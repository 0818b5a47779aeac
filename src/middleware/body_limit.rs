//! Request body size guard
//!
//! Short-circuits with 413 when `Content-Length` exceeds the configured
//! maximum. Unparseable values are logged and let through.

use super::{Middleware, Next};
use crate::error::HandlerError;
use crate::handler::RequestContext;
use crate::http;
use crate::logger;

#[derive(Debug, Clone, Copy)]
pub struct BodyLimit {
    max_body_size: u64,
}

impl BodyLimit {
    pub const fn new(max_body_size: u64) -> Self {
        Self { max_body_size }
    }

    fn exceeds(&self, ctx: &RequestContext) -> bool {
        let Some(value) = ctx.request().header("content-length") else {
            return false;
        };
        match value.trim().parse::<u64>() {
            Ok(size) if size > self.max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {})",
                    self.max_body_size
                ));
                true
            }
            Ok(_) => false,
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{value}', skipping size check"
                ));
                false
            }
        }
    }
}

impl Middleware for BodyLimit {
    fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> Result<(), HandlerError> {
        if self.exceeds(ctx) {
            ctx.send(http::build_413_response())?;
            return Ok(());
        }
        next.run(ctx)
    }
}
