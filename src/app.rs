//! Demo application served by the binary
//!
//! Two pages and a request logger: `/` answers with plain text, `/about`
//! renders a view.

use crate::config::Config;
use crate::error::RouterError;
use crate::http::Response;
use crate::middleware::{AccessLog, BodyLimit};
use crate::routing::Router;
use crate::view::{PlaceholderViews, ViewVars};
use std::sync::Arc;

const ABOUT_VIEW: &str = "<!DOCTYPE html>\n<html>\n<head><title>{{title}}</title></head>\n<body><h1>{{title}}</h1><p>{{message}}</p></body>\n</html>\n";

pub fn views() -> PlaceholderViews {
    PlaceholderViews::new().with_view("about", ABOUT_VIEW)
}

/// Build the router with the demo routes and the configured middleware
pub fn build_router(config: &Config) -> Result<Router, RouterError> {
    let mut router = Router::new();

    if config.logging.access_log {
        router.use_middleware(AccessLog::new(config.logging.access_log_format.clone()));
    }
    router.use_middleware(BodyLimit::new(config.http.max_body_size));

    router.get("/", |_req| Ok(Response::text("Hello World!")))?;

    let views = Arc::new(views());
    router.get("/about", move |_req| {
        let vars = ViewVars::from([
            ("title".to_string(), "About".to_string()),
            ("message".to_string(), "About page".to_string()),
        ]);
        Ok(Response::render(views.as_ref(), "about", &vars)?)
    })?;

    Ok(router)
}
