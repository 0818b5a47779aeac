//! HTTP response module
//!
//! The router's response value, the status builders it falls back to, and the
//! conversion into a hyper response used by the transport.

use crate::error::ViewError;
use crate::view::{ViewRenderer, ViewVars};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_LENGTH, SERVER};
use hyper::StatusCode;

/// Response produced by a handler or middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// 200 response with a plain text body
    pub fn text(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, body).with_header("Content-Type", "text/plain; charset=utf-8")
    }

    /// 200 response with an HTML body
    pub fn html(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, body).with_header("Content-Type", "text/html; charset=utf-8")
    }

    /// Render a named view and wrap it in an HTML response
    pub fn render(
        views: &dyn ViewRenderer,
        name: &str,
        vars: &ViewVars,
    ) -> Result<Self, ViewError> {
        views.render(name, vars).map(Self::html)
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Convert into a hyper response.
    ///
    /// `Content-Length` always comes from the body; a handler-set value is
    /// dropped. `Server` defaults to `server_name` unless the handler set one.
    pub fn into_hyper(self, server_name: &str, is_head: bool) -> hyper::Response<Full<Bytes>> {
        let status = self.status;
        let content_length = self.body.len();
        let has_server = self.header(SERVER.as_str()).is_some();
        let body = if is_head { Bytes::new() } else { self.body };

        let mut builder = hyper::Response::builder().status(status);
        for (name, value) in &self.headers {
            if name.eq_ignore_ascii_case(CONTENT_LENGTH.as_str()) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !has_server {
            builder = builder.header(SERVER, server_name);
        }
        builder = builder.header(CONTENT_LENGTH, content_length);

        builder.body(Full::new(body)).unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut fallback = hyper::Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response {
    Response::new(StatusCode::NOT_FOUND, "404 Not Found")
        .with_header("Content-Type", "text/plain")
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response {
    Response::new(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
        .with_header("Content-Type", "text/plain")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response {
    Response::new(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
        .with_header("Content-Type", "text/plain")
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::PlaceholderViews;

    #[test]
    fn test_text_response() {
        let resp = Response::text("Hello World!");
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, Bytes::from("Hello World!"));
        assert_eq!(resp.header("content-type"), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_status_builders() {
        assert_eq!(build_404_response().status, StatusCode::NOT_FOUND);
        assert_eq!(build_413_response().status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(build_500_response().status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_render_view() {
        let views = PlaceholderViews::new().with_view("index", "<h1>{{title}}</h1>");
        let vars = ViewVars::from([("title".to_string(), "Home".to_string())]);

        let resp = Response::render(&views, "index", &vars).unwrap();
        assert_eq!(resp.body, Bytes::from("<h1>Home</h1>"));
        assert_eq!(resp.header("Content-Type"), Some("text/html; charset=utf-8"));

        let err = Response::render(&views, "missing", &vars).unwrap_err();
        assert_eq!(err, ViewError::NotFound("missing".to_string()));
    }

    #[test]
    fn test_into_hyper_sets_length_and_server() {
        let resp = Response::text("About page").with_header("X-Trace", "abc");
        let hyper_resp = resp.into_hyper("rust_router/0.1", false);

        assert_eq!(hyper_resp.status(), StatusCode::OK);
        let headers = hyper_resp.headers();
        assert_eq!(headers["server"], "rust_router/0.1");
        assert_eq!(headers["content-length"], "10");
        assert_eq!(headers["x-trace"], "abc");
    }

    #[test]
    fn test_into_hyper_does_not_duplicate_transport_headers() {
        let resp = Response::text("abc")
            .with_header("Content-Length", "999")
            .with_header("Server", "custom");
        let hyper_resp = resp.into_hyper("rust_router/0.1", false);
        let headers = hyper_resp.headers();

        let lengths: Vec<_> = headers.get_all("content-length").iter().collect();
        assert_eq!(lengths, vec!["3"]);
        let servers: Vec<_> = headers.get_all("server").iter().collect();
        assert_eq!(servers, vec!["custom"]);
    }

    #[test]
    fn test_into_hyper_head_keeps_length() {
        use hyper::body::Body;

        let hyper_resp = Response::text("About page").into_hyper("test", true);
        assert_eq!(hyper_resp.headers()["content-length"], "10");
        assert_eq!(hyper_resp.body().size_hint().exact(), Some(0));
    }
}
