// Connection handling module
// Accepts a TCP connection and serves it with the shared router

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Method;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use super::state::ServerState;
use crate::http::{self, Request};
use crate::logger;

/// Accept a connection, enforcing the connection limit.
///
/// The counter is incremented before the check so concurrent accepts cannot
/// both slip under the limit.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<ServerState>,
) {
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    handle_connection(stream, peer_addr, Arc::clone(state));
}

/// Serve one connection on its own task, then release its slot.
///
/// `read_timeout` bounds how long hyper waits for each request head, which
/// also closes idle keep-alive connections. A connection that keeps sending
/// requests stays open.
fn handle_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, state: Arc<ServerState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(
                (performance.read_timeout > 0).then(|| Duration::from_secs(performance.read_timeout)),
            )
            .keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { Ok::<_, Infallible>(serve_request(&state, &req, peer_addr)) }
            }),
        );

        if let Err(err) = conn.await {
            if err.is_timeout() {
                logger::log_connection_timeout(&peer_addr);
            } else {
                logger::log_connection_error(&err);
            }
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Translate a hyper request, dispatch it, and translate the response back.
///
/// A dispatch error means the router is misconfigured; the client gets 500.
pub fn serve_request<B>(
    state: &ServerState,
    req: &hyper::Request<B>,
    peer_addr: SocketAddr,
) -> hyper::Response<Full<Bytes>> {
    let is_head = req.method() == Method::HEAD;
    let request = Request::from_hyper(req, peer_addr);

    let response = state.router.dispatch(request).unwrap_or_else(|e| {
        logger::log_error(&format!("Router configuration error: {e}"));
        http::build_500_response()
    });

    response.into_hyper(&state.config.http.server_name, is_head)
}
