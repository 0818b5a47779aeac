// Server module entry
// Hosts a Router behind a tokio + hyper HTTP/1 listener

mod connection;
mod listener;
mod state;

pub use connection::{accept_connection, serve_request};
pub use listener::create_listener;
pub use state::ServerState;

use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::logger;
use crate::routing::Router;

/// Bind the configured address and serve until Ctrl-C
pub async fn run(config: Config, router: Router) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.get_socket_addr()?;
    let listener = create_listener(addr)?;

    logger::log_server_start(&addr, &config, router.routes().len());
    for route in router.routes() {
        logger::log_route(&route.method, &route.path);
    }

    let state = Arc::new(ServerState::new(config, router));
    serve(listener, state, shutdown_signal()).await?;
    logger::log_info("Server stopped");
    Ok(())
}

/// Accept loop.
///
/// Returns once `shutdown` completes and in-flight connections have finished
/// or the write timeout has elapsed.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_shutdown();

    let grace = Duration::from_secs(state.config.performance.write_timeout);
    let deadline = tokio::time::Instant::now() + grace;
    while state.active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutting down with {} connections still open",
                state.active_connections.load(Ordering::SeqCst)
            ));
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_error(&format!("Failed to listen for Ctrl-C: {e}"));
        std::future::pending::<()>().await;
    }
}
