// Server state shared by every connection task

use std::sync::atomic::AtomicUsize;

use crate::config::Config;
use crate::routing::Router;

pub struct ServerState {
    pub config: Config,
    /// Frozen after startup; dispatch only reads it
    pub router: Router,
    pub active_connections: AtomicUsize,
}

impl ServerState {
    pub fn new(config: Config, router: Router) -> Self {
        Self {
            config,
            router,
            active_connections: AtomicUsize::new(0),
        }
    }
}
