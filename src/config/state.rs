// Application state module
// Owns configuration, the route table and the in-memory store

use tokio::sync::RwLock;

use super::types::Config;
use crate::routing::Router;
use crate::store::{MovieRegistry, UserIdentity};

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    pub router: Router,

    /// Saved user identity, one lock per entity
    pub identity: RwLock<UserIdentity>,
    /// Movie titles in insertion order
    pub movies: RwLock<MovieRegistry>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            router: Router::movie_routes(),
            identity: RwLock::new(UserIdentity::initial()),
            movies: RwLock::new(MovieRegistry::new()),
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
