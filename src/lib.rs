pub mod api;
pub mod auth;
pub mod config;
pub mod db;

pub use db::DbPool;

use std::sync::Arc;

use auth::SessionStore;
use config::Config;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(config: Config, db: DbPool, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            config,
            db,
            sessions,
        }
    }
}
