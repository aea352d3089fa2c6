//! Application state for the API server

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::api::auth::JwtConfig;
use crate::clock::{Clock, SystemClock};

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Shared connection pool
    pub db: Arc<DatabaseConnection>,
    /// Token signing and validation settings
    pub jwt: Arc<JwtConfig>,
    /// Source of expense timestamps
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// State backed by the system clock.
    pub fn new(db: Arc<DatabaseConnection>, jwt: JwtConfig) -> Self {
        Self {
            db,
            jwt: Arc::new(jwt),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock, e.g. with a fixed one in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
