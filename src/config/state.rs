// Application state module
// Shared, read-only state handed to every connection

use crate::routing::Router;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    pub const fn new(config: Config, router: Router) -> Self {
        Self { config, router }
    }

    /// Whether per-request dispatch lines are written
    pub fn debug_logging(&self) -> bool {
        self.config.logging.is_debug()
    }
}
