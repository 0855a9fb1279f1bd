//! Server state management.

use std::sync::Arc;

use eventkv_core::{EventRepository, EventService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: EventService,
}

impl AppState {
    /// Create application state over a repository implementation.
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self {
            service: EventService::new(repository),
        }
    }
}
