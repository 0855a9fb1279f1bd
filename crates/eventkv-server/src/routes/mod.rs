//! Route definitions for the REST API.

mod events;
mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Key mutations
        .route("/", post(events::create_key))
        .route("/", put(events::update_key))
        .route("/:user_id/:key", delete(events::delete_key))
        // Reads
        .route("/latest/:user_id/:key", get(events::get_answer))
        .route("/history/:user_id/:key", get(events::get_history))
        // Attach state
        .with_state(state)
}

pub use events::*;
pub use health::*;
