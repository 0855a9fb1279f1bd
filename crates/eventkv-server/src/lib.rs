//! eventkv-server - REST API server for eventkv.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use eventkv_core::SqliteEventStore;
//! use eventkv_server::{create_server, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = SqliteEventStore::in_memory().unwrap();
//!     let state = AppState::new(Arc::new(store));
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
