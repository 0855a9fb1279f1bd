//! eventkv-core - Core library for eventkv.
//!
//! A per-user key/value store where every mutation is recorded as an
//! immutable audit entry. The snapshot mutation and its history entry are
//! written atomically inside one SQLite transaction.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use eventkv_core::{EventQuery, EventService, EventSnapshot, SqliteEventStore};
//!
//! # fn main() -> eventkv_core::EventKvResult<()> {
//! let store = SqliteEventStore::in_memory()?;
//! let service = EventService::new(Arc::new(store));
//!
//! service.create_key(&EventSnapshot::new("name", "john", "u1"))?;
//! let current = service.get_answer(&EventQuery::new("name", "u1"))?;
//! assert_eq!(current.value, "john");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{Config, DatabaseConfig, ServerConfig};
pub use error::{EventKvError, EventKvResult};
pub use service::EventService;
pub use store::{EventRepository, SqliteEventStore};
pub use types::{
    Action, EventHistory, EventQuery, EventResponse, EventSnapshot, HistoryData,
    HistoryEntryResponse,
};
