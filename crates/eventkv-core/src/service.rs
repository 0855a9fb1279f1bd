//! Event service: stateless coordination over the repository.
//!
//! The service validates nothing (validation belongs to the boundary). It
//! delegates to the repository, annotates failures with the operation name
//! and identifying key without changing the error kind, and maps internal
//! entities to response-shaped objects.

use std::sync::Arc;

use tracing::debug;

use crate::error::EventKvResult;
use crate::store::EventRepository;
use crate::types::{EventQuery, EventResponse, EventSnapshot, HistoryEntryResponse};

/// Stateless coordinator between the external boundary and the store.
#[derive(Clone)]
pub struct EventService {
    repository: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    /// Create a key and record its `create` audit entry.
    pub fn create_key(&self, snapshot: &EventSnapshot) -> EventKvResult<()> {
        self.repository.create_key(snapshot).map_err(|e| {
            e.annotate(format!(
                "create_key '{}'/'{}'",
                snapshot.key, snapshot.user_id
            ))
        })?;

        debug!(key = %snapshot.key, user_id = %snapshot.user_id, "key created");
        Ok(())
    }

    /// Update a key and record its `update` audit entry.
    pub fn update_key(&self, snapshot: &EventSnapshot) -> EventKvResult<()> {
        self.repository.update_key(snapshot).map_err(|e| {
            e.annotate(format!(
                "update_key '{}'/'{}'",
                snapshot.key, snapshot.user_id
            ))
        })?;

        debug!(key = %snapshot.key, user_id = %snapshot.user_id, "key updated");
        Ok(())
    }

    /// Delete a key and record its `delete` audit entry.
    pub fn delete_key(&self, query: &EventQuery) -> EventKvResult<()> {
        self.repository
            .delete_key(query)
            .map_err(|e| e.annotate(format!("delete_key '{}'/'{}'", query.key, query.user_id)))?;

        debug!(key = %query.key, user_id = %query.user_id, "key deleted");
        Ok(())
    }

    /// Read the current value for a key.
    pub fn get_answer(&self, query: &EventQuery) -> EventKvResult<EventResponse> {
        let snapshot = self
            .repository
            .get_answer(query)
            .map_err(|e| e.annotate(format!("get_answer '{}'/'{}'", query.key, query.user_id)))?;

        Ok(EventResponse::from(snapshot))
    }

    /// Read the ordered action log for a key.
    pub fn get_history(&self, query: &EventQuery) -> EventKvResult<Vec<HistoryEntryResponse>> {
        let history = self
            .repository
            .get_history(query)
            .map_err(|e| e.annotate(format!("get_history '{}'/'{}'", query.key, query.user_id)))?;

        Ok(history.into_iter().map(Into::into).collect())
    }
}
