//! SQLite-backed persistence: snapshot store, history ledger, and the
//! transactional coordinator tying them together.
//!
//! Every mutation runs as a unit of work: the snapshot change and its audit
//! entry are written inside one transaction, and any early return (or panic)
//! drops the uncommitted [`rusqlite::Transaction`], which rolls back. There
//! is no partially-committed state.

mod history;
mod snapshot;

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::Connection;

use crate::config::DatabaseConfig;
use crate::error::EventKvResult;
use crate::types::{Action, EventHistory, EventQuery, EventSnapshot};

/// Persistence seam for event snapshots and their history.
#[cfg_attr(test, mockall::automock)]
pub trait EventRepository: Send + Sync {
    /// Create a snapshot and its `create` history entry atomically.
    fn create_key(&self, snapshot: &EventSnapshot) -> EventKvResult<()>;

    /// Update a snapshot in place and append an `update` history entry
    /// atomically.
    fn update_key(&self, snapshot: &EventSnapshot) -> EventKvResult<()>;

    /// Delete a snapshot and append a `delete` history entry atomically.
    fn delete_key(&self, query: &EventQuery) -> EventKvResult<()>;

    /// Read the current snapshot for a `(key, user_id)` pair.
    fn get_answer(&self, query: &EventQuery) -> EventKvResult<EventSnapshot>;

    /// Read the ordered history for a `(key, user_id)` pair.
    fn get_history(&self, query: &EventQuery) -> EventKvResult<Vec<EventHistory>>;
}

/// SQLite-backed event store.
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
}

impl SqliteEventStore {
    /// Open (or create) the store at the configured path.
    pub fn open(config: &DatabaseConfig) -> EventKvResult<Self> {
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(&config.path)?, config.busy_timeout_ms)
    }

    /// Open a store at an arbitrary path with the default lock-wait bound.
    pub fn open_path(path: impl AsRef<Path>) -> EventKvResult<Self> {
        Self::open(&DatabaseConfig {
            path: path.as_ref().to_path_buf(),
            ..DatabaseConfig::default()
        })
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> EventKvResult<Self> {
        Self::from_connection(
            Connection::open_in_memory()?,
            DatabaseConfig::default().busy_timeout_ms,
        )
    }

    fn from_connection(conn: Connection, busy_timeout_ms: u64) -> EventKvResult<Self> {
        conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn init_schema(conn: &Connection) -> EventKvResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS event_snapshot (
                key     TEXT NOT NULL,
                value   TEXT NOT NULL,
                user_id TEXT NOT NULL,
                PRIMARY KEY (key, user_id)
            );

            CREATE TABLE IF NOT EXISTS event_history (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                key        TEXT NOT NULL,
                value      TEXT NOT NULL,
                user_id    TEXT NOT NULL,
                action     TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_key_user_time
                ON event_history(key, user_id, created_at);
        "#,
        )?;
        Ok(())
    }
}

impl EventRepository for SqliteEventStore {
    fn create_key(&self, snapshot: &EventSnapshot) -> EventKvResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        snapshot::insert(&tx, snapshot)?;
        history::append(
            &tx,
            &snapshot.key,
            &snapshot.user_id,
            &snapshot.value,
            Action::Create,
        )
        .map_err(|e| {
            e.annotate(format!(
                "failed to historize create for key '{}' user '{}'",
                snapshot.key, snapshot.user_id
            ))
        })?;

        tx.commit()?;
        Ok(())
    }

    fn update_key(&self, snapshot: &EventSnapshot) -> EventKvResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        snapshot::update(&tx, snapshot)?;
        history::append(
            &tx,
            &snapshot.key,
            &snapshot.user_id,
            &snapshot.value,
            Action::Update,
        )
        .map_err(|e| {
            e.annotate(format!(
                "failed to historize update for key '{}' user '{}'",
                snapshot.key, snapshot.user_id
            ))
        })?;

        tx.commit()?;
        Ok(())
    }

    fn delete_key(&self, query: &EventQuery) -> EventKvResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        snapshot::delete(&tx, &query.key, &query.user_id)?;
        // The delete entry records only the identifiers from the query; the
        // removed value is not read back.
        history::append(&tx, &query.key, &query.user_id, "", Action::Delete).map_err(|e| {
            e.annotate(format!(
                "failed to historize delete for key '{}' user '{}'",
                query.key, query.user_id
            ))
        })?;

        tx.commit()?;
        Ok(())
    }

    fn get_answer(&self, query: &EventQuery) -> EventKvResult<EventSnapshot> {
        let conn = self.conn.lock().unwrap();
        snapshot::get(&conn, &query.key, &query.user_id)
    }

    fn get_history(&self, query: &EventQuery) -> EventKvResult<Vec<EventHistory>> {
        let conn = self.conn.lock().unwrap();
        history::list(&conn, &query.key, &query.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventKvError;
    use std::sync::Arc;

    fn store() -> SqliteEventStore {
        SqliteEventStore::in_memory().unwrap()
    }

    fn drop_history_table(store: &SqliteEventStore) {
        let conn = store.conn.lock().unwrap();
        conn.execute_batch("DROP TABLE event_history").unwrap();
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let store = store();
        store
            .create_key(&EventSnapshot::new("name", "john", "u1"))
            .unwrap();

        let current = store.get_answer(&EventQuery::new("name", "u1")).unwrap();
        assert_eq!(current, EventSnapshot::new("name", "john", "u1"));
    }

    #[test]
    fn test_create_appends_history() {
        let store = store();
        store
            .create_key(&EventSnapshot::new("name", "john", "u1"))
            .unwrap();

        let entries = store.get_history(&EventQuery::new("name", "u1")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, Action::Create);
        assert_eq!(entries[0].value, "john");
    }

    #[test]
    fn test_duplicate_create_conflicts_and_appends_nothing() {
        let store = store();
        store
            .create_key(&EventSnapshot::new("name", "john", "u1"))
            .unwrap();

        let err = store
            .create_key(&EventSnapshot::new("name", "sam", "u1"))
            .unwrap_err();
        assert!(matches!(err, EventKvError::Conflict { .. }));

        let entries = store.get_history(&EventQuery::new("name", "u1")).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_update_missing_is_not_found_and_appends_nothing() {
        let store = store();
        let err = store
            .update_key(&EventSnapshot::new("name", "sam", "u1"))
            .unwrap_err();
        assert!(matches!(err, EventKvError::NotFound { .. }));

        assert!(store
            .get_history(&EventQuery::new("name", "u1"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_delete_missing_is_not_found_and_appends_nothing() {
        let store = store();
        let err = store.delete_key(&EventQuery::new("name", "u1")).unwrap_err();
        assert!(matches!(err, EventKvError::NotFound { .. }));

        assert!(store
            .get_history(&EventQuery::new("name", "u1"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_delete_history_records_identifiers_only() {
        let store = store();
        store
            .create_key(&EventSnapshot::new("name", "john", "u1"))
            .unwrap();
        store.delete_key(&EventQuery::new("name", "u1")).unwrap();

        let entries = store.get_history(&EventQuery::new("name", "u1")).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].action, Action::Delete);
        assert_eq!(entries[1].value, "");
    }

    #[test]
    fn test_create_rolls_back_when_history_append_fails() {
        let store = store();
        drop_history_table(&store);

        let err = store
            .create_key(&EventSnapshot::new("name", "john", "u1"))
            .unwrap_err();
        assert!(matches!(err, EventKvError::Database { .. }));
        assert!(err.to_string().contains("historize create"));

        // The snapshot insert must not have persisted
        let err = store.get_answer(&EventQuery::new("name", "u1")).unwrap_err();
        assert!(matches!(err, EventKvError::NotFound { .. }));
    }

    #[test]
    fn test_update_rolls_back_when_history_append_fails() {
        let store = store();
        store
            .create_key(&EventSnapshot::new("name", "john", "u1"))
            .unwrap();
        drop_history_table(&store);

        let err = store
            .update_key(&EventSnapshot::new("name", "sam", "u1"))
            .unwrap_err();
        assert!(matches!(err, EventKvError::Database { .. }));

        let current = store.get_answer(&EventQuery::new("name", "u1")).unwrap();
        assert_eq!(current.value, "john");
    }

    #[test]
    fn test_delete_rolls_back_when_history_append_fails() {
        let store = store();
        store
            .create_key(&EventSnapshot::new("name", "john", "u1"))
            .unwrap();
        drop_history_table(&store);

        let err = store.delete_key(&EventQuery::new("name", "u1")).unwrap_err();
        assert!(matches!(err, EventKvError::Database { .. }));

        let current = store.get_answer(&EventQuery::new("name", "u1")).unwrap();
        assert_eq!(current.value, "john");
    }

    #[test]
    fn test_history_ordering_matches_application_order() {
        let store = store();
        store
            .create_key(&EventSnapshot::new("name", "v0", "u1"))
            .unwrap();
        for i in 1..=5 {
            store
                .update_key(&EventSnapshot::new("name", format!("v{}", i), "u1"))
                .unwrap();
        }

        let entries = store.get_history(&EventQuery::new("name", "u1")).unwrap();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].action, Action::Create);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.value, format!("v{}", i));
        }
    }

    #[test]
    fn test_concurrent_deletes_serialize() {
        let store = Arc::new(SqliteEventStore::in_memory().unwrap());
        store
            .create_key(&EventSnapshot::new("name", "john", "u1"))
            .unwrap();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.delete_key(&EventQuery::new("name", "u1")))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(EventKvError::NotFound { .. })))
                .count(),
            1
        );

        // Exactly one delete entry made it into the ledger
        let entries = store.get_history(&EventQuery::new("name", "u1")).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].action, Action::Delete);
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.db");

        {
            let store = SqliteEventStore::open_path(&path).unwrap();
            store
                .create_key(&EventSnapshot::new("name", "john", "u1"))
                .unwrap();
        }

        let store = SqliteEventStore::open_path(&path).unwrap();
        let current = store.get_answer(&EventQuery::new("name", "u1")).unwrap();
        assert_eq!(current.value, "john");
        assert_eq!(
            store
                .get_history(&EventQuery::new("name", "u1"))
                .unwrap()
                .len(),
            1
        );
    }
}
