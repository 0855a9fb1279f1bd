//! Operations on the `event_snapshot` table.
//!
//! Each function runs against a caller-supplied connection so it can take
//! part in an enclosing transaction. Zero-rows-affected is checked
//! explicitly; it is a distinct outcome, not a storage fault.

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::{EventKvError, EventKvResult};
use crate::types::EventSnapshot;

/// Fetch the current snapshot for a `(key, user_id)` pair.
pub(crate) fn get(conn: &Connection, key: &str, user_id: &str) -> EventKvResult<EventSnapshot> {
    let mut stmt = conn.prepare(
        "SELECT key, value, user_id FROM event_snapshot WHERE key = ?1 AND user_id = ?2",
    )?;

    stmt.query_row(params![key, user_id], |row| {
        Ok(EventSnapshot {
            key: row.get(0)?,
            value: row.get(1)?,
            user_id: row.get(2)?,
        })
    })
    .optional()?
    .ok_or_else(|| EventKvError::not_found(key, user_id))
}

/// Insert a new snapshot. Fails with a conflict if the `(key, user_id)`
/// primary key already exists.
pub(crate) fn insert(conn: &Connection, snapshot: &EventSnapshot) -> EventKvResult<()> {
    let result = conn.execute(
        "INSERT INTO event_snapshot (key, value, user_id) VALUES (?1, ?2, ?3)",
        params![snapshot.key, snapshot.value, snapshot.user_id],
    );

    match result {
        Ok(_) => Ok(()),
        Err(err) if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
            Err(EventKvError::conflict(&snapshot.key, &snapshot.user_id))
        }
        Err(err) => Err(err.into()),
    }
}

/// Update the snapshot matching `(key, user_id)` in place. Fails with
/// not-found when no row matched.
pub(crate) fn update(conn: &Connection, snapshot: &EventSnapshot) -> EventKvResult<()> {
    let affected = conn.execute(
        "UPDATE event_snapshot SET value = ?1 WHERE key = ?2 AND user_id = ?3",
        params![snapshot.value, snapshot.key, snapshot.user_id],
    )?;

    if affected == 0 {
        return Err(EventKvError::not_found(&snapshot.key, &snapshot.user_id));
    }
    Ok(())
}

/// Remove the snapshot matching `(key, user_id)`. Fails with not-found when
/// no row matched.
pub(crate) fn delete(conn: &Connection, key: &str, user_id: &str) -> EventKvResult<()> {
    let affected = conn.execute(
        "DELETE FROM event_snapshot WHERE key = ?1 AND user_id = ?2",
        params![key, user_id],
    )?;

    if affected == 0 {
        return Err(EventKvError::not_found(key, user_id));
    }
    Ok(())
}
