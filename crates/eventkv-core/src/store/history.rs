//! Operations on the `event_history` ledger.
//!
//! Entries are append-only and never mutated or deleted. There is no
//! uniqueness constraint beyond row identity; duplicate content is legal.

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::error::{EventKvError, EventKvResult};
use crate::types::{Action, EventHistory};

/// Append an immutable entry with a server-assigned timestamp.
pub(crate) fn append(
    conn: &Connection,
    key: &str,
    user_id: &str,
    value: &str,
    action: Action,
) -> EventKvResult<()> {
    let created_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO event_history (key, value, user_id, action, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![key, value, user_id, action.as_str(), created_at],
    )?;
    Ok(())
}

/// List all entries for a `(key, user_id)` pair, oldest first. The rowid
/// breaks ties between entries sharing a timestamp.
pub(crate) fn list(conn: &Connection, key: &str, user_id: &str) -> EventKvResult<Vec<EventHistory>> {
    let mut stmt = conn.prepare(
        "SELECT key, value, user_id, action, created_at
         FROM event_history
         WHERE key = ?1 AND user_id = ?2
         ORDER BY created_at ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![key, user_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (key, value, user_id, action, created_at) = row?;
        let action = Action::parse(&action).ok_or_else(|| {
            EventKvError::database(format!("unknown action '{}' in history", action))
        })?;
        entries.push(EventHistory {
            key,
            value,
            user_id,
            action,
            created_at,
        });
    }

    Ok(entries)
}
