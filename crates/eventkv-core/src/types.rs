//! Core data types: snapshots, history entries, queries, and responses.

use serde::{Deserialize, Serialize};

/// Action recorded against a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value for a `(key, user_id)` pair.
///
/// At most one snapshot exists per pair; the pair is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub key: String,
    pub value: String,
    pub user_id: String,
}

impl EventSnapshot {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            user_id: user_id.into(),
        }
    }
}

/// Immutable audit record of an action taken against a snapshot.
///
/// History entries are point-in-time copies; they do not reference the
/// snapshot row and survive its deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHistory {
    pub key: String,
    pub value: String,
    pub user_id: String,
    pub action: Action,
    /// Server-assigned creation timestamp (RFC 3339, UTC).
    pub created_at: String,
}

/// Identifies a `(key, user_id)` pair for reads and deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    pub key: String,
    pub user_id: String,
}

impl EventQuery {
    pub fn new(key: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            user_id: user_id.into(),
        }
    }
}

/// Current-value response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResponse {
    pub key: String,
    pub value: String,
}

impl From<EventSnapshot> for EventResponse {
    fn from(snapshot: EventSnapshot) -> Self {
        Self {
            key: snapshot.key,
            value: snapshot.value,
        }
    }
}

/// Key/value payload inside a history response entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryData {
    pub key: String,
    pub value: String,
}

/// One entry of the ordered history response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryResponse {
    pub data: HistoryData,
    pub event: Action,
}

impl From<EventHistory> for HistoryEntryResponse {
    fn from(entry: EventHistory) -> Self {
        Self {
            data: HistoryData {
                key: entry.key,
                value: entry.value,
            },
            event: entry.action,
        }
    }
}
