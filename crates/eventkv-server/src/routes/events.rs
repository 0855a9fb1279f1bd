//! Key/value endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use eventkv_core::{EventQuery, EventResponse, EventSnapshot, HistoryEntryResponse};

/// Request body for creating or updating a key.
#[derive(Debug, Deserialize)]
pub struct WriteKeyRequest {
    pub key: String,
    pub value: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl WriteKeyRequest {
    fn into_snapshot(self) -> ApiResult<EventSnapshot> {
        validate_identifiers(&self.key, &self.user_id)?;
        Ok(EventSnapshot::new(self.key, self.value, self.user_id))
    }
}

fn validate_identifiers(key: &str, user_id: &str) -> ApiResult<()> {
    if key.is_empty() {
        return Err(ApiError::validation("'key' must not be empty"));
    }
    if user_id.is_empty() {
        return Err(ApiError::validation("'user_id' must not be empty"));
    }
    Ok(())
}

/// Create a key.
/// POST /
pub async fn create_key(
    State(state): State<AppState>,
    Json(request): Json<WriteKeyRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let snapshot = request.into_snapshot()?;
    state.service.create_key(&snapshot)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "key created successfully".to_string(),
        }),
    ))
}

/// Update a key.
/// PUT /
pub async fn update_key(
    State(state): State<AppState>,
    Json(request): Json<WriteKeyRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let snapshot = request.into_snapshot()?;
    state.service.update_key(&snapshot)?;

    Ok(Json(MessageResponse {
        message: "key updated successfully".to_string(),
    }))
}

/// Get the current value for a key.
/// GET /latest/:user_id/:key
pub async fn get_answer(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(String, String)>,
) -> ApiResult<Json<EventResponse>> {
    validate_identifiers(&key, &user_id)?;

    let response = state.service.get_answer(&EventQuery::new(key, user_id))?;
    Ok(Json(response))
}

/// Delete a key.
/// DELETE /:user_id/:key
pub async fn delete_key(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    validate_identifiers(&key, &user_id)?;

    state.service.delete_key(&EventQuery::new(key, user_id))?;
    Ok(Json(MessageResponse {
        message: "key deleted successfully".to_string(),
    }))
}

/// Get the ordered action log for a key.
/// GET /history/:user_id/:key
pub async fn get_history(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(String, String)>,
) -> ApiResult<Json<Vec<HistoryEntryResponse>>> {
    validate_identifiers(&key, &user_id)?;

    let entries = state.service.get_history(&EventQuery::new(key, user_id))?;
    Ok(Json(entries))
}
