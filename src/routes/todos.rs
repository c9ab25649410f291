//! Todo REST routes.
//!
//! DESIGN
//! ======
//! Thin translation layer: parse the request, call the todo service, map
//! the error to a status code, and kick a detached snapshot push on every
//! successful mutation so websocket subscribers stay current no matter
//! which surface the mutation arrived on.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::services::{live, todo};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TodoTextBody {
    pub text: String,
}

pub(crate) fn todo_error_to_status(err: &todo::TodoError) -> StatusCode {
    match err {
        todo::TodoError::NotFound(_) => StatusCode::NOT_FOUND,
        todo::TodoError::EmptyText => StatusCode::UNPROCESSABLE_ENTITY,
        todo::TodoError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /api/todos` — full collection, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<todo::Todo>>, StatusCode> {
    let todos = todo::list(&state.pool)
        .await
        .map_err(|e| todo_error_to_status(&e))?;
    Ok(Json(todos))
}

/// `POST /api/todos` — create a todo.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<TodoTextBody>,
) -> Result<(StatusCode, Json<todo::Todo>), StatusCode> {
    let created = todo::create(&state.pool, &body.text)
        .await
        .map_err(|e| todo_error_to_status(&e))?;

    live::push_snapshot_detached(&state);
    Ok((StatusCode::CREATED, Json(created)))
}

/// `POST /api/todos/:id/toggle` — flip the completion flag.
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<todo::Todo>, StatusCode> {
    let toggled = todo::toggle(&state.pool, id)
        .await
        .map_err(|e| todo_error_to_status(&e))?;

    live::push_snapshot_detached(&state);
    Ok(Json(toggled))
}

/// `PATCH /api/todos/:id` — overwrite the text.
pub async fn update_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TodoTextBody>,
) -> Result<Json<todo::Todo>, StatusCode> {
    let updated = todo::update_text(&state.pool, id, &body.text)
        .await
        .map_err(|e| todo_error_to_status(&e))?;

    live::push_snapshot_detached(&state);
    Ok(Json(updated))
}

/// `DELETE /api/todos/:id` — delete one todo. Missing ids are a no-op,
/// never a 404, so clients can retry after a lost response.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let existed = todo::delete(&state.pool, id)
        .await
        .map_err(|e| todo_error_to_status(&e))?;

    if existed {
        live::push_snapshot_detached(&state);
    }
    Ok(Json(serde_json::json!({ "deleted": existed })))
}

/// `DELETE /api/todos` — clear the collection, reporting the count.
pub async fn clear_all(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let deleted_count = todo::clear_all(&state.pool)
        .await
        .map_err(|e| todo_error_to_status(&e))?;

    live::push_snapshot_detached(&state);
    Ok(Json(serde_json::json!({ "deleted_count": deleted_count })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping_covers_taxonomy() {
        assert_eq!(
            todo_error_to_status(&todo::TodoError::NotFound(Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            todo_error_to_status(&todo::TodoError::EmptyText),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            todo_error_to_status(&todo::TodoError::Database(sqlx::Error::PoolClosed)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
