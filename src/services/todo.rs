//! Todo service — list, create, toggle, edit, delete, clear-all.
//!
//! DESIGN
//! ======
//! Every operation goes straight to Postgres; there is no in-memory cache.
//! List order is strict reverse creation order, driven by the `seq` column
//! rather than timestamps so same-instant inserts still order correctly.
//! Toggle is a single `SET is_completed = NOT is_completed` statement, so
//! two rapid toggles on the same id cannot interleave into a stale flip —
//! per-row atomicity is the store's job, not ours.
//!
//! ERROR HANDLING
//! ==============
//! Toggle and edit fail with `NotFound` on unknown ids. Delete stays a
//! no-op on unknown ids so retries after a lost response remain safe.
//! Empty text is rejected here rather than trusted to callers.

use sqlx::PgPool;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("todo not found: {0}")]
    NotFound(Uuid),
    #[error("todo text must not be empty")]
    EmptyText,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::frame::ErrorCode for TodoError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_TODO_NOT_FOUND",
            Self::EmptyText => "E_EMPTY_TEXT",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

/// A single task record. Mirrors the `todos` table minus internal columns.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub is_completed: bool,
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Trim user-supplied text, rejecting input that is empty after trimming.
fn normalize_text(text: &str) -> Result<&str, TodoError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TodoError::EmptyText);
    }
    Ok(trimmed)
}

// =============================================================================
// LIST
// =============================================================================

/// List the full collection, newest first. An empty collection is an empty
/// vec, never an error.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(pool: &PgPool) -> Result<Vec<Todo>, TodoError> {
    let rows = sqlx::query_as::<_, (Uuid, String, bool)>(
        "SELECT id, text, is_completed FROM todos ORDER BY seq DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, text, is_completed)| Todo { id, text, is_completed })
        .collect())
}

// =============================================================================
// CREATE
// =============================================================================

/// Create a new todo with `is_completed = false` and return it.
///
/// # Errors
///
/// Returns `EmptyText` if `text` trims to nothing.
pub async fn create(pool: &PgPool, text: &str) -> Result<Todo, TodoError> {
    let text = normalize_text(text)?;
    let id = Uuid::new_v4();

    sqlx::query("INSERT INTO todos (id, text, is_completed) VALUES ($1, $2, FALSE)")
        .bind(id)
        .bind(text)
        .execute(pool)
        .await?;

    Ok(Todo { id, text: text.to_string(), is_completed: false })
}

// =============================================================================
// TOGGLE
// =============================================================================

/// Flip a todo's completion flag and return the updated record.
///
/// The flip happens in one UPDATE statement so the read-modify-write is
/// atomic at the row level.
///
/// # Errors
///
/// Returns `NotFound` if no todo with that id exists.
pub async fn toggle(pool: &PgPool, id: Uuid) -> Result<Todo, TodoError> {
    let row = sqlx::query_as::<_, (String, bool)>(
        "UPDATE todos SET is_completed = NOT is_completed WHERE id = $1 RETURNING text, is_completed",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some((text, is_completed)) = row else {
        return Err(TodoError::NotFound(id));
    };
    Ok(Todo { id, text, is_completed })
}

// =============================================================================
// EDIT
// =============================================================================

/// Overwrite a todo's text and return the updated record. The completion
/// flag is untouched.
///
/// # Errors
///
/// Returns `NotFound` on unknown ids and `EmptyText` on blank input.
pub async fn update_text(pool: &PgPool, id: Uuid, text: &str) -> Result<Todo, TodoError> {
    let text = normalize_text(text)?;

    let row = sqlx::query_as::<_, (bool,)>(
        "UPDATE todos SET text = $2 WHERE id = $1 RETURNING is_completed",
    )
    .bind(id)
    .bind(text)
    .fetch_optional(pool)
    .await?;

    let Some((is_completed,)) = row else {
        return Err(TodoError::NotFound(id));
    };
    Ok(Todo { id, text: text.to_string(), is_completed })
}

// =============================================================================
// DELETE
// =============================================================================

/// Delete a todo. Returns whether a row existed; deleting a missing id is
/// a no-op, not an error.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, TodoError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// CLEAR ALL
// =============================================================================

/// Delete every todo and return the number of rows removed.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn clear_all(pool: &PgPool) -> Result<u64, TodoError> {
    let result = sqlx::query("DELETE FROM todos").execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
#[path = "todo_test.rs"]
mod tests;
