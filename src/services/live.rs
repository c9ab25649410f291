//! Live service — subscriber registry and snapshot fan-out.
//!
//! DESIGN
//! ======
//! The reactive list is a standing subscription: whenever the collection
//! changes, the current list is re-read from Postgres and pushed to every
//! subscriber as a `todo:list` item frame. Subscribers never receive
//! deltas, only full snapshots, so a missed push is corrected by the next
//! one and no client-side merge logic exists anywhere.

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::frame::{Data, Frame};
use crate::services::todo::{self, Todo};
use crate::state::AppState;

/// Syscall carried by snapshot pushes.
pub const SNAPSHOT_SYSCALL: &str = "todo:list";

// =============================================================================
// SUBSCRIBE / UNSUBSCRIBE
// =============================================================================

/// Register a subscriber channel under a fresh client id.
pub async fn subscribe(state: &AppState, client_id: Uuid, tx: mpsc::Sender<Frame>) {
    let mut subscribers = state.subscribers.write().await;
    subscribers.insert(client_id, tx);
    info!(%client_id, subscribers = subscribers.len(), "live: subscriber attached");
}

/// Remove a subscriber. Called when its connection closes.
pub async fn unsubscribe(state: &AppState, client_id: Uuid) {
    let mut subscribers = state.subscribers.write().await;
    subscribers.remove(&client_id);
    info!(%client_id, subscribers = subscribers.len(), "live: subscriber detached");
}

// =============================================================================
// SNAPSHOT FAN-OUT
// =============================================================================

/// Build the `todo:list` snapshot frame for a list of todos.
#[must_use]
pub fn snapshot_frame(todos: &[Todo]) -> Frame {
    let mut data = Data::new();
    data.insert("todos".into(), serde_json::to_value(todos).unwrap_or_default());
    Frame::item_push(SNAPSHOT_SYSCALL, data)
}

/// Send a frame to every subscriber.
pub async fn broadcast(state: &AppState, frame: &Frame) {
    let subscribers = state.subscribers.read().await;
    for tx in subscribers.values() {
        // Best-effort: if a subscriber's channel is full, skip it. The next
        // snapshot will catch it up.
        let _ = tx.try_send(frame.clone());
    }
}

/// Re-read the collection and push a snapshot to every subscriber.
///
/// # Errors
///
/// Returns a database error if the list query fails.
pub async fn push_snapshot(state: &AppState) -> Result<(), todo::TodoError> {
    let todos = todo::list(&state.pool).await?;
    broadcast(state, &snapshot_frame(&todos)).await;
    Ok(())
}

/// Spawn a fire-and-forget snapshot push after a mutation. Failures are
/// logged; the subscription self-heals on the next successful push.
///
/// Pushes run one at a time under `snapshot_lock`. Two rapid mutations may
/// spawn in either order, but serializing read-then-broadcast guarantees
/// the final delivered snapshot reflects both.
pub fn push_snapshot_detached(state: &AppState) {
    let state = state.clone();
    tokio::spawn(async move {
        let _guard = state.snapshot_lock.lock().await;
        if let Err(e) = push_snapshot(&state).await {
            warn!(error = %e, "live: snapshot push failed");
        }
    });
}

#[cfg(test)]
#[path = "live_test.rs"]
mod tests;
