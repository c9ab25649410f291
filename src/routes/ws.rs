//! WebSocket handler — the live list subscription.
//!
//! DESIGN
//! ======
//! On upgrade, registers the connection as a subscriber and pushes an
//! initial `todo:list` snapshot, then enters a `select!` loop:
//! - Incoming client frames → parse + dispatch by syscall prefix
//! - Snapshot pushes from mutations elsewhere → forward to client
//!
//! Handler functions are pure business logic — they validate, call the
//! todo service, and return an `Outcome`. The dispatch layer owns all
//! outbound concerns: reply to sender and snapshot fan-out.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → subscribe → push `todo:list` snapshot
//! 2. Client sends frames → dispatch → handler returns Outcome
//! 3. Dispatch applies Outcome (reply; snapshot push on mutation)
//! 4. Close → unsubscribe

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::frame::{Data, Frame};
use crate::services::{live, todo};
use crate::state::AppState;

// =============================================================================
// OUTCOME
// =============================================================================

/// Result returned by handler functions. The dispatch layer uses this to
/// decide what the sender receives and whether subscribers get a fresh
/// snapshot — handlers never send frames directly.
enum Outcome {
    /// Send done+data to sender only.
    Reply(Data),
    /// Send done+data to sender and push a snapshot to every subscriber.
    Mutated(Data),
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    // Per-connection channel for receiving pushed snapshots.
    let (client_tx, mut client_rx) = mpsc::channel::<Frame>(64);
    live::subscribe(&state, client_id, client_tx).await;

    info!(%client_id, "ws: client connected");

    // Initial snapshot so the subscriber starts from current state.
    match todo::list(&state.pool).await {
        Ok(todos) => {
            if send_frame(&mut socket, &live::snapshot_frame(&todos)).await.is_err() {
                live::unsubscribe(&state, client_id).await;
                return;
            }
        }
        Err(e) => {
            warn!(%client_id, error = %e, "ws: initial snapshot failed");
        }
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        for frame in process_inbound_text(&state, client_id, &text).await {
                            let _ = send_frame(&mut socket, &frame).await;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = client_rx.recv() => {
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    live::unsubscribe(&state, client_id).await;
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Parse and process one inbound text frame and return frames for the sender.
///
/// Split out from the socket loop so tests can exercise dispatch without a
/// websocket transport.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> Vec<Frame> {
    let req: Frame = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound frame");
            let err = Frame::request("gateway:error", Data::new());
            return vec![err.error(format!("invalid json: {e}"))];
        }
    };

    info!(%client_id, id = %req.id, syscall = %req.syscall, status = ?req.status, "ws: recv frame");

    let result = match req.prefix() {
        "todo" => handle_todo(state, &req).await,
        other => Err(req.error(format!("unknown prefix: {other}"))),
    };

    match result {
        Ok(Outcome::Reply(data)) => vec![req.done_with(data)],
        Ok(Outcome::Mutated(data)) => {
            live::push_snapshot_detached(state);
            vec![req.done_with(data)]
        }
        Err(err_frame) => vec![err_frame],
    }
}

// =============================================================================
// TODO HANDLERS
// =============================================================================

async fn handle_todo(state: &AppState, req: &Frame) -> Result<Outcome, Frame> {
    match req.op() {
        "list" => match todo::list(&state.pool).await {
            Ok(todos) => {
                let mut data = Data::new();
                data.insert("todos".into(), serde_json::to_value(&todos).unwrap_or_default());
                Ok(Outcome::Reply(data))
            }
            Err(e) => Err(req.error_from(&e)),
        },
        "create" => {
            let text = req.data.get("text").and_then(|v| v.as_str()).unwrap_or("");
            match todo::create(&state.pool, text).await {
                Ok(created) => Ok(Outcome::Mutated(todo_to_data(&created))),
                Err(e) => Err(req.error_from(&e)),
            }
        }
        "toggle" => {
            let id = require_id(req)?;
            match todo::toggle(&state.pool, id).await {
                Ok(toggled) => Ok(Outcome::Mutated(todo_to_data(&toggled))),
                Err(e) => Err(req.error_from(&e)),
            }
        }
        "update" => {
            let id = require_id(req)?;
            let text = req.data.get("text").and_then(|v| v.as_str()).unwrap_or("");
            match todo::update_text(&state.pool, id, text).await {
                Ok(updated) => Ok(Outcome::Mutated(todo_to_data(&updated))),
                Err(e) => Err(req.error_from(&e)),
            }
        }
        "delete" => {
            let id = require_id(req)?;
            match todo::delete(&state.pool, id).await {
                Ok(existed) => {
                    let mut data = Data::new();
                    data.insert("id".into(), serde_json::json!(id));
                    data.insert("deleted".into(), serde_json::json!(existed));
                    Ok(Outcome::Mutated(data))
                }
                Err(e) => Err(req.error_from(&e)),
            }
        }
        "clear" => match todo::clear_all(&state.pool).await {
            Ok(deleted_count) => {
                let mut data = Data::new();
                data.insert("deleted_count".into(), serde_json::json!(deleted_count));
                Ok(Outcome::Mutated(data))
            }
            Err(e) => Err(req.error_from(&e)),
        },
        other => Err(req.error(format!("unknown todo op: {other}"))),
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn require_id(req: &Frame) -> Result<Uuid, Frame> {
    req.data
        .get("id")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| req.error("id required"))
}

fn todo_to_data(todo: &todo::Todo) -> Data {
    let mut data = Data::new();
    data.insert("id".into(), serde_json::json!(todo.id));
    data.insert("text".into(), serde_json::json!(todo.text));
    data.insert("is_completed".into(), serde_json::json!(todo.is_completed));
    data
}

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize frame");
            return Err(());
        }
    };
    if frame.status == crate::frame::Status::Error {
        let code = frame.data.get("code").and_then(|v| v.as_str()).unwrap_or("-");
        let message = frame.data.get("message").and_then(|v| v.as_str()).unwrap_or("-");
        warn!(id = %frame.id, syscall = %frame.syscall, code, message, "ws: send frame status=Error");
    } else {
        info!(id = %frame.id, syscall = %frame.syscall, status = ?frame.status, "ws: send frame");
    }
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
