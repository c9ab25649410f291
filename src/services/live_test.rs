use super::*;
use crate::frame::Status;
use crate::state::test_helpers;
use tokio::time::{Duration, timeout};

async fn recv_push(rx: &mut mpsc::Receiver<Frame>) -> Frame {
    timeout(Duration::from_millis(200), rx.recv())
        .await
        .expect("push receive timed out")
        .expect("channel closed")
}

async fn assert_channel_empty(rx: &mut mpsc::Receiver<Frame>) {
    // A closed channel (all senders dropped) also means nothing was
    // delivered; only an actual frame is a failure.
    match timeout(Duration::from_millis(80), rx.recv()).await {
        Err(_) | Ok(None) => {}
        Ok(Some(frame)) => panic!("unexpected frame: {}", frame.syscall),
    }
}

#[tokio::test]
async fn broadcast_reaches_all_subscribers() {
    let state = test_helpers::test_app_state();
    let (_, mut rx_a) = test_helpers::attach_subscriber(&state, 8).await;
    let (_, mut rx_b) = test_helpers::attach_subscriber(&state, 8).await;

    let frame = snapshot_frame(&[]);
    broadcast(&state, &frame).await;

    let a = recv_push(&mut rx_a).await;
    let b = recv_push(&mut rx_b).await;
    assert_eq!(a.syscall, SNAPSHOT_SYSCALL);
    assert_eq!(b.syscall, SNAPSHOT_SYSCALL);
}

#[tokio::test]
async fn unsubscribe_stops_delivery() {
    let state = test_helpers::test_app_state();
    let (client_id, mut rx) = test_helpers::attach_subscriber(&state, 8).await;

    unsubscribe(&state, client_id).await;
    broadcast(&state, &snapshot_frame(&[])).await;

    assert_channel_empty(&mut rx).await;
}

#[tokio::test]
async fn full_channel_does_not_block_broadcast() {
    let state = test_helpers::test_app_state();
    let (_, mut rx_full) = test_helpers::attach_subscriber(&state, 1).await;
    let (_, mut rx_ok) = test_helpers::attach_subscriber(&state, 8).await;

    // Fill the small channel, then broadcast twice more.
    broadcast(&state, &snapshot_frame(&[])).await;
    broadcast(&state, &snapshot_frame(&[])).await;
    broadcast(&state, &snapshot_frame(&[])).await;

    // The healthy subscriber saw all three pushes.
    for _ in 0..3 {
        recv_push(&mut rx_ok).await;
    }
    // The full one kept only its first.
    recv_push(&mut rx_full).await;
    assert_channel_empty(&mut rx_full).await;
}

#[tokio::test]
async fn detached_push_waits_for_an_in_flight_push() {
    let state = test_helpers::test_app_state();
    let (_, mut rx) = test_helpers::attach_subscriber(&state, 8).await;

    // Stand in for a push that has read but not yet broadcast.
    let in_flight = state.snapshot_lock.clone().lock_owned().await;
    push_snapshot_detached(&state);
    assert_channel_empty(&mut rx).await;
    drop(in_flight);
}

#[test]
fn snapshot_frame_shape() {
    use crate::services::todo::Todo;
    use uuid::Uuid;

    let todos = vec![Todo { id: Uuid::new_v4(), text: "Buy milk".into(), is_completed: false }];
    let frame = snapshot_frame(&todos);

    assert_eq!(frame.syscall, SNAPSHOT_SYSCALL);
    assert_eq!(frame.status, Status::Item);
    assert!(frame.parent_id.is_none());

    let pushed = frame.data.get("todos").and_then(|v| v.as_array()).expect("todos array");
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].get("text").and_then(|v| v.as_str()), Some("Buy milk"));
}
