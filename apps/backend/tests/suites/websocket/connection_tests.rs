// WebSocket connection lifecycle tests

use std::time::Duration;

use crate::support::build_test_state;
use crate::support::websocket::{start_test_server, wait_for_connections};
use crate::support::websocket_client::WebSocketClient;

const WAIT: Duration = Duration::from_secs(5);

#[actix_web::test]
async fn connect_and_close_updates_registry() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (server_handle, addr, server_join) = start_test_server(state.clone()).await?;

    let mut alice =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?username=alice"), WAIT).await?;
    let mut bob =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?username=bob"), WAIT).await?;
    wait_for_connections(&state, 2, WAIT).await?;

    alice.close().await?;
    wait_for_connections(&state, 1, WAIT).await?;
    bob.close().await?;
    wait_for_connections(&state, 0, WAIT).await?;

    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}

#[actix_web::test]
async fn malformed_messages_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (server_handle, addr, server_join) = start_test_server(state.clone()).await?;

    let mut client =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?username=alice"), WAIT).await?;
    client.send("this is not json").await?;
    client.send(r#"{"type":"resign"}"#).await?;
    client.send(r#"{"type":"make_move"}"#).await?;

    // Still connected and still served.
    client.find_match().await?;
    let start = client.expect_type("game_start", WAIT).await?;
    assert_eq!(start["game"]["is_bot"], true);
    assert_eq!(start["game"]["player1"]["username"], "alice");

    client.close().await?;
    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}

#[actix_web::test]
async fn disconnect_while_waiting_leaves_queue() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (server_handle, addr, server_join) = start_test_server(state.clone()).await?;

    let mut client =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?username=alice"), WAIT).await?;
    wait_for_connections(&state, 1, WAIT).await?;
    client.find_match().await?;

    let matchmaker = state.coordinator.matchmaker();
    let start = tokio::time::Instant::now();
    while matchmaker.waiting_count() != 1 {
        assert!(start.elapsed() < WAIT, "player never queued");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    client.close().await?;
    wait_for_connections(&state, 0, WAIT).await?;
    assert_eq!(matchmaker.waiting_count(), 0);

    // Past the match timeout no bot game appears for the departed player.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(state.coordinator.sessions().is_empty());

    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}
