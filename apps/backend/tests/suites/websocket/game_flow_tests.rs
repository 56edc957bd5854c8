// Full games played over real websocket connections

use std::time::Duration;

use serde_json::json;

use crate::support::build_test_state;
use crate::support::websocket::{start_test_server, wait_for_connections};
use crate::support::websocket_client::WebSocketClient;

const WAIT: Duration = Duration::from_secs(5);

#[actix_web::test]
async fn two_humans_play_to_a_win() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (server_handle, addr, server_join) = start_test_server(state.clone()).await?;

    let mut alice =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?username=alice"), WAIT).await?;
    let mut bob =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?username=bob"), WAIT).await?;
    wait_for_connections(&state, 2, WAIT).await?;

    alice.find_match().await?;
    let start = tokio::time::Instant::now();
    while state.coordinator.matchmaker().waiting_count() != 1 {
        assert!(start.elapsed() < WAIT, "alice never queued");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    bob.find_match().await?;

    let bob_start = bob.expect_type("game_start", WAIT).await?;
    let alice_start = alice.expect_type("game_start", WAIT).await?;
    assert_eq!(bob_start["game"]["id"], alice_start["game"]["id"]);
    // The player who completed the pairing takes seat one.
    assert_eq!(bob_start["game"]["player1"]["username"], "bob");
    assert_eq!(bob_start["game"]["player2"]["username"], "alice");
    assert_eq!(bob_start["game"]["is_bot"], false);

    alice.make_move(3).await?;
    let err = alice.expect_type("error", WAIT).await?;
    assert_eq!(err["message"], "not your turn");

    for turn in 0..7 {
        if turn % 2 == 0 {
            bob.make_move(0).await?;
        } else {
            alice.make_move(1).await?;
        }
        let seen_by_bob = bob.expect_type("move_made", WAIT).await?;
        let seen_by_alice = alice.expect_type("move_made", WAIT).await?;
        assert_eq!(seen_by_bob, seen_by_alice);
        assert_eq!(seen_by_bob["player"], if turn % 2 == 0 { 1 } else { 2 });
    }

    for client in [&mut bob, &mut alice] {
        let end = client.expect_type("game_end", WAIT).await?;
        assert_eq!(end["result"], "win");
        assert_eq!(end["winner"]["username"], "bob");
        assert_eq!(end["game"]["status"], "finished");
    }
    assert!(state.coordinator.sessions().is_empty());

    let top = state.store.top_players(10).await?;
    assert_eq!(top[0].username, "bob");
    assert_eq!(top[0].wins, 1);

    bob.close().await?;
    alice.close().await?;
    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}

#[actix_web::test]
async fn lone_player_plays_the_bot() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (server_handle, addr, server_join) = start_test_server(state.clone()).await?;

    let mut alice =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?username=alice"), WAIT).await?;
    alice.find_match().await?;

    let start = alice.expect_type("game_start", WAIT).await?;
    assert_eq!(start["game"]["is_bot"], true);
    assert_eq!(start["game"]["player2"]["username"], "Bot");
    assert_eq!(start["game"]["current_turn"], 1);

    alice.make_move(0).await?;
    let mine = alice.expect_type("move_made", WAIT).await?;
    assert_eq!(mine["player"], 1);
    assert_eq!(mine["column"], 0);
    assert_eq!(mine["row"], 5);

    let reply = alice.expect_type("move_made", WAIT).await?;
    assert_eq!(reply["player"], 2);
    assert_eq!(reply["game"]["current_turn"], 1);

    alice.make_move(9).await?;
    let err = alice.expect_type("error", WAIT).await?;
    assert_eq!(err["message"], "column 9 is out of range");

    alice.close().await?;
    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}

#[actix_web::test]
async fn rejoin_returns_current_state_read_only() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (server_handle, addr, server_join) = start_test_server(state.clone()).await?;

    let mut alice =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?username=alice"), WAIT).await?;
    alice.find_match().await?;
    let start = alice.expect_type("game_start", WAIT).await?;
    let game_id = start["game"]["id"].clone();

    alice.close().await?;
    wait_for_connections(&state, 0, WAIT).await?;

    let mut back =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?username=alice"), WAIT).await?;
    for unknown in ["00000000-0000-0000-0000-000000000000", "abc"] {
        back.send_json(json!({"type": "rejoin", "game_id": unknown}))
            .await?;
        let err = back.expect_type("error", WAIT).await?;
        assert_eq!(err["message"], "Game not found");
    }

    back.send_json(json!({"type": "rejoin", "game_id": game_id}))
        .await?;
    let rejoined = back.expect_type("rejoin_success", WAIT).await?;
    assert_eq!(rejoined["game"]["id"], game_id);
    assert_eq!(rejoined["game"]["status"], "playing");

    // Rejoining only views the game; the seat stays with the old connection.
    assert_eq!(rejoined["game"]["player1"]["id"], start["game"]["player1"]["id"]);
    back.make_move(3).await?;
    let err = back.expect_type("error", WAIT).await?;
    assert_eq!(err["message"], "you are not a player in this game");

    back.close().await?;
    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}
