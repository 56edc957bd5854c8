// WebSocket test utilities

use std::net::TcpListener;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use fourrow::routes;
use fourrow::state::app_state::AppState;

pub async fn wait_for_connections(
    state: &AppState,
    expected: usize,
    timeout: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let hub = state.coordinator.hub();
    let start = tokio::time::Instant::now();
    loop {
        let count = hub.connected_count().await;
        if count == expected {
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(format!(
                "timeout waiting for connected_count == {expected} (got {count})"
            )
            .into());
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Start a real HTTP server on a random local port.
///
/// Returns the server handle (for a graceful stop), the bound address and
/// the join handle of the server future.
pub async fn start_test_server(
    state: AppState,
) -> Result<
    (
        actix_web::dev::ServerHandle,
        std::net::SocketAddr,
        actix_web::rt::task::JoinHandle<Result<(), std::io::Error>>,
    ),
    Box<dyn std::error::Error>,
> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let state_data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let server_handle = server.handle();
    let join = actix_web::rt::spawn(server);

    Ok((server_handle, addr, join))
}
