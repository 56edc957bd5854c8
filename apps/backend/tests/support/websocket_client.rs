// WebSocket client utilities for testing

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// WebSocket test client
pub struct WebSocketClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketClient {
    /// Connect to a WebSocket endpoint, retrying until success or timeout.
    pub async fn connect_retry(
        url: &str,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let start = tokio::time::Instant::now();
        loop {
            match connect_async(url).await {
                Ok((stream, _)) => return Ok(Self { stream }),
                Err(err) => {
                    if start.elapsed() >= timeout {
                        return Err(Box::new(err));
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        }
    }

    /// Receive the next message with a timeout
    pub async fn recv_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<Message>, Box<dyn std::error::Error>> {
        tokio::time::timeout(timeout, self.stream.next())
            .await
            .map_err(|_| "Timeout waiting for message")?
            .transpose()
            .map_err(|e| e.into())
    }

    /// Send a text message
    pub async fn send(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.stream.send(Message::text(text.to_string())).await?;
        Ok(())
    }

    pub async fn send_json(&mut self, value: Value) -> Result<(), Box<dyn std::error::Error>> {
        self.send(&value.to_string()).await
    }

    pub async fn find_match(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.send_json(json!({"type": "find_match"})).await
    }

    pub async fn make_move(&mut self, column: i64) -> Result<(), Box<dyn std::error::Error>> {
        self.send_json(json!({"type": "make_move", "column": column}))
            .await
    }

    /// Close the connection
    pub async fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.stream.close(None).await?;
        Ok(())
    }

    /// Next JSON text frame, skipping pings and pongs.
    pub async fn recv_json_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<Value>, Box<dyn std::error::Error>> {
        loop {
            match self.recv_timeout(timeout).await? {
                Some(Message::Text(text)) => {
                    let json: Value = serde_json::from_str(&text)?;
                    return Ok(Some(json));
                }
                Some(Message::Ping(_)) | Some(Message::Pong(_)) => continue,
                Some(_) | None => return Ok(None),
            }
        }
    }

    /// Next JSON message, failing unless its `type` is `expected`.
    pub async fn expect_type(
        &mut self,
        expected: &str,
        timeout: Duration,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let msg = self
            .recv_json_timeout(timeout)
            .await?
            .ok_or("connection closed")?;
        if msg["type"] != expected {
            return Err(format!("expected {expected}, got {msg}").into());
        }
        Ok(msg)
    }
}
