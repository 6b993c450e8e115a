//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use futures::StreamExt;
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use chathub_api::AppState;
use chathub_core::config::AppConfig;
use chathub_realtime::{Hub, MessageEnvelope};

/// WebSocket client connection used by tests.
pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Hub shared with the router
    pub hub: Arc<Hub>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a test application with default settings
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with the given settings
    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(config.clone());
        let hub = state.hub.clone();
        let router = chathub_api::build_app(state);

        Self {
            router,
            hub,
            config,
        }
    }

    /// Serve the app on an ephemeral local port
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");
        let router = self.router.clone();

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });

        addr
    }

    /// Open a subscriber connection
    pub async fn subscribe(&self, addr: SocketAddr) -> Client {
        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/subscribe"))
            .await
            .expect("WebSocket handshake failed");
        client
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Vec<u8>>) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::from(body.unwrap_or_default()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }

    /// Publish a text message through the HTTP endpoint
    pub async fn publish(&self, text: &str) -> TestResponse {
        self.request("POST", "/publish", Some(text.as_bytes().to_vec()))
            .await
    }
}

/// Default test configuration, serving the repository's static directory.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string();
    config
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body (`Null` if not JSON)
    pub body: Value,
    /// Raw body text
    pub text: String,
}

/// Next delivered envelope, skipping control frames.
pub async fn next_envelope(client: &mut Client) -> MessageEnvelope {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("Timed out waiting for a message")
            .expect("Connection ended")
            .expect("WebSocket error");

        match frame {
            Message::Text(text) => {
                return MessageEnvelope::from_json(text.as_str()).expect("Invalid envelope");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Expected text frame, got {other:?}"),
        }
    }
}

/// Read until the server's close frame arrives, skipping data frames.
pub async fn next_close(client: &mut Client) -> Option<CloseFrame> {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("Timed out waiting for close");

        match frame {
            Some(Ok(Message::Close(close))) => return close,
            Some(Ok(_)) => continue,
            Some(Err(_)) | None => return None,
        }
    }
}

/// Wait until the hub has exactly `count` subscribers.
pub async fn wait_for_subscribers(hub: &Hub, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while hub.subscriber_count().await != count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Subscriber count never settled");
}
