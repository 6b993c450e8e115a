//! Integration tests for the subscribe WebSocket endpoint.

mod helpers;

use futures::SinkExt;
use http::StatusCode;
use tokio_tungstenite::tungstenite::Message;

use chathub_realtime::MessageKind;

#[tokio::test]
async fn test_join_publish_leave_flow() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut a = app.subscribe(addr).await;
    let welcome_a = helpers::next_envelope(&mut a).await;
    assert_eq!(welcome_a.message_type, MessageKind::Welcome);
    assert!(welcome_a.message.starts_with("Welcome new user: "));

    let mut b = app.subscribe(addr).await;
    let welcome_b = helpers::next_envelope(&mut b).await;
    assert_eq!(welcome_b.message_type, MessageKind::Welcome);
    let b_name = welcome_b
        .message
        .trim_start_matches("Welcome new user: ")
        .to_string();
    assert_eq!(b_name.len(), 4);

    let seen_by_a = helpers::next_envelope(&mut a).await;
    assert_eq!(seen_by_a.message, welcome_b.message);

    let response = app.publish("hi").await;
    assert_eq!(response.status, StatusCode::ACCEPTED);

    for client in [&mut a, &mut b] {
        let envelope = helpers::next_envelope(client).await;
        assert_eq!(envelope.message, "hi");
        assert_eq!(envelope.message_type, MessageKind::Content);
    }

    b.close(None).await.expect("Failed to close");
    drop(b);

    let left = helpers::next_envelope(&mut a).await;
    assert_eq!(left.message_type, MessageKind::Leave);
    assert_eq!(left.message, format!("User Logged out: {b_name}"));

    helpers::wait_for_subscribers(&app.hub, 1).await;
}

#[tokio::test]
async fn test_inbound_data_closes_with_policy_violation() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut client = app.subscribe(addr).await;
    helpers::next_envelope(&mut client).await;

    client
        .send(Message::Text("hello?".into()))
        .await
        .expect("Failed to send");

    let close = helpers::next_close(&mut client)
        .await
        .expect("Expected a close frame");
    assert_eq!(u16::from(close.code), 1008);

    helpers::wait_for_subscribers(&app.hub, 0).await;
}

#[tokio::test]
async fn test_shutdown_closes_with_going_away() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut client = app.subscribe(addr).await;
    helpers::next_envelope(&mut client).await;

    app.hub.shutdown();

    let close = helpers::next_close(&mut client)
        .await
        .expect("Expected a close frame");
    assert_eq!(u16::from(close.code), 1001);

    helpers::wait_for_subscribers(&app.hub, 0).await;
}

#[tokio::test]
async fn test_subscribe_requires_upgrade() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/subscribe", None).await;

    assert!(
        response.status.is_client_error(),
        "Expected a 4xx for a plain GET, got {}",
        response.status
    );
}

#[tokio::test]
async fn test_static_index_served() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("/main.js"));
}
