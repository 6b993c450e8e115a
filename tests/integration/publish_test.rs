//! Integration tests for the publish endpoint.

mod helpers;

use http::StatusCode;

use chathub_core::config::HubConfig;
use chathub_realtime::MessageKind;

#[tokio::test]
async fn test_publish_accepted() {
    let app = helpers::TestApp::new();

    let response = app.publish("hello").await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(app.hub.metrics().snapshot().messages_published, 1);
}

#[tokio::test]
async fn test_publish_reaches_registered_subscriber() {
    let app = helpers::TestApp::new();
    let (subscriber, mut queue) = app.hub.new_named_subscriber("test");
    app.hub.register(subscriber).await;

    let response = app.publish("to everyone").await;
    assert_eq!(response.status, StatusCode::ACCEPTED);

    let welcome = queue.recv().await.expect("welcome");
    assert_eq!(welcome.kind(), MessageKind::Welcome);
    let content = queue.recv().await.expect("content");
    assert_eq!(content.kind(), MessageKind::Content);
    assert_eq!(content.text(), "to everyone");
}

#[tokio::test]
async fn test_publish_get_not_allowed() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/publish", None).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_publish_body_at_limit_accepted() {
    let app = helpers::TestApp::new();

    let body = vec![b'x'; app.config.hub.max_publish_bytes];
    let response = app.request("POST", "/publish", Some(body)).await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_publish_body_over_limit_rejected() {
    let app = helpers::TestApp::new();

    let body = vec![b'x'; app.config.hub.max_publish_bytes + 1];
    let response = app.request("POST", "/publish", Some(body)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.body["error"], "PAYLOAD_TOO_LARGE");
    assert_eq!(app.hub.metrics().snapshot().messages_published, 0);
}

#[tokio::test]
async fn test_rejected_body_not_delivered() {
    let app = helpers::TestApp::new();
    let (subscriber, mut queue) = app.hub.new_named_subscriber("test");
    app.hub.register(subscriber).await;

    let body = vec![b'x'; app.config.hub.max_publish_bytes + 1];
    let response = app.request("POST", "/publish", Some(body)).await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);

    assert_eq!(queue.recv().await.expect("welcome").kind(), MessageKind::Welcome);
    assert!(queue.try_recv().is_err());
}

#[tokio::test]
async fn test_publish_limit_follows_config() {
    let mut config = helpers::test_config();
    config.hub = HubConfig {
        max_publish_bytes: 4,
        ..HubConfig::default()
    };
    let app = helpers::TestApp::with_config(config);

    assert_eq!(app.publish("four").await.status, StatusCode::ACCEPTED);
    assert_eq!(
        app.publish("fives").await.status,
        StatusCode::PAYLOAD_TOO_LARGE
    );
}

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}
