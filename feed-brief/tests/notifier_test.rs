mod common;

use common::init_tracing;
use feed_brief::notifier::format_message;
use feed_brief::types::BriefError;
use feed_brief::{Brief, Notifier, WeComNotifier};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_format_message() {
    let brief = Brief::new("新闻", "一条简讯。");
    assert_eq!(
        format_message("Title", &brief, "https://blog.example.com/p"),
        "【新闻】Title\n一条简讯。\n\n[阅读原文](https://blog.example.com/p)"
    );
}

#[tokio::test]
async fn test_delivers_markdown_payload() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({
            "msgtype": "markdown",
            "markdown": { "content": "hello" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0, "errmsg": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WeComNotifier::new(Some(format!("{}/hook", server.uri()))).unwrap();
    notifier.notify("hello").await.unwrap();
}

#[tokio::test]
async fn test_nonzero_errcode_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 93000, "errmsg": "invalid webhook" })))
        .mount(&server)
        .await;

    let notifier = WeComNotifier::new(Some(server.uri())).unwrap();
    let err = notifier.notify("hello").await.unwrap_err();
    assert!(matches!(err, BriefError::Notification(_)));
}

#[tokio::test]
async fn test_server_error_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "errcode": 0 })))
        .mount(&server)
        .await;

    let notifier = WeComNotifier::new(Some(server.uri())).unwrap();
    assert!(notifier.notify("hello").await.is_err());
}

#[tokio::test]
async fn test_missing_webhook_is_a_failure() {
    let notifier = WeComNotifier::new(None).unwrap();
    let err = notifier.notify("hello").await.unwrap_err();
    assert!(matches!(err, BriefError::Notification(_)));
}
