use std::time::Duration;

use axum::http::StatusCode;

use report_relay::error::ForwardError;
use report_relay::forwarder::Forwarder;
use report_relay::models::SanitizedReport;
use report_relay::payload::build;

mod common;

fn message() -> report_relay::models::OutboundMessage {
    build(&SanitizedReport {
        brainrots: vec!["Bombardiro Crocodilo".to_string()],
        player_count: 4,
        private_server_link: "N/A".to_string(),
        player_name: "N/A".to_string(),
        username: "Souza Logger".to_string(),
        title: "Auto Souza".to_string(),
    })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn acknowledges_success_status() {
    let sink = common::start_sink(StatusCode::NO_CONTENT, Duration::ZERO).await;
    let forwarder = Forwarder::new(client(), sink.url.clone(), Duration::from_secs(10));

    let ack = forwarder.forward(&message()).await.unwrap();

    assert_eq!(ack.status, 204);
    let received = sink.messages();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["embeds"][0]["fields"][1]["value"], "4");
}

#[tokio::test]
async fn rejection_carries_status_and_is_not_retried() {
    let sink = common::start_sink(StatusCode::TOO_MANY_REQUESTS, Duration::ZERO).await;
    let forwarder = Forwarder::new(client(), sink.url.clone(), Duration::from_secs(10));

    let err = forwarder.forward(&message()).await.unwrap_err();

    assert!(matches!(err, ForwardError::SinkRejected { status: 429 }));
    assert_eq!(sink.messages().len(), 1);
}

#[tokio::test]
async fn timeout_is_unreachable() {
    let sink = common::start_sink(StatusCode::OK, Duration::from_secs(5)).await;
    let forwarder = Forwarder::new(client(), sink.url.clone(), Duration::from_millis(100));

    let err = forwarder.forward(&message()).await.unwrap_err();

    assert!(matches!(err, ForwardError::SinkUnreachable(_)));
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
    let forwarder = Forwarder::new(client(), common::dead_sink_url().await, Duration::from_secs(2));

    let err = forwarder.forward(&message()).await.unwrap_err();

    assert!(matches!(err, ForwardError::SinkUnreachable(_)));
}

#[tokio::test]
async fn unreachable_error_hides_webhook_token() {
    let dead = common::dead_sink_url().await;
    let url = dead.join("/api/webhooks/123/SECRETTOKEN").unwrap();
    let forwarder = Forwarder::new(client(), url, Duration::from_secs(2));

    let err = forwarder.forward(&message()).await.unwrap_err();
    assert!(matches!(err, ForwardError::SinkUnreachable(_)));

    let mut rendered = vec![err.to_string(), format!("{err:?}")];
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        rendered.push(cause.to_string());
        source = cause.source();
    }
    let relayed = report_relay::error::RelayError::from(err);
    rendered.push(relayed.to_string());

    for text in rendered {
        assert!(!text.contains("SECRETTOKEN"), "token leaked: {text}");
        assert!(!text.contains("/api/webhooks"), "path leaked: {text}");
    }
}
