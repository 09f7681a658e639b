//! Integration tests for the live SMS feed: the event stream, the inbound
//! webhook, and JSON publishing.

mod common;

use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use common::{body_bytes, body_json, get, next_frame, parse_data_frame, post_form, send_json};
use serde_json::json;

const STREAM: &str = "/api/v1/sms/stream";
const WEBHOOK: &str = "/api/v1/webhooks/sms";

// ---------------------------------------------------------------------------
// Test: stream response carries event-stream headers and registers a subscriber
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stream_opens_with_event_stream_headers() {
    let (app, state) = common::build_test_app();

    let response = get(app, STREAM).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
    assert_eq!(response.headers().get("cache-control").unwrap(), "no-cache, no-transform");
    assert_eq!(state.event_hub.subscriber_count(), 1);

    // Dropping the response body is the disconnect signal.
    drop(response);
    assert_eq!(state.event_hub.subscriber_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: inbound webhook is relayed to an open stream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inbound_webhook_is_relayed_to_stream() {
    let (app, _) = common::build_test_app();
    let mut stream = get(app.clone(), STREAM).await.into_body();

    let response = post_form(
        app,
        WEBHOOK,
        "From=%2B15550001&To=%2B15550002&Body=hello+there&MessageSid=SM42",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "application/xml");
    let reply = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(reply.contains("<Response></Response>"));

    let frame = next_frame(&mut stream).await.expect("event frame");
    let event = parse_data_frame(&frame);
    assert_eq!(event["type"], "sms");
    assert_eq!(event["from"], "+15550001");
    assert_eq!(event["to"], "+15550002");
    assert_eq!(event["body"], "hello there");
    assert_eq!(event["direction"], "inbound");
    assert_eq!(event["raw"]["MessageSid"], "SM42");
}

#[tokio::test]
async fn webhook_without_sender_returns_400() {
    let (app, _) = common::build_test_app();

    let response = post_form(app, WEBHOOK, "To=%2B15550002&Body=hi").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn webhook_with_no_listeners_still_acknowledges() {
    let (app, state) = common::build_test_app();

    let response = post_form(app, WEBHOOK, "From=a&To=b&Body=nobody+home").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.event_hub.subscriber_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: two streams receive, then only the one still open
// ---------------------------------------------------------------------------

#[tokio::test]
async fn closed_stream_stops_receiving() {
    let (app, state) = common::build_test_app();
    let mut stream_a = get(app.clone(), STREAM).await.into_body();
    let mut stream_b = get(app.clone(), STREAM).await.into_body();
    assert_eq!(state.event_hub.subscriber_count(), 2);

    post_form(app.clone(), WEBHOOK, "From=a&To=b&Body=first").await;

    let a = parse_data_frame(&next_frame(&mut stream_a).await.unwrap());
    let b = parse_data_frame(&next_frame(&mut stream_b).await.unwrap());
    assert_eq!(a["body"], "first");
    assert_eq!(b["body"], "first");

    drop(stream_a);
    assert_eq!(state.event_hub.subscriber_count(), 1);

    post_form(app, WEBHOOK, "From=a&To=b&Body=second").await;
    let b = parse_data_frame(&next_frame(&mut stream_b).await.unwrap());
    assert_eq!(b["body"], "second");
}

// ---------------------------------------------------------------------------
// Test: JSON publish reaches subscribers and reports delivery counts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_outbound_event_reports_delivery() {
    let (app, _) = common::build_test_app();
    let mut stream = get(app.clone(), STREAM).await.into_body();

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/sms/events",
        json!({
            "from": "+15550002",
            "to": "+15550001",
            "body": "on my way",
            "direction": "outbound"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["delivered"], 1);
    assert_eq!(json["data"]["failed"], 0);

    let event = parse_data_frame(&next_frame(&mut stream).await.unwrap());
    assert_eq!(event["type"], "sms");
    assert_eq!(event["direction"], "outbound");
    assert_eq!(event["body"], "on my way");
}

#[tokio::test]
async fn publish_without_recipient_returns_400() {
    let (app, _) = common::build_test_app();

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/sms/events",
        json!({"from": "a", "to": " ", "direction": "outbound"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
