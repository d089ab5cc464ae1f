//! HTTP-level tests for the answering service, run against the router with
//! fake model clients.

mod common;

use std::sync::atomic::Ordering;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{harness, Reply, PASSAGES};
use medai::api::error::MISSING_QUESTION;
use medai::api::router;

async fn send(app: Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn ask_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_home_returns_fixed_shape() {
    let h = harness(Reply::Echo);
    let (status, body) = send(router(h.state), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["message"], "Medical RAG API is running!");
    assert!(json["endpoints"]["/ask (POST)"].is_string());
    assert_eq!(json.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_ask_returns_question_and_answer() {
    let h = harness(Reply::Fixed("Iron supplements and rest."));
    let (status, body) = send(
        router(h.state),
        ask_request(r#"{"question": "How is anemia treated?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json,
        json!({"question": "How is anemia treated?", "answer": "Iron supplements and rest."})
    );
}

#[tokio::test]
async fn test_ask_prompt_contains_top_four_passages_in_order() {
    let h = harness(Reply::Echo);
    let (status, body) = send(
        router(h.state),
        ask_request(r#"{"question": "What is anemia?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    let answer = json["answer"].as_str().unwrap();

    let expected_context = PASSAGES[..4]
        .iter()
        .map(|(content, _)| *content)
        .collect::<Vec<_>>()
        .join("\n\n");
    assert!(answer.contains(&expected_context), "answer was: {answer}");
    assert!(!answer.contains(PASSAGES[4].0));
    assert!(answer.ends_with("Question: What is anemia?\n"));
}

#[tokio::test]
async fn test_ask_missing_question_is_rejected_without_model_call() {
    let h = harness(Reply::Echo);
    let (status, body) = send(
        router(h.state.clone()),
        ask_request(r#"{"query": "What is anemia?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, json!({ "error": MISSING_QUESTION }));

    assert_eq!(h.generator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(*h.notifier.sent.lock(), vec![MISSING_QUESTION]);
}

#[tokio::test]
async fn test_ask_rejects_blank_and_malformed_bodies() {
    for body in [r#"{"question": "   "}"#, "not json", r#"{"question": 42}"#, ""] {
        let h = harness(Reply::Echo);
        let (status, response) = send(router(h.state), ask_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert!(response.contains("'question' field"));
        assert_eq!(h.generator.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_ask_generation_failure_is_500_and_notified() {
    let h = harness(Reply::Fail("Gemini API returned 429: quota exceeded"));
    let (status, body) = send(
        router(h.state.clone()),
        ask_request(r#"{"question": "What is anemia?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Gemini API returned 429: quota exceeded");

    let tail = h.state.logger.tail(10);
    let last = tail.last().unwrap();
    assert!(last.notify);
    assert_eq!(last.message, "Gemini API returned 429: quota exceeded");
    assert_eq!(h.notifier.sent.lock().len(), 1);
}

#[tokio::test]
async fn test_ask_logs_question_and_answer() {
    let h = harness(Reply::Fixed("Iron supplements."));
    send(
        router(h.state.clone()),
        ask_request(r#"{"question": "How is anemia treated?"}"#),
    )
    .await;

    let messages: Vec<String> = h
        .state
        .logger
        .tail(10)
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(messages, vec!["How is anemia treated?", "Iron supplements."]);
    assert!(h.notifier.sent.lock().is_empty());
}

#[tokio::test]
async fn test_logs_endpoint_returns_plain_text_tail() {
    let h = harness(Reply::Fixed("Iron supplements."));
    let app = router(h.state.clone());
    send(
        app.clone(),
        ask_request(r#"{"question": "How is anemia treated?"}"#),
    )
    .await;
    h.state.logger.info("third entry");

    let resp = app.oneshot(get("/logs?limit=2")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("medai: Iron supplements."));
    assert!(lines[1].ends_with("medai: third entry"));
}

#[tokio::test]
async fn test_logs_default_limit() {
    let h = harness(Reply::Echo);
    for i in 0..60 {
        h.state.logger.info(format!("entry {i}"));
    }
    let (status, text) = send(router(h.state), get("/logs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text.lines().count(), 50);
    assert!(text.ends_with("entry 59\n"));
}

#[tokio::test]
async fn test_logs_unparsable_limit_uses_default() {
    let h = harness(Reply::Echo);
    for i in 0..60 {
        h.state.logger.info(format!("entry {i}"));
    }
    let app = router(h.state);

    for uri in ["/logs?limit=abc", "/logs?limit=-3"] {
        let (status, text) = send(app.clone(), get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(text.lines().count(), 50, "{uri}");
    }
}

#[tokio::test]
async fn test_cors_allows_configured_origin_only() {
    let h = harness(Reply::Echo);
    let app = router(h.state);

    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/ask")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app
        .clone()
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );

    let denied = app.oneshot(preflight("https://evil.example")).await.unwrap();
    assert!(denied
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
