//! HTTP surface integration tests: routing, identity extraction, status
//! mapping, and error bodies

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use confab::backend::routes::create_router;
use confab::backend::server::state::AppState;
use confab::backend::service::ConversationService;
use common::{direct_conversation, send_text, test_service, uid};

async fn test_app() -> (axum::Router, ConversationService) {
    let service = test_service().await;
    let app = create_router(AppState::new(service.clone()));
    (app, service)
}

fn request(method: &str, uri: &str, user: Option<Uuid>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.to_string());
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_identity_is_401() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(request("GET", "/api/conversations", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_conversation_returns_201() {
    let (app, _) = test_app().await;
    let creator = uid();

    let response = app
        .oneshot(request(
            "POST",
            "/api/conversations",
            Some(creator),
            Some(json!({ "member_ids": [uid()], "is_group": false })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["created_by"], json!(creator.to_string()));
    assert_eq!(body["members"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn group_without_name_is_400() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(request(
            "POST",
            "/api/conversations",
            Some(uid()),
            Some(json!({ "member_ids": [uid(), uid()], "is_group": true })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["status"], json!(400));
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn hidden_and_missing_conversations_are_indistinguishable() {
    let (app, service) = test_app().await;
    let (a, b, outsider) = (uid(), uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;

    let hidden = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/conversations/{}", conversation.id),
            Some(outsider),
            None,
        ))
        .await
        .unwrap();
    let missing = app
        .oneshot(request(
            "GET",
            &format!("/api/conversations/{}", uid()),
            Some(outsider),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_json(hidden).await, response_json(missing).await);
}

#[tokio::test]
async fn unauthorized_edit_is_403() {
    let (app, service) = test_app().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "mine").await;

    let response = app
        .oneshot(request(
            "PATCH",
            &format!("/api/messages/{}", message.id),
            Some(b),
            Some(json!({ "body": "not yours" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn send_and_mark_read_flow() {
    let (app, service) = test_app().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;

    let send = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/conversations/{}/messages", conversation.id),
            Some(a),
            Some(json!({ "body": "hi" })),
        ))
        .await
        .unwrap();
    assert_eq!(send.status(), StatusCode::CREATED);
    let message = response_json(send).await;
    let message_id = message["id"].as_str().unwrap().to_string();

    let mark = app
        .oneshot(request(
            "POST",
            &format!("/api/conversations/{}/read", conversation.id),
            Some(b),
            Some(json!({ "last_read_message_id": message_id })),
        ))
        .await
        .unwrap();
    assert_eq!(mark.status(), StatusCode::OK);
    assert_eq!(response_json(mark).await, json!({ "updated": true }));
}

#[tokio::test]
async fn summary_reports_unavailable_without_collaborator() {
    let (app, service) = test_app().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;

    let response = app
        .oneshot(request(
            "GET",
            &format!("/api/conversations/{}/summary", conversation.id),
            Some(a),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({ "available": false, "summary": null })
    );
}

#[tokio::test]
async fn delete_reports_whether_anything_changed() {
    let (app, service) = test_app().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "bye").await;

    let first = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/messages/{}", message.id),
            Some(a),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response_json(first).await, json!({ "deleted": true }));

    let second = app
        .oneshot(request(
            "DELETE",
            &format!("/api/messages/{}", message.id),
            Some(a),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response_json(second).await, json!({ "deleted": false }));
}

#[tokio::test]
async fn unknown_route_falls_back_to_404() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(request("GET", "/api/nonsense", Some(uid()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
