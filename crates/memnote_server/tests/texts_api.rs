use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use memnote_core::db::{build_pool, DbLocation};
use memnote_core::Note;
use memnote_server::{app, NoteStore};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn memory_app() -> Router {
    app(NoteStore::open(&DbLocation::Memory, 1).unwrap())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn list(app: &Router) -> Vec<Note> {
    let (status, body) = send(app, empty_request(Method::GET, "/texts")).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

fn error_message(body: &str) -> String {
    let value: Value = serde_json::from_str(body).unwrap();
    value["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn list_starts_empty() {
    let app = memory_app();
    let (status, body) = send(&app, empty_request(Method::GET, "/texts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn create_update_delete_flow() {
    let app = memory_app();

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/texts", json!({ "text": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "Text created");

    let notes = list(&app).await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "hi");
    let id = notes[0].id;

    let (status, body) = send(
        &app,
        json_request(Method::PUT, &format!("/texts/{id}"), json!({ "text": "bye" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Text updated");

    let notes = list(&app).await;
    assert_eq!(notes, vec![Note::new(id, "bye")]);

    let (status, body) = send(&app, empty_request(Method::DELETE, &format!("/texts/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Text deleted");

    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn list_renders_note_shape() {
    let app = memory_app();
    send(
        &app,
        json_request(Method::POST, "/texts", json!({ "text": "shape" })),
    )
    .await;

    let (_, body) = send(&app, empty_request(Method::GET, "/texts")).await;
    let value: Value = serde_json::from_str(&body).unwrap();
    let item = &value[0];
    assert_eq!(item["message"], "shape");
    let id = item["id"].as_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn blank_create_is_rejected_and_not_persisted() {
    let app = memory_app();

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/texts", json!({ "text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Text cannot be blank");
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn legacy_plain_text_put_creates_note() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/texts")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("from the old client"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "Text created");

    let notes = list(&app).await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "from the old client");
}

#[tokio::test]
async fn legacy_plain_text_put_rejects_blank_body() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/texts")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("\n"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Text cannot be blank");
}

#[tokio::test]
async fn update_with_malformed_id_is_bad_request() {
    let app = memory_app();

    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/texts/123", json!({ "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Invalid UUID format"));
}

#[tokio::test]
async fn update_with_blank_text_is_bad_request() {
    let app = memory_app();
    let id = Uuid::new_v4();

    let (status, body) = send(
        &app,
        json_request(Method::PUT, &format!("/texts/{id}"), json!({ "text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Text cannot be blank");
}

#[tokio::test]
async fn delete_with_malformed_id_is_bad_request() {
    let app = memory_app();

    let (status, body) = send(&app, empty_request(Method::DELETE, "/texts/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Invalid UUID format"));
}

#[tokio::test]
async fn missing_id_mutations_report_plain_success() {
    let app = memory_app();
    send(
        &app,
        json_request(Method::POST, "/texts", json!({ "text": "survivor" })),
    )
    .await;
    let missing = Uuid::new_v4();

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/texts/{missing}"),
            json!({ "text": "ghost" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Text updated");

    let (status, body) =
        send(&app, empty_request(Method::DELETE, &format!("/texts/{missing}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Text deleted");

    let notes = list(&app).await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "survivor");
}

#[tokio::test]
async fn unreadable_json_is_bad_request_with_error_body() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/texts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"text\":"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&body).is_empty());

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/texts", json!({ "message": "wrong field" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = memory_app();
    let payload = "x".repeat(2 * 1024 * 1024);
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/texts")
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn storage_failure_maps_to_internal_error() {
    let pool = build_pool(&DbLocation::Memory, 1).unwrap();
    pool.get()
        .unwrap()
        .execute_batch("DROP TABLE notes;")
        .unwrap();
    let app = app(NoteStore::from_pool(pool));

    let (status, body) = send(&app, empty_request(Method::GET, "/texts")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "storage unavailable");
}

#[tokio::test]
async fn file_backed_store_keeps_notes_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let location = DbLocation::File(dir.path().join("notes.db"));

    let first = app(NoteStore::open(&location, 4).unwrap());
    send(
        &first,
        json_request(Method::POST, "/texts", json!({ "text": "durable" })),
    )
    .await;
    drop(first);

    let second = app(NoteStore::open(&location, 4).unwrap());
    let notes = list(&second).await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "durable");
}

#[tokio::test]
async fn blank_id_routes_are_bad_request() {
    let app = memory_app();

    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/texts/%20", json!({ "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "ID cannot be blank");

    let (status, body) = send(&app, empty_request(Method::DELETE, "/texts/%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "ID cannot be blank");
}

#[tokio::test]
async fn invalid_input_is_rejected_while_every_connection_is_busy() {
    let pool = build_pool(&DbLocation::Memory, 1).unwrap();
    let _only_connection = pool.get().unwrap();
    let app = app(NoteStore::from_pool(pool.clone()));

    let started_at = std::time::Instant::now();
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/texts", json!({ "text": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Text cannot be blank");

    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/texts/123", json!({ "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Invalid UUID format"));

    let (status, _) = send(&app, empty_request(Method::DELETE, "/texts/123")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(started_at.elapsed() < std::time::Duration::from_secs(1));
}

#[tokio::test]
async fn invalid_utf8_body_and_path_use_error_body() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/texts")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(vec![0xff, 0xfe, 0xfd]))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&body).is_empty());

    let (status, body) = send(&app, empty_request(Method::DELETE, "/texts/%FF")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&body).is_empty());
    assert!(list(&app).await.is_empty());
}
