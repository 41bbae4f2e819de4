use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::{DatabaseConfig, ServerConfig};
use models::{bootstrap, ConnectionState, StorageStatus};
use serde_json::{json, Value};
use tower::Service;

use server::{startup, ServerState};

async fn build_state() -> anyhow::Result<ServerState> {
    let storage = bootstrap::open(&DatabaseConfig::in_memory()).await?;
    startup::init_schema(&storage.conn).await;
    Ok(ServerState::new(storage.conn, storage.status, "development"))
}

async fn build_app() -> anyhow::Result<Router> {
    Ok(startup::app(build_state().await?, &ServerConfig::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

#[tokio::test]
async fn banner_reports_environment() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "GET", "/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Student Course Management API is running", "env": "development"}));
    Ok(())
}

#[tokio::test]
async fn health_reports_connected_storage() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["test_result"], 1);
    assert_eq!(body["storage"]["state"], "connected");
    assert_eq!(body["storage"]["degraded"], false);
    Ok(())
}

#[tokio::test]
async fn health_stays_200_when_database_is_gone() -> anyhow::Result<()> {
    let state = build_state().await?;
    let db = state.db.clone();
    let app = startup::app(state, &ServerConfig::default());
    db.close().await?;

    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], "disconnected");
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_surfaces_fallback_mode() -> anyhow::Result<()> {
    let storage = bootstrap::open(&DatabaseConfig::in_memory()).await?;
    let status = StorageStatus { state: ConnectionState::FallbackActive, attempts: 5, ..storage.status };
    let app = startup::app(ServerState::new(storage.conn, status, "production"), &ServerConfig::default());

    let (_, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(body["storage"]["state"], "fallback_active");
    assert_eq!(body["storage"]["attempts"], 5);
    assert_eq!(body["storage"]["degraded"], true);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_with_400() -> anyhow::Result<()> {
    let app = build_app().await?;
    let jane = json!({"name": "Jane Smith", "email": "jane@example.com"});

    let (status, body) = send(&app, "POST", "/students/", Some(jane)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);

    let (status, body) = send(&app, "POST", "/students", Some(json!({"name": "J. Smith", "email": "jane@example.com"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");

    let (status, body) = send(&app, "POST", "/students", Some(json!({"name": "J. Smith", "email": "jane@EXAMPLE.com"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");
    Ok(())
}

#[tokio::test]
async fn malformed_input_is_rejected_before_storage() -> anyhow::Result<()> {
    let app = build_app().await?;

    let (status, _) = send(&app, "POST", "/students/", Some(json!({"name": "Jane", "email": "not-an-email"}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send(&app, "POST", "/students/", Some(json!({"name": "Jane"}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send(&app, "POST", "/courses/", Some(json!({"title": ""}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, body) = send(&app, "GET", "/students/abc", None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation Error");
    let (status, _) = send(&app, "GET", "/students/?skip=-1", None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let req = Request::builder()
        .method("POST")
        .uri("/students/")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/students/", None).await?;
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn enroll_reports_missing_student_before_course() -> anyhow::Result<()> {
    let app = build_app().await?;

    let (status, body) = send(&app, "POST", "/enroll/", Some(json!({"student_id": 1, "course_id": 1}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Student not found");

    send(&app, "POST", "/students/", Some(json!({"name": "Jane", "email": "jane@example.com"}))).await?;
    let (status, body) = send(&app, "POST", "/enroll/", Some(json!({"student_id": 1, "course_id": 1}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Course not found");

    let (status, body) = send(&app, "GET", "/courses/9", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Course not found");
    Ok(())
}

#[tokio::test]
async fn enrollment_is_visible_from_both_sides_without_recursion() -> anyhow::Result<()> {
    let app = build_app().await?;
    send(&app, "POST", "/students/", Some(json!({"name": "Jane Smith", "email": "jane@example.com"}))).await?;
    send(&app, "POST", "/courses/", Some(json!({"title": "Web Development", "description": "Learn web development basics"}))).await?;

    let (status, _) = send(&app, "POST", "/enroll", Some(json!({"student_id": 1, "course_id": 1}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, "POST", "/enroll/", Some(json!({"student_id": 1, "course_id": 1}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Student already enrolled in this course");

    let (_, student) = send(&app, "GET", "/students/1", None).await?;
    assert_eq!(student["courses"][0]["title"], "Web Development");
    assert!(student["courses"][0].get("students").is_none());

    let (_, course) = send(&app, "GET", "/courses/1", None).await?;
    assert_eq!(course["students"][0]["email"], "jane@example.com");
    assert!(course["students"][0].get("courses").is_none());

    let (_, list) = send(&app, "GET", "/enrollments/", None).await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn lists_page_in_insertion_order() -> anyhow::Result<()> {
    let app = build_app().await?;
    for i in 0..5 {
        send(&app, "POST", "/courses", Some(json!({"title": format!("C{i}")}))).await?;
    }

    let (status, body) = send(&app, "GET", "/courses/?skip=1&limit=2", None).await?;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body.as_array().unwrap().iter().map(|c| c["title"].as_str().unwrap().to_string()).collect();
    assert_eq!(titles, vec!["C1", "C2"]);

    let (_, body) = send(&app, "GET", "/courses/?skip=50", None).await?;
    assert_eq!(body, json!([]));
    let (_, body) = send(&app, "GET", "/courses", None).await?;
    assert_eq!(body.as_array().map(Vec::len), Some(5));
    Ok(())
}

#[tokio::test]
async fn oversized_paging_values_return_pages_not_errors() -> anyhow::Result<()> {
    let app = build_app().await?;
    send(&app, "POST", "/students/", Some(json!({"name": "Jane", "email": "jane@example.com"}))).await?;
    send(&app, "POST", "/courses/", Some(json!({"title": "Rust"}))).await?;

    let (status, body) = send(&app, "GET", "/students/?skip=18446744073709551615", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, "GET", "/courses/?limit=9223372036854775808", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = send(&app, "GET", "/enrollments/?skip=18446744073709551615&limit=18446744073709551615", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "GET", "/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/enroll/"]["post"].is_object());
    Ok(())
}
