//! HttpPlanningAgent against a local axum stand-in for the agent service.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use repair_planner_core::{AgentConfig, AgentError, HttpPlanningAgent, PlanningAgent};

#[derive(Default)]
struct FakeService {
    registered: AtomicBool,
    conflict_on_create: bool,
    reject_create: bool,
    fail_responses: bool,
    gets: AtomicUsize,
    creates: AtomicUsize,
    create_bodies: Mutex<Vec<Value>>,
    response_bodies: Mutex<Vec<Value>>,
    auth_headers: Mutex<Vec<String>>,
}

async fn get_version(
    State(svc): State<Arc<FakeService>>,
    Path((_name, version)): Path<(String, String)>,
) -> (StatusCode, Json<Value>) {
    svc.gets.fetch_add(1, Ordering::SeqCst);
    if svc.registered.load(Ordering::SeqCst) {
        (StatusCode::OK, Json(json!({ "version": version })))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
    }
}

async fn create_version(
    State(svc): State<Arc<FakeService>>,
    Path(_name): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    svc.creates.fetch_add(1, Ordering::SeqCst);
    svc.create_bodies.lock().unwrap().push(body);
    if svc.reject_create {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    if svc.conflict_on_create {
        return StatusCode::CONFLICT;
    }
    svc.registered.store(true, Ordering::SeqCst);
    StatusCode::CREATED
}

async fn create_response(
    State(svc): State<Arc<FakeService>>,
    Path(_name): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        svc.auth_headers.lock().unwrap().push(auth.to_string());
    }
    svc.response_bodies.lock().unwrap().push(body);
    if svc.fail_responses {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "overloaded" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "output": [
                { "type": "message", "content": [{ "type": "output_text", "text": "{\"title\":" }] },
                { "type": "message", "content": [{ "type": "output_text", "text": "\"Fix temp\"}" }] }
            ]
        })),
    )
}

async fn serve(svc: Arc<FakeService>) -> SocketAddr {
    let app = Router::new()
        .route("/agents/:name/versions/:version", get(get_version))
        .route("/agents/:name/versions", post(create_version))
        .route("/agents/:name/responses", post(create_response))
        .with_state(svc);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn agent_for(addr: SocketAddr) -> HttpPlanningAgent {
    HttpPlanningAgent::new(AgentConfig::new(format!("http://{addr}")).with_agent_version("7"))
        .unwrap()
}

#[tokio::test]
async fn ensure_version_registers_once_per_process() {
    let svc = Arc::new(FakeService::default());
    let agent = agent_for(serve(svc.clone()).await);

    let first = agent.ensure_version().await.unwrap();
    let second = agent.ensure_version().await.unwrap();

    assert!(first.created);
    assert_eq!(first, second);
    assert_eq!(first.version, "7");
    assert_eq!(svc.gets.load(Ordering::SeqCst), 1);
    assert_eq!(svc.creates.load(Ordering::SeqCst), 1);

    let body = &svc.create_bodies.lock().unwrap()[0];
    assert_eq!(body["version"], "7");
    assert_eq!(body["model"], "gpt-4o-mini");
    assert!(body["instructions"].as_str().unwrap().contains("JSON"));
}

#[tokio::test]
async fn existing_version_is_not_recreated() {
    let svc = Arc::new(FakeService::default());
    svc.registered.store(true, Ordering::SeqCst);
    let agent = agent_for(serve(svc.clone()).await);

    let version = agent.ensure_version().await.unwrap();

    assert!(!version.created);
    assert_eq!(svc.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn conflict_on_create_counts_as_current() {
    let svc = Arc::new(FakeService {
        conflict_on_create: true,
        ..Default::default()
    });
    let agent = agent_for(serve(svc.clone()).await);

    let version = agent.ensure_version().await.unwrap();
    assert!(!version.created);
}

#[tokio::test]
async fn failed_registration_is_retried_on_next_call() {
    let svc = Arc::new(FakeService {
        reject_create: true,
        ..Default::default()
    });
    let agent = agent_for(serve(svc.clone()).await);

    let err = agent.ensure_version().await.unwrap_err();
    assert!(matches!(err, AgentError::Registration(_)));
    assert!(agent.ensure_version().await.is_err());
    assert_eq!(svc.creates.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn invoke_sends_prompt_and_joins_output_text() {
    let svc = Arc::new(FakeService::default());
    let addr = serve(svc.clone()).await;
    let agent = HttpPlanningAgent::new(
        AgentConfig::new(format!("http://{addr}"))
            .with_agent_name("press-planner")
            .with_api_key("s3cret"),
    )
    .unwrap();

    let text = agent.invoke("plan this").await.unwrap();
    assert_eq!(text, r#"{"title":"Fix temp"}"#);

    // invoke registers the version first
    assert_eq!(svc.creates.load(Ordering::SeqCst), 1);
    let body = &svc.response_bodies.lock().unwrap()[0];
    assert_eq!(body["input"], "plan this");
    assert_eq!(body["version"], "1");
    assert_eq!(*svc.auth_headers.lock().unwrap(), vec!["Bearer s3cret"]);
}

#[tokio::test]
async fn non_success_response_is_an_http_error() {
    let svc = Arc::new(FakeService {
        fail_responses: true,
        ..Default::default()
    });
    let agent = agent_for(serve(svc).await);

    let err = agent.invoke("plan this").await.unwrap_err();
    match err {
        AgentError::Http { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("overloaded"));
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = agent_for(addr).invoke("plan this").await.unwrap_err();
    assert!(matches!(err, AgentError::Transport(_)));
}
