// tests/http_endpoints.rs

mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::fake_installer::{FakeInstaller, FakeScript};
use crate::common::{init_tracing, wait_for_completion};

use std::error::Error;
use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use installer_shim::build_orchestrator;
use installer_shim::engine::Orchestrator;
use installer_shim::server::{router, AppState};

type TestResult = Result<(), Box<dyn Error>>;

fn build_app(prompts: &[&str], fake: &FakeInstaller, index_page: &str) -> (Router, Arc<Orchestrator>) {
    let cfg = ConfigFileBuilder::new()
        .with_prompts(prompts)
        .with_index_page(index_page)
        .build();
    let orchestrator = build_orchestrator(&cfg, Arc::new(fake.clone()));
    let state = AppState::new(Arc::clone(&orchestrator), cfg.server.index_page.clone());
    (router(state), orchestrator)
}

async fn get_json(app: &Router, uri: &str) -> Result<(StatusCode, Value), Box<dyn Error>> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

async fn post_answer(app: &Router, body: &str) -> Result<(StatusCode, Value), Box<dyn Error>> {
    let request = Request::builder()
        .method("POST")
        .uri("/start_installation")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?;
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn progress_before_any_run_is_the_waiting_snapshot() -> TestResult {
    init_tracing();

    let fake = FakeInstaller::new(FakeScript::new(&[], 0));
    let (app, _orch) = build_app(&["Hostname?"], &fake, "index.html");

    let (status, body) = get_json(&app, "/progress").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "progress": 0,
            "status": "Waiting to start...",
            "complete": false,
            "current_prompt": "Hostname?",
        })
    );
    Ok(())
}

#[tokio::test]
async fn answering_every_prompt_over_http_runs_the_installer() -> TestResult {
    init_tracing();

    let fake = FakeInstaller::new(FakeScript::new(&["step1", "step2"], 0));
    let (app, orch) = build_app(&["Hostname?", "Username?"], &fake, "index.html");

    let (status, body) = post_answer(&app, r#"{"hostname": "box"}"#).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "next_prompt", "prompt": "Username?"}));

    let (status, body) = post_answer(&app, r#"{"username": "alice"}"#).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "started"}));

    wait_for_completion(orch.store()).await;
    let (_, body) = get_json(&app, "/progress").await?;
    assert_eq!(
        body,
        json!({
            "progress": 100,
            "status": "Installation completed successfully!",
            "complete": true,
            "current_prompt": null,
        })
    );
    assert_eq!(fake.payloads(), vec!["box\nalice\n".to_string()]);
    Ok(())
}

#[tokio::test]
async fn installer_failure_is_reported_as_content_not_transport_error() -> TestResult {
    init_tracing();

    let fake = FakeInstaller::new(FakeScript::missing());
    let (app, orch) = build_app(&[], &fake, "index.html");

    let (status, body) = post_answer(&app, "{}").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "started"}));

    wait_for_completion(orch.store()).await;
    let (status, body) = get_json(&app, "/progress").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["complete"], json!(true));
    let text = body["status"].as_str().unwrap_or_default();
    assert!(text.starts_with("Installation failed to start:"), "{text}");
    Ok(())
}

#[tokio::test]
async fn submitting_while_running_is_a_benign_rejection() -> TestResult {
    init_tracing();

    let fake = FakeInstaller::gated(FakeScript::new(&[], 0));
    let (app, orch) = build_app(&["Only?"], &fake, "index.html");

    let (_, body) = post_answer(&app, r#"{"a": "1"}"#).await?;
    assert_eq!(body, json!({"status": "started"}));

    let (status, body) = post_answer(&app, "this is not json").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "rejected", "reason": "installation already running"})
    );

    fake.release();
    wait_for_completion(orch.store()).await;
    assert_eq!(fake.launches(), 1);
    Ok(())
}

#[tokio::test]
async fn index_page_is_served_as_html() -> TestResult {
    init_tracing();

    let mut page = NamedTempFile::new()?;
    write!(page, "<html><body>installer</body></html>")?;
    let path = page.path().to_string_lossy().to_string();

    let fake = FakeInstaller::new(FakeScript::new(&[], 0));
    let (app, _orch) = build_app(&[], &fake, &path);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some(&b"text/html"[..])
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..], b"<html><body>installer</body></html>");
    Ok(())
}

#[tokio::test]
async fn missing_index_page_is_not_found() -> TestResult {
    init_tracing();

    let fake = FakeInstaller::new(FakeScript::new(&[], 0));
    let (app, _orch) = build_app(&[], &fake, "/definitely/not/here/index.html");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
