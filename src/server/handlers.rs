// src/server/handlers.rs

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::SubmitOutcome;
use crate::state::ProgressState;

use super::AppState;

/// Body of `POST /start_installation` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StartResponse {
    NextPrompt { prompt: String },
    Started,
    Rejected { reason: String },
}

impl From<SubmitOutcome> for StartResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::NextPrompt(prompt) => StartResponse::NextPrompt { prompt },
            SubmitOutcome::Started => StartResponse::Started,
            SubmitOutcome::Rejected(reason) => StartResponse::Rejected {
                reason: reason.to_string(),
            },
        }
    }
}

pub async fn index(State(state): State<AppState>) -> Response {
    match tokio::fs::read(state.index_page.as_path()).await {
        Ok(page) => ([(header::CONTENT_TYPE, "text/html")], page).into_response(),
        Err(e) => {
            warn!(path = %state.index_page.display(), error = %e, "index page unavailable");
            (StatusCode::NOT_FOUND, "index page not found").into_response()
        }
    }
}

pub async fn progress(State(state): State<AppState>) -> Json<ProgressState> {
    Json(state.orchestrator.progress())
}

pub async fn start_installation(State(state): State<AppState>, body: Bytes) -> Json<StartResponse> {
    let answer = extract_answer(&body);
    Json(state.orchestrator.submit(answer).into())
}

/// Pull the single answer out of a request body such as `{"hostname": "box"}`.
///
/// The key is ignored. Missing or `null` values, and bodies that are not
/// JSON at all, count as an empty answer.
fn extract_answer(body: &[u8]) -> String {
    if body.iter().all(u8::is_ascii_whitespace) {
        return String::new();
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => {
            if map.len() > 1 {
                debug!(keys = map.len(), "answer body has several keys; using the first");
            }
            map.into_iter()
                .next()
                .map(|(_, value)| answer_from_value(value))
                .unwrap_or_default()
        }
        Ok(other) => answer_from_value(other),
        Err(e) => {
            warn!(error = %e, "answer body is not valid JSON; treating as empty answer");
            String::new()
        }
    }
}

fn answer_from_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
