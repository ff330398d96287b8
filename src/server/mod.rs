// src/server/mod.rs

//! HTTP boundary.
//!
//! Thin mapping from requests onto the [`Orchestrator`]. Installer failures
//! are part of the JSON payloads; every installer-related endpoint answers
//! `200 OK`.
//!
//! - `GET /` serves the configured index page.
//! - `GET /progress` returns the current [`ProgressState`](crate::state::ProgressState).
//! - `POST /start_installation` submits one answer.

pub mod handlers;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::engine::Orchestrator;
use crate::errors::Result;

pub use handlers::StartResponse;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub index_page: Arc<PathBuf>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, index_page: impl Into<PathBuf>) -> Self {
        Self {
            orchestrator,
            index_page: Arc::new(index_page.into()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/progress", get(handlers::progress))
        .route("/start_installation", post(handlers::start_installation))
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "http server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("http server stopped");
    Ok(())
}
