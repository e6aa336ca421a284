//! # Preview Server
//!
//! Serves a [`RenderedSite`] from memory so authors can click through the
//! tutorial before publishing.
//!
//! Endpoints:
//! - `GET /health`: `{"status":"ok","pages":N}`
//! - `GET /`: temporary redirect to step 1
//! - `GET {base_path}{file}`: a rendered page, 404 otherwise

use crate::error::AppError;
use crate::site::RenderedSite;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Shared, immutable server state.
pub type SharedSite = Arc<RenderedSite>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub pages: usize,
}

async fn health_handler(State(site): State<SharedSite>) -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "ok",
        pages: site.len(),
    })
}

async fn index_handler(State(site): State<SharedSite>) -> Response {
    match site.start_href() {
        Some(href) => Redirect::temporary(href).into_response(),
        None => not_found(),
    }
}

async fn page_handler(State(site): State<SharedSite>, Path(file): Path<String>) -> Response {
    match site.get(&file) {
        Some(html) => Html(html.to_string()).into_response(),
        None => {
            tracing::debug!(file = %file, "page not found");
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>\n")).into_response()
}

/// Build the preview router.
pub fn router(site: SharedSite) -> Router {
    let page_route = format!("{}{{file}}", site.base_path());

    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(index_handler))
        .route(&page_route, get(page_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(site)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, site: SharedSite) -> Result<(), AppError> {
    let app = router(site);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::io(addr.to_string(), e))?;

    tracing::info!(%addr, "preview server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::io(addr.to_string(), e))?;

    tracing::info!("preview server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
