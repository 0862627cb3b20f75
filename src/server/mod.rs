//! HTTP surface for formsight.
//!
//! A compact axum router with three endpoints:
//!
//! - `GET /` – greeting, useful as a liveness probe.
//! - `POST /upload-pdf` – multipart form with a `file` part (PDF bytes)
//!   and a `schema` part (JSON text); runs the extraction pipeline and
//!   returns `{ filename, status, result }`.
//! - `GET /download-example-pdf` – serves a static example document when
//!   one is configured and present.
//!
//! The extractor lives in [`AppState`] and is passed to handlers through
//! axum state; there is no global service instance. Cross-origin access
//! is restricted to the single configured front-end origin.

mod config;
mod handlers;

pub use config::ServerConfig;

use crate::extract::Extractor;
use axum::extract::DefaultBodyLimit;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared per-process state, cheap to clone into each handler.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
    pub example_pdf_path: Arc<std::path::PathBuf>,
}

/// Build the application router.
///
/// `allowed_origin` must parse as a header value; anything else falls
/// back to an empty CORS allow-list (same-origin only).
pub fn create_router(state: AppState, allowed_origin: &str, max_upload_bytes: usize) -> Router {
    let cors = match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE]),
        Err(_) => {
            tracing::warn!(allowed_origin, "Invalid CORS origin; cross-origin requests disabled");
            CorsLayer::new()
        }
    };

    Router::new()
        .route("/", get(handlers::root))
        .route("/upload-pdf", post(handlers::upload_pdf))
        .route("/download-example-pdf", get(handlers::download_example_pdf))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let ServerConfig {
        host,
        port,
        allowed_origin,
        example_pdf_path,
        max_upload_bytes,
        extraction,
    } = config;
    let addr = format!("{host}:{port}");

    let state = AppState {
        extractor: Arc::new(Extractor::new(extraction)),
        example_pdf_path: Arc::new(example_pdf_path),
    };
    let app = create_router(state, &allowed_origin, max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("formsight listening on {addr}");
    axum::serve(listener, app).await
}
