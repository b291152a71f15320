//! OCR HTTP service.
//!
//! Routes:
//!   GET  /        frontend from `server.static_dir`, or a status message
//!   GET  /health  liveness probe
//!   POST /ocr     recognize an uploaded image, optionally filtered to invoice records

mod error;
mod routes;
mod worker;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use escaner_core::models::config::ServerConfig;
use escaner_core::LineItemExtractor;

pub use error::ApiError;
pub use worker::OcrWorker;

/// State shared by all routes.
#[derive(Clone)]
pub struct AppState {
    pub ocr: OcrWorker,
    pub extractor: Arc<LineItemExtractor>,
    pub max_image_size: u32,
}

impl AppState {
    pub fn new(ocr: OcrWorker, extractor: LineItemExtractor, max_image_size: u32) -> Self {
        Self {
            ocr,
            extractor: Arc::new(extractor),
            max_image_size,
        }
    }
}

/// Build the service router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/ocr", post(routes::ocr))
        .route("/health", get(routes::health));

    let router = match &config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.route("/", get(routes::root)),
    };

    router
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: permissive when `*` is listed, otherwise only the given origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Bind and serve until Ctrl-C.
pub async fn run(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "OCR server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
