//! HTTP surface: `POST /generate-code`, `GET /health` and `GET /templates`.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::templates::TemplateStore;
use crate::generation::LayoutComposer;

pub use error::ApiError;

/// Shared, read-only state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub composer: Arc<LayoutComposer>,
}

impl AppState {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self {
            composer: Arc::new(LayoutComposer::new(store)),
        }
    }
}

/// CORS policy: one origin, any method or header, credentials allowed.
pub fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn build_router(state: AppState, cors_origin: HeaderValue) -> Router {
    Router::new()
        .route("/generate-code", post(handlers::generate_code_handler))
        .route("/health", get(handlers::health_handler))
        .route("/templates", get(handlers::templates_handler))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
