//! Route handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::AppState;
use super::error::ApiError;
use crate::core::schema;

/// `POST /generate-code`
pub async fn generate_code_handler(
    State(state): State<AppState>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("generate_code", %request_id);

    async move {
        let Json(body) = payload?;
        let request = schema::validate(&body)?;
        info!(
            layout = %request.layout,
            cards = request.cards.len(),
            filters = request.filters.len(),
            sections = request.chart_sections().len(),
            "Generating dashboard"
        );

        let document = state.composer.compose(&request)?;
        let disposition = format!("attachment; filename={}", document.filename);

        Ok::<_, ApiError>((
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            document.content,
        ))
    }
    .instrument(span)
    .await
}

/// `GET /health`
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

#[derive(Debug, Serialize)]
struct TemplateSummary<'a> {
    name: &'a str,
    kind: &'a str,
    placeholders: &'a [String],
}

/// `GET /templates`
pub async fn templates_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.composer.renderer().resolver().store();
    let summaries: Vec<TemplateSummary<'_>> = store
        .entries()
        .map(|entry| TemplateSummary {
            name: &entry.name,
            kind: entry.kind.as_str(),
            placeholders: &entry.placeholders,
        })
        .collect();
    Json(summaries).into_response()
}
