use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    export::{content_disposition, export_filename, render_document},
    models::{GenerationReport, GenerationRequest, Language, Style},
    orchestrator::{GenerateError, Orchestrator},
    pdf::{generate_pdf, ExportError},
};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::Generate(GenerateError::Validation(_)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "validation", "message": message })),
            )
                .into_response(),
            ApiError::Generate(GenerateError::TotalFailure { failures }) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "total_failure", "message": message, "failures": failures })),
            )
                .into_response(),
            ApiError::Export(_) => {
                tracing::error!("❌ Export failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "export", "message": message }))).into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/options", get(options))
        .route("/api/generate", post(generate))
        .route("/api/export", post(export_text))
        .route("/api/export/pdf", post(export_pdf))
        .layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

pub async fn options() -> Json<serde_json::Value> {
    Json(json!({ "languages": Language::ALL, "styles": Style::ALL }))
}

pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerationRequest>,
) -> Result<Json<GenerationReport>, ApiError> {
    tracing::info!("🎯 Copy requested for product: {}", body.product_name);
    let report = state.orchestrator.generate_all(&body).await?;
    Ok(Json(report))
}

fn attachment(content_type: &str, filename: &str, body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(filename)),
        ],
        body,
    )
        .into_response()
}

pub async fn export_text(Json(report): Json<GenerationReport>) -> Response {
    let filename = export_filename(&report.request.product_name, report.generated_at, "txt");
    tracing::info!("📄 Exporting {}", filename);
    attachment("text/plain; charset=utf-8", &filename, render_document(&report).into_bytes())
}

pub async fn export_pdf(Json(report): Json<GenerationReport>) -> Result<Response, ApiError> {
    let filename = export_filename(&report.request.product_name, report.generated_at, "pdf");
    tracing::info!("📄 Exporting {}", filename);
    let bytes = generate_pdf(&report)?;
    Ok(attachment("application/pdf", &filename, bytes))
}
