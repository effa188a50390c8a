use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::service::SiteAnalysisService;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub address: String,
}

/// Router builder exposing the analyze operation.
pub fn analysis_router(service: Arc<SiteAnalysisService>) -> Router {
    Router::new()
        .route("/", get(banner_handler))
        .route("/analyze", post(analyze_handler))
        .route("/api/v1/sites/analyze", post(analyze_handler))
        .with_state(service)
}

async fn banner_handler() -> Json<serde_json::Value> {
    Json(json!({
        "service": "site-analyzer",
        "status": "running",
        "endpoints": ["POST /analyze", "POST /api/v1/sites/analyze"],
    }))
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<SiteAnalysisService>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    match service.analyze(&request.address).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (err.status(), Json(payload)).into_response()
        }
    }
}
