use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use edugenius_core::{PipelineError, StudyEngine, StudyGuide};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("../static/index.html");

// --- Shared State ---
pub struct AppState {
    pub engine: StudyEngine,
}

// --- Protocol Types (matching frontend) ---
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    prompt: String,
}

/// `{success: true, data}` or `{success: false, error}`.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<StudyGuide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiEnvelope {
    fn ok(data: StudyGuide) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/generate", post(generate_handler))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

// --- Health Check ---
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "EduGenius API",
        "version": "2.0"
    }))
}

async fn generate_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Json<ApiEnvelope> {
    let request_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(request_id = %request_id, error = %rejection.body_text(), "Rejected /generate payload");
            return Json(ApiEnvelope::fail(format!(
                "Server error: {}",
                rejection.body_text()
            )));
        }
    };

    let prompt = request.prompt.trim().to_string();
    if prompt.is_empty() {
        return Json(ApiEnvelope::fail(PipelineError::EmptyPrompt.to_string()));
    }

    info!(request_id = %request_id, prompt = %prompt, "Processing generate request");

    // Run the pipeline in its own task so a panic becomes an error envelope.
    let engine = state.engine.clone();
    let handle = tokio::spawn(async move { engine.generate(&prompt).await });

    match handle.await {
        Ok(Ok(guide)) => {
            info!(
                request_id = %request_id,
                sources = guide.sources.len(),
                "Study guide delivered"
            );
            Json(ApiEnvelope::ok(guide))
        }
        Ok(Err(e)) => {
            warn!(request_id = %request_id, stage = e.stage(), error = %e, "Pipeline failed");
            Json(ApiEnvelope::fail(e.to_string()))
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Pipeline task panicked/aborted");
            Json(ApiEnvelope::fail(format!("Server error: {}", e)))
        }
    }
}
