//! HTTP transport: `GET /health` and `POST /predict`.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServiceConfig;
use crate::error::CareerLensError;
use crate::pipeline::inference::InferenceService;
use crate::service::protocol::{ErrorResponse, MODEL_NOT_LOADED, PredictResponse, answer};

/// Shared state injected into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: InferenceService,
    pub top_k: usize,
}

/// Library error mapped onto an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub CareerLensError);

impl From<CareerLensError> for ApiError {
    fn from(err: CareerLensError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CareerLensError::InvalidInput(_) | CareerLensError::Json(_) => StatusCode::BAD_REQUEST,
            CareerLensError::ArtifactMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            other => {
                error!("prediction failed: {other}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .with_state(state)
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model_loaded": state.service.is_ready(),
    }))
}

/// POST /predict
///
/// Takes the raw body so an unloaded model is reported before the body is
/// inspected; an empty body counts as `{}`.
async fn predict_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    if !state.service.is_ready() {
        return Err(CareerLensError::artifact_missing(MODEL_NOT_LOADED).into());
    }
    let body: Value = if body.iter().all(u8::is_ascii_whitespace) {
        json!({})
    } else {
        serde_json::from_slice(&body)?
    };

    let service = state.service.clone();
    let top_k = state.top_k;
    let response = tokio::task::spawn_blocking(move || answer(&service, &body, top_k))
        .await
        .map_err(|e| CareerLensError::other(format!("prediction task failed: {e}")))??;
    Ok(Json(response))
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError(CareerLensError::Json(err))
    }
}

/// Bind to the configured address and serve until Ctrl-C.
pub async fn serve(
    config: &ServiceConfig,
    service: InferenceService,
    top_k: usize,
) -> anyhow::Result<()> {
    if !service.is_ready() {
        info!(
            dir = %config.base_dir.display(),
            "no trained artifacts found; /predict answers 500 until restarted with a model"
        );
    }
    let app = build_router(AppState { service, top_k }).layer(TraceLayer::new_for_http());

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;
    Ok(())
}
