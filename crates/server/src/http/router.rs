use super::error::{ApiError, ErrorBody, INTERNAL_ERROR_MESSAGE};
use super::handlers::{health, webhook};
use crate::state::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook::handle_webhook))
        .route("/health", get(health::health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!("Handler panicked: {}", details);

    let body = ErrorBody {
        error: INTERNAL_ERROR_MESSAGE.to_string(),
        details: Some(details),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
