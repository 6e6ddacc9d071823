pub mod licenses;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::consts::API_TITLE;
use crate::error::ServiceError;
use crate::service::LicenseService;

/// Shared application state.
pub type AppState = Arc<LicenseService>;

/// Build the license API router.
///
/// CORS is wide open: any origin, method, and header. There is no
/// authentication at this interface.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(licenses::routes())
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": API_TITLE }))
}

/// Error response: `{"detail": "..."}` with the mapped status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError {
                status: StatusCode::NOT_FOUND,
                detail: msg,
            },
            ServiceError::Validation(msg) => ApiError::unprocessable(msg),
            ServiceError::Storage(msg) => {
                tracing::error!(error = %msg, "storage failure");
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail: msg,
                }
            }
        }
    }
}
