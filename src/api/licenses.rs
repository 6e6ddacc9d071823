use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    routing::{get, put},
};

use super::{ApiError, AppState};
use crate::model::{CategorySummary, LicenseRecord, LicenseUpdate};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/licenses", get(list_licenses))
        .route("/licenses/{license_id}", put(update_license))
        .route("/summary", get(get_summary))
}

async fn list_licenses(State(svc): State<AppState>) -> Result<Json<Vec<LicenseRecord>>, ApiError> {
    Ok(Json(svc.list_all().await?))
}

async fn get_summary(State(svc): State<AppState>) -> Result<Json<Vec<CategorySummary>>, ApiError> {
    Ok(Json(svc.summarize().await?))
}

async fn update_license(
    State(svc): State<AppState>,
    license_id: Result<Path<i64>, PathRejection>,
    update: Result<Json<LicenseUpdate>, JsonRejection>,
) -> Result<Json<LicenseRecord>, ApiError> {
    let Path(license_id) = license_id.map_err(|e| ApiError::unprocessable(e.body_text()))?;
    let Json(update) = update.map_err(|e| ApiError::unprocessable(e.body_text()))?;
    Ok(Json(svc.update(license_id, update).await?))
}
