//! Location endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use invtrack_common::db;
use invtrack_common::models::Location;
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub name: String,
}

/// GET /api/locations
pub async fn list_locations(State(state): State<AppState>) -> ApiResult<Json<Vec<Location>>> {
    Ok(Json(db::list_locations(&state.db).await?))
}

/// GET /api/locations/:id
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Location>> {
    db::get_location(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Location {}", id)))
}

/// POST /api/locations
///
/// 409 when a location with the same name (ignoring case) exists.
pub async fn create_location(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LocationRequest>,
) -> ApiResult<(StatusCode, Json<Location>)> {
    let location = db::create_location(&state.db, &request.name).await?;
    info!("✓ Location added: {}", location.name);
    Ok((StatusCode::CREATED, Json(location)))
}

/// PUT /api/locations/:id
pub async fn rename_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<LocationRequest>,
) -> ApiResult<Json<Location>> {
    Ok(Json(db::rename_location(&state.db, &id, &request.name).await?))
}

/// DELETE /api/locations/:id
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    db::delete_location(&state.db, &id).await?;
    info!("✓ Location deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
